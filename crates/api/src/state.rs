use mongodb::Database;
use agrocoop_config::Settings;
use agrocoop_services::{
    AuthService, BlobStore, FanoutService,
    dao::{
        company::CompanyDao, project::ProjectDao, resource::ResourceDao, user::UserDao,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub companies: Arc<CompanyDao>,
    pub projects: Arc<ProjectDao>,
    pub resources: Arc<ResourceDao>,
    pub fanout: Arc<FanoutService>,
    pub storage: Arc<BlobStore>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let users = Arc::new(UserDao::new(&db));
        let companies = Arc::new(CompanyDao::new(&db));
        let projects = Arc::new(ProjectDao::new(&db));
        let resources = Arc::new(ResourceDao::new(
            &db,
            settings.storage.low_stock_threshold,
        ));
        let fanout = Arc::new(FanoutService::new(&db));
        let storage = Arc::new(BlobStore::new(settings.storage.upload_dir.clone()));

        Self {
            db,
            settings,
            auth,
            users,
            companies,
            projects,
            resources,
            fanout,
            storage,
        }
    }
}
