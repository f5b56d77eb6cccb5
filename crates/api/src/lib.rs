pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (no company prefix)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/refresh", post(routes::auth::refresh))
        .route("/me", get(routes::auth::me));

    // Company routes
    let company_routes = Router::new()
        .route("/{company_id}", get(routes::company::get))
        .route(
            "/{company_id}/member",
            get(routes::company::members).post(routes::company::add_member),
        );

    // Project routes (under company); tasks, comments, outputs, files and
    // allocations all mutate the project aggregate
    let project_routes = Router::new()
        .route("/", get(routes::project::list).post(routes::project::create))
        .route(
            "/{project_id}",
            get(routes::project::get)
                .put(routes::project::update)
                .delete(routes::project::delete),
        )
        .route("/{project_id}/task", post(routes::task::add))
        .route(
            "/{project_id}/task/{task_id}",
            put(routes::task::update).delete(routes::task::delete),
        )
        .route(
            "/{project_id}/task/{task_id}/file",
            post(routes::file::upload_task_file),
        )
        .route(
            "/{project_id}/task/{task_id}/file/{file_id}",
            get(routes::file::download_task_file).delete(routes::file::delete_task_file),
        )
        .route("/{project_id}/comment", post(routes::comment::add))
        .route(
            "/{project_id}/comment/{comment_id}",
            delete(routes::comment::delete),
        )
        .route("/{project_id}/output", post(routes::output::add))
        .route(
            "/{project_id}/output/{output_id}",
            delete(routes::output::delete),
        )
        .route("/{project_id}/file", post(routes::file::upload_project_file))
        .route(
            "/{project_id}/file/{file_id}",
            get(routes::file::download_project_file).delete(routes::file::delete_project_file),
        )
        .route("/{project_id}/allocation", post(routes::resource::allocate))
        .route(
            "/{project_id}/allocation/{resource_id}",
            delete(routes::resource::deallocate),
        );

    // Resource ledger routes (under company)
    let resource_routes = Router::new()
        .route("/", get(routes::resource::list).post(routes::resource::create))
        .route(
            "/{resource_id}",
            get(routes::resource::get)
                .put(routes::resource::update)
                .delete(routes::resource::delete),
        );

    // Activity feed (under company)
    let activity_routes = Router::new().route("/", get(routes::activity::list));

    // Notification inbox (under company)
    let notification_routes = Router::new()
        .route("/", get(routes::notification::list))
        .route("/read-all", put(routes::notification::mark_all_read))
        .route(
            "/{notification_id}/read",
            put(routes::notification::mark_read),
        );

    // Report exports (under company)
    let export_routes = Router::new()
        .route("/project", get(routes::export::projects))
        .route("/resource", get(routes::export::resources))
        .route("/project/{project_id}/output", get(routes::export::outputs));

    // Compose API
    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/company", company_routes)
        .nest("/company/{company_id}/project", project_routes)
        .nest("/company/{company_id}/resource", resource_routes)
        .nest("/company/{company_id}/activity", activity_routes)
        .nest("/company/{company_id}/notification", notification_routes)
        .nest("/company/{company_id}/export", export_routes);

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
