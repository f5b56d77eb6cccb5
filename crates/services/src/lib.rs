pub mod auth;
pub mod dao;
pub mod export;
pub mod fanout;
pub mod policy;
pub mod storage;

pub use auth::AuthService;
pub use dao::*;
pub use fanout::FanoutService;
pub use storage::BlobStore;
