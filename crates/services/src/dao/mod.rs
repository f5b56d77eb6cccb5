pub mod base;
pub mod company;
pub mod project;
pub mod resource;
pub mod user;

pub use base::BaseDao;
