pub mod csv;
pub mod pdf;
pub mod reports;
