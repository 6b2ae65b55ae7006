pub mod models;
pub mod paths;
