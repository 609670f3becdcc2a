pub mod catalog;
pub mod config;
pub mod core;
pub mod model;

pub use catalog::Catalog;
