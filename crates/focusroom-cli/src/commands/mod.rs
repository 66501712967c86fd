pub mod ambient;
pub mod config;
pub mod focus;
pub mod note;
