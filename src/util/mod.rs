pub mod auth;
pub mod browser;
pub mod path;
