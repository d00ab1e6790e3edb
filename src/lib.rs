pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod interaction;
pub mod location;
pub mod normalize;
pub mod notify;
pub mod render;
pub mod response;
pub mod series;
pub mod services;
pub mod tables;
