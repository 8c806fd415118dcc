//! Task Proxy Library
//!
//! A JSON API gateway in front of a task-management service, plus the typed
//! client and dashboard that consume it.

pub mod client;
pub mod config;
pub mod dashboard;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
