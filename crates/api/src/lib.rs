//! HTTP policy service: route, action and navigation decisions over JSON.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
