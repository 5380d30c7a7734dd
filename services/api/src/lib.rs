//! Foto Kunga API service
//!
//! Photo sharing backend: user accounts, photo uploads with threaded
//! comments, and a cookie-session login. Stored documents are shaped into
//! explicit view models before they leave the service.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod upload;
pub mod views;
