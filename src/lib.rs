//! Bookshelf server
//!
//! An in-memory book record store exposed as a REST JSON API. The collection
//! lives only as long as the process; every start begins with an empty shelf.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state around a fresh, empty repository
    pub fn new() -> Self {
        Self {
            services: Arc::new(services::Services::new(repository::Repository::new())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
