//! Application State Management
//!
//! This module provides the application state that contains all services
//! and their dependencies. Everything is built explicitly at startup and
//! handed to the transports; there is no global registry.

use std::sync::Arc;

use actix_web::web;
use log::info;

use crate::config::AppConfig;
use crate::photo::StorageResult;
use crate::service::PhotoService;
use crate::storage::mock_store::MockRepository;
use crate::storage::Repository;

/// Application state containing all services and their dependencies
#[derive(Clone)]
pub struct AppState {
    pub photo_service: Arc<PhotoService>,
    pub config: AppConfig,
}

impl AppState {
    /// Create application state from configuration, opening the configured
    /// storage engine.
    pub fn from_config(config: AppConfig) -> StorageResult<Self> {
        info!("Initializing application state with configuration");
        let repository = config.storage.create_repository()?;
        let state = Self::with_repository(repository, config);
        info!("Application state initialized successfully");
        Ok(state)
    }

    /// Create application state around an already opened repository
    pub fn with_repository(repository: Arc<dyn Repository>, config: AppConfig) -> Self {
        Self {
            photo_service: Arc::new(PhotoService::new(repository)),
            config,
        }
    }

    /// Create application state for testing with the in-memory repository
    pub fn new_for_testing() -> Self {
        Self::with_repository(Arc::new(MockRepository::new()), AppConfig::default())
    }

    pub fn max_payload_size(&self) -> usize {
        self.config.server.max_payload_size
    }
}

/// Helper function to extract app state from Actix-web data
pub fn extract_app_state(data: &web::Data<AppState>) -> &AppState {
    data.as_ref()
}
