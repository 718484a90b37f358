pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod utils;

use std::time::Duration;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};

use services::{Alerts, BookingEngine, Catalog, CitySuggestions};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub catalog: Catalog,
    pub booking: BookingEngine,
    pub alerts: Alerts,
    pub suggestions: CitySuggestions,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, suggestions: CitySuggestions) -> Self {
        Self {
            catalog: Catalog::new(db.clone()),
            booking: BookingEngine::new(
                db.clone(),
                Duration::from_secs(config.booking_timeout_secs),
            ),
            alerts: Alerts::new(db.clone()),
            suggestions,
            db,
            config,
        }
    }
}
