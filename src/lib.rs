//! Cake store: REST service for cake records with soft delete, backed by PostgreSQL.

pub mod config;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{AppConfig, DatabaseConfig};
pub use entity::{Cake, NewCake};
pub use error::{AppError, ConfigError};
pub use repository::{CakeRepository, PgCakeRepository};
pub use response::Envelope;
pub use routes::{cake_routes, common_routes, common_routes_with_ready, with_middleware};
pub use service::CakeService;
pub use state::AppState;
pub use store::{connect, ensure_database_exists, run_migrations};
