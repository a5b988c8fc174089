//! Cake use cases: forwards to the repository and logs every outcome.

use std::sync::Arc;

use crate::entity::{Cake, NewCake};
use crate::error::AppError;
use crate::repository::CakeRepository;

#[derive(Clone)]
pub struct CakeService {
    repo: Arc<dyn CakeRepository>,
}

impl CakeService {
    pub fn new(repo: Arc<dyn CakeRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all_cakes(&self) -> Result<Vec<Cake>, AppError> {
        match self.repo.get_all().await {
            Ok(cakes) => {
                tracing::info!(count = cakes.len(), "fetched all cakes");
                Ok(cakes)
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching all cakes");
                Err(e)
            }
        }
    }

    pub async fn get_cake_by_id(&self, id: i64) -> Result<Cake, AppError> {
        match self.repo.get_by_id(id).await {
            Ok(cake) => {
                tracing::info!(id, "fetched cake");
                Ok(cake)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "error fetching cake");
                Err(e)
            }
        }
    }

    pub async fn create_cake(&self, cake: NewCake) -> Result<Cake, AppError> {
        match self.repo.create(&cake).await {
            Ok(created) => {
                tracing::info!(id = created.id, title = %created.title, "created cake");
                Ok(created)
            }
            Err(e) => {
                tracing::error!(title = %cake.title, error = %e, "error creating cake");
                Err(e)
            }
        }
    }

    pub async fn update_cake(&self, id: i64, cake: NewCake) -> Result<Cake, AppError> {
        match self.repo.update(id, &cake).await {
            Ok(updated) => {
                tracing::info!(id, "updated cake");
                Ok(updated)
            }
            Err(e) => {
                tracing::error!(id, error = %e, "error updating cake");
                Err(e)
            }
        }
    }

    pub async fn delete_cake(&self, id: i64) -> Result<(), AppError> {
        match self.repo.delete(id).await {
            Ok(()) => {
                tracing::info!(id, "deleted cake");
                Ok(())
            }
            Err(e) => {
                tracing::error!(id, error = %e, "error deleting cake");
                Err(e)
            }
        }
    }
}
