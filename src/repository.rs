//! Cake persistence. Soft-deleted rows stay in the table but are invisible to every query here.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::entity::{Cake, NewCake};
use crate::error::AppError;

#[async_trait]
pub trait CakeRepository: Send + Sync {
    /// Live cakes, best rated first, ties broken by title.
    async fn get_all(&self) -> Result<Vec<Cake>, AppError>;
    async fn get_by_id(&self, id: i64) -> Result<Cake, AppError>;
    async fn create(&self, cake: &NewCake) -> Result<Cake, AppError>;
    async fn update(&self, id: i64, cake: &NewCake) -> Result<Cake, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("cake {} not found", id))
}

const COLUMNS: &str =
    "id, title, description, rating, image, is_deleted, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct PgCakeRepository {
    pool: PgPool,
}

impl PgCakeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CakeRepository for PgCakeRepository {
    async fn get_all(&self) -> Result<Vec<Cake>, AppError> {
        let sql = format!(
            "SELECT {} FROM cakes WHERE is_deleted = FALSE ORDER BY rating DESC, title ASC",
            COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Cake>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i64) -> Result<Cake, AppError> {
        let sql = format!("SELECT {} FROM cakes WHERE id = $1 AND is_deleted = FALSE", COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, Cake>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, cake: &NewCake) -> Result<Cake, AppError> {
        let sql = format!(
            "INSERT INTO cakes (title, description, rating, image, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, title = %cake.title, "query");
        let row = sqlx::query_as::<_, Cake>(&sql)
            .bind(&cake.title)
            .bind(&cake.description)
            .bind(cake.rating)
            .bind(&cake.image)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, cake: &NewCake) -> Result<Cake, AppError> {
        let sql = format!(
            "UPDATE cakes SET title = $1, description = $2, rating = $3, image = $4, updated_at = NOW() \
             WHERE id = $5 AND is_deleted = FALSE RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        sqlx::query_as::<_, Cake>(&sql)
            .bind(&cake.title)
            .bind(&cake.description)
            .bind(cake.rating)
            .bind(&cake.image)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let sql = "UPDATE cakes SET is_deleted = TRUE, deleted_at = NOW() \
                   WHERE id = $1 AND is_deleted = FALSE";
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}
