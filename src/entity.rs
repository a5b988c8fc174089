//! Cake records as stored and as written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the `cakes` table.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Cake {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub rating: f64,
    pub image: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Mutable fields of a cake, used for both create and update.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct NewCake {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub rating: f64,
    pub image: String,
}
