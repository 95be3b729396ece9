use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub organization_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
