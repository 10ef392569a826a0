use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub movie_id: i64,
    /// Author's account id.
    pub user_id: i64,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Review {
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub rating: i32,
    pub comment: String,
}

impl ReviewRequest {
    pub fn new(rating: i32, comment: impl Into<String>) -> Self {
        Self {
            rating,
            comment: comment.into(),
        }
    }
}
