use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "postgres")]
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A note record. Deletion is logical: `deleted` rows stay in storage but
/// disappear from reads.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "postgres", derive(FromRow))]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub body: Option<String>,
    #[serde(skip_serializing)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creation payload. `title` is optional in the type so its absence can be
/// reported as a missing-parameter outcome instead of a deserialization
/// failure.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateNote {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// Partial update payload; absent fields are left untouched.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl Note {
    pub fn new(title: String, body: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            body,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}
