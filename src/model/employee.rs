use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee directory row. Used for display-name resolution and for picking
/// the batch of employees to compute; never for the computation itself.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Employee {
    #[schema(example = 1001)]
    pub id: u64,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "active")]
    pub status: String,
}

impl Employee {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
