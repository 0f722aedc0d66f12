use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "a.petrova")]
    pub username: String,
    #[schema(example = "Anna Petrova", nullable = true)]
    pub full_name: Option<String>,
    #[schema(example = "a.petrova@company.ru", nullable = true)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}
