use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Accountant,
    User,
}

impl Role {
    /// Roles allowed to approve, reject or send back a submitted budget version.
    pub fn is_approver(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_backend_role_names() {
        assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("MANAGER").unwrap(), Role::Manager);
        assert!(Role::from_str("ROOT").is_err());
        assert_eq!(Role::Accountant.to_string(), "ACCOUNTANT");
    }

    #[test]
    fn only_admin_and_manager_approve() {
        assert!(Role::Admin.is_approver());
        assert!(Role::Manager.is_approver());
        assert!(!Role::Accountant.is_approver());
        assert!(!Role::User.is_approver());
    }
}
