use chrono::{DateTime, Utc};

use crate::ids::UserId;

/// Public view of an account, as the API service serializes it.
///
/// Email, password hash and billing identifiers never leave the API, so
/// they have no place here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub created_time: Option<DateTime<Utc>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub has_stripe_customer_id: Option<bool>,
}

impl User {
    pub fn new(id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            created_time: None,
            has_stripe_customer_id: None,
        }
    }

    pub fn with_created_time(mut self, created_time: DateTime<Utc>) -> Self {
        self.created_time = Some(created_time);
        self
    }

    /// Client route of the user's public profile page.
    pub fn profile_path(&self) -> String {
        format!("/{}", self.username)
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_api_payload_without_optional_fields() {
        let user: User = serde_json::from_value(json!({
            "id": "8d6b2c6e-5f1f-11e6-8b77-86f30ca893d3",
            "username": "ericflo",
        }))
        .unwrap();

        assert_eq!(user.id.as_str(), "8d6b2c6e-5f1f-11e6-8b77-86f30ca893d3");
        assert_eq!(user.username, "ericflo");
        assert!(user.created_time.is_none());
        assert!(user.has_stripe_customer_id.is_none());
    }

    #[test]
    fn omits_stripe_flag_when_not_hydrated() {
        let value = serde_json::to_value(User::new("u1", "alice")).unwrap();
        assert!(value.get("has_stripe_customer_id").is_none());
        assert_eq!(value["username"], "alice");
    }

    #[test]
    fn profile_path_is_rooted_username() {
        assert_eq!(User::new("u1", "alice").profile_path(), "/alice");
    }
}
