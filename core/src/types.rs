//! Domain DTOs for the travel API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.

use serde::{Deserialize, Serialize};

/// Envelope status that marks a successful call.
pub const STATUS_OK: i64 = 200;

/// A single diary entry returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Travel {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Wrapper every JSON reply from the service arrives in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub travels: Vec<Travel>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// The locally cached signed-in user. An empty `email` means signed out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    #[serde(rename = "user_name", default)]
    pub name: String,
    #[serde(rename = "user_email", default)]
    pub email: String,
    #[serde(rename = "user_photo_url", default)]
    pub photo_url: String,
}

impl Identity {
    pub fn new(name: &str, email: &str, photo_url: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            photo_url: photo_url.to_string(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        !self.email.is_empty()
    }
}

/// Form fields for a create or update upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelForm {
    pub title: String,
    pub description: String,
    /// JPEG bytes, already compressed (see `photo::encode_jpeg`).
    pub image: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_uses_camel_case_keys() {
        let travel = Travel {
            id: 7,
            user_id: "a@b.c".to_string(),
            title: "Bali".to_string(),
            completed: true,
            description: None,
            image_url: Some("uploads/x.jpg".to_string()),
        };
        let json = serde_json::to_value(&travel).unwrap();
        assert_eq!(json["userId"], "a@b.c");
        assert_eq!(json["imageUrl"], "uploads/x.jpg");
        assert!(json["description"].is_null());
    }

    #[test]
    fn travel_tolerates_missing_optional_fields() {
        let travel: Travel =
            serde_json::from_str(r#"{"id":1,"userId":"u","title":"t"}"#).unwrap();
        assert!(!travel.completed);
        assert!(travel.description.is_none());
        assert!(travel.image_url.is_none());
    }

    #[test]
    fn envelope_defaults_travels_to_empty() {
        let env: ApiResponse = serde_json::from_str(r#"{"status":200,"message":"ok"}"#).unwrap();
        assert!(env.is_success());
        assert!(env.travels.is_empty());
    }

    #[test]
    fn envelope_status_one_is_not_success() {
        let env: ApiResponse = serde_json::from_str(r#"{"status":1,"message":"ok"}"#).unwrap();
        assert!(!env.is_success());
    }

    #[test]
    fn identity_serializes_with_preference_keys() {
        let id = Identity::new("Ann", "ann@example.com", "https://p/ann.png");
        let json = serde_json::to_value(&id).unwrap();
        assert_eq!(json["user_name"], "Ann");
        assert_eq!(json["user_email"], "ann@example.com");
        assert_eq!(json["user_photo_url"], "https://p/ann.png");
    }

    #[test]
    fn empty_identity_is_signed_out() {
        assert!(!Identity::default().is_signed_in());
        assert!(Identity::new("", "x@y.z", "").is_signed_in());
    }
}
