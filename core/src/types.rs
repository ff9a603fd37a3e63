//! Institution DTOs for the consent API.
//!
//! These mirror the mock-server's schema but are defined independently so
//! integration tests catch drift between the two crates.

use serde::{Deserialize, Serialize};

/// An institution as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub it_director_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub it_director_email: Option<String>,
    /// Server-assigned timestamp; its representation is not part of the
    /// contract, so it is carried through untyped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<serde_json::Value>,
}

/// Request payload for creating an institution. The loader only ever sets
/// `name`; the director fields are omitted from the JSON when unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstitution {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub it_director_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub it_director_email: Option<String>,
}

impl CreateInstitution {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            it_director_name: None,
            it_director_email: None,
        }
    }
}
