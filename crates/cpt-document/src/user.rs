//! Application user records

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::collection::Collection;
use crate::document::Document;
use crate::id::DocumentId;
use crate::Fields;

/// Application role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "READ_AND_WRITE")]
    ReadAndWrite,
    #[serde(rename = "READ_ONLY")]
    ReadOnly,
    #[serde(untagged)]
    Other(String),
}

/// Credential, role and settings of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppUser {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "_class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub username: String,
    /// Stored credential, opaque to maintenance tooling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    /// Written as a boolean; legacy documents hold the string `"false"`
    #[serde(rename = "isLdapUser", default, deserialize_with = "bool_or_string")]
    pub is_ldap_user: bool,
    #[serde(default)]
    pub settings: Fields,
    #[serde(flatten)]
    pub extra: Fields,
}

impl Document for AppUser {
    const COLLECTION: Collection = Collection::User;

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.username
    }
}

fn bool_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        Value::String(s) => s
            .parse::<bool>()
            .map_err(|_| serde::de::Error::custom(format!("invalid isLdapUser value: {s}"))),
        other => Err(serde::de::Error::custom(format!("invalid isLdapUser value: {other}"))),
    }
}
