//! Seed the administrator account

use cpt_document::{AppUser, DocumentId, Fields, Role};
use serde_json::json;

use crate::error::MigrationError;
use crate::seed::{Seed, SeedDocument};

/// Key and username of the seeded administrator
pub const ADMIN_USER_KEY: &str = "admin";

/// Settings every new user starts with
#[must_use]
pub fn default_settings() -> Fields {
    let mut settings = Fields::new();
    settings.insert("BREAKDOWN_DECIMAL".into(), json!(0));
    settings.insert("VARIABLE_DECIMAL".into(), json!(0));
    settings.insert("TIMEZONE".into(), json!("UTC: GMT+0000"));
    settings.insert("SIGMA".into(), json!([99, 95]));
    settings
}

/// Inserts the `admin` user with role `ADMIN` when absent
#[derive(Debug, Clone, Default)]
pub struct SeedAdminUser {
    password: Option<String>,
}

impl SeedAdminUser {
    /// Seed without a stored credential
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With the credential to store, as the application expects it
    #[inline]
    #[must_use]
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// The administrator record
    #[must_use]
    pub fn user(&self) -> AppUser {
        AppUser {
            id: DocumentId::text(ADMIN_USER_KEY),
            class: None,
            username: ADMIN_USER_KEY.to_string(),
            password: self.password.clone(),
            role: Role::Admin,
            is_ldap_user: false,
            settings: default_settings(),
            extra: Fields::new(),
        }
    }
}

impl Seed for SeedAdminUser {
    fn name(&self) -> &'static str {
        "seed-admin-user"
    }

    fn documents(&self) -> Result<Vec<SeedDocument>, MigrationError> {
        Ok(vec![SeedDocument::from_record(&self.user())?])
    }
}
