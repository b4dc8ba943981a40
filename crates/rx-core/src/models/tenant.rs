//! Tenant entity - one isolated pharmacy account, routed by subdomain.

use crate::{CoreError, Result};

use std::panic::Location;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An isolated customer account. The subdomain is the routing key for all
/// tenant-scoped endpoints, including the live monitor stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Routing key, e.g. "apex-pharmacy" (lowercase alphanumeric + hyphen)
    pub subdomain: String,
    pub name: String,
    /// Cleared on soft-deactivation; the row itself is never removed
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Tenant {
    /// Create a new active tenant. Fails when the subdomain is not a valid
    /// routing key.
    #[track_caller]
    pub fn new(subdomain: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let subdomain = subdomain.into();
        Self::validate_subdomain(&subdomain)?;

        Ok(Self {
            id: Uuid::new_v4(),
            subdomain,
            name: name.into(),
            active: true,
            created_at: Utc::now(),
        })
    }

    /// Subdomains are DNS labels: 1-63 chars, lowercase alphanumeric or
    /// hyphen, no leading/trailing hyphen.
    #[track_caller]
    pub fn validate_subdomain(value: &str) -> Result<()> {
        let valid = !value.is_empty()
            && value.len() <= 63
            && !value.starts_with('-')
            && !value.ends_with('-')
            && value
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

        if valid {
            Ok(())
        } else {
            Err(CoreError::InvalidSubdomain {
                value: value.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
