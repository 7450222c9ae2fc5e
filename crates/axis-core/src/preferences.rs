//! Per-user angle unit preferences.
//!
//! Preferences live for the lifetime of the process; a restart resets every
//! user to the default unit.

use crate::angle::AngleUnit;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Interface for preference stores
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Stored unit for a user, if one was ever set
    async fn get_unit(&self, user_id: i64) -> Option<AngleUnit>;
    /// Store a unit for a user, replacing any previous value
    async fn set_unit(&self, user_id: i64, unit: AngleUnit);
    /// Number of users with a stored preference
    async fn user_count(&self) -> usize;
}

/// In-memory preference map shared by all handlers.
#[derive(Debug, Default)]
pub struct InMemoryPreferences {
    units: RwLock<HashMap<i64, AngleUnit>>,
}

impl InMemoryPreferences {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferences {
    async fn get_unit(&self, user_id: i64) -> Option<AngleUnit> {
        self.units.read().await.get(&user_id).copied()
    }

    async fn set_unit(&self, user_id: i64, unit: AngleUnit) {
        let previous = self.units.write().await.insert(user_id, unit);
        debug!(user_id, ?previous, new = %unit, "Stored angle unit preference");
    }

    async fn user_count(&self) -> usize {
        self.units.read().await.len()
    }
}
