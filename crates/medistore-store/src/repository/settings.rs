//! # Settings Repository
//!
//! Singleton shop configuration. Reads fall back to the defaults when no
//! settings have been saved yet, so a fresh install works out of the box.

use tracing::info;

use medistore_core::validation::validate_rate_bps;
use medistore_core::Settings;

use crate::backend::StorageBackend;
use crate::error::StoreResult;
use crate::store::PharmacyStore;

/// Repository for the settings singleton.
#[derive(Debug)]
pub struct SettingsRepository<'a, B> {
    store: &'a PharmacyStore<B>,
}

impl<'a, B: StorageBackend> SettingsRepository<'a, B> {
    pub fn new(store: &'a PharmacyStore<B>) -> Self {
        SettingsRepository { store }
    }

    /// Returns the current settings, or the defaults if none were saved.
    pub fn get(&self) -> StoreResult<Settings> {
        self.store.settings()
    }

    /// Replaces the settings wholesale.
    pub fn save(&self, settings: &Settings) -> StoreResult<()> {
        validate_rate_bps("default_tax", settings.default_tax_bps)?;
        validate_rate_bps("default_discount", settings.default_discount_bps)?;

        self.store.save_settings(settings)?;
        info!(shop = %settings.shop_name, "Settings saved");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
