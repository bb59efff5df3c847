//! # Typed Collection Store
//!
//! `PharmacyStore` turns the string-payload [`StorageBackend`] port into
//! typed whole-collection access: one JSON array per collection, loaded and
//! saved in full.
//!
//! ## Collections
//! ```text
//! ┌────────────┬──────────────────────────────────────────────┐
//! │ key        │ contents                                     │
//! ├────────────┼──────────────────────────────────────────────┤
//! │ medicines  │ Vec<Medicine>   - live stock records         │
//! │ sales      │ Vec<Sale>       - append-only history        │
//! │ refunds    │ Vec<Refund>     - append-only history        │
//! │ udhar      │ Vec<Udhar>      - credit records             │
//! │ users      │ Vec<User>       - advisory login list        │
//! │ settings   │ Settings        - singleton document         │
//! └────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! A collection that was never written loads as an empty list; settings
//! load as `Settings::default()`. Mutators must re-load immediately before
//! mutating to keep the lost-update window as small as the model allows.

use serde::de::DeserializeOwned;
use serde::Serialize;

use medistore_core::{Medicine, Refund, Sale, Settings, Udhar, User};

use crate::backend::StorageBackend;
use crate::error::{StoreError, StoreResult};

/// Collection keys, namespaced the way the original deployment stored them.
pub mod keys {
    pub const MEDICINES: &str = "pharmacy_medicines";
    pub const SALES: &str = "pharmacy_sales";
    pub const REFUNDS: &str = "pharmacy_refunds";
    pub const UDHAR: &str = "pharmacy_udhar";
    pub const SETTINGS: &str = "pharmacy_settings";
    pub const USERS: &str = "pharmacy_users";
}

/// Typed load/save over a storage backend.
#[derive(Debug)]
pub struct PharmacyStore<B> {
    backend: B,
}

impl<B: StorageBackend> PharmacyStore<B> {
    /// Wraps a backend.
    pub fn new(backend: B) -> Self {
        PharmacyStore { backend }
    }

    /// Access to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // -------------------------------------------------------------------------
    // Generic list access
    // -------------------------------------------------------------------------

    fn load_list<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        match self.backend.read(key)? {
            Some(payload) => serde_json::from_str(&payload).map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                source: e,
            }),
            None => Ok(Vec::new()),
        }
    }

    fn save_list<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let payload = serde_json::to_string(items).map_err(|e| StoreError::Encode {
            key: key.to_string(),
            source: e,
        })?;
        self.backend.write(key, &payload)
    }

    // -------------------------------------------------------------------------
    // Typed collections
    // -------------------------------------------------------------------------

    pub fn medicines(&self) -> StoreResult<Vec<Medicine>> {
        self.load_list(keys::MEDICINES)
    }

    pub fn save_medicines(&self, medicines: &[Medicine]) -> StoreResult<()> {
        self.save_list(keys::MEDICINES, medicines)
    }

    pub fn sales(&self) -> StoreResult<Vec<Sale>> {
        self.load_list(keys::SALES)
    }

    pub fn save_sales(&self, sales: &[Sale]) -> StoreResult<()> {
        self.save_list(keys::SALES, sales)
    }

    pub fn refunds(&self) -> StoreResult<Vec<Refund>> {
        self.load_list(keys::REFUNDS)
    }

    pub fn save_refunds(&self, refunds: &[Refund]) -> StoreResult<()> {
        self.save_list(keys::REFUNDS, refunds)
    }

    pub fn udhars(&self) -> StoreResult<Vec<Udhar>> {
        self.load_list(keys::UDHAR)
    }

    pub fn save_udhars(&self, udhars: &[Udhar]) -> StoreResult<()> {
        self.save_list(keys::UDHAR, udhars)
    }

    pub fn users(&self) -> StoreResult<Vec<User>> {
        self.load_list(keys::USERS)
    }

    pub fn save_users(&self, users: &[User]) -> StoreResult<()> {
        self.save_list(keys::USERS, users)
    }

    /// Loads settings, falling back to defaults when never saved.
    pub fn settings(&self) -> StoreResult<Settings> {
        match self.backend.read(keys::SETTINGS)? {
            Some(payload) => serde_json::from_str(&payload).map_err(|e| StoreError::Corrupt {
                key: keys::SETTINGS.to_string(),
                source: e,
            }),
            None => Ok(Settings::default()),
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        let payload = serde_json::to_string(settings).map_err(|e| StoreError::Encode {
            key: keys::SETTINGS.to_string(),
            source: e,
        })?;
        self.backend.write(keys::SETTINGS, &payload)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chrono::NaiveDate;

    fn store() -> PharmacyStore<MemoryBackend> {
        PharmacyStore::new(MemoryBackend::new())
    }

    fn medicine(id: &str) -> Medicine {
        Medicine {
            id: id.to_string(),
            name: "Panadol".to_string(),
            company: "GSK".to_string(),
            category: "Tablet".to_string(),
            cost_price_cents: 700,
            sale_price_cents: 1000,
            stock: 50,
            reorder_level: 10,
            expiry: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            batch_number: "B-1".to_string(),
        }
    }

    #[test]
    fn test_uninitialized_collection_is_empty() {
        let store = store();
        assert!(store.medicines().unwrap().is_empty());
        assert!(store.sales().unwrap().is_empty());
        assert!(store.refunds().unwrap().is_empty());
    }

    #[test]
    fn test_collection_round_trip() {
        let store = store();
        store
            .save_medicines(&[medicine("med-1"), medicine("med-2")])
            .unwrap();

        let loaded = store.medicines().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "med-1");
        assert_eq!(loaded[1].stock, 50);
    }

    #[test]
    fn test_settings_default_until_saved() {
        let store = store();
        let settings = store.settings().unwrap();
        assert_eq!(settings.shop_name, "MediStore Pharmacy");

        let mut changed = settings;
        changed.shop_name = "City Pharmacy".to_string();
        changed.default_tax_bps = 0;
        store.save_settings(&changed).unwrap();

        let reloaded = store.settings().unwrap();
        assert_eq!(reloaded.shop_name, "City Pharmacy");
        assert_eq!(reloaded.default_tax_bps, 0);
    }

    #[test]
    fn test_corrupt_payload_reports_key() {
        let store = store();
        store.backend().write(keys::SALES, "not json").unwrap();
        let err = store.sales().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == keys::SALES));
    }
}
