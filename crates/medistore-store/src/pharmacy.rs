//! # Pharmacy Facade
//!
//! Single entry point over the store and its repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Pharmacy<B>                                    │
//! │                                                                         │
//! │   medicines() ──► MedicineRepository ──┐                               │
//! │   inventory() ──► InventoryLedger     │                                │
//! │   sales()     ──► SaleRepository      ├──► PharmacyStore<B> ──► B     │
//! │   refunds()   ──► RefundEngine        │     (JSON codec)    (backend) │
//! │   udhar()     ──► UdharRepository     │                                │
//! │   users()     ──► UserRepository      │                                │
//! │   settings()  ──► SettingsRepository ─┘                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories borrow the store, so they are cheap to construct on every
//! call; the facade owns nothing but the store itself.
//!
//! ## Usage
//! ```rust,ignore
//! use medistore_store::{JsonFileBackend, Pharmacy};
//!
//! let pharmacy = Pharmacy::new(JsonFileBackend::new("./data")?);
//! let low = pharmacy.medicines().low_stock()?;
//! ```

use crate::backend::{MemoryBackend, StorageBackend};
use crate::repository::inventory::InventoryLedger;
use crate::repository::medicine::MedicineRepository;
use crate::repository::refund::RefundEngine;
use crate::repository::sale::SaleRepository;
use crate::repository::settings::SettingsRepository;
use crate::repository::udhar::UdharRepository;
use crate::repository::user::UserRepository;
use crate::store::PharmacyStore;

/// Handle bundling the store with its repositories.
#[derive(Debug)]
pub struct Pharmacy<B> {
    store: PharmacyStore<B>,
}

impl Pharmacy<MemoryBackend> {
    /// An in-memory pharmacy, for tests and previews.
    pub fn in_memory() -> Self {
        Pharmacy::new(MemoryBackend::new())
    }
}

impl<B: StorageBackend> Pharmacy<B> {
    pub fn new(backend: B) -> Self {
        Pharmacy {
            store: PharmacyStore::new(backend),
        }
    }

    /// Direct access to the typed store.
    pub fn store(&self) -> &PharmacyStore<B> {
        &self.store
    }

    pub fn medicines(&self) -> MedicineRepository<'_, B> {
        MedicineRepository::new(&self.store)
    }

    pub fn inventory(&self) -> InventoryLedger<'_, B> {
        InventoryLedger::new(&self.store)
    }

    pub fn sales(&self) -> SaleRepository<'_, B> {
        SaleRepository::new(&self.store)
    }

    pub fn refunds(&self) -> RefundEngine<'_, B> {
        RefundEngine::new(&self.store)
    }

    pub fn udhar(&self) -> UdharRepository<'_, B> {
        UdharRepository::new(&self.store)
    }

    pub fn users(&self) -> UserRepository<'_, B> {
        UserRepository::new(&self.store)
    }

    pub fn settings(&self) -> SettingsRepository<'_, B> {
        SettingsRepository::new(&self.store)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_starts_empty() {
        let pharmacy = Pharmacy::in_memory();
        assert!(pharmacy.medicines().all().unwrap().is_empty());
        assert!(pharmacy.sales().all().unwrap().is_empty());
        assert!(pharmacy.refunds().all().unwrap().is_empty());
    }
}
