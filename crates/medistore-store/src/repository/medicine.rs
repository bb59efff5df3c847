//! # Medicine Repository
//!
//! CRUD for the medicines collection plus stock-report helpers.
//!
//! ## Duplicate Policy
//! A medicine is identified for duplicate purposes by its (name, company)
//! pair, compared case-insensitively - stock entry is done by hand and
//! "panadol / gsk" is the same medicine as "Panadol / GSK". The duplicate
//! check runs before any write.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use medistore_core::validation::{validate_name, validate_price_cents};
use medistore_core::{CoreError, Medicine};

use crate::backend::StorageBackend;
use crate::error::{StoreError, StoreResult};
use crate::store::PharmacyStore;

/// Fields for a new medicine; the id is generated on insert.
#[derive(Debug, Clone)]
pub struct NewMedicine {
    pub name: String,
    pub company: String,
    pub category: String,
    pub cost_price_cents: i64,
    pub sale_price_cents: i64,
    pub stock: i64,
    pub reorder_level: i64,
    pub expiry: NaiveDate,
    pub batch_number: String,
}

/// Repository for medicine records.
#[derive(Debug)]
pub struct MedicineRepository<'a, B> {
    store: &'a PharmacyStore<B>,
}

impl<'a, B: StorageBackend> MedicineRepository<'a, B> {
    pub fn new(store: &'a PharmacyStore<B>) -> Self {
        MedicineRepository { store }
    }

    /// Returns every medicine.
    pub fn all(&self) -> StoreResult<Vec<Medicine>> {
        self.store.medicines()
    }

    /// Finds a medicine by id.
    pub fn find(&self, id: &str) -> StoreResult<Option<Medicine>> {
        Ok(self.store.medicines()?.into_iter().find(|m| m.id == id))
    }

    /// Adds a medicine, rejecting duplicates by (name, company).
    pub fn add(&self, new: NewMedicine) -> StoreResult<Medicine> {
        validate_name("name", &new.name)?;
        validate_name("company", &new.company)?;
        validate_price_cents(new.cost_price_cents)?;
        validate_price_cents(new.sale_price_cents)?;

        let mut medicines = self.store.medicines()?;

        let duplicate = medicines.iter().any(|m| {
            m.name.eq_ignore_ascii_case(&new.name) && m.company.eq_ignore_ascii_case(&new.company)
        });
        if duplicate {
            return Err(StoreError::Core(CoreError::DuplicateMedicine {
                name: new.name,
                company: new.company,
            }));
        }

        let medicine = Medicine {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            company: new.company,
            category: new.category,
            cost_price_cents: new.cost_price_cents,
            sale_price_cents: new.sale_price_cents,
            stock: new.stock,
            reorder_level: new.reorder_level,
            expiry: new.expiry,
            batch_number: new.batch_number,
        };

        medicines.push(medicine.clone());
        self.store.save_medicines(&medicines)?;

        info!(id = %medicine.id, name = %medicine.name, "Medicine added");
        Ok(medicine)
    }

    /// Replaces a medicine record wholesale (stock edits, price changes).
    ///
    /// Fails with `MedicineNotFound` when the id is unknown.
    pub fn update(&self, updated: &Medicine) -> StoreResult<()> {
        let mut medicines = self.store.medicines()?;

        let slot = medicines
            .iter_mut()
            .find(|m| m.id == updated.id)
            .ok_or_else(|| CoreError::MedicineNotFound(updated.id.clone()))?;

        *slot = updated.clone();
        self.store.save_medicines(&medicines)
    }

    /// Deletes a medicine.
    ///
    /// Deliberately tolerant of unknown ids; sale and refund history keeps
    /// its snapshots either way.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let mut medicines = self.store.medicines()?;
        medicines.retain(|m| m.id != id);
        self.store.save_medicines(&medicines)
    }

    // -------------------------------------------------------------------------
    // Stock reports
    // -------------------------------------------------------------------------

    /// Medicines at or below the configured low-stock threshold.
    pub fn low_stock(&self) -> StoreResult<Vec<Medicine>> {
        let threshold = self.store.settings()?.low_stock_threshold;
        Ok(self
            .store
            .medicines()?
            .into_iter()
            .filter(|m| m.stock <= threshold)
            .collect())
    }

    /// Medicines whose batch expires within the configured alert window.
    pub fn expiring_soon(&self, today: NaiveDate) -> StoreResult<Vec<Medicine>> {
        let days = self.store.settings()?.expiry_alert_days;
        Ok(self
            .store
            .medicines()?
            .into_iter()
            .filter(|m| m.expires_within(today, days))
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
