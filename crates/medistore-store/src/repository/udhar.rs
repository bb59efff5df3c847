//! # Udhar Repository
//!
//! Store credit records. Created unpaid, flipped to paid exactly once when
//! the customer settles; the paid timestamp is stamped at transition time.

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use medistore_core::validation::{validate_name, validate_price_cents};
use medistore_core::{Money, Udhar, UdharStatus};

use crate::backend::StorageBackend;
use crate::error::StoreResult;
use crate::store::PharmacyStore;

/// Fields for a new credit record; id, date and status are set on insert.
#[derive(Debug, Clone)]
pub struct NewUdhar {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub amount_cents: i64,
    pub due_date: Option<NaiveDate>,
    pub invoice_no: String,
    pub note: Option<String>,
}

/// Repository for udhar (store credit) records.
#[derive(Debug)]
pub struct UdharRepository<'a, B> {
    store: &'a PharmacyStore<B>,
}

impl<'a, B: StorageBackend> UdharRepository<'a, B> {
    pub fn new(store: &'a PharmacyStore<B>) -> Self {
        UdharRepository { store }
    }

    /// Returns every credit record.
    pub fn all(&self) -> StoreResult<Vec<Udhar>> {
        self.store.udhars()
    }

    /// Records a new unpaid credit.
    pub fn add(&self, new: NewUdhar) -> StoreResult<Udhar> {
        validate_name("customer_name", &new.customer_name)?;
        validate_price_cents(new.amount_cents)?;

        let udhar = Udhar {
            id: Uuid::new_v4().to_string(),
            customer_name: new.customer_name,
            customer_phone: new.customer_phone,
            amount_cents: new.amount_cents,
            status: UdharStatus::Unpaid,
            date: Utc::now(),
            due_date: new.due_date,
            paid_date: None,
            invoice_no: new.invoice_no,
            note: new.note,
        };

        let mut udhars = self.store.udhars()?;
        udhars.push(udhar.clone());
        self.store.save_udhars(&udhars)?;

        info!(id = %udhar.id, customer = %udhar.customer_name, "Udhar recorded");
        Ok(udhar)
    }

    /// Marks a credit as paid, stamping the settlement time.
    ///
    /// Returns `false` when the id is unknown or the record is already
    /// paid; the paid date of a settled record is never rewritten.
    pub fn mark_paid(&self, id: &str) -> StoreResult<bool> {
        let mut udhars = self.store.udhars()?;

        let Some(udhar) = udhars.iter_mut().find(|u| u.id == id && u.is_unpaid()) else {
            return Ok(false);
        };

        udhar.status = UdharStatus::Paid;
        udhar.paid_date = Some(Utc::now());
        info!(id = %id, "Udhar settled");

        self.store.save_udhars(&udhars)?;
        Ok(true)
    }

    /// Deletes a credit record. Tolerant of unknown ids.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let mut udhars = self.store.udhars()?;
        udhars.retain(|u| u.id != id);
        self.store.save_udhars(&udhars)
    }

    /// Sum of all outstanding (unpaid) credit.
    pub fn unpaid_total(&self) -> StoreResult<Money> {
        Ok(self
            .store
            .udhars()?
            .iter()
            .filter(|u| u.is_unpaid())
            .map(Udhar::amount)
            .sum())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
