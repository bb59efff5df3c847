//! # Inventory Ledger
//!
//! The single mutating operation on medicine stock: a signed delta adjust.
//! Sales call it with negative deltas, refunds with positive ones, and
//! manual stock corrections with either.
//!
//! ## Tolerant Failure Policy
//! A delta against an unknown medicine id is a silent no-op, not an error.
//! Historical sale and refund records may reference medicines that were
//! deleted later; restoring stock for such a line must not fail the
//! surrounding operation. The skip is logged so it stays observable.
//!
//! No lower bound is enforced here: callers are responsible for never
//! requesting a decrement larger than the available stock (the cart caps
//! quantity at stock-at-add time).

use tracing::debug;

use crate::backend::StorageBackend;
use crate::error::StoreResult;
use crate::store::PharmacyStore;

/// Delta-adjusts medicine stock.
#[derive(Debug)]
pub struct InventoryLedger<'a, B> {
    store: &'a PharmacyStore<B>,
}

impl<'a, B: StorageBackend> InventoryLedger<'a, B> {
    pub fn new(store: &'a PharmacyStore<B>) -> Self {
        InventoryLedger { store }
    }

    /// Applies `delta` to the medicine's on-hand stock and persists.
    ///
    /// Unknown ids are skipped silently (see module docs).
    pub fn adjust_stock(&self, medicine_id: &str, delta: i64) -> StoreResult<()> {
        let mut medicines = self.store.medicines()?;

        match medicines.iter_mut().find(|m| m.id == medicine_id) {
            Some(medicine) => {
                medicine.stock += delta;
                debug!(
                    medicine_id = %medicine_id,
                    delta,
                    stock = medicine.stock,
                    "Adjusted stock"
                );
                self.store.save_medicines(&medicines)
            }
            None => {
                debug!(
                    medicine_id = %medicine_id,
                    delta,
                    "Stock adjustment skipped: medicine not found"
                );
                Ok(())
            }
        }
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
    use medistore_core::Medicine;

    fn store_with_medicine(stock: i64) -> PharmacyStore<MemoryBackend> {
        let store = PharmacyStore::new(MemoryBackend::new());
        store
            .save_medicines(&[Medicine {
                id: "med-1".to_string(),
                name: "Panadol".to_string(),
                company: "GSK".to_string(),
                category: "Tablet".to_string(),
                cost_price_cents: 700,
                sale_price_cents: 1000,
                stock,
                reorder_level: 10,
                expiry: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
                batch_number: "B-1".to_string(),
            }])
            .unwrap();
        store
    }

    #[test]
    fn test_adjust_stock_applies_delta() {
        let store = store_with_medicine(50);
        let ledger = InventoryLedger::new(&store);

        ledger.adjust_stock("med-1", -3).unwrap();
        assert_eq!(store.medicines().unwrap()[0].stock, 47);

        ledger.adjust_stock("med-1", 3).unwrap();
        assert_eq!(store.medicines().unwrap()[0].stock, 50);
    }

    #[test]
    fn test_adjust_stock_unknown_id_is_noop() {
        let store = store_with_medicine(50);
        let ledger = InventoryLedger::new(&store);

        ledger.adjust_stock("deleted-med", 5).unwrap();
        assert_eq!(store.medicines().unwrap()[0].stock, 50);
    }

    #[test]
    fn test_adjust_stock_nets_zero() {
        // adjustStock(-Q) then adjustStock(+Q) restores stock exactly
        let store = store_with_medicine(12);
        let ledger = InventoryLedger::new(&store);

        ledger.adjust_stock("med-1", -12).unwrap();
        assert_eq!(store.medicines().unwrap()[0].stock, 0);
        ledger.adjust_stock("med-1", 12).unwrap();
        assert_eq!(store.medicines().unwrap()[0].stock, 12);
    }
}
