//! # Refund Engine
//!
//! Orchestrates partial refunds against recorded sales.
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit_refund(sale_id, lines, reason, note, status)                    │
//! │                                                                         │
//! │  1. Load the sale (SaleNotFound if absent)                             │
//! │  2. Re-gate every line against the replayed refund log                 │
//! │  3. Compute the amount (snapshots + blended tax share)                 │
//! │  4. Append the Refund record                                           │
//! │  5. Restore stock (+qty per line, best effort)                         │
//! │                                                                         │
//! │  Append happens BEFORE restoration; a line whose medicine was          │
//! │  deleted is absorbed by the ledger's no-op policy, so the refund       │
//! │  record is never left half-written behind an error.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Known Limitation
//! Re-gating at step 2 closes the validate/submit window within one
//! process, but there is no cross-process serialization: two terminals
//! refunding the same line simultaneously can both pass the gate. Accepted
//! for single-terminal deployment; multi-terminal needs a transactional
//! append behind the storage port.

use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use medistore_core::refund::{
    check_refundable, line_refund_status, refund_amount, refunded_quantity,
};
use medistore_core::validation::validate_quantity;
use medistore_core::{
    CoreError, LineRefundStatus, Money, Refund, RefundLine, RefundReason, RefundStatus, Sale,
};

use crate::backend::StorageBackend;
use crate::error::{StoreError, StoreResult};
use crate::repository::inventory::InventoryLedger;
use crate::store::PharmacyStore;

/// Length of the invoice label derived from the sale id.
const INVOICE_LABEL_LEN: usize = 12;

/// Repository and reconciliation logic for refunds.
#[derive(Debug)]
pub struct RefundEngine<'a, B> {
    store: &'a PharmacyStore<B>,
}

impl<'a, B: StorageBackend> RefundEngine<'a, B> {
    pub fn new(store: &'a PharmacyStore<B>) -> Self {
        RefundEngine { store }
    }

    /// Returns the full refund history.
    pub fn all(&self) -> StoreResult<Vec<Refund>> {
        self.store.refunds()
    }

    /// Refunds recorded against one sale.
    pub fn refunds_for_sale(&self, sale_id: &str) -> StoreResult<Vec<Refund>> {
        Ok(self
            .store
            .refunds()?
            .into_iter()
            .filter(|r| r.sale_id == sale_id)
            .collect())
    }

    /// How many units of `medicine_id` have been refunded against
    /// `sale_id`, replayed from the refund log. Always recomputed, never
    /// cached.
    pub fn refunded_quantity(&self, sale_id: &str, medicine_id: &str) -> StoreResult<i64> {
        let refunds = self.store.refunds()?;
        Ok(refunded_quantity(&refunds, sale_id, medicine_id))
    }

    /// Checks whether `quantity` more units may be refunded.
    ///
    /// Returns the available quantity on success so callers can clamp
    /// their input bounds. Must be checked immediately before building a
    /// refund; [`submit_refund`](Self::submit_refund) re-checks anyway.
    pub fn validate_refund(
        &self,
        sale_id: &str,
        medicine_id: &str,
        quantity: i64,
    ) -> StoreResult<i64> {
        validate_quantity(quantity)?;

        let sale = self.require_sale(sale_id)?;
        let refunds = self.store.refunds()?;
        Ok(check_refundable(&sale, &refunds, medicine_id, quantity)?)
    }

    /// Computes the refund amount for proposed lines without committing.
    /// Pure preview; repeated calls return the same value.
    pub fn refund_amount(&self, sale: &Sale, lines: &[RefundLine]) -> Money {
        refund_amount(sale, lines)
    }

    /// Validates, computes, appends the refund and restores stock.
    ///
    /// The caller is expected to have run [`validate_refund`] per line
    /// already; the gate runs again here against the latest refund log so
    /// a stale caller cannot over-refund. Returns the persisted record.
    pub fn submit_refund(
        &self,
        sale_id: &str,
        lines: Vec<RefundLine>,
        reason: RefundReason,
        note: Option<String>,
        status: RefundStatus,
    ) -> StoreResult<Refund> {
        if lines.is_empty() {
            return Err(StoreError::Core(CoreError::EmptyCart));
        }

        let sale = self.require_sale(sale_id)?;

        // Latest log, loaded once and used for both gating and append.
        let mut refunds = self.store.refunds()?;

        // Gate on the aggregate per medicine so two lines for the same
        // medicine in one submission cannot slip past the invariant.
        let mut requested: HashMap<&str, i64> = HashMap::new();
        for line in &lines {
            validate_quantity(line.quantity)?;
            *requested.entry(line.medicine_id.as_str()).or_insert(0) += line.quantity;
        }
        for (medicine_id, quantity) in &requested {
            check_refundable(&sale, &refunds, medicine_id, *quantity)?;
        }

        let amount = refund_amount(&sale, &lines);

        let refund = Refund {
            id: Uuid::new_v4().to_string(),
            sale_id: sale.id.clone(),
            invoice_no: sale.id.chars().take(INVOICE_LABEL_LEN).collect(),
            date: Utc::now(),
            lines,
            amount_cents: amount.cents(),
            reason,
            note,
            status,
            customer_name: sale.customer_name.clone(),
            customer_phone: sale.customer_phone.clone(),
        };

        refunds.push(refund.clone());
        self.store.save_refunds(&refunds)?;
        debug!(id = %refund.id, sale_id = %sale.id, amount = %amount, "Refund appended");

        // Restore stock, best effort: the ledger absorbs medicines that
        // no longer exist rather than leaving the appended record behind
        // an error.
        let ledger = InventoryLedger::new(self.store);
        for line in &refund.lines {
            ledger.adjust_stock(&line.medicine_id, line.quantity)?;
        }

        info!(
            id = %refund.id,
            sale_id = %sale.id,
            amount = %amount,
            reason = ?reason,
            "Refund submitted"
        );
        Ok(refund)
    }

    /// Refund state of one sale line: Available, PartiallyRefunded or
    /// FullyRefunded.
    pub fn line_status(&self, sale: &Sale, medicine_id: &str) -> StoreResult<LineRefundStatus> {
        let line = sale
            .line_for(medicine_id)
            .ok_or_else(|| CoreError::SaleLineMissing {
                sale_id: sale.id.clone(),
                medicine_id: medicine_id.to_string(),
            })?;
        let refunded = self.refunded_quantity(&sale.id, medicine_id)?;
        Ok(line_refund_status(line.quantity, refunded))
    }

    /// Builds a refund line from a sale line, snapshotting price and
    /// per-unit discount at refund time.
    pub fn line_from_sale(&self, sale: &Sale, medicine_id: &str, quantity: i64) -> StoreResult<RefundLine> {
        let line = sale
            .line_for(medicine_id)
            .ok_or_else(|| CoreError::SaleLineMissing {
                sale_id: sale.id.clone(),
                medicine_id: medicine_id.to_string(),
            })?;

        // Per-unit discount in cents from the line's percent discount.
        let discount = line.unit_price().percent_of(line.discount());
        let total = line.unit_price().multiply_quantity(quantity)
            - discount.multiply_quantity(quantity);

        Ok(RefundLine {
            medicine_id: line.medicine_id.clone(),
            medicine_name: line.name.clone(),
            company: line.company.clone(),
            batch_number: line.batch_number.clone(),
            quantity,
            original_quantity: line.quantity,
            unit_price_cents: line.unit_price_cents,
            discount_cents: discount.cents(),
            line_total_cents: total.cents(),
        })
    }

    fn require_sale(&self, sale_id: &str) -> StoreResult<Sale> {
        self.store
            .sales()?
            .into_iter()
            .find(|s| s.id == sale_id)
            .ok_or_else(|| StoreError::Core(CoreError::SaleNotFound(sale_id.to_string())))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::repository::sale::{CustomerInfo, PaymentInfo, SaleRepository};
    use chrono::NaiveDate;
    use medistore_core::{CartLine, Medicine, Percentage};

    fn seeded_store() -> PharmacyStore<MemoryBackend> {
        let store = PharmacyStore::new(MemoryBackend::new());
        store
            .save_medicines(&[Medicine {
                id: "med-1".to_string(),
                name: "Panadol".to_string(),
                company: "GSK".to_string(),
                category: "Tablet".to_string(),
                cost_price_cents: 700,
                sale_price_cents: 1000,
                stock: 50,
                reorder_level: 10,
                expiry: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
                batch_number: "B-1".to_string(),
            }])
            .unwrap();
        store
    }

    fn record_sale(store: &PharmacyStore<MemoryBackend>, qty: i64) -> Sale {
        SaleRepository::new(store)
            .record_sale(
                vec![CartLine {
                    medicine_id: "med-1".to_string(),
                    name: "Panadol".to_string(),
                    company: "GSK".to_string(),
                    unit_price_cents: 1000,
                    quantity: qty,
                    discount_bps: 0,
                    batch_number: "B-1".to_string(),
                    stock_at_add: 50,
                }],
                PaymentInfo::card(),
                CustomerInfo {
                    name: Some("Ali".to_string()),
                    phone: None,
                },
                Percentage::zero(),
            )
            .unwrap()
    }

    #[test]
    fn test_validate_refund_unknown_sale() {
        let store = seeded_store();
        let engine = RefundEngine::new(&store);
        let err = engine.validate_refund("ghost", "med-1", 1).unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::SaleNotFound(_))));
    }

    #[test]
    fn test_validate_refund_item_not_in_sale() {
        // Scenario C
        let store = seeded_store();
        let sale = record_sale(&store, 5);
        let engine = RefundEngine::new(&store);
        let err = engine.validate_refund(&sale.id, "med-9", 1).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::SaleLineMissing { .. })
        ));
    }

    #[test]
    fn test_submit_refund_restores_stock_and_records_amount() {
        let store = seeded_store();
        let sale = record_sale(&store, 5); // stock 50 → 45
        let engine = RefundEngine::new(&store);

        let line = engine.line_from_sale(&sale, "med-1", 2).unwrap();
        let refund = engine
            .submit_refund(
                &sale.id,
                vec![line],
                RefundReason::CustomerRequest,
                Some("opened box".to_string()),
                RefundStatus::Completed,
            )
            .unwrap();

        // 5% tax on the sale: subtotal 50.00, tax 2.50.
        // raw refund 20.00, blended share 20.00 × 2.50/50.00 = 1.00
        assert_eq!(refund.amount_cents, 2100);
        assert_eq!(refund.invoice_no, sale.id.chars().take(12).collect::<String>());
        assert_eq!(refund.customer_name.as_deref(), Some("Ali"));

        assert_eq!(store.medicines().unwrap()[0].stock, 47);
        assert_eq!(engine.refunded_quantity(&sale.id, "med-1").unwrap(), 2);
    }

    #[test]
    fn test_submit_refund_regates_against_latest_log() {
        let store = seeded_store();
        let sale = record_sale(&store, 5);
        let engine = RefundEngine::new(&store);

        let first = engine.line_from_sale(&sale, "med-1", 3).unwrap();
        engine
            .submit_refund(
                &sale.id,
                vec![first],
                RefundReason::Defective,
                None,
                RefundStatus::Completed,
            )
            .unwrap();

        // A stale caller that validated before the first submit cannot
        // push the line past its original quantity.
        let second = engine.line_from_sale(&sale, "med-1", 3).unwrap();
        let err = engine
            .submit_refund(
                &sale.id,
                vec![second],
                RefundReason::Defective,
                None,
                RefundStatus::Completed,
            )
            .unwrap_err();
        match err {
            StoreError::Core(CoreError::ExceedsAvailable {
                requested,
                available,
            }) => {
                assert_eq!(requested, 3);
                assert_eq!(available, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_submit_refund_aggregates_duplicate_lines() {
        let store = seeded_store();
        let sale = record_sale(&store, 5);
        let engine = RefundEngine::new(&store);

        // Two lines for the same medicine totaling 6 > 5 sold
        let a = engine.line_from_sale(&sale, "med-1", 3).unwrap();
        let b = engine.line_from_sale(&sale, "med-1", 3).unwrap();
        let err = engine
            .submit_refund(
                &sale.id,
                vec![a, b],
                RefundReason::Other,
                None,
                RefundStatus::Completed,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::ExceedsAvailable { .. })
        ));
    }

    #[test]
    fn test_submit_refund_empty_lines_rejected() {
        let store = seeded_store();
        let sale = record_sale(&store, 5);
        let engine = RefundEngine::new(&store);
        let err = engine
            .submit_refund(
                &sale.id,
                vec![],
                RefundReason::Other,
                None,
                RefundStatus::Completed,
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::EmptyCart)));
    }

    #[test]
    fn test_refund_for_deleted_medicine_still_appends() {
        let store = seeded_store();
        let sale = record_sale(&store, 5);
        let engine = RefundEngine::new(&store);

        // Medicine removed after the sale; refund still goes through and
        // the stock restoration is silently absorbed.
        store.save_medicines(&[]).unwrap();

        let line = engine.line_from_sale(&sale, "med-1", 1).unwrap();
        let refund = engine
            .submit_refund(
                &sale.id,
                vec![line],
                RefundReason::Expired,
                None,
                RefundStatus::Completed,
            )
            .unwrap();
        assert_eq!(engine.refunds_for_sale(&sale.id).unwrap().len(), 1);
        assert_eq!(refund.lines[0].medicine_name, "Panadol");
    }

    #[test]
    fn test_line_status_progression() {
        let store = seeded_store();
        let sale = record_sale(&store, 2);
        let engine = RefundEngine::new(&store);

        assert_eq!(
            engine.line_status(&sale, "med-1").unwrap(),
            LineRefundStatus::Available
        );

        let one = engine.line_from_sale(&sale, "med-1", 1).unwrap();
        engine
            .submit_refund(
                &sale.id,
                vec![one],
                RefundReason::Other,
                None,
                RefundStatus::Completed,
            )
            .unwrap();
        assert_eq!(
            engine.line_status(&sale, "med-1").unwrap(),
            LineRefundStatus::PartiallyRefunded
        );

        let last = engine.line_from_sale(&sale, "med-1", 1).unwrap();
        engine
            .submit_refund(
                &sale.id,
                vec![last],
                RefundReason::Other,
                None,
                RefundStatus::Completed,
            )
            .unwrap();
        assert_eq!(
            engine.line_status(&sale, "med-1").unwrap(),
            LineRefundStatus::FullyRefunded
        );
    }
}
