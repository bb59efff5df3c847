//! # Sale Repository
//!
//! Records completed transactions and answers sale-history queries.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(lines, payment, customer)                                  │
//! │                                                                         │
//! │  1. Gate: cart non-empty, cash received covers the total               │
//! │  2. Compute totals once (subtotal / discount / tax / total)            │
//! │  3. Append the immutable Sale record                                   │
//! │  4. Decrement stock for every line via the inventory ledger            │
//! │                                                                         │
//! │  The recorder trusts its input: the cart builder has already capped    │
//! │  each quantity at the stock available when the line was added, so no   │
//! │  stock re-check happens here. Documented boundary, not a gap.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use medistore_core::totals::{sale_totals, SaleTotals};
use medistore_core::validation::{validate_quantity, validate_rate_bps};
use medistore_core::{
    CartLine, CoreError, Money, PaymentMethod, Percentage, Sale, ValidationError, MAX_CART_LINES,
};

use crate::backend::StorageBackend;
use crate::error::{StoreError, StoreResult};
use crate::repository::inventory::InventoryLedger;
use crate::store::PharmacyStore;

/// How the customer is paying.
#[derive(Debug, Clone)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    /// Required when method is Cash; must cover the total.
    pub cash_received_cents: Option<i64>,
}

impl PaymentInfo {
    pub fn cash(received_cents: i64) -> Self {
        PaymentInfo {
            method: PaymentMethod::Cash,
            cash_received_cents: Some(received_cents),
        }
    }

    pub fn card() -> Self {
        PaymentInfo {
            method: PaymentMethod::Card,
            cash_received_cents: None,
        }
    }

    pub fn udhar() -> Self {
        PaymentInfo {
            method: PaymentMethod::Udhar,
            cash_received_cents: None,
        }
    }
}

/// Optional customer details attached to the sale.
#[derive(Debug, Clone, Default)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Repository for sale records.
#[derive(Debug)]
pub struct SaleRepository<'a, B> {
    store: &'a PharmacyStore<B>,
}

impl<'a, B: StorageBackend> SaleRepository<'a, B> {
    pub fn new(store: &'a PharmacyStore<B>) -> Self {
        SaleRepository { store }
    }

    /// Returns the full sale history.
    pub fn all(&self) -> StoreResult<Vec<Sale>> {
        self.store.sales()
    }

    /// Finds a sale by id.
    pub fn find(&self, id: &str) -> StoreResult<Option<Sale>> {
        Ok(self.store.sales()?.into_iter().find(|s| s.id == id))
    }

    /// Computes the monetary breakdown for a cart without committing
    /// anything. Used for checkout display; the same math runs again in
    /// [`record_sale`](Self::record_sale).
    pub fn preview_totals(
        &self,
        lines: &[CartLine],
        global_discount: Percentage,
    ) -> StoreResult<SaleTotals> {
        let settings = self.store.settings()?;
        let medicines = self.store.medicines()?;
        Ok(sale_totals(
            lines,
            global_discount,
            settings.default_tax(),
            |id| {
                medicines
                    .iter()
                    .find(|m| m.id == id)
                    .map(|m| m.cost_price())
            },
        ))
    }

    /// Validates, computes totals, appends the sale and decrements stock.
    ///
    /// Totals use the default tax rate from settings; `global_discount`
    /// applies on top of any per-line discounts. Returns the persisted
    /// sale.
    pub fn record_sale(
        &self,
        lines: Vec<CartLine>,
        payment: PaymentInfo,
        customer: CustomerInfo,
        global_discount: Percentage,
    ) -> StoreResult<Sale> {
        if lines.is_empty() {
            return Err(StoreError::Core(CoreError::EmptyCart));
        }
        if lines.len() > MAX_CART_LINES {
            return Err(ValidationError::OutOfRange {
                field: "lines".to_string(),
                min: 1,
                max: MAX_CART_LINES as i64,
            }
            .into());
        }
        for line in &lines {
            validate_quantity(line.quantity)?;
            validate_rate_bps("discount", line.discount_bps)?;
        }
        validate_rate_bps("discount", global_discount.bps())?;

        let totals = self.preview_totals(&lines, global_discount)?;

        // Cash must cover the total before anything is written.
        let (cash_received, change) = match payment.method {
            PaymentMethod::Cash => {
                let received = Money::from_cents(payment.cash_received_cents.unwrap_or(0));
                if received < totals.total {
                    return Err(StoreError::Core(CoreError::InsufficientCash {
                        total_cents: totals.total.cents(),
                        received_cents: received.cents(),
                    }));
                }
                (Some(received.cents()), Some((received - totals.total).cents()))
            }
            _ => (None, None),
        };

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            lines,
            subtotal_cents: totals.subtotal.cents(),
            discount_cents: totals.discount.cents(),
            tax_cents: totals.tax.cents(),
            total_cents: totals.total.cents(),
            payment: payment.method,
            cash_received_cents: cash_received,
            change_cents: change,
            customer_name: customer.name,
            customer_phone: customer.phone,
        };

        let mut sales = self.store.sales()?;
        sales.push(sale.clone());
        self.store.save_sales(&sales)?;
        debug!(id = %sale.id, total = %totals.total, "Sale appended");

        // Decrement stock for every line. The ledger absorbs lines whose
        // medicine has since been deleted.
        let ledger = InventoryLedger::new(self.store);
        for line in &sale.lines {
            ledger.adjust_stock(&line.medicine_id, -line.quantity)?;
        }

        info!(
            id = %sale.id,
            total = %totals.total,
            lines = sale.lines.len(),
            payment = ?sale.payment,
            "Sale recorded"
        );
        Ok(sale)
    }

    // -------------------------------------------------------------------------
    // Medicine-referencing queries
    // -------------------------------------------------------------------------

    /// All sales containing a line for the medicine id.
    pub fn sales_referencing_medicine(&self, medicine_id: &str) -> StoreResult<Vec<Sale>> {
        Ok(self
            .store
            .sales()?
            .into_iter()
            .filter(|s| s.references_medicine(medicine_id))
            .collect())
    }

    /// All sales containing a line whose medicine name matches the search
    /// term (case-insensitive substring). Drives the refund search screen.
    pub fn search_by_medicine_name(&self, term: &str) -> StoreResult<Vec<Sale>> {
        let needle = term.trim().to_lowercase();
        Ok(self
            .store
            .sales()?
            .into_iter()
            .filter(|s| {
                s.lines
                    .iter()
                    .any(|l| l.name.to_lowercase().contains(&needle))
            })
            .collect())
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

    fn line(medicine_id: &str, name: &str, price: i64, qty: i64) -> CartLine {
        CartLine {
            medicine_id: medicine_id.to_string(),
            name: name.to_string(),
            company: "GSK".to_string(),
            unit_price_cents: price,
            quantity: qty,
            discount_bps: 0,
            batch_number: "B-1".to_string(),
            stock_at_add: 100,
        }
    }

    fn seeded_store() -> PharmacyStore<MemoryBackend> {
        let store = PharmacyStore::new(MemoryBackend::new());
        let meds: Vec<Medicine> = [("med-1", "Panadol"), ("med-2", "Brufen")]
            .iter()
            .map(|(id, name)| Medicine {
                id: id.to_string(),
                name: name.to_string(),
                company: "GSK".to_string(),
                category: "Tablet".to_string(),
                cost_price_cents: 700,
                sale_price_cents: 1000,
                stock: 100,
                reorder_level: 10,
                expiry: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
                batch_number: "B-1".to_string(),
            })
            .collect();
        store.save_medicines(&meds).unwrap();
        store
    }

    #[test]
    fn test_empty_cart_rejected() {
        let store = seeded_store();
        let repo = SaleRepository::new(&store);
        let err = repo
            .record_sale(
                vec![],
                PaymentInfo::card(),
                CustomerInfo::default(),
                Percentage::zero(),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::EmptyCart)));
    }

    #[test]
    fn test_oversized_cart_rejected() {
        let store = seeded_store();
        let repo = SaleRepository::new(&store);

        let lines: Vec<CartLine> = (0..=MAX_CART_LINES)
            .map(|_| line("med-1", "Panadol", 1000, 1))
            .collect();
        let err = repo
            .record_sale(
                lines,
                PaymentInfo::card(),
                CustomerInfo::default(),
                Percentage::zero(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_insufficient_cash_rejected() {
        let store = seeded_store();
        let repo = SaleRepository::new(&store);

        // 2 × 10.00 = 20.00, 5% tax → 21.00; offering 20.00 fails
        let err = repo
            .record_sale(
                vec![line("med-1", "Panadol", 1000, 2)],
                PaymentInfo::cash(2000),
                CustomerInfo::default(),
                Percentage::zero(),
            )
            .unwrap_err();
        match err {
            StoreError::Core(CoreError::InsufficientCash {
                total_cents,
                received_cents,
            }) => {
                assert_eq!(total_cents, 2100);
                assert_eq!(received_cents, 2000);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Nothing was written, stock untouched
        assert!(store.sales().unwrap().is_empty());
        assert_eq!(store.medicines().unwrap()[0].stock, 100);
    }

    #[test]
    fn test_record_sale_computes_change_and_decrements_stock() {
        // Scenario E: two lines of qty 3 and 1 decrement both medicines
        let store = seeded_store();
        let repo = SaleRepository::new(&store);

        let sale = repo
            .record_sale(
                vec![
                    line("med-1", "Panadol", 1000, 3),
                    line("med-2", "Brufen", 500, 1),
                ],
                PaymentInfo::cash(5000),
                CustomerInfo {
                    name: Some("Ali".to_string()),
                    phone: None,
                },
                Percentage::zero(),
            )
            .unwrap();

        // subtotal 35.00, tax 5% = 1.75, total 36.75, change 13.25
        assert_eq!(sale.subtotal_cents, 3500);
        assert_eq!(sale.tax_cents, 175);
        assert_eq!(sale.total_cents, 3675);
        assert_eq!(sale.cash_received_cents, Some(5000));
        assert_eq!(sale.change_cents, Some(1325));
        assert_eq!(
            sale.total_cents,
            sale.subtotal_cents - sale.discount_cents + sale.tax_cents
        );

        let meds = store.medicines().unwrap();
        assert_eq!(meds.iter().find(|m| m.id == "med-1").unwrap().stock, 97);
        assert_eq!(meds.iter().find(|m| m.id == "med-2").unwrap().stock, 99);
    }

    #[test]
    fn test_sale_history_appends() {
        let store = seeded_store();
        let repo = SaleRepository::new(&store);

        for _ in 0..3 {
            repo.record_sale(
                vec![line("med-1", "Panadol", 1000, 1)],
                PaymentInfo::card(),
                CustomerInfo::default(),
                Percentage::zero(),
            )
            .unwrap();
        }
        assert_eq!(repo.all().unwrap().len(), 3);
    }

    #[test]
    fn test_sales_referencing_medicine() {
        let store = seeded_store();
        let repo = SaleRepository::new(&store);

        repo.record_sale(
            vec![line("med-1", "Panadol", 1000, 1)],
            PaymentInfo::card(),
            CustomerInfo::default(),
            Percentage::zero(),
        )
        .unwrap();
        repo.record_sale(
            vec![line("med-2", "Brufen", 500, 2)],
            PaymentInfo::card(),
            CustomerInfo::default(),
            Percentage::zero(),
        )
        .unwrap();

        assert_eq!(repo.sales_referencing_medicine("med-1").unwrap().len(), 1);
        assert_eq!(repo.sales_referencing_medicine("med-9").unwrap().len(), 0);
    }

    #[test]
    fn test_search_by_medicine_name() {
        let store = seeded_store();
        let repo = SaleRepository::new(&store);

        repo.record_sale(
            vec![line("med-1", "Panadol Extra", 1200, 1)],
            PaymentInfo::card(),
            CustomerInfo::default(),
            Percentage::zero(),
        )
        .unwrap();

        assert_eq!(repo.search_by_medicine_name("panadol").unwrap().len(), 1);
        assert_eq!(repo.search_by_medicine_name("  EXTRA ").unwrap().len(), 1);
        assert!(repo.search_by_medicine_name("brufen").unwrap().is_empty());
    }

    #[test]
    fn test_udhar_sale_has_no_cash_fields() {
        let store = seeded_store();
        let repo = SaleRepository::new(&store);

        let sale = repo
            .record_sale(
                vec![line("med-1", "Panadol", 1000, 1)],
                PaymentInfo::udhar(),
                CustomerInfo {
                    name: Some("Bilal".to_string()),
                    phone: Some("0300-1234567".to_string()),
                },
                Percentage::zero(),
            )
            .unwrap();
        assert_eq!(sale.payment, PaymentMethod::Udhar);
        assert_eq!(sale.cash_received_cents, None);
        assert_eq!(sale.change_cents, None);
    }
}
