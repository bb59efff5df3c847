//! # Domain Types
//!
//! Core domain types for the MediStore pharmacy system.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Medicine     │   │      Sale       │   │     Refund      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name/company   │   │  lines[]        │   │  sale_id (ref)  │       │
//! │  │  stock          │   │  totals         │   │  lines[]        │       │
//! │  │  batch/expiry   │   │  payment        │   │  amount/reason  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Udhar       │   │    Settings     │   │      User       │       │
//! │  │  store credit   │   │   singleton     │   │   advisory      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Sale and refund lines freeze the medicine's name, company, batch and
//! price at transaction time. History stays accurate even if the medicine
//! record is later edited or deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Money, Percentage};

// =============================================================================
// Medicine
// =============================================================================

/// A medicine in stock.
///
/// Stock is mutated only through delta adjustments (sales decrement,
/// refunds restore, stock edits correct) and must never go negative;
/// callers cap sale quantities at the available stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name (e.g., "Panadol 500mg").
    pub name: String,

    /// Manufacturer.
    pub company: String,

    /// Category (e.g., "Tablet", "Syrup").
    pub category: String,

    /// Purchase cost per unit in cents (for profit reporting).
    pub cost_price_cents: i64,

    /// Selling price per unit in cents.
    pub sale_price_cents: i64,

    /// Units on hand.
    pub stock: i64,

    /// Stock threshold below which restocking is flagged.
    pub reorder_level: i64,

    /// Expiry date of the current batch.
    pub expiry: NaiveDate,

    /// Batch number of the current stock.
    pub batch_number: String,
}

impl Medicine {
    /// Returns the selling price as Money.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    /// Returns the purchase cost as Money.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Checks whether stock has fallen to or below the reorder level.
    #[inline]
    pub fn needs_reorder(&self) -> bool {
        self.stock <= self.reorder_level
    }

    /// Checks whether the batch expires within `days` of `today`.
    pub fn expires_within(&self, today: NaiveDate, days: i64) -> bool {
        let remaining = self.expiry.signed_duration_since(today).num_days();
        remaining <= days
    }
}

// =============================================================================
// Cart / Sale Lines
// =============================================================================

/// One line of a cart, frozen into the sale record at checkout.
///
/// Uses the snapshot pattern: name, company, batch and unit price are
/// copied from the medicine at add-to-cart time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub medicine_id: String,
    /// Medicine name at time of sale (frozen).
    pub name: String,
    /// Manufacturer at time of sale (frozen).
    pub company: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold (>= 1).
    pub quantity: i64,
    /// Per-line discount in basis points (0..=10000).
    pub discount_bps: u32,
    /// Batch number at time of sale (frozen).
    pub batch_number: String,
    /// Stock on hand when the line was added; the cart UI caps quantity
    /// at this value, which is the Sale Recorder's documented precondition.
    pub stock_at_add: i64,
}

impl CartLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line subtotal before discount (unit price × quantity).
    #[inline]
    pub fn line_subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Returns the per-line discount rate.
    #[inline]
    pub fn discount(&self) -> Percentage {
        Percentage::from_bps(self.discount_bps)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Store credit extended to the customer, settled later.
    Udhar,
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale transaction.
///
/// Immutable once recorded: totals are computed exactly once at creation
/// and never recalculated. History is append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub date: DateTime<Utc>,
    /// Ordered cart lines, frozen at checkout.
    pub lines: Vec<CartLine>,
    pub subtotal_cents: i64,
    /// Aggregate discount (per-line + global) in cents.
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment: PaymentMethod,
    /// For cash: amount the customer handed over.
    pub cash_received_cents: Option<i64>,
    /// For cash: change returned.
    pub change_cents: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

impl Sale {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Finds the sale line for a medicine, if the sale contains one.
    pub fn line_for(&self, medicine_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.medicine_id == medicine_id)
    }

    /// Checks whether the sale references the medicine in any line.
    pub fn references_medicine(&self, medicine_id: &str) -> bool {
        self.line_for(medicine_id).is_some()
    }
}

// =============================================================================
// Refund
// =============================================================================

/// Why a refund was issued. A reason is mandatory on every refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundReason {
    Defective,
    Expired,
    WrongItem,
    CustomerRequest,
    Other,
}

/// Processing status of a refund record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    Completed,
    Pending,
}

/// One line of a refund.
///
/// Price and discount are captured at refund time from the *sale* line,
/// never re-read from the live medicine record - historical accuracy wins
/// over current pricing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundLine {
    pub medicine_id: String,
    /// Medicine name snapshot for historical display.
    pub medicine_name: String,
    pub company: String,
    pub batch_number: String,
    /// Quantity being refunded in this record.
    pub quantity: i64,
    /// Quantity in the original sale line.
    pub original_quantity: i64,
    /// Unit price in cents, copied from the sale line.
    pub unit_price_cents: i64,
    /// Per-unit discount in cents, copied from the sale line.
    pub discount_cents: i64,
    /// Computed line total (unit × qty − discount × qty).
    pub line_total_cents: i64,
}

impl RefundLine {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }
}

/// A refund against a sale.
///
/// Append-only: refunds are never mutated. The quantity already refunded
/// for any (sale, medicine) pair is always re-derived by replaying these
/// records, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    /// Back-reference to the originating sale.
    pub sale_id: String,
    /// Invoice label shown on refund receipts (derived from the sale id).
    pub invoice_no: String,
    pub date: DateTime<Utc>,
    pub lines: Vec<RefundLine>,
    /// Total refunded amount in cents, incl. the proportional tax share.
    pub amount_cents: i64,
    pub reason: RefundReason,
    pub note: Option<String>,
    pub status: RefundStatus,
    /// Customer snapshot copied from the sale.
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
}

impl Refund {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Udhar (Store Credit)
// =============================================================================

/// Payment state of a credit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UdharStatus {
    Paid,
    Unpaid,
}

/// Store credit ("udhar") extended to a customer, settled later.
///
///// Shares the append + status-transition lifecycle: created unpaid,
/// flipped to paid once settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Udhar {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub amount_cents: i64,
    pub status: UdharStatus,
    pub date: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<DateTime<Utc>>,
    pub invoice_no: String,
    pub note: Option<String>,
}

impl Udhar {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    #[inline]
    pub fn is_unpaid(&self) -> bool {
        self.status == UdharStatus::Unpaid
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Singleton shop configuration.
///
/// The Sale Recorder reads `default_tax_bps`; everything else is carried
/// so the stored document round-trips unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub shop_name: String,
    /// Currency symbol for display (e.g., "Rs").
    pub currency: String,
    /// Default tax rate in basis points (500 = 5%).
    pub default_tax_bps: u32,
    /// Default global discount in basis points.
    pub default_discount_bps: u32,
    pub invoice_prefix: String,
    pub invoice_footer: String,
    pub show_customer_info: bool,
    pub enable_udhar: bool,
    /// Stock level at or below which a medicine is flagged low.
    pub low_stock_threshold: i64,
    /// Days ahead to flag upcoming batch expiries.
    pub expiry_alert_days: i64,
    // UI preferences, persisted but unused by the core.
    pub dark_mode: bool,
    pub compact_sidebar: bool,
}

impl Settings {
    /// Returns the default tax rate.
    #[inline]
    pub fn default_tax(&self) -> Percentage {
        Percentage::from_bps(self.default_tax_bps)
    }

    /// Returns the default global discount rate.
    #[inline]
    pub fn default_discount(&self) -> Percentage {
        Percentage::from_bps(self.default_discount_bps)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            shop_name: "MediStore Pharmacy".to_string(),
            currency: "Rs".to_string(),
            default_tax_bps: 500,
            default_discount_bps: 0,
            invoice_prefix: "INV-".to_string(),
            invoice_footer: "Thank you for your business!".to_string(),
            show_customer_info: true,
            enable_udhar: true,
            low_stock_threshold: 50,
            expiry_alert_days: 30,
            dark_mode: false,
            compact_sidebar: false,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// Role of a store user. Advisory only - the core enforces no permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Staff,
}

/// A store user. The user list drives the login screen, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn medicine() -> Medicine {
        Medicine {
            id: "med-1".to_string(),
            name: "Panadol".to_string(),
            company: "GSK".to_string(),
            category: "Tablet".to_string(),
            cost_price_cents: 700,
            sale_price_cents: 1000,
            stock: 20,
            reorder_level: 25,
            expiry: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            batch_number: "B-42".to_string(),
        }
    }

    #[test]
    fn test_needs_reorder() {
        let mut med = medicine();
        assert!(med.needs_reorder());
        med.stock = 26;
        assert!(!med.needs_reorder());
    }

    #[test]
    fn test_expires_within() {
        let med = medicine();
        let today = NaiveDate::from_ymd_opt(2026, 12, 10).unwrap();
        assert!(med.expires_within(today, 30));
        assert!(!med.expires_within(today, 10));
    }

    #[test]
    fn test_cart_line_subtotal() {
        let line = CartLine {
            medicine_id: "med-1".to_string(),
            name: "Panadol".to_string(),
            company: "GSK".to_string(),
            unit_price_cents: 1000,
            quantity: 3,
            discount_bps: 1000,
            batch_number: "B-42".to_string(),
            stock_at_add: 20,
        };
        assert_eq!(line.line_subtotal().cents(), 3000);
        assert_eq!(line.discount().bps(), 1000);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_tax().bps(), 500);
        assert_eq!(settings.currency, "Rs");
        assert_eq!(settings.low_stock_threshold, 50);
        assert!(settings.enable_udhar);
    }

    #[test]
    fn test_payment_method_serde_tags() {
        let json = serde_json::to_string(&PaymentMethod::Udhar).unwrap();
        assert_eq!(json, "\"udhar\"");
        let json = serde_json::to_string(&RefundReason::WrongItem).unwrap();
        assert_eq!(json, "\"wrong_item\"");
    }
}
