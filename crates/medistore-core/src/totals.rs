//! # Sale Totals
//!
//! Pure computation of a sale's monetary breakdown from its cart lines.
//!
//! ## Computation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal  = Σ (unit price × quantity)                                  │
//! │  discount  = Σ (line subtotal × line discount)                          │
//! │            + subtotal × global discount                                 │
//! │  tax       = (subtotal − discount) × tax rate                           │
//! │  total     = subtotal − discount + tax                                  │
//! │  profit    = Σ ((unit − cost) × qty, reduced by the line discount)      │
//! │                                                                         │
//! │  Each percent application rounds half-up at the cent boundary.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are computed exactly once, at checkout; the resulting `Sale`
//! record is immutable and is never recalculated.

use crate::money::{Money, Percentage};
use crate::types::CartLine;

/// Monetary breakdown of a cart at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleTotals {
    pub subtotal: Money,
    /// Aggregate discount: per-line discounts plus the global discount.
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
    /// Informational only - reported to the caller, never persisted on
    /// the sale record.
    pub profit: Money,
}

/// Computes the totals for a cart.
///
/// `cost_of` supplies the current cost price for a medicine id, or `None`
/// when the medicine is unknown (its lines then contribute zero profit).
/// Taking a closure keeps this module free of storage access.
pub fn sale_totals<F>(
    lines: &[CartLine],
    global_discount: Percentage,
    tax_rate: Percentage,
    cost_of: F,
) -> SaleTotals
where
    F: Fn(&str) -> Option<Money>,
{
    let subtotal: Money = lines.iter().map(|l| l.line_subtotal()).sum();

    let line_discount: Money = lines
        .iter()
        .map(|l| l.line_subtotal().percent_of(l.discount()))
        .sum();
    let discount = line_discount + subtotal.percent_of(global_discount);

    let tax = (subtotal - discount).percent_of(tax_rate);
    let total = subtotal - discount + tax;

    let profit: Money = lines
        .iter()
        .filter_map(|l| {
            let cost = cost_of(&l.medicine_id)?;
            let gross = (l.unit_price() - cost).multiply_quantity(l.quantity);
            Some(gross - gross.percent_of(l.discount()))
        })
        .sum();

    SaleTotals {
        subtotal,
        discount,
        tax,
        total,
        profit,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
