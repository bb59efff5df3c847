//! # Refund Reconciliation
//!
//! Pure math behind partial refunds: how much of a sold line may still be
//! refunded, and how much money a refund is worth.
//!
//! ## Replay-Based Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The refund log is append-only. "How much of line X was refunded?"     │
//! │  is ALWAYS answered by replaying every refund against the sale:        │
//! │                                                                         │
//! │    Sale S ──► Refund #1 (qty 2) ──► Refund #2 (qty 1) ──► ...          │
//! │                                                                         │
//! │    refunded_quantity(S, X) = 2 + 1 = 3   (recomputed, never cached)    │
//! │                                                                         │
//! │  No running counter means no counter to invalidate: the derived value  │
//! │  is consistent with history by construction.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Gating
//! `check_refundable` enforces the conservation invariant: across all
//! refunds of a sale, the refunded quantity of a line never exceeds the
//! quantity originally sold. Callers must check it immediately before
//! constructing a refund.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Refund, RefundLine, Sale};

// =============================================================================
// Replay
// =============================================================================

/// Sums the quantity of `medicine_id` refunded against `sale_id` across
/// the given refund records.
///
/// Pure and idempotent: same records in, same count out. Returns 0 when no
/// refund touches the line. Records for other sales are ignored, so the
/// whole refund collection can be passed as-is.
pub fn refunded_quantity(refunds: &[Refund], sale_id: &str, medicine_id: &str) -> i64 {
    refunds
        .iter()
        .filter(|r| r.sale_id == sale_id)
        .flat_map(|r| r.lines.iter())
        .filter(|l| l.medicine_id == medicine_id)
        .map(|l| l.quantity)
        .sum()
}

// =============================================================================
// Gating
// =============================================================================

/// Checks whether `requested` more units of `medicine_id` may be refunded
/// against `sale`.
///
/// ## Algorithm
/// 1. Find the sale line for the medicine (`SaleLineMissing` if absent).
/// 2. Replay the refund log to get the already-refunded quantity.
/// 3. available = sold − already refunded.
/// 4. available == 0  → `FullyRefunded`.
/// 5. requested > available → `ExceedsAvailable { requested, available }`.
///
/// Returns the available quantity on success so the caller can clamp its
/// input bounds.
///
/// The sale lookup itself lives in the store layer (which owns the sales
/// collection and reports `SaleNotFound`); this function gates a sale the
/// caller already holds.
pub fn check_refundable(
    sale: &Sale,
    refunds: &[Refund],
    medicine_id: &str,
    requested: i64,
) -> CoreResult<i64> {
    let line = sale
        .line_for(medicine_id)
        .ok_or_else(|| CoreError::SaleLineMissing {
            sale_id: sale.id.clone(),
            medicine_id: medicine_id.to_string(),
        })?;

    let already = refunded_quantity(refunds, &sale.id, medicine_id);
    let available = line.quantity - already;

    if available <= 0 {
        return Err(CoreError::FullyRefunded {
            sale_id: sale.id.clone(),
            medicine_id: medicine_id.to_string(),
        });
    }

    if requested > available {
        return Err(CoreError::ExceedsAvailable {
            requested,
            available,
        });
    }

    Ok(available)
}

// =============================================================================
// Amount Computation
// =============================================================================

/// Computes the monetary amount for a set of refund lines against a sale.
///
/// ## Algorithm
/// 1. raw = Σ (unit price × qty − per-unit discount × qty)
/// 2. If the sale carried tax, add the blended tax share:
///    raw × sale.tax / sale.subtotal.
///
/// The blended rate assumes tax was applied uniformly across the sale; this
/// is the historical behavior and is preserved as-is rather than replaced
/// with per-line tax allocation. Prices come from the refund lines (sale
/// snapshots), never from the live medicine record.
///
/// Pure function - safe to call repeatedly for preview before commit.
pub fn refund_amount(sale: &Sale, lines: &[RefundLine]) -> Money {
    let raw: Money = lines
        .iter()
        .map(|l| {
            l.unit_price().multiply_quantity(l.quantity)
                - l.discount().multiply_quantity(l.quantity)
        })
        .sum();

    if sale.tax().is_positive() {
        raw + raw.proportional(sale.tax(), sale.subtotal())
    } else {
        raw
    }
}

// =============================================================================
// Status Derivation
// =============================================================================

/// Refund state of one sale line, derived from the replayed quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRefundStatus {
    /// Nothing refunded yet.
    Available,
    /// Some but not all units refunded.
    PartiallyRefunded,
    /// Every unit refunded.
    FullyRefunded,
}

/// Classifies a sale line from its original and refunded quantities.
pub fn line_refund_status(original: i64, refunded: i64) -> LineRefundStatus {
    if refunded <= 0 {
        LineRefundStatus::Available
    } else if refunded < original {
        LineRefundStatus::PartiallyRefunded
    } else {
        LineRefundStatus::FullyRefunded
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
