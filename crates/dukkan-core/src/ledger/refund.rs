//! # Refund Reconciliation
//!
//! Planning a refund against a debt: headroom validation, closed-account
//! detection, and the offsetting "Geri Ödeme" payment.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Refund Reconciliation                              │
//! │                                                                         │
//! │  Refund request (debt, product, quantity, refund amount)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  prior refunds + requested > debt amount?                              │
//! │       ├── yes → RefundExceedsDebt, nothing persisted                   │
//! │       ▼                                                                 │
//! │  net_paid = total_paid - total_refunded   (customer aggregates)        │
//! │  closed   = net_paid >= debt amount                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  offsetting Payment { amount: 0, refund_amount: X, "Geri Ödeme" }      │
//! │  + stock restored by quantity                                          │
//! │  + Refund record (status completed)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Known Quirk (inherited, intentionally preserved)
//! Open and closed accounts both get the same offsetting payment; only the
//! `notes` string differs. The predecessor system computed the open/closed
//! distinction and then executed the same write in both branches. Changing
//! an open-account refund to reduce the debt amount directly would rewrite
//! historical ledger totals, so the behavior is kept until the business
//! confirms the intended semantics. See DESIGN.md.

use crate::error::CoreError;
use crate::money::Money;

/// Description on every offsetting refund payment.
pub const REFUND_OFFSET_DESCRIPTION: &str = "Geri Ödeme";

/// Notes marker for refunds against a closed account.
pub const CLOSED_ACCOUNT_NOTE: &str = "Kapalı hesap iadesi";

/// Notes marker for refunds against an open account.
pub const OPEN_ACCOUNT_NOTE: &str = "Açık hesap iadesi";

/// Ledger aggregates needed to plan a refund.
///
/// The storage layer computes these inside the refund transaction so the
/// plan is based on a consistent snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RefundContext {
    /// The target debt's amount (debt-scoped, not a customer-wide sum).
    pub debt_amount: Money,
    /// Sum of completed refunds already issued against this debt.
    pub prior_refunds: Money,
    /// Sum of active payment amounts for the customer
    /// (scoped to the sub-customer when one is given).
    pub total_paid: Money,
    /// Sum of active refund amounts for the customer (same scope).
    pub total_refunded: Money,
}

/// The planned effects of a refund.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundPlan {
    /// Whether the account already counted as settled at refund time.
    pub closed_account: bool,
    /// Notes string for the offsetting payment.
    pub offset_note: &'static str,
}

/// Validates a refund request and decides the ledger effects.
///
/// ## Rules
/// - `refund` must be positive
/// - `prior_refunds + refund` must not exceed `debt_amount`, otherwise
///   `RefundExceedsDebt`
/// - Closed account: `total_paid - total_refunded >= debt_amount`
///
/// Refunds are not deduplicated: replaying the same request either trips
/// the headroom check or legitimately produces a second refund.
pub fn plan_refund(
    debt_id: &str,
    ctx: &RefundContext,
    refund: Money,
) -> Result<RefundPlan, CoreError> {
    if !refund.is_positive() {
        return Err(CoreError::InvalidPaymentAmount {
            reason: "refund amount must be positive".to_string(),
        });
    }

    if ctx.prior_refunds + refund > ctx.debt_amount {
        return Err(CoreError::RefundExceedsDebt {
            debt_id: debt_id.to_string(),
            debt_kurus: ctx.debt_amount.kurus(),
            requested_kurus: refund.kurus(),
            already_refunded_kurus: ctx.prior_refunds.kurus(),
        });
    }

    let net_paid = ctx.total_paid - ctx.total_refunded;
    let closed_account = net_paid >= ctx.debt_amount;

    Ok(RefundPlan {
        closed_account,
        offset_note: if closed_account {
            CLOSED_ACCOUNT_NOTE
        } else {
            OPEN_ACCOUNT_NOTE
        },
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(debt: i64, prior: i64, paid: i64, refunded: i64) -> RefundContext {
        RefundContext {
            debt_amount: Money::from_kurus(debt),
            prior_refunds: Money::from_kurus(prior),
            total_paid: Money::from_kurus(paid),
            total_refunded: Money::from_kurus(refunded),
        }
    }

    #[test]
    fn test_refund_exceeding_debt_is_rejected() {
        // Spec scenario: refund 1200 against a debt of 1000, no priors
        let err = plan_refund("d1", &ctx(1000, 0, 0, 0), Money::from_kurus(1200)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::RefundExceedsDebt {
                debt_kurus: 1000,
                requested_kurus: 1200,
                already_refunded_kurus: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_prior_refunds_count_against_headroom() {
        // 700 already refunded, 400 more would exceed the 1000 debt
        let err = plan_refund("d1", &ctx(1000, 700, 0, 0), Money::from_kurus(400)).unwrap_err();
        assert!(matches!(err, CoreError::RefundExceedsDebt { .. }));

        // 300 exactly exhausts the headroom
        assert!(plan_refund("d1", &ctx(1000, 700, 0, 0), Money::from_kurus(300)).is_ok());
    }

    #[test]
    fn test_open_account_detection() {
        // Paid 400 of a 1000 debt: net_paid < debt_amount, account open
        let plan = plan_refund("d1", &ctx(1000, 0, 400, 0), Money::from_kurus(200)).unwrap();
        assert!(!plan.closed_account);
        assert_eq!(plan.offset_note, OPEN_ACCOUNT_NOTE);
    }

    #[test]
    fn test_closed_account_detection() {
        // Fully paid: net_paid >= debt_amount
        let plan = plan_refund("d1", &ctx(1000, 0, 1000, 0), Money::from_kurus(200)).unwrap();
        assert!(plan.closed_account);
        assert_eq!(plan.offset_note, CLOSED_ACCOUNT_NOTE);
    }

    #[test]
    fn test_prior_refunds_reopen_account() {
        // Paid 1000 but 300 already refunded: net_paid 700 < 1000
        let plan = plan_refund("d1", &ctx(1000, 300, 1000, 300), Money::from_kurus(200)).unwrap();
        assert!(!plan.closed_account);
    }

    #[test]
    fn test_zero_refund_rejected() {
        let err = plan_refund("d1", &ctx(1000, 0, 0, 0), Money::zero()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPaymentAmount { .. }));
    }
}
