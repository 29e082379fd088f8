//! # Payment Allocation
//!
//! Splitting an untargeted payment across a customer's open debts,
//! oldest-first.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Oldest-First Allocation                                    │
//! │                                                                         │
//! │  Payment: ₺6,00       Open debts (created_at ascending):               │
//! │                                                                         │
//! │  ┌──────────────┐     Debt A  amount ₺4,00  paid ₺0,00                 │
//! │  │ remaining    │ ──► apply ₺4,00 → A paid in full                     │
//! │  │ ₺6,00 → ₺2,00│                                                      │
//! │  │              │     Debt B  amount ₺5,00  paid ₺2,00                 │
//! │  │ ₺2,00 → ₺0,00│ ──► apply ₺2,00 → B at ₺4,00/₺5,00, still open      │
//! │  └──────────────┘                                                      │
//! │                       Debt C  never visited (payment exhausted)        │
//! │                                                                         │
//! │  Leftover after all debts are exhausted is returned as `unallocated`   │
//! │  and it is the caller's job to decide what to do with it.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::money::Money;
use crate::types::Debt;

/// One debt's share of an allocated payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub debt_id: String,
    /// Portion of the payment applied to this debt.
    pub applied: Money,
    /// The debt's paid_amount after the application.
    pub new_paid_kurus: i64,
    /// Whether the debt is settled after the application.
    pub is_paid: bool,
}

/// Result of allocating one payment across open debts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub allocations: Vec<Allocation>,
    /// Remainder left after every open debt was visited.
    pub unallocated: Money,
}

impl AllocationOutcome {
    /// Total amount actually applied to debts.
    pub fn total_applied(&self) -> Money {
        self.allocations
            .iter()
            .fold(Money::zero(), |acc, a| acc + a.applied)
    }
}

/// Allocates a payment across open debts, oldest first.
///
/// ## Rules
/// - Debts are visited in ascending `created_at` order; equal timestamps
///   keep their input order (no secondary tie-break is defined)
/// - Settled debts (`is_paid`) are skipped
/// - Each debt receives `min(remaining payment, debt remaining)`
/// - The walk stops when the payment is exhausted
/// - Whatever is left after the last open debt is returned as
///   `unallocated`, never silently dropped
pub fn allocate_oldest_first(debts: &[Debt], amount: Money) -> AllocationOutcome {
    let mut ordered: Vec<&Debt> = debts.iter().filter(|d| !d.is_paid).collect();
    // Stable: preserves input order for equal timestamps
    ordered.sort_by_key(|d| d.created_at);

    let mut remaining_payment = amount;
    let mut allocations = Vec::new();

    for debt in ordered {
        if remaining_payment.is_zero() || remaining_payment.is_negative() {
            break;
        }

        let applied = remaining_payment.min(debt.remaining());
        if !applied.is_positive() {
            continue;
        }

        let new_paid = debt.paid_amount_kurus + applied.kurus();
        allocations.push(Allocation {
            debt_id: debt.id.clone(),
            applied,
            new_paid_kurus: new_paid,
            is_paid: new_paid >= debt.amount_kurus,
        });

        remaining_payment -= applied;
    }

    AllocationOutcome {
        allocations,
        unallocated: remaining_payment,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DebtKind, RecordStatus};
    use chrono::{Duration, Utc};

    fn debt(id: &str, amount: i64, paid: i64, age_days: i64) -> Debt {
        Debt {
            id: id.into(),
            customer_id: "c1".into(),
            sub_customer_id: None,
            amount_kurus: amount,
            paid_amount_kurus: paid,
            is_paid: paid >= amount,
            sale_id: None,
            kind: DebtKind::Manual,
            description: None,
            due_date: None,
            status: RecordStatus::Active,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[test]
    fn test_single_debt_two_payments() {
        // Spec scenario: one debt of 1000; 600 then 400
        let debts = vec![debt("d1", 1000, 0, 1)];
        let first = allocate_oldest_first(&debts, Money::from_kurus(600));
        assert_eq!(first.allocations.len(), 1);
        assert_eq!(first.allocations[0].applied.kurus(), 600);
        assert_eq!(first.allocations[0].new_paid_kurus, 600);
        assert!(!first.allocations[0].is_paid);
        assert!(first.unallocated.is_zero());

        let debts = vec![debt("d1", 1000, 600, 1)];
        let second = allocate_oldest_first(&debts, Money::from_kurus(400));
        assert_eq!(second.allocations[0].new_paid_kurus, 1000);
        assert!(second.allocations[0].is_paid);
        assert!(second.unallocated.is_zero());
    }

    #[test]
    fn test_oldest_debt_paid_first() {
        let debts = vec![
            debt("newer", 500, 0, 1),
            debt("oldest", 400, 0, 10),
            debt("middle", 300, 0, 5),
        ];
        let outcome = allocate_oldest_first(&debts, Money::from_kurus(600));

        let ids: Vec<&str> = outcome
            .allocations
            .iter()
            .map(|a| a.debt_id.as_str())
            .collect();
        assert_eq!(ids, vec!["oldest", "middle"]);

        assert_eq!(outcome.allocations[0].applied.kurus(), 400);
        assert!(outcome.allocations[0].is_paid);
        assert_eq!(outcome.allocations[1].applied.kurus(), 200);
        assert!(!outcome.allocations[1].is_paid);
        assert!(outcome.unallocated.is_zero());
    }

    #[test]
    fn test_applied_never_exceeds_payment() {
        let debts = vec![debt("d1", 300, 0, 3), debt("d2", 300, 0, 2)];
        let outcome = allocate_oldest_first(&debts, Money::from_kurus(450));

        assert_eq!(outcome.total_applied().kurus(), 450);
        assert!(outcome.unallocated.is_zero());
    }

    #[test]
    fn test_leftover_is_reported() {
        let debts = vec![debt("d1", 300, 100, 1)];
        let outcome = allocate_oldest_first(&debts, Money::from_kurus(500));

        assert_eq!(outcome.total_applied().kurus(), 200);
        assert_eq!(outcome.unallocated.kurus(), 300);
    }

    #[test]
    fn test_settled_debts_are_skipped() {
        let debts = vec![debt("paid", 300, 300, 9), debt("open", 400, 0, 1)];
        let outcome = allocate_oldest_first(&debts, Money::from_kurus(100));

        assert_eq!(outcome.allocations.len(), 1);
        assert_eq!(outcome.allocations[0].debt_id, "open");
    }

    #[test]
    fn test_no_open_debts() {
        let outcome = allocate_oldest_first(&[], Money::from_kurus(100));
        assert!(outcome.allocations.is_empty());
        assert_eq!(outcome.unallocated.kurus(), 100);
    }

    #[test]
    fn test_partially_paid_debt_only_receives_remainder() {
        let debts = vec![debt("d1", 1000, 800, 1)];
        let outcome = allocate_oldest_first(&debts, Money::from_kurus(500));

        assert_eq!(outcome.allocations[0].applied.kurus(), 200);
        assert!(outcome.allocations[0].is_paid);
        assert_eq!(outcome.unallocated.kurus(), 300);
    }
}
