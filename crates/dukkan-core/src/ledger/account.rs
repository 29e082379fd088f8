//! # Account-State Guard
//!
//! Per sub-customer open/closed state machine, enforced at the update
//! boundary: a closed account can never be reopened.

use crate::error::CoreError;
use crate::types::AccountStatus;

/// Checks whether a sub-customer status transition is allowed.
///
/// ## State Machine
/// ```text
/// Active ──► Inactive     allowed (closing the account, terminal)
/// Inactive ──► Active     REJECTED: "Kapalı hesap tekrar açılamaz"
/// x ──► x                 allowed (no-op)
/// ```
///
/// `Deleted` is a soft-delete flag handled outside this machine; moving a
/// deleted record back to an open state is also rejected, since deletion
/// implies the account was closed first.
pub fn check_status_transition(
    sub_customer_id: &str,
    current: AccountStatus,
    requested: AccountStatus,
) -> Result<(), CoreError> {
    match (current, requested) {
        (AccountStatus::Inactive, AccountStatus::Active)
        | (AccountStatus::Deleted, AccountStatus::Active) => Err(CoreError::AccountClosed {
            sub_customer_id: sub_customer_id.to_string(),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
