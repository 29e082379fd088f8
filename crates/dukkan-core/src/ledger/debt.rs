//! # Debt Ledger
//!
//! Creating debts from credit sales and applying payments to a single debt.

use chrono::{DateTime, Utc};

use crate::money::Money;
use crate::types::{Debt, DebtKind, RecordStatus, Sale, SaleItem};

/// Builds the human-readable debt description from sale items.
///
/// ## Format
/// `"<qty> adet <name>"` per item, joined with `", "`.
///
/// ## Example
/// ```rust
/// # use dukkan_core::ledger::debt_description;
/// # use dukkan_core::types::SaleItem;
/// let items = vec![
///     SaleItem {
///         id: "i1".into(), sale_id: "s1".into(), product_id: "p1".into(),
///         barcode: "869".into(), name_snapshot: "Süt".into(),
///         unit_price_kurus: 1500, quantity: 2, line_total_kurus: 3000,
///     },
/// ];
/// assert_eq!(debt_description(&items), "2 adet Süt");
/// ```
pub fn debt_description(items: &[SaleItem]) -> String {
    items
        .iter()
        .map(|item| format!("{} adet {}", item.quantity, item.name_snapshot))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the Debt opened by a credit sale.
///
/// ## Invariant
/// `debt.amount == sale.total` - the whole sale goes on the ledger, the
/// customer starts with nothing paid down.
///
/// ## Purity
/// The debt ID and timestamp are passed in by the caller (the storage layer
/// generates them), keeping this function deterministic.
pub fn debt_from_sale(id: String, sale: &Sale, items: &[SaleItem], now: DateTime<Utc>) -> Debt {
    Debt {
        id,
        // A credit sale is validated upstream to carry a customer
        customer_id: sale.customer_id.clone().unwrap_or_default(),
        sub_customer_id: sale.sub_customer_id.clone(),
        amount_kurus: sale.total_kurus,
        paid_amount_kurus: 0,
        is_paid: sale.total_kurus <= 0,
        sale_id: Some(sale.id.clone()),
        kind: DebtKind::Sale,
        description: Some(debt_description(items)),
        due_date: None,
        status: RecordStatus::Active,
        created_at: now,
    }
}

/// Applies a payment amount to a single debt.
///
/// ## Rules
/// - `paid_amount += amount` - even past the debt total; over-payment is
///   visible in the ledger rather than silently capped
/// - `is_paid` is recomputed as `paid_amount >= amount_total`
pub fn apply_to_debt(debt: &mut Debt, amount: Money) {
    debt.paid_amount_kurus += amount.kurus();
    debt.is_paid = debt.paid_amount_kurus >= debt.amount_kurus;
}

// =============================================================================
// Unit Tests
// =============================================================================
