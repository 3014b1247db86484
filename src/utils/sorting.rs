//! Ranking helpers for raw transaction records.

use std::cmp::Reverse;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::domain::common::Amounted;
use crate::errors::{LedgerError, LedgerResult};

const AMOUNT_KEY: &str = "Amount";

/// Returns a copy of `records` ordered by their `"Amount"` key, largest first.
/// Records with equal amounts keep their input order.
///
/// Fails with [`LedgerError::Contract`] when a record has no numeric `"Amount"`.
pub fn sort_largest_transaction(
    records: &[Map<String, Value>],
) -> LedgerResult<Vec<Map<String, Value>>> {
    let mut keyed = records
        .iter()
        .enumerate()
        .map(|(index, record)| record_amount(record, index).map(|amount| (amount, record)))
        .collect::<LedgerResult<Vec<_>>>()?;
    // Stable: ties stay in first-seen order.
    keyed.sort_by_key(|(amount, _)| Reverse(*amount));
    Ok(keyed.into_iter().map(|(_, record)| record.clone()).collect())
}

/// Same ordering as [`sort_largest_transaction`] for any [`Amounted`] item.
pub fn sort_by_amount_desc<T: Amounted + Clone>(items: &[T]) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| Reverse(item.amount()));
    sorted
}

fn record_amount(record: &Map<String, Value>, index: usize) -> LedgerResult<Decimal> {
    let parsed = match record.get(AMOUNT_KEY) {
        Some(Value::Number(number)) => number.to_string().parse::<Decimal>().ok().or_else(|| {
            number
                .as_f64()
                .and_then(|value| Decimal::try_from(value).ok())
        }),
        Some(Value::String(raw)) => raw.trim().parse::<Decimal>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        LedgerError::contract(format!(
            "record {} has no numeric '{}' value",
            index, AMOUNT_KEY
        ))
    })
}
