//! CSV import of a transaction batch.
//!
//! Header-driven and position-independent: columns are matched by name,
//! case-insensitively. Numeric fields that do not parse coerce to `0` and
//! are counted rather than aborting the batch; dates pass through as text
//! because the engine owns all date policy (a malformed date must reach the
//! engine's warning path, not die here).

use ledgerlens_engine::{Transaction, Warnings};

const REQUIRED_COLUMNS: [&str; 6] = ["date", "customer", "stockitem", "qty", "rate", "amount"];

/// Parse a CSV batch into transactions plus coercion counters.
///
/// A missing required column is an error; a bad numeric value is not.
pub fn read_transactions(csv_text: &str) -> Result<(Vec<Transaction>, Warnings), String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| format!("CSV read error: {e}"))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let idx = |name: &str| -> Result<usize, String> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| format!("missing required column '{name}'"))
    };

    let [date_idx, customer_idx, stockitem_idx, qty_idx, rate_idx, amount_idx] = {
        let mut indices = [0usize; 6];
        for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = idx(name)?;
        }
        indices
    };

    let mut warnings = Warnings::default();
    let mut numeric = |record: &csv::StringRecord, index: usize| -> f64 {
        let raw = record.get(index).unwrap_or("").trim();
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ if raw.is_empty() => 0.0,
            _ => {
                warnings.coerced_values += 1;
                0.0
            }
        }
    };

    let mut transactions = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| format!("CSV read error: {e}"))?;
        transactions.push(Transaction {
            date: record.get(date_idx).unwrap_or("").trim().to_string(),
            customer: record.get(customer_idx).unwrap_or("").trim().to_string(),
            stockitem: record.get(stockitem_idx).unwrap_or("").trim().to_string(),
            qty: numeric(&record, qty_idx),
            rate: numeric(&record, rate_idx),
            amount: numeric(&record, amount_idx),
        });
    }

    Ok((transactions, warnings))
}
