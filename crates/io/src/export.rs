//! CSV export of the currently visible report rows.
//!
//! Output is for machine re-import, not display: shortest round-trip float
//! formatting, no thousands separators. Quoting and escaping (commas,
//! quotes, newlines, doubled internal quotes) are handled by the `csv`
//! writer. Export never fails on data issues; non-finite numbers stringify
//! to the empty string.

use ledgerlens_engine::{Dimension, EnhancedTransaction, GroupNode, VisibleRow};

pub const EXPORT_HEADER: [&str; 6] = ["Date", "Customer", "Stock Item", "Qty", "Rate", "Amount"];

// ── Formatting ──────────────────────────────────────────────────────

/// Shortest text that round-trips the value; empty for non-finite input.
fn format_number(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        String::new()
    }
}

// ── Rows ────────────────────────────────────────────────────────────

/// A group-summary line: the node's key lands in the column of the
/// dimension it partitions by; the other name columns stay blank. The
/// implicit all-rows group has no dimension, so all three stay blank.
fn group_record(node: &GroupNode) -> [String; 6] {
    let mut date = String::new();
    let mut customer = String::new();
    let mut stockitem = String::new();
    match node.dim {
        Some(Dimension::Date) => date = node.key.clone(),
        Some(Dimension::Customer) => customer = node.key.clone(),
        Some(Dimension::StockItem) => stockitem = node.key.clone(),
        None => {}
    }
    [
        date,
        customer,
        stockitem,
        format_number(node.aggregate.sum_qty),
        format_number(node.aggregate.weighted_rate),
        format_number(node.aggregate.sum_amount),
    ]
}

fn leaf_record(row: &EnhancedTransaction) -> [String; 6] {
    [
        row.txn.date.clone(),
        row.txn.customer.clone(),
        row.txn.stockitem.clone(),
        format_number(row.txn.qty),
        format_number(row.txn.rate),
        format_number(row.txn.amount),
    ]
}

// ── Entry point ─────────────────────────────────────────────────────

/// Serialize the visible rows to CSV text: UTF-8, `\n` line endings,
/// header plus one line per row.
pub fn export_csv(rows: &[VisibleRow<'_>]) -> Result<String, String> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    csv.write_record(EXPORT_HEADER)
        .map_err(|e| format!("CSV write error: {e}"))?;

    for row in rows {
        let record = match row {
            VisibleRow::GroupSummary(node) => group_record(node),
            VisibleRow::LeafRow(txn) => leaf_record(txn),
        };
        csv.write_record(&record)
            .map_err(|e| format!("CSV write error: {e}"))?;
    }

    let bytes = csv
        .into_inner()
        .map_err(|e| format!("CSV flush error: {e}"))?;
    String::from_utf8(bytes).map_err(|e| format!("CSV encoding error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlens_engine::{Aggregate, Transaction};

    fn leaf(date: &str, customer: &str, stockitem: &str, qty: f64, rate: f64) -> EnhancedTransaction {
        EnhancedTransaction {
            txn: Transaction {
                date: date.into(),
                customer: customer.into(),
                stockitem: stockitem.into(),
                qty,
                rate,
                amount: qty * rate,
            },
            date_bucket: None,
            unit_rate: rate,
        }
    }

    fn group(key: &str, dim: Option<Dimension>, qty: f64, amount: f64) -> GroupNode {
        GroupNode {
            key: key.into(),
            dim,
            depth: 0,
            children: Vec::new(),
            rows: Vec::new(),
            aggregate: Aggregate {
                count: 1,
                sum_qty: qty,
                sum_amount: amount,
                weighted_rate: if qty != 0.0 { amount / qty } else { 0.0 },
            },
        }
    }

    #[test]
    fn header_and_line_endings() {
        let out = export_csv(&[]).unwrap();
        assert_eq!(out, "Date,Customer,Stock Item,Qty,Rate,Amount\n");
    }

    #[test]
    fn group_key_lands_in_its_dimension_column() {
        let by_customer = group("Acme", Some(Dimension::Customer), 10.0, 1500.0);
        let by_date = group("2023-06-01", Some(Dimension::Date), 4.0, 100.0);
        let rows = [
            VisibleRow::GroupSummary(&by_customer),
            VisibleRow::GroupSummary(&by_date),
        ];
        let out = export_csv(&rows).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], ",Acme,,10,150,1500");
        assert_eq!(lines[2], "2023-06-01,,,4,25,100");
    }

    #[test]
    fn implicit_group_leaves_name_columns_blank() {
        let implicit = group("", None, 2.0, 50.0);
        let out = export_csv(&[VisibleRow::GroupSummary(&implicit)]).unwrap();
        assert_eq!(out.lines().nth(1).unwrap(), ",,,2,25,50");
    }

    #[test]
    fn leaf_rows_carry_source_fields_verbatim() {
        let row = leaf("2023-06-15", "Acme", "Widget", 10.0, 100.5);
        let out = export_csv(&[VisibleRow::LeafRow(&row)]).unwrap();
        assert_eq!(out.lines().nth(1).unwrap(), "2023-06-15,Acme,Widget,10,100.5,1005");
    }

    #[test]
    fn commas_and_quotes_are_escaped() {
        let row = leaf("2023-06-15", "Acme, Inc.", "6\" Flange", 1.0, 10.0);
        let out = export_csv(&[VisibleRow::LeafRow(&row)]).unwrap();
        assert_eq!(
            out.lines().nth(1).unwrap(),
            "2023-06-15,\"Acme, Inc.\",\"6\"\" Flange\",1,10,10"
        );
    }

    #[test]
    fn embedded_newline_is_quoted() {
        let row = leaf("2023-06-15", "Two\nLines", "X", 1.0, 10.0);
        let out = export_csv(&[VisibleRow::LeafRow(&row)]).unwrap();
        assert!(out.contains("\"Two\nLines\""));
    }

    #[test]
    fn non_finite_numbers_export_as_empty() {
        let mut node = group("Acme", Some(Dimension::Customer), 0.0, 100.0);
        node.aggregate.weighted_rate = f64::NAN;
        node.aggregate.sum_qty = f64::INFINITY;
        let out = export_csv(&[VisibleRow::GroupSummary(&node)]).unwrap();
        assert_eq!(out.lines().nth(1).unwrap(), ",Acme,,,,100");
    }

    #[test]
    fn no_thousands_separators() {
        let node = group("Acme", Some(Dimension::Customer), 1000.0, 1234567.89);
        let out = export_csv(&[VisibleRow::GroupSummary(&node)]).unwrap();
        assert!(out.contains("1234567.89"));
        assert!(!out.contains("1,234,567"));
    }
}
