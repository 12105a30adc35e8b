// Property-based tests for the aggregation engine.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use ledgerlens_engine::{
    aggregate, bucket, Dimension, Filters, Granularity, GroupNode, GroupSpec, Transaction,
};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_date() -> impl Strategy<Value = String> {
    // Valid for every month, including February.
    (2020i32..2026, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}"))
}

fn arb_name(pool: &'static [&'static str]) -> impl Strategy<Value = String> {
    proptest::sample::select(pool).prop_map(str::to_string)
}

fn arb_txn() -> impl Strategy<Value = Transaction> {
    (
        arb_date(),
        arb_name(&["Acme", "Globex", "Initech", "Hooli"]),
        arb_name(&["Widget", "Gadget", "Sprocket"]),
        -100.0f64..100.0,
        0.0f64..500.0,
    )
        .prop_map(|(date, customer, stockitem, qty, rate)| Transaction {
            date,
            customer,
            stockitem,
            qty,
            rate,
            amount: qty * rate,
        })
}

fn arb_batch() -> impl Strategy<Value = Vec<Transaction>> {
    proptest::collection::vec(arb_txn(), 0..120)
}

fn arb_spec() -> impl Strategy<Value = GroupSpec> {
    let dim = prop_oneof![
        Just(Dimension::Customer),
        Just(Dimension::StockItem),
        Just(Dimension::Date),
    ];
    let granularity = prop_oneof![
        Just(Granularity::Day),
        Just(Granularity::Week),
        Just(Granularity::Month),
        Just(Granularity::Quarter),
        Just(Granularity::Year),
    ];
    (proptest::collection::vec(dim, 0..=2), granularity).prop_map(|(mut dims, g)| {
        dims.dedup();
        if dims.len() == 2 && dims[0] == dims[1] {
            dims.pop();
        }
        GroupSpec {
            dimensions: dims,
            granularity: Some(g),
        }
    })
}

fn check_rates(node: &GroupNode) {
    let agg = &node.aggregate;
    if agg.sum_qty == 0.0 {
        assert_eq!(agg.weighted_rate, 0.0);
    } else {
        let expect = agg.sum_amount / agg.sum_qty;
        assert!(
            (agg.weighted_rate - expect).abs() <= 1e-9 * (1.0 + expect.abs()),
            "node '{}': rate {} != {}",
            node.key,
            agg.weighted_rate,
            expect
        );
    }
    for child in &node.children {
        check_rates(child);
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    // Root sums equal the linear sums over the batch, whatever the grouping.
    #[test]
    fn conservation(records in arb_batch(), spec in arb_spec()) {
        let report = aggregate(&records, &Filters::default(), &spec).unwrap();
        let qty: f64 = records.iter().map(|t| t.qty).sum();
        let amount: f64 = records.iter().map(|t| t.amount).sum();
        // Tree summation reorders float additions; compare with a tolerance.
        let tol = 1e-6 * (1.0 + amount.abs());
        prop_assert_eq!(report.root.aggregate.count, records.len());
        prop_assert!((report.root.aggregate.sum_qty - qty).abs() <= tol);
        prop_assert!((report.root.aggregate.sum_amount - amount).abs() <= tol);
    }

    // Every node's rate is its own sum_amount / sum_qty.
    #[test]
    fn weighted_rate_holds_at_every_node(records in arb_batch(), spec in arb_spec()) {
        let report = aggregate(&records, &Filters::default(), &spec).unwrap();
        check_rates(&report.root);
    }

    // Filtering an already-filtered batch is a no-op.
    #[test]
    fn filter_idempotence(
        records in arb_batch(),
        from in proptest::option::of(arb_date()),
        to in proptest::option::of(arb_date()),
        needle in proptest::option::of("[a-z]{1,4}"),
    ) {
        let filters = Filters { from_date: from, to_date: to, text: needle };
        let (once, _) = filters.apply(&records).unwrap();
        let once: Vec<Transaction> = once.into_iter().cloned().collect();
        let (twice, warnings) = filters.apply(&once).unwrap();
        let twice: Vec<Transaction> = twice.into_iter().cloned().collect();
        prop_assert_eq!(once, twice);
        prop_assert!(warnings.is_empty());
    }

    // A week key is a Monday, on or before its date, within six days.
    #[test]
    fn week_bucket_is_the_enclosing_monday(date in arb_date()) {
        use chrono::{Datelike, NaiveDate, Weekday};

        let key = bucket(&date, Granularity::Week).unwrap();
        let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d").unwrap();
        let monday = NaiveDate::parse_from_str(&key, "%Y-%m-%d").unwrap();

        prop_assert_eq!(monday.weekday(), Weekday::Mon);
        prop_assert!(monday <= day);
        prop_assert!((day - monday).num_days() <= 6);
    }

    // Swapping the two dimensions never changes the grand totals.
    #[test]
    fn grouping_order_independence(records in arb_batch()) {
        let ab = GroupSpec {
            dimensions: vec![Dimension::Customer, Dimension::StockItem],
            granularity: None,
        };
        let ba = GroupSpec {
            dimensions: vec![Dimension::StockItem, Dimension::Customer],
            granularity: None,
        };
        let left = aggregate(&records, &Filters::default(), &ab).unwrap();
        let right = aggregate(&records, &Filters::default(), &ba).unwrap();
        let tol = 1e-6 * (1.0 + left.root.aggregate.sum_amount.abs());
        prop_assert_eq!(left.root.aggregate.count, right.root.aggregate.count);
        prop_assert!(
            (left.root.aggregate.sum_qty - right.root.aggregate.sum_qty).abs() <= tol
        );
        prop_assert!(
            (left.root.aggregate.sum_amount - right.root.aggregate.sum_amount).abs() <= tol
        );
    }
}
