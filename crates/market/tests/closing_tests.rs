use chrono::{NaiveDate, NaiveDateTime};
use faang_core::common::Instrument;
use faang_core::snapshot::entity::{Column, ColumnKey, RecoveredTable, Table};
use faang_core::snapshot::error::SnapshotError;
use faang_market::closing::{coerce_price, extract_closing_prices};

fn index(rows: usize) -> Vec<NaiveDateTime> {
    (0..rows)
        .map(|h| {
            NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(9 + u32::try_from(h).unwrap(), 30, 0)
                .unwrap()
        })
        .collect()
}

fn two_level(columns: &[(&str, &str, &[&str])]) -> RecoveredTable {
    let rows = columns.first().map(|c| c.2.len()).unwrap_or(0);
    RecoveredTable::TwoLevel(Table {
        index: index(rows),
        columns: columns
            .iter()
            .map(|(field, instrument, values)| Column {
                key: ColumnKey::new(*field, *instrument),
                values: values.iter().map(|v| v.to_string()).collect(),
            })
            .collect(),
    })
}

fn single_level(columns: &[(&str, &[&str])]) -> RecoveredTable {
    let rows = columns.first().map(|c| c.1.len()).unwrap_or(0);
    RecoveredTable::SingleLevel(Table {
        index: index(rows),
        columns: columns
            .iter()
            .map(|(label, values)| Column {
                key: label.to_string(),
                values: values.iter().map(|v| v.to_string()).collect(),
            })
            .collect(),
    })
}

#[test]
fn test_coerce_price() {
    assert_eq!(coerce_price(" 250.5 "), Some(250.5));
    assert_eq!(coerce_price("1e3"), Some(1000.0));
    assert_eq!(coerce_price(""), None);
    assert_eq!(coerce_price("n/a"), None);
    assert_eq!(coerce_price("NaN"), None);
    assert_eq!(coerce_price("inf"), None);
}

#[test]
fn test_exact_close_for_all_instruments() {
    let table = two_level(&[
        ("Close", "AAPL", &["250.5", "251.0"]),
        ("Close", "AMZN", &["220.1", "bad"]),
        ("Close", "META", &["600.0", "601.0"]),
        ("Close", "GOOG", &["190.2", ""]),
        ("Close", "NFLX", &["900.0", "905.5"]),
        ("Volume", "AAPL", &["1000", "1200"]),
    ]);

    let prices = extract_closing_prices(&table).unwrap();
    assert_eq!(prices.field, "Close");
    assert_eq!(prices.index.len(), 2);
    assert_eq!(prices.series.len(), 5);
    assert!(prices.unavailable.is_empty());

    let order: Vec<Instrument> = prices.series.iter().map(|s| s.instrument).collect();
    assert_eq!(order, Instrument::ALL);

    // 无法解析的值变为缺失，而不是报错
    assert_eq!(
        prices.get(Instrument::Amzn).unwrap().values,
        vec![Some(220.1), None]
    );
    assert_eq!(prices.get(Instrument::Goog).unwrap().present(), 1);
}

#[test]
fn test_missing_instrument_is_reported_not_fatal() {
    let table = two_level(&[
        ("Close", "AAPL", &["250.5"]),
        ("Close", "AMZN", &["220.1"]),
        ("Close", "META", &["600.0"]),
        ("Close", "GOOG", &["190.2"]),
        ("Open", "NFLX", &["899.0"]),
    ]);

    let prices = extract_closing_prices(&table).unwrap();
    assert_eq!(prices.series.len(), 4);
    assert_eq!(prices.unavailable, vec![Instrument::Nflx]);
    assert!(prices.get(Instrument::Nflx).is_none());
}

#[test]
fn test_exact_close_preferred_over_adjusted() {
    let table = two_level(&[
        ("Adj Close", "AAPL", &["249.0"]),
        ("Close", "AAPL", &["250.0"]),
    ]);

    let prices = extract_closing_prices(&table).unwrap();
    assert_eq!(prices.field, "Close");
    assert_eq!(prices.get(Instrument::Aapl).unwrap().values, vec![Some(250.0)]);
}

#[test]
fn test_substring_match_uses_first_drifted_field() {
    let table = two_level(&[
        ("Open", "AAPL", &["248.0"]),
        ("Adj Close", "AAPL", &["249.0"]),
        ("Adj Close", "META", &["599.0"]),
        ("Close Bid", "AAPL", &["1.0"]),
    ]);

    let prices = extract_closing_prices(&table).unwrap();
    assert_eq!(prices.field, "Adj Close");
    assert_eq!(prices.series.len(), 2);
    assert_eq!(prices.get(Instrument::Aapl).unwrap().values, vec![Some(249.0)]);
    assert_eq!(prices.unavailable.len(), 3);
}

#[test]
fn test_two_level_without_close_is_fatal() {
    let table = two_level(&[("Open", "AAPL", &["248.0"]), ("Volume", "AAPL", &["10"])]);
    let err = extract_closing_prices(&table).unwrap_err();
    assert!(matches!(err, SnapshotError::SchemaNotRecognized(field) if field == "Close"));
}

#[test]
fn test_degraded_columns_match_by_label() {
    let table = single_level(&[
        ("Open_AAPL", &["248.0", "249.0"]),
        ("Close_AAPL", &["250.0", "251.0"]),
        ("META Close", &["600.0", "x"]),
    ]);

    let prices = extract_closing_prices(&table).unwrap();
    assert_eq!(prices.series.len(), 2);
    assert_eq!(
        prices.get(Instrument::Aapl).unwrap().values,
        vec![Some(250.0), Some(251.0)]
    );
    assert_eq!(prices.get(Instrument::Meta).unwrap().values, vec![Some(600.0), None]);
    assert_eq!(
        prices.unavailable,
        vec![Instrument::Amzn, Instrument::Goog, Instrument::Nflx]
    );
}

#[test]
fn test_degraded_without_close_is_fatal() {
    let table = single_level(&[("Open", &["1.0"]), ("Volume", &["10"])]);
    assert!(matches!(
        extract_closing_prices(&table),
        Err(SnapshotError::SchemaNotRecognized(_))
    ));
}
