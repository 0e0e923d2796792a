use chrono::{NaiveDate, NaiveDateTime};
use faang_chart::png::PngPlotWriter;
use faang_chart::render::render_chart;
use faang_core::chart::port::PlotWriter;
use faang_core::common::Instrument;
use faang_core::config::PlotConfig;
use faang_core::market::entity::{ClosingPrices, PriceSeries};
use std::fs;
use tempfile::tempdir;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 2)
        .unwrap()
        .and_hms_opt(hour, 30, 0)
        .unwrap()
}

fn small_writer() -> PngPlotWriter {
    PngPlotWriter::new(&PlotConfig {
        width_in: 4,
        height_in: 2,
        dpi: 50,
    })
}

#[test]
fn test_writes_png_named_after_title() {
    let tmp = tempdir().unwrap();
    let prices = ClosingPrices {
        index: vec![at(9), at(10), at(11)],
        field: "Close".to_string(),
        series: vec![
            PriceSeries {
                instrument: Instrument::Aapl,
                values: vec![Some(250.0), None, Some(252.0)],
            },
            PriceSeries {
                instrument: Instrument::Nflx,
                values: vec![Some(900.0), Some(905.0), Some(910.0)],
            },
        ],
        unavailable: vec![Instrument::Amzn, Instrument::Meta, Instrument::Goog],
    };

    let chart = render_chart(&prices, "20250102-113000");
    let path = small_writer().write(&chart, tmp.path()).unwrap();

    assert_eq!(path, tmp.path().join("20250102-113000.png"));
    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(&PNG_MAGIC));
}

#[test]
fn test_empty_chart_is_still_written() {
    let tmp = tempdir().unwrap();
    let prices = ClosingPrices {
        index: Vec::new(),
        field: "Close".to_string(),
        series: Vec::new(),
        unavailable: Instrument::ALL.to_vec(),
    };

    let chart = render_chart(&prices, "empty");
    let path = small_writer().write(&chart, tmp.path()).unwrap();
    assert!(fs::read(&path).unwrap().starts_with(&PNG_MAGIC));
}

#[test]
fn test_title_and_legend_reach_the_image() {
    let tmp = tempdir().unwrap();
    let prices = ClosingPrices {
        index: vec![at(9), at(10)],
        field: "Close".to_string(),
        series: vec![PriceSeries {
            instrument: Instrument::Aapl,
            values: vec![Some(250.0), Some(251.0)],
        }],
        unavailable: Vec::new(),
    };
    let writer = small_writer();
    let render = |title: &str, label: &str, sub: &str| {
        let dir = tmp.path().join(sub);
        fs::create_dir_all(&dir).unwrap();
        let mut chart = render_chart(&prices, title);
        chart.series[0].label = label.to_string();
        fs::read(writer.write(&chart, &dir).unwrap()).unwrap()
    };

    let base = render("20250102-093000", "AAPL", "a");
    // 只有标题不同
    let retitled = render("20250103-093000", "AAPL", "b");
    // 只有图例不同
    let relabelled = render("20250102-093000", "NFLX", "c");

    assert_ne!(base, retitled);
    assert_ne!(base, relabelled);
}
