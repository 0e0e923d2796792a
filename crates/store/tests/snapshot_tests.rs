use chrono::{NaiveDate, NaiveDateTime};
use faang_core::snapshot::entity::{Column, ColumnKey, MarketFrame, RecoveredTable};
use faang_core::snapshot::port::SnapshotStore;
use faang_store::csv_store::CsvSnapshotStore;
use faang_store::dir::ensure_dir;
use faang_store::locator::find_latest;
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

/// 创建文件并把修改时间设为 UNIX 纪元后 `secs` 秒。
fn touch(dir: &Path, name: &str, secs: u64) {
    let path = dir.join(name);
    fs::write(&path, "Datetime,Close\n").unwrap();
    let file = File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

fn sample_frame() -> MarketFrame {
    MarketFrame {
        index: vec![at(2, 14), at(2, 15)],
        columns: vec![
            Column {
                key: ColumnKey::new("Close", "AAPL"),
                values: vec![Some(250.5), None],
            },
            Column {
                key: ColumnKey::new("Close", "NFLX"),
                values: vec![Some(901.25), Some(905.0)],
            },
            Column {
                key: ColumnKey::new("Volume", "AAPL"),
                values: vec![Some(1200.0), Some(800.0)],
            },
        ],
    }
}

#[test]
fn test_ensure_dir_creates_nested_and_returns_absolute() {
    let tmp = tempdir().unwrap();
    let nested = tmp.path().join("a").join("b");

    let resolved = ensure_dir(&nested).unwrap();
    assert!(nested.is_dir());
    assert!(resolved.is_absolute());

    // 再次调用不报错
    assert_eq!(ensure_dir(&nested).unwrap(), resolved);
}

#[test]
fn test_locator_without_snapshots() {
    let tmp = tempdir().unwrap();
    assert!(find_latest(tmp.path()).unwrap().is_none());
    assert!(find_latest(&tmp.path().join("missing")).unwrap().is_none());

    // 非 csv 文件不计入
    touch(tmp.path(), "20250101-090000.png", 100);
    assert!(find_latest(tmp.path()).unwrap().is_none());
}

#[test]
fn test_locator_picks_most_recently_modified() {
    let tmp = tempdir().unwrap();
    // 文件名与修改时间顺序刻意相反
    touch(tmp.path(), "20250102-100000.csv", 100);
    touch(tmp.path(), "20250101-090000.csv", 200);
    touch(tmp.path(), "20250103-100000.png", 300);
    fs::create_dir(tmp.path().join("nested.csv")).unwrap();

    let latest = find_latest(tmp.path()).unwrap().unwrap();
    assert_eq!(latest.stem, "20250101-090000");

    // 幂等：目录不变时结果不变
    let again = find_latest(tmp.path()).unwrap().unwrap();
    assert_eq!(again, latest);
}

#[test]
fn test_locator_tie_break_is_deterministic() {
    let tmp = tempdir().unwrap();
    touch(tmp.path(), "20250101-090000.csv", 500);
    touch(tmp.path(), "20250101-090001.csv", 500);

    let latest = find_latest(tmp.path()).unwrap().unwrap();
    assert_eq!(latest.stem, "20250101-090001");
}

#[test]
fn test_store_writes_two_line_header_layout() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let data_dir = tmp.path().join("data-faang-stocks");
    let store = CsvSnapshotStore::new(&data_dir);

    // 目录在首次写入时创建
    assert!(store.latest()?.is_none());
    let saved = store.save(&sample_frame(), at(2, 16))?;

    assert_eq!(saved.stem, "20250102-160000");
    assert_eq!(saved.path.file_name().unwrap(), "20250102-160000.csv");
    assert!(saved.path.is_absolute());

    let text = fs::read_to_string(&saved.path)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Price,Close,Close,Volume");
    assert_eq!(lines[1], "Ticker,AAPL,NFLX,AAPL");
    assert_eq!(lines[2], "Datetime,,,");
    assert_eq!(lines[3], "2025-01-02 14:00:00,250.5,901.25,1200");
    assert_eq!(lines[4], "2025-01-02 15:00:00,,905,800");

    let latest = store.latest()?.expect("snapshot should be found");
    assert_eq!(latest.path, saved.path);

    // 写入的布局可以被解析器直接还原为双层结构
    let RecoveredTable::TwoLevel(table) = store.load(&latest)? else {
        panic!("expected a two-level table");
    };
    assert_eq!(table.index, vec![at(2, 14), at(2, 15)]);
    let aapl = table.column(&ColumnKey::new("Close", "AAPL")).unwrap();
    assert_eq!(aapl.values, vec!["250.5", ""]);

    Ok(())
}

#[test]
fn test_empty_frame_writes_headers_only() -> anyhow::Result<()> {
    let tmp = tempdir()?;
    let store = CsvSnapshotStore::new(tmp.path());
    let mut frame = sample_frame();
    frame.index.clear();
    frame.columns.iter_mut().for_each(|c| c.values.clear());
    assert!(frame.is_empty());

    let saved = store.save(&frame, at(3, 9))?;
    let text = fs::read_to_string(&saved.path)?;
    assert_eq!(text.lines().count(), 3);
    Ok(())
}
