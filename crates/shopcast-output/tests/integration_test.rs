//! Integration tests for the predictions table.

use shopcast_output::{PredictionRecord, PredictionSummary, prediction_file_name, write_predictions};
use std::fs;

#[derive(Debug, serde::Deserialize)]
struct Row {
    #[serde(rename = "ID")]
    id: i64,
    item_cnt_month: f64,
}

#[test]
fn test_written_table_reads_back_in_order() {
    let dir = std::env::temp_dir().join(format!("shopcast_output_it_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let now = chrono::NaiveDate::from_ymd_opt(2025, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 0)
        .unwrap();
    let path = dir.join(prediction_file_name(now));
    let records: Vec<PredictionRecord> = (0..50)
        .map(|i| PredictionRecord::new(i, f64::from(i as i32 % 21)))
        .collect();

    write_predictions(&path, &records).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(
        reader.headers().unwrap(),
        &csv::StringRecord::from(vec!["ID", "item_cnt_month"])
    );
    let rows: Vec<Row> = reader.deserialize().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 50);
    for (row, record) in rows.iter().zip(&records) {
        assert_eq!(row.id, record.id);
        assert_eq!(row.item_cnt_month, record.item_cnt_month);
    }

    let values: Vec<f64> = rows.iter().map(|r| r.item_cnt_month).collect();
    let summary = PredictionSummary::from_values(&values);
    assert!(summary.min >= 0.0 && summary.max <= 20.0);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_rewrite_replaces_previous_table() {
    let dir = std::env::temp_dir().join(format!("shopcast_output_rw_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("predictions.csv");

    write_predictions(&path, &[PredictionRecord::new(0, 1.0), PredictionRecord::new(1, 2.0)]).unwrap();
    write_predictions(&path, &[PredictionRecord::new(0, 5.0)]).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "ID,item_cnt_month\n0,5.0\n");
    fs::remove_dir_all(&dir).unwrap();
}
