//! Prepare, train and infer against a small on-disk data root.

use chrono::NaiveDate;
use shopcast::data::{DataError, MemoryReporter, PreprocessConfig, artifacts};
use shopcast::model::{GbdtConfig, ModelError};
use shopcast::pipeline::{self, PipelineError, TrainOptions, processed_store};
use shopcast::features::FeatureConfig;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("shopcast-pipeline-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_raw_inputs(root: &Path) {
    let mut sales = String::from("date,date_block_num,shop_id,item_id,item_price,item_cnt_day\n");
    for day in 1..=20u32 {
        let count = f64::from(day % 4 + 1);
        writeln!(sales, "{day:02}.01.2015,24,1,100,99.0,{count}").unwrap();
        writeln!(sales, "{day:02}.01.2015,24,2,200,{}.5,{}", 40 + day, day % 3).unwrap();
    }
    // clipped above and below, and one row dropped for its price
    sales.push_str("21.01.2015,24,1,300,15.0,50.0\n");
    sales.push_str("22.01.2015,24,1,300,15.0,-1.0\n");
    sales.push_str("23.01.2015,24,1,300,-1.0,2.0\n");
    fs::write(root.join("sales_train.csv"), sales).unwrap();

    fs::write(
        root.join("items.csv"),
        "item_name,item_id,item_category_id\nlamp,100,7\nvase,200,7\nrug,300,9\n",
    )
    .unwrap();
    fs::write(
        root.join("test.csv"),
        "ID,shop_id,item_id\n0,1,100\n1,2,200\n2,5,999\nnull,1,300\n",
    )
    .unwrap();
}

fn small_options() -> TrainOptions {
    TrainOptions {
        gbdt: GbdtConfig {
            n_estimators: 25,
            max_depth: 3,
            min_child_samples: 2,
            ..GbdtConfig::default()
        },
        ..TrainOptions::default()
    }
}

#[test]
fn test_prepare_train_infer_end_to_end() {
    let root = scratch_dir("e2e");
    write_raw_inputs(&root);
    let models = root.join("models");
    let outputs = root.join("outputs");
    let reporter = MemoryReporter::new();

    let prepared = pipeline::prepare(&root, &PreprocessConfig::default(), &reporter).unwrap();
    assert_eq!(prepared.sales.height(), 42);
    assert_eq!(
        reporter.stages(),
        vec!["load raw tables", "clean sales", "persist cleaned tables"]
    );

    let report = pipeline::train(&root, &models, "gbdt", &small_options(), &reporter).unwrap();
    assert_eq!(report.rows, 42);
    assert_eq!(report.train_rows + report.test_rows, 42);
    assert!(report.holdout_r2.is_finite());
    assert_eq!(report.model_path, models.join("gbdt.json"));
    assert!(report.model_path.is_file());

    let store = processed_store(&root);
    for name in [artifacts::TRAIN_FEATURES, artifacts::TRAIN_LABELS, artifacts::SCALER] {
        assert!(store.exists(name), "{name} missing");
    }
    assert_eq!(store.load_table(artifacts::TRAIN_FEATURES).unwrap().shape(), (42, 6));

    let now = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 0)
        .unwrap();
    let inferred = pipeline::infer(
        &root,
        &models,
        "gbdt",
        &outputs,
        now,
        &FeatureConfig::default(),
        &reporter,
    )
    .unwrap();
    assert_eq!(inferred.output_path, outputs.join("predictions_20240102_0304.csv"));
    assert_eq!(inferred.summary.count, 4);
    assert!(inferred.summary.min >= 0.0 && inferred.summary.max <= 20.0);

    let text = fs::read_to_string(&inferred.output_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("ID,item_cnt_month"));
    let ids: Vec<&str> = lines.map(|l| l.split(',').next().unwrap()).collect();
    assert_eq!(ids, vec!["0", "1", "2", "3"]);

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_infer_without_model_writes_nothing() {
    let root = scratch_dir("nomodel");
    write_raw_inputs(&root);
    let reporter = MemoryReporter::new();
    pipeline::prepare(&root, &PreprocessConfig::default(), &reporter).unwrap();
    let outputs = root.join("outputs");

    let now = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let err = pipeline::infer(
        &root,
        &root.join("models"),
        "absent",
        &outputs,
        now,
        &FeatureConfig::default(),
        &reporter,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Model(ModelError::Unavailable { .. })
    ));
    assert!(!outputs.exists());
    assert!(!reporter.stages().iter().any(|s| s == "build inference features"));
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_prepare_with_bad_date_persists_nothing() {
    let root = scratch_dir("baddate");
    write_raw_inputs(&root);
    let mut sales = fs::read_to_string(root.join("sales_train.csv")).unwrap();
    sales.push_str("2015-01-24,24,1,100,99.0,1.0\n");
    fs::write(root.join("sales_train.csv"), sales).unwrap();

    let err = pipeline::prepare(&root, &PreprocessConfig::default(), &MemoryReporter::new())
        .unwrap_err();
    assert!(matches!(err, PipelineError::Data(DataError::Schema { .. })));

    let store = processed_store(&root);
    for name in [artifacts::SALES, artifacts::ITEMS, artifacts::SCORING] {
        assert!(!store.exists(name), "{name} should not exist");
    }
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_train_before_prepare_fails() {
    let root = scratch_dir("unprepared");
    let err = pipeline::train(
        &root,
        &root.join("models"),
        "gbdt",
        &TrainOptions::default(),
        &MemoryReporter::new(),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Data(_)));
    fs::remove_dir_all(&root).unwrap();
}
