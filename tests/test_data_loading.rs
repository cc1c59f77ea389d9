//! Integration test: encoding tables read from disk

use catencode::prelude::*;
use polars::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file
}

#[test]
fn test_encode_csv_file() {
    let file = write_csv(&["id,device", "1,pc", "2,mobile", "3,pc", "4,tablet"]);
    let df = DataLoader::new().load_auto(file.path()).unwrap();

    let config = EncodingConfig::new().with_input(file.path());
    let mut pipeline = CategoricalPipeline::new(config);
    let result = pipeline.run(&df).unwrap();

    assert_eq!(result.height(), 4);
    assert_eq!(result.width(), 2 + 1 + 3);
    let labels: Vec<Option<i64>> = result
        .column("device_label")
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(labels, vec![Some(1), Some(0), Some(1), Some(2)]);
}

#[test]
fn test_encode_and_save() {
    let file = write_csv(&["device", "b", "a", "b"]);
    let df = DataLoader::new().load_auto(file.path()).unwrap();

    let mut pipeline = CategoricalPipeline::new(EncodingConfig::default());
    let mut result = pipeline.run(&df).unwrap();

    let out = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    DataSaver::save_auto(&mut result, out.path()).unwrap();

    let reloaded = DataLoader::new().load_csv(out.path()).unwrap();
    let names: Vec<String> = reloaded
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(
        names,
        vec!["device", "device_label", "device_label_onehot_0", "device_label_onehot_1"]
    );
}

#[test]
fn test_missing_input_file() {
    let err = DataLoader::new().load_auto("no_such_dir/test.csv").unwrap_err();
    assert!(matches!(err, EncodeError::IoError(_)));
}

#[test]
fn test_missing_column() {
    let file = write_csv(&["id,os", "1,linux"]);
    let df = DataLoader::new().load_auto(file.path()).unwrap();

    let mut pipeline = CategoricalPipeline::new(EncodingConfig::default());
    let err = pipeline.run(&df).unwrap_err();
    assert!(matches!(err, EncodeError::FeatureNotFound(ref c) if c == "device"));
}
