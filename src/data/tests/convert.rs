//! MAT -> JSON 转换单元测试

use std::fs;

use serde_json::{Value, json};

use super::temp_dir;
use crate::data::convert::{DEFAULT_KEYS, json_path_for, mat_to_json, mat_to_json_value};
use crate::data::{DataError, FeatureDataset};
use crate::mat::{MatArray, MatClass, MatData, MatFile, MatVariable, MatWriter};

fn variable(name: &str, class: MatClass, dims: Vec<usize>, data: MatData) -> MatVariable {
    MatVariable {
        name: name.to_string(),
        array: MatArray::new(class, dims, data).unwrap(),
    }
}

#[test]
fn test_only_requested_keys_are_kept() {
    let bytes = MatWriter::new()
        .to_bytes(&[
            variable("Ds", MatClass::Double, vec![1, 2], MatData::Float(vec![0.5, 2.0])),
            variable("other", MatClass::Double, vec![1, 1], MatData::Float(vec![9.0])),
        ])
        .unwrap();
    let file = MatFile::from_bytes(&bytes).unwrap();

    let value = mat_to_json_value(&file, &DEFAULT_KEYS).unwrap();
    assert_eq!(value, json!({"Ds": [[0.5, 2.0]]}));
}

#[test]
fn test_mat_to_json_file_round_trips_into_dataset() {
    let dir = temp_dir("convert");
    let data_mat = dir.join("Source_Data.mat");
    let label_mat = dir.join("Source_Label.mat");

    // 3x2 特征矩阵（列优先）与 uint8 标签列向量
    MatWriter::new()
        .compress(true)
        .save(
            &data_mat,
            &[variable(
                "Ds",
                MatClass::Double,
                vec![3, 2],
                MatData::Float(vec![0.1, 0.2, 0.3, 1.5, 2.5, 3.5]),
            )],
        )
        .unwrap();
    MatWriter::new()
        .save(
            &label_mat,
            &[variable("Ls", MatClass::UInt8, vec![3, 1], MatData::UInt(vec![1, 2, 1]))],
        )
        .unwrap();

    let data_json = mat_to_json(&data_mat, &DEFAULT_KEYS).unwrap();
    let label_json = mat_to_json(&label_mat, &DEFAULT_KEYS).unwrap();
    assert_eq!(data_json, dir.join("Source_Data.mat.json"));
    assert_eq!(json_path_for(&label_mat), label_json);

    let text = fs::read_to_string(&data_json).unwrap();
    let value: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value, json!({"Ds": [[0.1, 1.5], [0.2, 2.5], [0.3, 3.5]]}));
    assert_eq!(
        fs::read_to_string(&label_json).unwrap(),
        r#"{"Ls":[[1],[2],[1]]}"#
    );

    let dataset = FeatureDataset::from_json_files(&data_json, &label_json).unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.get(2).unwrap().0.to_vec(), vec![0.3f32, 3.5]);
    assert_eq!(dataset.get(2).unwrap().1, 1);
}

#[test]
fn test_missing_mat_file() {
    let dir = temp_dir("convert_missing");
    assert!(matches!(
        mat_to_json(dir.join("nope.mat"), &DEFAULT_KEYS),
        Err(DataError::FileNotFound(_))
    ));
}

#[test]
fn test_logical_labels_round_trip_into_dataset() {
    let dir = temp_dir("convert_logical");
    let data_mat = dir.join("Data.mat");
    let label_mat = dir.join("Label.mat");

    MatWriter::new()
        .save(
            &data_mat,
            &[variable("Ds", MatClass::Double, vec![2, 1], MatData::Float(vec![0.5, 1.5]))],
        )
        .unwrap();
    MatWriter::new()
        .save(
            &label_mat,
            &[variable("Ls", MatClass::UInt8, vec![2, 1], MatData::Bool(vec![true, false]))],
        )
        .unwrap();

    let from_mat = FeatureDataset::from_mat_files(&data_mat, &label_mat).unwrap();
    assert_eq!(from_mat.labels().to_vec(), vec![1, 0]);

    let data_json = mat_to_json(&data_mat, &DEFAULT_KEYS).unwrap();
    let label_json = mat_to_json(&label_mat, &DEFAULT_KEYS).unwrap();
    assert_eq!(
        fs::read_to_string(&label_json).unwrap(),
        r#"{"Ls":[[true],[false]]}"#
    );

    let from_json = FeatureDataset::from_json_files(&data_json, &label_json).unwrap();
    assert_eq!(from_json.labels(), from_mat.labels());
    assert_eq!(from_json.features(), from_mat.features());
}
