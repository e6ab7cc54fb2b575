use std::{
    env, fs,
    path::{Path, PathBuf},
};

use datafiles::{SweepResults, npy, npy::NpyArray};
use ndarray::{Array1, Array2};
use readout::{ExperimentConfig, loader, run};

const CLASSES: usize = 3;
const FEATURES: usize = 4;

fn scratch(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("readout-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Rows cycle through the classes, each class lighting up its own feature.
fn blobs(n: usize, offset: usize) -> (Array2<f32>, Array1<i64>) {
    let x = Array2::from_shape_fn((n, FEATURES), |(i, j)| {
        let class = (i + offset) % CLASSES;
        let hot = if j == class { 3.0 } else { 0.0 };
        hot + ((i * 7 + j) % 5) as f32 * 0.1
    });
    let y = (0..n).map(|i| ((i + offset) % CLASSES) as i64).collect();
    (x, y)
}

fn write_task(dir: &Path, stem: &str, train: usize, test: usize) {
    let (x, y) = blobs(train, 0);
    npy::save(dir.join(format!("{stem}_tr_set.npy")), x.view()).unwrap();
    npy::save(dir.join(format!("{stem}_tr_label.npy")), y.view()).unwrap();

    let (x, y) = blobs(test, 1);
    npy::save(dir.join(format!("{stem}_te_set.npy")), x.view()).unwrap();
    npy::save(dir.join(format!("{stem}_te_label.npy")), y.view()).unwrap();
}

fn config(json: String) -> ExperimentConfig {
    serde_json::from_str(&json).unwrap()
}

#[test]
fn sweep_records_every_point_and_writes_results() {
    let dir = scratch("sweep");
    write_task(&dir, "blobs", 60, 30);
    let output = dir.join("sweep.json");

    let config = config(format!(
        r#"{{
            "data": {{ "dir": {dir:?}, "prefix": "blobs" }},
            "experiment": {{
                "kind": "sweep",
                "points": {{ "start": 15, "end": 61, "step": 15 }},
                "output": {output:?}
            }},
            "model": {{ "learning_rate": 0.1, "weight_decay": 0.0, "batch_size": 8, "epochs": 30 }},
            "seed": 3
        }}"#
    ));

    let record = run(&config).unwrap();
    assert_eq!(record.points, [15, 30, 45, 60]);
    assert_eq!(record.accuracies.len(), 4);
    for accuracies in &record.accuracies {
        assert_eq!(accuracies.len(), 1);
        assert!((0.0..=1.0).contains(&accuracies[0]));
    }
    assert!(record.accuracies[3][0] > 0.9, "{:?}", record.accuracies);

    let saved = SweepResults::load(&output).unwrap();
    assert_eq!(saved.points, record.points);
    assert_eq!(saved.accuracy.len(), 4);
    assert_eq!(saved.true_labels.len(), 30);
    assert_eq!(saved.predicted_labels.len(), 30);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn same_seed_gives_the_same_record() {
    let dir = scratch("seed");
    write_task(&dir, "blobs", 30, 12);

    let json = format!(
        r#"{{
            "data": {{ "dir": {dir:?}, "prefix": "blobs" }},
            "experiment": {{
                "kind": "sweep",
                "points": {{ "start": 10, "end": 31, "step": 10 }},
                "output": {:?}
            }},
            "model": {{ "learning_rate": 0.05, "weight_decay": 0.01, "momentum": 0.9, "batch_size": 4, "epochs": 5, "shuffle": true }},
            "seed": 11
        }}"#,
        dir.join("seed.json")
    );

    let first = run(&config(json.clone())).unwrap();
    let second = run(&config(json)).unwrap();
    assert_eq!(first, second);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn trials_read_one_file_set_per_trial() {
    let dir = scratch("trials");
    write_task(&dir, "run0", 45, 15);
    write_task(&dir, "run1", 45, 15);
    let accuracies = dir.join("accuracies.npy");
    let datapoints = dir.join("datapoints.npy");

    let config = config(format!(
        r#"{{
            "data": {{ "dir": {dir:?}, "prefix": "run" }},
            "experiment": {{
                "kind": "trials",
                "trials": 2,
                "points": [20, 45],
                "accuracies": {accuracies:?},
                "datapoints": {datapoints:?}
            }},
            "model": {{ "learning_rate": 0.1, "weight_decay": 0.0, "batch_size": 5, "epochs": 20 }},
            "seed": 5
        }}"#
    ));

    let record = run(&config).unwrap();
    assert_eq!(record.points, [20, 45]);
    for accuracies in &record.accuracies {
        assert_eq!(accuracies.len(), 2);
        assert!(accuracies.iter().all(|a| (0.0..=100.0).contains(a)));
    }
    // Separable blobs, so scaled accuracies can't all stay within [0, 1].
    assert!(
        record.accuracies.iter().flatten().any(|&a| a > 1.0),
        "{:?}",
        record.accuracies
    );

    let saved = NpyArray::open(&accuracies).unwrap();
    assert_eq!(saved.shape(), [2, 2]);
    let expected: Vec<f64> = record
        .accuracies
        .iter()
        .flatten()
        .map(|&a| a as f64)
        .collect();
    assert_eq!(saved.to_vec::<f64>(), expected);
    let points = NpyArray::open(&datapoints).unwrap();
    assert_eq!(points.to_vec::<i64>(), [20, 45]);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn single_trial_uses_the_unsuffixed_files() {
    let dir = scratch("single");
    write_task(&dir, "only", 30, 9);
    let accuracies = dir.join("acc.npy");

    let config = config(format!(
        r#"{{
            "data": {{ "dir": {dir:?}, "prefix": "only" }},
            "experiment": {{
                "kind": "trials",
                "trials": 1,
                "points": [30],
                "percent": false,
                "accuracies": {accuracies:?},
                "datapoints": {:?}
            }},
            "seed": 1
        }}"#,
        dir.join("points.npy")
    ));

    let record = run(&config).unwrap();
    assert_eq!(record.accuracies.len(), 1);
    assert!((0.0..=1.0).contains(&record.accuracies[0][0]));
    assert_eq!(NpyArray::open(&accuracies).unwrap().shape(), [1]);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn loader_rejects_mismatched_feature_widths() {
    let dir = scratch("widths");
    write_task(&dir, "bad", 6, 3);
    npy::save(dir.join("bad_te_set.npy"), Array2::<f32>::zeros((3, 2)).view()).unwrap();

    let source = readout::tasks::DataSource {
        dir: dir.clone(),
        task: None,
        prefix: Some("bad".into()),
    };
    let err = loader::load(&source, None).unwrap_err();
    assert!(err.to_string().contains("features"), "{err}");

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn missing_files_name_the_path() {
    let dir = scratch("missing");
    let source = readout::tasks::DataSource {
        dir: dir.clone(),
        task: None,
        prefix: Some("absent".into()),
    };

    let err = loader::load(&source, Some(2)).unwrap_err();
    assert!(format!("{err:#}").contains("absent2_tr_set.npy"), "{err:#}");

    fs::remove_dir_all(dir).unwrap();
}
