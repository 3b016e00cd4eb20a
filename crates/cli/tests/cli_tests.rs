//! CLI integration tests

use prost::Message;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use tract_onnx::pb::*;

const SAMPLE: [&str; 7] = ["10.5", "200.3", "0.1", "-0.05", "0.02", "0.052", "0.91"];

fn predict_risk(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_predict-risk"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// The artifact location the binary resolves, next to the executable
fn installed_model_path() -> PathBuf {
    let exe = Path::new(env!("CARGO_BIN_EXE_predict-risk"))
        .canonicalize()
        .expect("binary path");
    exe.parent().expect("binary dir").join("risk_model.onnx")
}

fn assert_single_error_line(output: &Output) -> String {
    assert_eq!(output.status.code(), Some(1), "failures exit with status 1");
    assert!(output.stdout.is_empty(), "nothing is printed on stdout");

    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    assert!(stderr.starts_with("ERROR:"), "stderr was {:?}", stderr);
    assert_eq!(stderr.trim_end().lines().count(), 1, "stderr was {:?}", stderr);
    stderr
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = predict_risk(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("PRISK"), "Should show app name");
    assert!(stdout.contains("Vit_P"), "Should list feature order");
    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("--strict-schema"), "Should show schema option");
    assert!(stdout.contains("--expected-sha256"), "Should show checksum option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = predict_risk(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("predict-risk"), "Should show binary name");
}

#[test]
fn test_too_few_arguments() {
    let stderr = assert_single_error_line(&predict_risk(&SAMPLE[..6]));
    assert!(stderr.contains("got 6"), "stderr was {:?}", stderr);
}

#[test]
fn test_too_many_arguments() {
    let mut args = SAMPLE.to_vec();
    args.push("1.0");
    let stderr = assert_single_error_line(&predict_risk(&args));
    assert!(stderr.contains("got 8"), "stderr was {:?}", stderr);
}

#[test]
fn test_non_numeric_argument() {
    let mut args = SAMPLE.to_vec();
    args[2] = "abc";
    let stderr = assert_single_error_line(&predict_risk(&args));
    assert!(stderr.contains("argument 3"), "stderr was {:?}", stderr);
    assert!(stderr.contains("abc"), "stderr was {:?}", stderr);
}

/// Test missing artifact error, negative feature values parse as values
#[test]
fn test_missing_model_names_expected_path() {
    let expected = installed_model_path();
    if expected.exists() {
        // An artifact has been installed next to the test binary
        return;
    }

    let stderr = assert_single_error_line(&predict_risk(&SAMPLE));
    assert!(stderr.contains("model not found"), "stderr was {:?}", stderr);
    assert!(
        stderr.contains(&expected.display().to_string()),
        "stderr {:?} should name {}",
        stderr,
        expected.display()
    );
}

/// Test that an artifact in the working directory is never picked up
#[test]
fn test_model_resolution_ignores_working_directory() {
    if installed_model_path().exists() {
        return;
    }

    let cwd = tempfile::TempDir::new().unwrap();
    std::fs::write(cwd.path().join("risk_model.onnx"), b"decoy").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_predict-risk"))
        .args(SAMPLE)
        .current_dir(cwd.path())
        .output()
        .expect("Failed to execute command");

    let stderr = assert_single_error_line(&output);
    assert!(stderr.contains("model not found"), "stderr was {:?}", stderr);
}

/// Test invalid option error handling
#[test]
fn test_invalid_option() {
    let mut args = vec!["--no-such-flag"];
    args.extend(SAMPLE);
    let stderr = assert_single_error_line(&predict_risk(&args));
    assert!(stderr.contains("invalid command line"), "stderr was {:?}", stderr);
}

#[test]
fn test_invalid_format_value() {
    let mut args = vec!["--format", "xml"];
    args.extend(SAMPLE);
    assert_single_error_line(&predict_risk(&args));
}

fn float_tensor(name: &str, dims: &[i64]) -> ValueInfoProto {
    let dim = dims
        .iter()
        .map(|d| tensor_shape_proto::Dimension {
            denotation: String::new(),
            value: Some(tensor_shape_proto::dimension::Value::DimValue(*d)),
        })
        .collect();
    ValueInfoProto {
        name: name.to_string(),
        r#type: Some(TypeProto {
            denotation: String::new(),
            value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                elem_type: 1,
                shape: Some(TensorShapeProto { dim }),
            })),
        }),
        ..Default::default()
    }
}

fn initializer(name: &str, dims: &[i64], float_data: Vec<f32>) -> TensorProto {
    TensorProto {
        name: name.to_string(),
        dims: dims.to_vec(),
        data_type: 1,
        float_data,
        ..Default::default()
    }
}

/// Classifier over a `[1,7]` row that always answers [0.3, 0.7]
fn constant_classifier() -> Vec<u8> {
    let op = |op_type: &str, input: &[&str], output: &str| NodeProto {
        op_type: op_type.to_string(),
        input: input.iter().map(|s| s.to_string()).collect(),
        output: vec![output.to_string()],
        name: format!("{}_op", output),
        ..Default::default()
    };
    let graph = GraphProto {
        name: "constant_classifier".to_string(),
        node: vec![
            op("MatMul", &["float_input", "W"], "z"),
            op("Add", &["z", "B"], "probabilities"),
        ],
        initializer: vec![
            initializer("W", &[7, 2], vec![0.0; 14]),
            initializer("B", &[1, 2], vec![0.3, 0.7]),
        ],
        input: vec![float_tensor("float_input", &[1, 7])],
        output: vec![float_tensor("probabilities", &[1, 2])],
        ..Default::default()
    };
    ModelProto {
        ir_version: 7,
        opset_import: vec![OperatorSetIdProto {
            domain: String::new(),
            version: 13,
        }],
        graph: Some(graph),
        ..Default::default()
    }
    .encode_to_vec()
}

/// A copy of the binary with a model installed beside it
fn installed_copy() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let exe = dir.path().join("predict-risk");
    std::fs::copy(env!("CARGO_BIN_EXE_predict-risk"), &exe).unwrap();
    std::fs::write(dir.path().join("risk_model.onnx"), constant_classifier()).unwrap();
    (dir, exe)
}

/// Test a successful run prints only the score
#[test]
fn test_installed_model_scores_features() {
    let (_dir, exe) = installed_copy();
    let run = || Command::new(&exe).args(SAMPLE).output().unwrap();

    let output = run();
    assert!(
        output.status.success(),
        "stderr was {:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(output.stdout, b"0.700000");

    let again = run();
    assert_eq!(output.stdout, again.stdout, "repeated runs are identical");
}

/// Test the JSON report from a successful run
#[test]
fn test_installed_model_json_report() {
    let (_dir, exe) = installed_copy();
    let mut args = vec!["--format", "json"];
    args.extend(SAMPLE);
    let output = Command::new(&exe).args(&args).output().unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["formatted"], "0.700000");
    assert_eq!(value["score"], 0.7);
    assert_eq!(value["capability"], "probabilistic");
    assert_eq!(value["representation"], "positional");
}
