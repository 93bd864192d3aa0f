mod common;

use archlens::graph::TypeForm;
use archlens::semantic::SourceType;
use common::{field, model, write_model};
use indoc::indoc;
use std::process::{Command, Output};

fn archlens(args: &[&str], dir: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_archlens"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run archlens")
}

#[test]
fn test_audit_clean_model_as_json() {
    let (dir, path) = write_model(&model(vec![
        SourceType::new("shop.util.StringUtils", TypeForm::Class),
        SourceType::new("shop.util.Dates", TypeForm::Class),
    ]));

    let output = archlens(
        &["audit", path.to_str().unwrap(), "--format", "json"],
        dir.path(),
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["passed"], true);
    assert_eq!(report["summary"]["total"], 2);
    assert_eq!(report["summary"]["not_analyzed"], 2);
}

#[test]
fn test_audit_fails_on_aggregate_cycle() {
    let (dir, path) = write_model(&model(vec![
        SourceType::new("shop.domain.Order", TypeForm::Class)
            .with_field(field("customer", "shop.domain.Customer")),
        SourceType::new("shop.domain.Customer", TypeForm::Class)
            .with_field(field("lastOrder", "shop.domain.Order")),
    ]));
    std::fs::write(
        dir.path().join("archlens.toml"),
        indoc! {r#"
            [classification.explicit]
            "shop.domain.Order" = "AGGREGATE_ROOT"
            "shop.domain.Customer" = "AGGREGATE_ROOT"
        "#},
    )
    .unwrap();

    let output = archlens(&["audit", path.to_str().unwrap(), "--plain"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("ddd:aggregate-cycle"));
    assert!(stdout.contains("FAILED"));
}

#[test]
fn test_report_is_written_to_output_file() {
    let (dir, path) = write_model(&model(vec![SourceType::new(
        "shop.util.StringUtils",
        TypeForm::Class,
    )]));
    let report = dir.path().join("report.json");

    let output = archlens(
        &[
            "audit",
            path.to_str().unwrap(),
            "--format",
            "json",
            "--output",
            report.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(written["passed"], true);
}

#[test]
fn test_missing_model_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = archlens(&["audit", "does-not-exist.json"], dir.path());

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load model"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = tempfile::TempDir::new().unwrap();

    assert!(archlens(&["init"], dir.path()).status.success());
    assert!(dir.path().join("archlens.toml").exists());

    assert!(!archlens(&["init"], dir.path()).status.success());
    assert!(archlens(&["init", "--force"], dir.path()).status.success());
}
