//! End-to-end tests: intake a report, assign it, count and resolve products.
//!
//! Every test runs against its own temporary data directory and an empty
//! config file, so the user's real configuration is never read.

#![allow(deprecated)] // cargo_bin deprecation: replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("stockrecon").expect("binary 'stockrecon' should be built");
        cmd.arg("--config")
            .arg(self.path("config.toml"))
            .arg("--data-dir")
            .arg(self.path("data"));
        cmd
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn intake_report(&self) {
        let report = self.write("report.json", &report_json(10));
        self.cmd()
            .arg("intake")
            .arg(&report)
            .args(["--location", "centro"])
            .assert()
            .success()
            .stdout(predicate::str::contains("10 products"))
            .stdout(predicate::str::contains("2024-03-05"));
    }

    fn roster(&self, workers: usize) -> PathBuf {
        let entries: Vec<Value> = (1..=workers)
            .map(|i| {
                serde_json::json!({
                    "code": format!("W{i}"),
                    "displayName": format!("Worker {i}"),
                    "role": if i % 2 == 0 { "manager" } else { "counter" },
                })
            })
            .collect();
        self.write("roster.json", &serde_json::to_string(&entries).unwrap())
    }

    fn stored(&self) -> Value {
        let content = fs::read_to_string(self.path("data").join("centro").join("products.json"))
            .expect("collection should be saved");
        serde_json::from_str(&content).unwrap()
    }
}

/// A one-page stock report with `n` products laid out as code/name line pairs.
fn report_json(n: usize) -> String {
    let mut fragments = vec![
        serde_json::json!({"text": "Sucursal Centro", "x": 0.0, "y": 800.0}),
        serde_json::json!({"text": "Reporte de Existencias al 05/03/2024", "x": 150.0, "y": 800.0}),
    ];
    let mut y = 760.0;
    for i in 1..=n {
        fragments.push(serde_json::json!({"text": format!("AB{i}"), "x": 0.0, "y": y}));
        y -= 12.0;
        fragments.push(serde_json::json!({"text": format!("Producto {i}"), "x": 0.0, "y": y}));
        fragments.push(serde_json::json!({"text": (i * 10).to_string(), "x": 300.0, "y": y}));
        y -= 12.0;
    }
    fragments.push(serde_json::json!({"text": "Página 1 de 1", "x": 200.0, "y": 10.0}));
    serde_json::to_string(&vec![fragments]).unwrap()
}

fn product<'a>(stored: &'a Value, correlative: usize) -> &'a Value {
    &stored["products"][correlative - 1]
}

#[test]
fn intake_saves_numbered_products() {
    let ws = Workspace::new();
    ws.intake_report();

    let stored = ws.stored();
    assert_eq!(stored["reportDate"], "2024-03-05");
    assert_eq!(stored["products"].as_array().unwrap().len(), 10);
    assert_eq!(product(&stored, 3)["code"], "AB3");
    assert_eq!(product(&stored, 3)["systemQuantity"], 30);
    assert_eq!(product(&stored, 3)["difference"], -30);
    assert_eq!(product(&stored, 3)["reviewer"], "Pending");
}

#[test]
fn intake_rejects_wrong_report_type() {
    let ws = Workspace::new();
    let invoice = ws.write(
        "invoice.json",
        r#"[[{"text": "Factura 0001-234", "x": 0, "y": 800}, {"text": "AB1", "x": 0, "y": 700}, {"text": "Clavo 4", "x": 0, "y": 690}]]"#,
    );
    ws.cmd()
        .arg("intake")
        .arg(&invoice)
        .args(["--location", "centro"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not the expected report"));
    assert!(!ws.path("data").join("centro").exists());
}

#[test]
fn intake_without_rows_is_informational() {
    let ws = Workspace::new();
    let empty = ws.write(
        "empty.json",
        r#"[[{"text": "Lista de productos", "x": 0, "y": 800}]]"#,
    );
    ws.cmd()
        .arg("intake")
        .arg(&empty)
        .args(["--location", "centro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No product records found"));
}

#[test]
fn assign_wraps_from_start_index() {
    let ws = Workspace::new();
    ws.intake_report();
    let roster = ws.roster(2);

    let output = ws
        .cmd()
        .args(["assign", "--location", "centro", "--start", "6", "--json"])
        .arg("--roster")
        .arg(&roster)
        .output()
        .unwrap();
    assert!(output.status.success());
    let ranges: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(ranges[0]["workerCode"], "W1");
    assert_eq!(ranges[0]["firstCorrelative"], 6);
    assert_eq!(ranges[0]["lastCorrelative"], 10);
    assert_eq!(ranges[1]["firstCorrelative"], 1);
    assert_eq!(ranges[1]["lastCorrelative"], 5);

    let stored = ws.stored();
    assert_eq!(product(&stored, 6)["assignedWorker"], "W1");
    assert_eq!(product(&stored, 1)["assignedWorker"], "W2");
}

#[test]
fn assign_with_role_filter_and_bad_start() {
    let ws = Workspace::new();
    ws.intake_report();
    let roster = ws.roster(3);

    ws.cmd()
        .args(["assign", "--location", "centro", "--role", "counter"])
        .arg("--roster")
        .arg(&roster)
        .assert()
        .success()
        .stdout(predicate::str::contains("across 2 workers"))
        .stdout(predicate::str::contains("W3"));

    ws.cmd()
        .args(["assign", "--location", "centro", "--start", "11"])
        .arg("--roster")
        .arg(&roster)
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside 1..=10"));

    ws.cmd()
        .args(["assign", "--location", "centro", "--role", "driver"])
        .arg("--roster")
        .arg(&roster)
        .assert()
        .failure()
        .stderr(predicate::str::contains("roster is empty"));
}

#[test]
fn count_clear_and_resolve_round_trip() {
    let ws = Workspace::new();
    ws.intake_report();

    ws.cmd()
        .args(["count", "-l", "centro", "-c", "ab2", "-w", "W1", "--partials", "5,7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("real 12 / system 20"))
        .stdout(predicate::str::contains("Reviewed"));
    let stored = ws.stored();
    assert_eq!(product(&stored, 2)["realQuantity"], 12);
    assert_eq!(product(&stored, 2)["difference"], -8);
    assert_eq!(product(&stored, 2)["reviewer"], "W1");

    ws.cmd()
        .args(["resolve", "-l", "centro", "-c", "AB2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("difference +0"));
    let stored = ws.stored();
    assert_eq!(product(&stored, 2)["realQuantity"], 20);
    assert_eq!(product(&stored, 2)["reviewer"], "W1");

    ws.cmd()
        .args(["clear", "-l", "centro", "-c", "AB2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending"));
    let stored = ws.stored();
    assert_eq!(product(&stored, 2)["realQuantity"], 0);
    assert_eq!(product(&stored, 2)["reviewer"], "Pending");
    assert_eq!(product(&stored, 2)["reviewedAt"], "Pending");
}

#[test]
fn resolve_all_and_show_summary() {
    let ws = Workspace::new();
    ws.intake_report();

    ws.cmd()
        .args(["resolve", "-l", "centro", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved 10 differences"));

    ws.cmd()
        .args(["show", "-l", "centro"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10 matching"))
        .stdout(predicate::str::contains("net +0"));
}

#[test]
fn show_json_includes_ranges() {
    let ws = Workspace::new();
    ws.intake_report();
    let roster = ws.roster(3);
    ws.cmd()
        .args(["assign", "-l", "centro", "-s", "9"])
        .arg("--roster")
        .arg(&roster)
        .assert()
        .success();

    let output = ws
        .cmd()
        .args(["show", "-l", "centro", "--json"])
        .arg("--roster")
        .arg(&roster)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["total"], 10);
    assert_eq!(value["ranges"][0]["firstCorrelative"], 9);
    assert_eq!(value["ranges"][0]["lastCorrelative"], 2);
}

#[test]
fn unknown_product_and_location_fail() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["show", "-l", "norte"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Run `stockrecon intake` first"));

    ws.intake_report();
    ws.cmd()
        .args(["clear", "-l", "centro", "-c", "ZZ9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Product not found: ZZ9"));
}

#[test]
fn product_list_under_wrong_location_is_refused() {
    let ws = Workspace::new();
    ws.intake_report();
    let norte = ws.path("data").join("norte");
    fs::create_dir_all(&norte).unwrap();
    fs::copy(
        ws.path("data").join("centro").join("products.json"),
        norte.join("products.json"),
    )
    .unwrap();
    let before = ws.stored();

    ws.cmd()
        .args(["count", "-l", "norte", "-c", "AB1", "-w", "W1", "--set", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not belong under 'norte'"));
    assert_eq!(ws.stored(), before);
}
