//! Command-line behaviour against temporary bundles and databases.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TEORICO: &str = "\
COD: T001
PREGUNTA: 2+2?
A: 3
B: 4
C: 5
D: 6
SOLUCION: B
NORMA: Math

COD: T002
PREGUNTA: Capital of Spain?
A: Lisbon
B: Paris
C: Madrid
D: Rome
SOLUCION: C
NORMA:
";

const PRACTICO: &str = "\
COD: P001
PREGUNTA: A driver approaches a junction.
RESPUESTA A: Stop
RESPUESTA B: Yield
RESPUESTA C: Continue
SOLUCION: RESPUESTA B
NORMA: Reglamento art. 56
";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        fs::write(dir.path().join("teorico.txt"), TEORICO).unwrap();
        fs::write(dir.path().join("practico.txt"), PRACTICO).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).display().to_string()
    }

    fn db(&self) -> String {
        self.path("questions.db")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("quizload").unwrap();
        cmd.arg("-c").arg(self.path("config.json"));
        cmd
    }

    fn load(&self, extra: &[&str]) -> assert_cmd::assert::Assert {
        self.cmd()
            .arg("load")
            .arg("--fixed")
            .arg(self.path("teorico.txt"))
            .arg("--variable")
            .arg(self.path("practico.txt"))
            .arg("--db")
            .arg(self.db())
            .args(extra)
            .assert()
    }
}

#[test]
fn test_load_reports_counts_per_category() {
    let ws = Workspace::new();

    ws.load(&[])
        .success()
        .stdout(predicate::str::contains(
            "2 fixed-choice and 1 variable-choice records loaded",
        ));

    assert!(Path::new(&ws.db()).exists());
}

#[test]
fn test_stats_after_repeated_upsert_load() {
    let ws = Workspace::new();
    ws.load(&[]).success();
    ws.load(&["--policy", "upsert"]).success();

    ws.cmd()
        .args(["stats", "--db", &ws.db()])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"fixed-choice\s+2").unwrap())
        .stdout(predicate::str::is_match(r"variable-choice\s+1").unwrap())
        .stdout(predicate::str::is_match(r"total\s+3").unwrap());
}

#[test]
fn test_reject_policy_aborts_second_run() {
    let ws = Workspace::new();
    ws.load(&[]).success();

    ws.load(&["--policy", "reject"])
        .failure()
        .stderr(predicate::str::contains("nothing was committed"));

    ws.cmd()
        .args(["stats", "--db", &ws.db()])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"total\s+3").unwrap());
}

#[test]
fn test_dry_run_writes_nothing() {
    let ws = Workspace::new();

    ws.load(&["--dry-run"])
        .success()
        .stdout(predicate::str::contains("dry run"));

    assert!(!Path::new(&ws.db()).exists());
    ws.cmd()
        .args(["list", "--category", "fixed", "--format", "json", "--db", &ws.db()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database not found"));
}

#[test]
fn test_stats_on_missing_database_fails() {
    let ws = Workspace::new();
    let missing = ws.path("typo.db");

    ws.cmd()
        .args(["stats", "--db", &missing])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database not found"));

    assert!(!Path::new(&missing).exists());
}

#[test]
fn test_list_json_from_existing_database() {
    let ws = Workspace::new();
    ws.load(&[]).success();

    ws.cmd()
        .args(["list", "--category", "fixed", "--format", "json", "--db", &ws.db()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""code": "T002""#));
}

#[test]
fn test_list_shows_stored_questions() {
    let ws = Workspace::new();
    ws.load(&[]).success();

    ws.cmd()
        .args(["list", "--category", "variable", "--db", &ws.db()])
        .assert()
        .success()
        .stdout(predicate::str::contains("[P001] A driver approaches a junction."))
        .stdout(predicate::str::contains("* B: Yield"));
}

#[test]
fn test_extract_prints_json_records() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("extract")
        .arg(ws.path("teorico.txt"))
        .args(["--grammar", "fixed"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""code": "T001""#))
        .stdout(predicate::str::contains(r#""correct_option": "B""#))
        .stdout(predicate::str::contains(r#""category": "teorico""#));
}

#[test]
fn test_extract_writes_csv_file() {
    let ws = Workspace::new();
    let output = ws.path("out.csv");

    ws.cmd()
        .arg("extract")
        .arg(ws.path("practico.txt"))
        .args(["--grammar", "variable", "--format", "csv", "--output", &output])
        .assert()
        .success();

    let csv = fs::read_to_string(output).unwrap();
    assert!(csv.starts_with("code,category,question,options,correct_option,norma"));
    assert!(csv.contains("P001,practico"));
}

#[test]
fn test_missing_bundle_fails() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["load", "--fixed", &ws.path("nope/*.zip"), "--db", &ws.db()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No bundles found"));
}

#[test]
fn test_load_without_bundles_fails() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["load", "--db", &ws.db()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to load"));
}

#[test]
fn test_config_set_then_get() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "set", "store.duplicate_policy", "append"])
        .assert()
        .success();

    ws.cmd()
        .args(["config", "get", "store.duplicate_policy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"append\""));
}
