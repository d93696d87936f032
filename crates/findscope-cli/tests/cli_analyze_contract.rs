use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

const RESPONSE: &str = r#"{
  "placements": [],
  "searchServiceDebug": {
    "hybridSearch": [
      "Hybrid search is executed for Main flow",
      "Vector search based on the algo RR_VECTOR_SIMILARITY with minReturn as 0.72 for Main flow"
    ],
    "searchRequest": "http://solr:8983/solr/select?q=sheba&rows=30&fq=brand%3A%22Sheba%22"
  }
}"#;

fn findscope() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("findscope"));
    cmd.env_remove("FINDSCOPE_VECTOR_ALGORITHMS")
        .env_remove("FINDSCOPE_OUTPUT");
    cmd
}

#[test]
fn findscope_analyze_file_contract() {
    let mut f = tempfile::NamedTempFile::new().expect("tmp response");
    f.write_all(RESPONSE.as_bytes()).expect("write response");

    let out = findscope()
        .args(["analyze", "--file"])
        .arg(f.path())
        .output()
        .expect("run findscope analyze");
    assert!(out.status.success(), "analyze failed");

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse analyze json");
    assert_eq!(v["kind"].as_str(), Some("analyze"));
    assert_eq!(v["ok"].as_bool(), Some(true));
    assert_eq!(v["warnings"], serde_json::json!([]));

    let a = &v["report"]["analysis"];
    assert_eq!(a["hybridSearchFlow"].as_str(), Some("Main flow"));
    assert_eq!(a["vectorAlgorithm"].as_str(), Some("RR_VECTOR_SIMILARITY"));
    assert_eq!(a["minReturnValue"].as_str(), Some("0.72"));
    assert!(a["topResults"].is_null());
    assert!(v["report"]["summary"].is_null());

    let rows = v["report"]["requestParams"].as_array().expect("requestParams");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["key"].as_str(), Some("Base URL"));
    assert_eq!(rows[3]["value"].as_str(), Some("brand:\"Sheba\""));
}

#[test]
fn findscope_analyze_stdin_text_contract() {
    let stdin = r#"{"searchServiceDebug":{"hybridSearch":["Top 500 results with similarity above 0.72 will be picked from RR_KNN_SIMILARITY Vector search based on the configuration for Main flow"]}}"#;
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("findscope"))
        .args(["analyze", "--output", "text"])
        .env_remove("FINDSCOPE_VECTOR_ALGORITHMS")
        .write_stdin(stdin)
        .assert()
        .success()
        .stdout(predicate::str::contains("Vector Algorithm: RR_KNN_SIMILARITY"))
        .stdout(predicate::str::contains("Top Results: 500"))
        .stdout(predicate::str::contains(
            "Vector Search Configuration: Top 500 results with similarity above 0.72 using RR_KNN_SIMILARITY",
        ));
}

#[test]
fn findscope_analyze_without_debug_section() {
    let out = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("findscope"))
        .args(["analyze"])
        .env_remove("FINDSCOPE_OUTPUT")
        .write_stdin(r#"{"placements":[]}"#)
        .output()
        .expect("run findscope analyze");
    assert!(out.status.success());

    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse analyze json");
    assert!(v["report"].is_null());
    assert_eq!(v["warnings"], serde_json::json!(["no_debug_section"]));
}

#[test]
fn findscope_analyze_invalid_json_contract() {
    findscope()
        .args(["analyze", "--output", "text"])
        .stdin(std::process::Stdio::null())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid payload"));
}
