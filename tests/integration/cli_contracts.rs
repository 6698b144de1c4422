use crate::integration::support::sample_records;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tocbuild::error::ApiError;
use tocbuild::tooling::cli::{CliContext, Commands};

const DICTIONARY: &str = r#"
[coarse]
A = "Alimentary tract and metabolism"
L = "Antineoplastic and immunomodulating agents"

[mid]
A10 = "Drugs used in diabetes"
L01 = "Antineoplastic agents"

[fine]
L01FA = "CD20 (Clusters of Differentiation 20) inhibitors"
L01FF = "PD-1/PDL-1 (Programmed cell death protein 1/death ligand 1) inhibitors"
"#;

const WORKSPACE_CONFIG: &str = r#"
[inputs]
records = "data/records.json"
dictionary = "data/atc.toml"

[output]
dir = "out/RDCP-E26-EMA"

[catalog]
accession = "RDCP-E26-EMA"
title = "RDCP-E26-EMA - EMA PARs"
license_name = "EMA Public"
"#;

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    let records: Vec<_> = sample_records().iter().map(|r| (**r).clone()).collect();
    fs::write(
        data.join("records.json"),
        serde_json::to_string(&serde_json::json!({ "data": records })).unwrap(),
    )
    .unwrap();
    fs::write(data.join("atc.toml"), DICTIONARY).unwrap();
    fs::write(temp.path().join("tocbuild.toml"), WORKSPACE_CONFIG).unwrap();
    temp
}

fn build(format: &str, clean: bool, dry_run: bool) -> Commands {
    Commands::Build {
        records: None,
        dictionary: None,
        output: None,
        clean,
        dry_run,
        format: format.to_string(),
    }
}

fn parse(output: &str) -> serde_json::Value {
    serde_json::from_str(output).unwrap()
}

fn output_dir(root: &Path) -> std::path::PathBuf {
    root.join("out").join("RDCP-E26-EMA")
}

#[test]
fn build_json_contract_has_required_fields() {
    let temp = workspace();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();
    let parsed = parse(&cli.execute(&build("json", false, false)).unwrap());

    assert_eq!(parsed["accession"], "RDCP-E26-EMA");
    assert_eq!(parsed["records"], 13);
    assert_eq!(parsed["documents_written"], 24);
    assert_eq!(parsed["name_collisions"], 0);
    assert_eq!(parsed["dry_run"], false);
    assert!(parsed.get("collisions").is_none());

    let out = output_dir(temp.path());
    assert!(out.join("files").join("toc.json").is_file());
    assert!(out.join("By-Code").join("toc.json").is_file());
    let metadata = parse(&fs::read_to_string(out.join("metadata.json")).unwrap());
    assert_eq!(metadata["stats"]["documents_written"], 24);
    assert_eq!(metadata["license"]["name"], "EMA Public");
}

#[test]
fn verify_after_build_reports_a_consistent_tree() {
    let temp = workspace();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();
    cli.execute(&build("text", false, false)).unwrap();

    let parsed = parse(
        &cli.execute(&Commands::Verify {
            output: None,
            format: "json".to_string(),
        })
        .unwrap(),
    );
    assert_eq!(parsed["documents"], 24);
    assert_eq!(parsed["metadata_present"], true);
    assert_eq!(parsed["leaves"], 52, "each record's listing appears on both views");
    assert_eq!(parsed["issues"].as_array().unwrap().len(), 0);
}

#[test]
fn dry_run_writes_nothing() {
    let temp = workspace();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();
    let parsed = parse(&cli.execute(&build("json", false, true)).unwrap());
    assert_eq!(parsed["documents_written"], 24);
    assert_eq!(parsed["dry_run"], true);
    assert!(!output_dir(temp.path()).exists());
}

#[test]
fn clean_removes_stale_pages() {
    let temp = workspace();
    let stale = output_dir(temp.path()).join("stale");
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("toc.json"), "{}").unwrap();

    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();
    cli.execute(&build("text", true, false)).unwrap();
    assert!(!stale.exists());
    assert!(output_dir(temp.path()).join("metadata.json").is_file());
}

#[test]
fn refused_clean_build_keeps_previous_output() {
    let temp = workspace();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();
    cli.execute(&build("text", false, false)).unwrap();
    let metadata = output_dir(temp.path()).join("metadata.json");
    assert!(metadata.is_file());

    fs::write(
        temp.path().join("data").join("records.json"),
        r#"[
            {"id": "EMEA/H/C/000001", "name": "Alpha", "code": "L01FA01"},
            {"id": "EMEA-H-C-000001", "name": "Beta", "code": "L01FB02"}
        ]"#,
    )
    .unwrap();
    fs::write(
        temp.path().join("tocbuild.toml"),
        format!("{}\n[build]\nfail_on_collision = true\n", WORKSPACE_CONFIG),
    )
    .unwrap();

    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();
    let err = cli.execute(&build("text", true, false)).unwrap_err();
    assert!(matches!(err, ApiError::NameCollision(1)));
    assert!(metadata.is_file());
    assert!(output_dir(temp.path()).join("By-Code").join("toc.json").is_file());
}

#[test]
fn missing_feed_fails_before_writing() {
    let temp = workspace();
    fs::remove_file(temp.path().join("data").join("records.json")).unwrap();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();
    let err = cli.execute(&build("text", true, false)).unwrap_err();
    assert!(matches!(err, ApiError::MissingInput { what: "record feed", .. }));
    assert!(!output_dir(temp.path()).exists());
}

#[test]
fn resolve_json_lists_every_boundary() {
    let temp = workspace();
    let cli = CliContext::new(temp.path().to_path_buf(), None).unwrap();
    let parsed = parse(
        &cli.execute(&Commands::Resolve {
            code: "l01ff".to_string(),
            dictionary: None,
            format: "json".to_string(),
        })
        .unwrap(),
    );
    assert_eq!(parsed["normalized"], "L01FFXX");
    assert_eq!(
        parsed["label"],
        "PD-1/PDL-1 (Programmed cell death protein 1/death ligand 1) inhibitors"
    );
    let prefixes: Vec<&str> = parsed["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["prefix"].as_str().unwrap())
        .collect();
    assert_eq!(prefixes, vec!["L", "L01", "L01F", "L01FF", "L01FFX"]);
}
