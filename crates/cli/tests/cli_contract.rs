use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures").join(name)
}

fn json_stdout(args: &[&str], file: PathBuf) -> Value {
    let output = cargo_bin_cmd!("xplore")
        .arg(args[0])
        .arg(file)
        .args(&args[1..])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_slice(&output).expect("stdout should contain valid json")
}

#[test]
fn version_prints_package_version() {
    cargo_bin_cmd!("xplore")
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn import_lists_accepted_and_reports_rejected() {
    cargo_bin_cmd!("xplore")
        .arg("import")
        .arg(fixture("small.pdf"))
        .arg(fixture("invalid.pdf"))
        .arg(fixture("with-info.pdf"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1\tsmall.pdf\t"))
        .stdout(predicate::str::contains("2\twith-info.pdf\t"))
        .stdout(predicate::str::contains("5 PDF attributes"))
        .stderr(predicate::str::contains("Failed to read: "))
        .stderr(predicate::str::contains("invalid.pdf"));
}

#[test]
fn import_reads_locations_from_list_file() {
    let temp = tempfile::tempdir().expect("temp dir should be created");
    let list = temp.path().join("picked.txt");
    std::fs::write(
        &list,
        format!("{}\n\n{}\n", fixture("three-pages.pdf").display(), fixture("small.pdf").display()),
    )
    .expect("list file should be written");

    cargo_bin_cmd!("xplore")
        .arg("import")
        .arg("--list")
        .arg(&list)
        .assert()
        .success()
        .stdout(predicate::str::contains("1\tthree-pages.pdf"))
        .stdout(predicate::str::contains("2\tsmall.pdf"))
        .stderr(predicate::str::contains("Failed to read").not());
}

#[test]
fn import_reports_unreadable_list_as_failure() {
    cargo_bin_cmd!("xplore")
        .arg("import")
        .arg("--list")
        .arg(fixture("missing-list.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read file list"));
}

#[test]
fn attributes_prints_pdf_info_lines() {
    cargo_bin_cmd!("xplore")
        .arg("attributes")
        .arg(fixture("with-info.pdf"))
        .arg("--source")
        .arg("pdf")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1\tTitle=Document Analysis\n"))
        .stdout(predicate::str::contains("2\tAuthor=J. Doe"))
        .stdout(predicate::str::contains("CreationDate=2023-10-31 12:00:00 +00:00"))
        .stdout(predicate::str::contains("5\tProducer=XP"));
}

#[test]
fn attributes_lists_both_sections_by_default() {
    cargo_bin_cmd!("xplore")
        .arg("attributes")
        .arg(fixture("small.pdf"))
        .assert()
        .success()
        .stdout(predicate::str::contains("File attributes:"))
        .stdout(predicate::str::contains("size=").and(predicate::str::contains("PDF attributes:")));
}

#[test]
fn tokens_emit_stable_json_contract() {
    let value = json_stdout(&["tokens"], fixture("small.pdf"));

    assert_eq!(value["page"], 1);
    assert_eq!(value["page_count"], 1);
    assert_eq!(value["unit"], "word");
    assert_eq!(value["scheme"], "TokenType");
    assert!(value.get("selection").is_none());

    insta::assert_json_snapshot!("cli_tokens_small_pdf", value["tokens"]);
}

#[test]
fn tokens_join_selected_ids_in_order() {
    let value = json_stdout(&["tokens", "--select", "3,0,1"], fixture("small.pdf"));

    assert_eq!(value["selection"], "The quick fox");
}

#[test]
fn tokens_of_blank_page_are_empty() {
    let value = json_stdout(&["tokens", "--page", "2"], fixture("three-pages.pdf"));

    assert_eq!(value["page"], 2);
    assert_eq!(value["tokens"], Value::Array(Vec::new()));
}

#[test]
fn sentence_tokens_are_untyped() {
    let value =
        json_stdout(&["tokens", "--page", "3", "--unit", "sentence"], fixture("three-pages.pdf"));

    let tokens = value["tokens"].as_array().expect("tokens should be an array");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0]["text"], "Second page text.");
    assert_eq!(tokens[1]["id"], 1);
    assert!(tokens.iter().all(|token| token["type"] == "no type"));
    assert_eq!(value["scheme"], "TokenType");
}

#[test]
fn tokens_reject_page_zero_and_out_of_range() {
    cargo_bin_cmd!("xplore")
        .arg("tokens")
        .arg(fixture("small.pdf"))
        .arg("--page")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("1-based"));

    cargo_bin_cmd!("xplore")
        .arg("tokens")
        .arg(fixture("three-pages.pdf"))
        .arg("--page")
        .arg("9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn tokens_reject_unknown_unit() {
    cargo_bin_cmd!("xplore")
        .arg("tokens")
        .arg(fixture("small.pdf"))
        .arg("--unit")
        .arg("line")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown token unit"));
}

#[test]
fn extract_commits_edits_and_picked_tokens() {
    let value = json_stdout(
        &["extract", "--title", "Foxes", "--pick", "1,2", "--into", "abstract"],
        fixture("small.pdf"),
    );

    assert_eq!(value["id"], 1);
    assert_eq!(value["extract"]["title"], "Foxes");
    assert_eq!(value["extract"]["abstract"], "quick brown");
    assert_eq!(value["extract"]["authors"], "");
    assert_eq!(value["committed"], serde_json::json!(["Title", "Abstract"]));
}

#[test]
fn extract_drops_viewer_selection_into_field() {
    let value = json_stdout(
        &["extract", "--selection", "pdf, metadata", "--into", "keywords"],
        fixture("with-info.pdf"),
    );

    assert_eq!(value["extract"]["author_keywords"], "pdf, metadata");
    assert_eq!(value["committed"], serde_json::json!(["Author Keywords"]));
}

#[test]
fn extract_with_blank_title_commits_nothing() {
    let value = json_stdout(&["extract", "--title", ""], fixture("small.pdf"));

    assert_eq!(value["committed"], Value::Array(Vec::new()));
    assert_eq!(value["extract"]["title"], "");
}

#[test]
fn fails_for_missing_file() {
    cargo_bin_cmd!("xplore")
        .arg("tokens")
        .arg(fixture("missing.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to import"))
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn fails_for_invalid_pdf() {
    cargo_bin_cmd!("xplore")
        .arg("attributes")
        .arg(fixture("invalid.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid PDF document"));
}

#[test]
fn fails_for_encrypted_marker_pdf() {
    cargo_bin_cmd!("xplore")
        .arg("attributes")
        .arg(fixture("encrypted-marker.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("encrypted PDFs are not supported"));
}
