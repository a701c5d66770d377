//! Integration tests for the command implementations.

use std::fs;
use std::path::PathBuf;

use psf_cli::commands::{TOOL_NAME, run_copy, run_show, run_update_checksum, run_verify};
use psf_filer::{ParamSetHandler, ReadOptions, WriteOptions};
use psf_model::{
    DataPoolInfo, DataPoolVersion, FileInfo, InterpretedDataPool, InterpretedElement,
    InterpretedList, InterpretedNode, RawEntry, RawNode,
};
use tempfile::TempDir;

fn sealed_source(dir: &TempDir) -> PathBuf {
    let info = DataPoolInfo::new("DP0", 123, DataPoolVersion::new(1, 0, 0)).with_nvm(0, 2);
    let mut handler = ParamSetHandler::new();
    handler.set_file_info(
        FileInfo::stamped("writer", "1.0")
            .with_creator("tester")
            .with_project("Demo", "2.1"),
    );
    handler
        .add_interpreted_node(InterpretedNode::new(
            "NodeA",
            vec![InterpretedDataPool::new(
                info.clone(),
                vec![InterpretedList::new(
                    "L0",
                    vec![InterpretedElement::new("Speed", 1000u16)],
                )],
            )],
        ))
        .expect("interpreted");
    handler
        .add_raw_node(RawNode {
            name: "NodeA".to_string(),
            data_pools: vec![info],
            entries: vec![RawEntry::new(0, vec![0xE8, 0x03])],
        })
        .expect("raw");

    let path = dir.path().join("source.syde_psi");
    handler
        .create_clean_file(&path, WriteOptions::default())
        .expect("create");
    ParamSetHandler::update_checksum(&path).expect("seal");
    path
}

#[test]
fn verify_reports_valid_and_tampered_files() {
    let dir = TempDir::new().expect("temp dir");
    let path = sealed_source(&dir);
    assert!(run_verify(&path).expect("verify").is_valid());

    let tampered = fs::read_to_string(&path)
        .expect("read")
        .replace("<creator>tester</creator>", "<creator>someone</creator>");
    fs::write(&path, tampered).expect("tamper");
    assert!(!run_verify(&path).expect("verify").is_valid());

    run_update_checksum(&path).expect("repair");
    assert!(run_verify(&path).expect("verify").is_valid());
}

#[test]
fn show_loads_registry() {
    let dir = TempDir::new().expect("temp dir");
    let path = sealed_source(&dir);
    let result = run_show(&path, ReadOptions::default()).expect("show");
    assert_eq!(result.registry.interpreted_nodes().len(), 1);
    assert_eq!(result.registry.raw_nodes().len(), 1);
    assert!(result.summary.checksum.is_some());

    let json = serde_json::to_value(&result).expect("json");
    assert_eq!(
        json["registry"]["interpreted_nodes"][0]["name"],
        serde_json::Value::from("NodeA")
    );
}

#[test]
fn copy_restamps_and_seals() {
    let dir = TempDir::new().expect("temp dir");
    let input = sealed_source(&dir);
    let output = dir.path().join("copy.syde_psi");

    let result = run_copy(&input, &output, false, Some("copied")).expect("copy");
    assert_eq!(result.nodes, 1);
    let report = run_verify(&output).expect("verify copy");
    assert!(report.is_valid());
    assert_eq!(report.stored, Some(result.checksum));

    let copy = run_show(&output, ReadOptions::default()).expect("show copy");
    let info = copy.registry.file_info();
    assert_eq!(info.tool_name.as_deref(), Some(TOOL_NAME));
    assert_eq!(info.creator.as_deref(), Some("tester"));
    assert_eq!(info.project_version.as_deref(), Some("2.1"));
    assert_eq!(info.user_comment.as_deref(), Some("copied"));
    let source = run_show(&input, ReadOptions::default()).expect("show source");
    assert_eq!(
        copy.registry.interpreted_nodes(),
        source.registry.interpreted_nodes()
    );
    assert_eq!(copy.registry.raw_nodes(), source.registry.raw_nodes());

    let err = run_copy(&input, &output, false, None).expect_err("output exists");
    assert!(format!("{err:#}").contains("already exists"));
}

#[test]
fn copy_interpreted_only_drops_raw() {
    let dir = TempDir::new().expect("temp dir");
    let input = sealed_source(&dir);
    let output = dir.path().join("interpreted.syde_psi");
    run_copy(&input, &output, true, None).expect("copy");
    let copy = run_show(&output, ReadOptions::default().with_interpreted_only(true)).expect("show");
    assert_eq!(copy.registry.interpreted_nodes().len(), 1);
    assert!(!fs::read_to_string(&output).expect("read").contains("<raw>"));
}
