mod common;

use common::{MockBackend, create_test_pdf};
use proposal_export::*;
use proposal_layout::PageBreakMarkers;
use std::path::Path;
use tempfile::TempDir;

const BUILD_ID: &str = "2024-01-01 00-00-00_Acme";

fn options(root: &Path) -> ExportOptions {
    ExportOptions {
        spreadsheet_id: "doc".to_string(),
        sheet_id: 7,
        output_dir: root.join("out"),
        state_file: root.join("state.json"),
        ..Default::default()
    }
}

async fn store_with_build(options: &ExportOptions) -> MarkerStore {
    let mut store = MarkerStore::open(&options.state_file).await.unwrap();
    store
        .put(BuildRecord::new(
            BUILD_ID,
            "Acme",
            "2024-01-01 00-00-00",
            7,
            &PageBreakMarkers::new(vec![1, 50, 70]).unwrap(),
        ))
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_export_writes_artifacts_and_consumes_record() {
    let temp = TempDir::new().unwrap();
    let mut options = options(temp.path());
    options.archive = true;
    let mut store = store_with_build(&options).await;
    let backend = MockBackend::new(vec![create_test_pdf(&[1, 2]), create_test_pdf(&[3])]);

    let outcome = export_build(&backend, &mut store, &options, None).await.unwrap();

    assert_eq!(outcome.build_id, BUILD_ID);
    assert_eq!(outcome.page_count, 3);
    let folder = temp.path().join("out").join(BUILD_ID);
    assert_eq!(outcome.written.folder, folder);
    assert!(folder.join("Acme_2024-01-01 00-00-00.pdf").exists());
    assert!(folder.join("Acme_2024-01-01 00-00-00.xlsx").exists());
    assert_eq!(
        outcome.archive,
        Some(temp.path().join("out").join(format!("{}.zip", BUILD_ID)))
    );

    let reopened = MarkerStore::open(&options.state_file).await.unwrap();
    assert!(matches!(
        reopened.get(BUILD_ID),
        Err(ExportError::MissingBuild(_))
    ));
}

#[tokio::test]
async fn test_failed_fetch_writes_nothing_and_keeps_record() {
    let temp = TempDir::new().unwrap();
    let options = options(temp.path());
    let mut store = store_with_build(&options).await;
    let mut backend = MockBackend::new(vec![create_test_pdf(&[1]), create_test_pdf(&[2])]);
    backend.fail_page = Some(2);

    let result = export_build(&backend, &mut store, &options, Some(BUILD_ID)).await;

    assert!(matches!(result, Err(ExportError::Fetch { .. })));
    assert!(!temp.path().join("out").exists());
    let reopened = MarkerStore::open(&options.state_file).await.unwrap();
    assert_eq!(reopened.get(BUILD_ID).unwrap().markers, "1,50,70");
}

#[tokio::test]
async fn test_unknown_build_is_missing() {
    let temp = TempDir::new().unwrap();
    let options = options(temp.path());
    let mut store = store_with_build(&options).await;
    let backend = MockBackend::new(Vec::new());

    let result = export_build(&backend, &mut store, &options, Some("nope")).await;
    assert!(matches!(result, Err(ExportError::MissingBuild(_))));
}

#[tokio::test]
async fn test_invalid_options_stop_before_fetching() {
    let temp = TempDir::new().unwrap();
    let mut options = options(temp.path());
    options.spreadsheet_id.clear();
    let mut store = store_with_build(&options).await;
    let backend = MockBackend::new(Vec::new());

    let result = export_build(&backend, &mut store, &options, None).await;
    assert!(matches!(result, Err(ExportError::Config(_))));
    assert!(backend.seen.lock().unwrap().is_empty());
}
