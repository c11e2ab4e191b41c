use proposal_export::*;
use proposal_layout::PageBreakMarkers;
use tempfile::TempDir;

fn record(id: &str, markers: &[usize]) -> BuildRecord {
    BuildRecord::new(
        id,
        "Acme",
        "2024-01-01 00-00-00",
        7,
        &PageBreakMarkers::new(markers.to_vec()).unwrap(),
    )
}

#[tokio::test]
async fn test_missing_state_file_is_empty_store() {
    let temp = TempDir::new().unwrap();
    let store = MarkerStore::open(temp.path().join("state.json")).await.unwrap();
    assert_eq!(store.build_ids().count(), 0);
    assert!(matches!(store.latest(), Err(ExportError::MissingBuild(_))));
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("state.json");

    let mut store = MarkerStore::open(&path).await.unwrap();
    store.put(record("a", &[1, 34])).await.unwrap();
    store.put(record("b", &[1, 50, 70])).await.unwrap();

    let reopened = MarkerStore::open(&path).await.unwrap();
    assert_eq!(reopened.latest().unwrap().build_id, "b");
    assert_eq!(reopened.get("a").unwrap().markers, "1,34");

    let segments = reopened.resolve(None).unwrap().segments().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!((segments[0].first_row, segments[0].last_row), (2, 50));
    assert_eq!((segments[1].first_row, segments[1].last_row), (51, 70));
    assert_eq!(segments[1].last_column, 7);
}

#[tokio::test]
async fn test_builds_do_not_share_markers() {
    let temp = TempDir::new().unwrap();
    let mut store = MarkerStore::open(temp.path().join("state.json")).await.unwrap();
    store.put(record("first", &[1, 34])).await.unwrap();
    store.put(record("second", &[1, 52])).await.unwrap();

    assert_eq!(store.resolve(Some("first")).unwrap().markers, "1,34");
    assert_eq!(store.resolve(Some("second")).unwrap().markers, "1,52");
}

#[tokio::test]
async fn test_remove_after_export() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("state.json");
    let mut store = MarkerStore::open(&path).await.unwrap();
    store.put(record("a", &[1, 34])).await.unwrap();

    let removed = store.remove("a").await.unwrap();
    assert_eq!(removed.map(|r| r.build_id), Some("a".to_string()));
    assert!(matches!(store.get("a"), Err(ExportError::MissingBuild(_))));

    let reopened = MarkerStore::open(&path).await.unwrap();
    assert!(matches!(reopened.latest(), Err(ExportError::MissingBuild(_))));
}

#[tokio::test]
async fn test_corrupt_markers_are_layout_error() {
    let mut bad = record("a", &[1, 34]);
    bad.markers = "1,x".to_string();
    assert!(matches!(bad.segments(), Err(ExportError::Layout(_))));
}

#[tokio::test]
async fn test_same_build_id_is_not_overwritten() {
    let temp = TempDir::new().unwrap();
    let mut store = MarkerStore::open(temp.path().join("state.json")).await.unwrap();
    store.put(record("2024-01-01 00-00-00_Acme", &[1, 34])).await.unwrap();

    let result = store.put(record("2024-01-01 00-00-00_Acme", &[1, 52])).await;
    assert!(matches!(result, Err(ExportError::BuildExists(_))));
    assert_eq!(store.get("2024-01-01 00-00-00_Acme").unwrap().markers, "1,34");
}
