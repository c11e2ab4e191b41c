use proposal_layout::*;
use tempfile::NamedTempFile;

#[test]
fn test_default_options() {
    let options = LayoutOptions::default();
    assert_eq!(options.orders_start_row, 200);
    assert_eq!(options.header_row, 3);
    assert!(options.validate().is_ok());
}

#[test]
fn test_header_row_must_leave_first_marker_free() {
    let options = LayoutOptions {
        header_row: 1,
        ..Default::default()
    };
    assert!(matches!(options.validate(), Err(LayoutError::Config(_))));
}

#[test]
fn test_zero_start_row_rejected() {
    let options = LayoutOptions {
        orders_start_row: 0,
        ..Default::default()
    };
    assert!(options.validate().is_err());
}

#[tokio::test]
async fn test_options_save_load() {
    let mut options = LayoutOptions::default();
    options.orders_start_row = 5;
    options.template.footer[0][0] = "Valid for 3 days".to_string();

    let temp = NamedTempFile::new().unwrap();
    options.save(temp.path()).await.unwrap();

    let loaded = LayoutOptions::load(temp.path()).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_partial_options_fill_defaults() {
    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), r#"{ "header_row": 4 }"#).unwrap();

    let loaded = LayoutOptions::load(temp.path()).await.unwrap();
    assert_eq!(loaded.header_row, 4);
    assert_eq!(loaded.orders_start_row, 200);
    assert_eq!(loaded.template, ProposalTemplate::default());
}

#[tokio::test]
async fn test_malformed_options_are_config_errors() {
    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), "{ not json").unwrap();

    let result = LayoutOptions::load(temp.path()).await;
    assert!(matches!(result, Err(LayoutError::Config(_))));
}
