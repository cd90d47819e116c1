use super::*;
use crate::foundation::error::SheetError;

fn info() -> DocumentInfo {
    DocumentInfo::new(64, 32, FrameIndex(3), FrameIndex(10))
}

#[test]
fn empty_config_resolves_to_document_defaults() {
    let cfg = ExportConfigDef::from_reader("{}".as_bytes()).unwrap().resolve(&info());
    assert_eq!(cfg, ExportConfig::for_document(&info()));
    assert_eq!(cfg.direction, PackDirection::RowMajor);
    assert_eq!(cfg.range_start, FrameIndex(3));
    assert_eq!(cfg.range_end, FrameIndex(10));
    assert_eq!(cfg.range_step, 1);
    assert_eq!(cfg.rows, 8);
    assert_eq!(cfg.columns, 8);
    assert!(!cfg.trim && !cfg.skip_blank && !cfg.only_keyframes && !cfg.skip_duplicate);
    assert_eq!(cfg.margin, Margin::default());
    cfg.validate().unwrap();
}

#[test]
fn explicit_fields_override_defaults() {
    let json = r#"{
        "direction": "vertical",
        "rows": 3,
        "range_start": 4,
        "range_end": 9,
        "range_step": 2,
        "trim": true,
        "skip_duplicate": true,
        "margin": { "left": 5, "right": 5 }
    }"#;
    let cfg = ExportConfigDef::from_reader(json.as_bytes())
        .unwrap()
        .resolve(&info());
    assert_eq!(cfg.direction, PackDirection::ColumnMajor);
    assert_eq!(cfg.grid_count(), 3);
    assert_eq!(cfg.columns, 8);
    assert_eq!(cfg.margin, Margin::new(5, 0, 5, 0).unwrap());

    let sel = cfg.selection().unwrap();
    assert_eq!(
        sel.span.iter().collect::<Vec<_>>(),
        vec![FrameIndex(4), FrameIndex(6), FrameIndex(8)]
    );
    assert!(sel.skip_duplicate);
    assert!(!sel.skip_blank);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = ExportConfigDef::from_reader(r#"{ "colums": 2 }"#.as_bytes()).unwrap_err();
    assert!(matches!(err, SheetError::Serde(_)));
}

#[test]
fn overlay_prefers_the_overriding_fields() {
    let base = ExportConfigDef {
        rows: Some(2),
        columns: Some(4),
        trim: Some(true),
        ..ExportConfigDef::default()
    };
    let flags = ExportConfigDef {
        columns: Some(6),
        skip_blank: Some(true),
        ..ExportConfigDef::default()
    };
    let merged = base.overlaid(flags);
    assert_eq!(merged.rows, Some(2));
    assert_eq!(merged.columns, Some(6));
    assert_eq!(merged.trim, Some(true));
    assert_eq!(merged.skip_blank, Some(true));
    assert_eq!(merged.direction, None);
}

#[test]
fn inverted_range_and_zero_step_are_invalid_ranges() {
    let mut cfg = ExportConfig::for_document(&info());
    cfg.range_start = FrameIndex(9);
    cfg.range_end = FrameIndex(4);
    assert!(matches!(cfg.validate(), Err(SheetError::InvalidRange(_))));

    let mut cfg = ExportConfig::for_document(&info());
    cfg.range_step = 0;
    assert!(matches!(cfg.validate(), Err(SheetError::InvalidRange(_))));
    assert!(cfg.selection().is_err());
}

#[test]
fn zero_grid_counts_and_wide_margins_fail_validation() {
    let mut cfg = ExportConfig::for_document(&info());
    cfg.rows = 0;
    assert!(matches!(cfg.validate(), Err(SheetError::Validation(_))));

    let mut cfg = ExportConfig::for_document(&info());
    cfg.columns = 0;
    assert!(matches!(cfg.validate(), Err(SheetError::Validation(_))));

    let mut cfg = ExportConfig::for_document(&info());
    cfg.margin.bottom = -1000;
    assert!(matches!(cfg.validate(), Err(SheetError::Validation(_))));
    cfg.margin.bottom = -999;
    cfg.validate().unwrap();
}

#[test]
fn range_is_checked_before_grid() {
    let mut cfg = ExportConfig::for_document(&info());
    cfg.rows = 0;
    cfg.range_step = 0;
    assert!(matches!(cfg.validate(), Err(SheetError::InvalidRange(_))));
}
