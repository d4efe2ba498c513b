use super::*;

#[test]
fn defaults_are_the_canonical_variant() {
    let cfg = RenderConfig::default();
    assert_eq!(cfg.reference_width, 1280.0);
    assert_eq!(cfg.scale_divisor, 1000.0);
    assert_eq!(cfg.anchor_margin_px, 20.0);
    assert_eq!(cfg.default_font_size, 72.0);
    cfg.validate().unwrap();
}

#[test]
fn compact_editor_only_changes_its_constants() {
    let cfg = RenderConfig::compact_editor();
    assert_eq!(cfg.scale_divisor, 250.0);
    assert_eq!(cfg.default_font_size, 120.0);
    assert_eq!(cfg.reference_width, RenderConfig::default().reference_width);
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg: RenderConfig = serde_json::from_str(r#"{"reference_width": 640}"#).unwrap();
    assert_eq!(cfg.reference_width, 640.0);
    assert_eq!(cfg.curve_min_radius, 80.0);
}

#[test]
fn validate_rejects_degenerate_values() {
    let cfg = RenderConfig {
        reference_width: 0.0,
        ..RenderConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = RenderConfig {
        plate_padding_px: -1.0,
        ..RenderConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn from_path_reads_json_file() {
    let path = std::env::temp_dir().join(format!("thumbforge-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"scale_divisor": 250, "history_limit": 3}"#).unwrap();
    let cfg = RenderConfig::from_path(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(cfg.scale_divisor, 250.0);
    assert_eq!(cfg.history_limit, 3);
}
