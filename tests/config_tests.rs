use std::io::Write;

use monitor_reveal::config::SceneConfig;

#[test]
fn empty_document_yields_defaults() {
    let cfg: SceneConfig = serde_yaml::from_str("{}").expect("parse empty config");
    assert_eq!(cfg.projection.yaw_max_deg, -28.0);
    assert_eq!(cfg.projection.pitch_max_deg, -18.0);
    assert_eq!(cfg.projection.focal_length, 2400.0);
    assert_eq!(cfg.scroll.max_scroll_factor, 0.65);
    assert_eq!(cfg.scroll.narrow_viewport_max, 640.0);
    assert_eq!(cfg.render.neck_segments, 32);
    assert_eq!(cfg.render.base_segments, 64);
    assert_eq!(cfg.render.texture_grid, 6);
    cfg.validated().expect("defaults must validate");
}

#[test]
fn kebab_case_overrides_apply() {
    let yaml = r#"
projection:
  focal-length: 1800
  yaw-max-deg: -20
scroll:
  max-scroll-factor: 0.5
  translate-y-start: 48
render:
  texture-grid: 8
"#;
    let cfg: SceneConfig = serde_yaml::from_str(yaml).expect("parse overrides");
    assert_eq!(cfg.projection.focal_length, 1800.0);
    assert_eq!(cfg.projection.yaw_max_deg, -20.0);
    // Untouched siblings keep their defaults.
    assert_eq!(cfg.projection.pitch_max_deg, -18.0);
    assert_eq!(cfg.scroll.max_scroll_factor, 0.5);
    assert_eq!(cfg.scroll.translate_y_start, 48.0);
    assert_eq!(cfg.render.texture_grid, 8);
    cfg.validated().expect("overrides must validate");
}

#[test]
fn unknown_fields_are_rejected() {
    let yaml = "projection:\n  focal-distance: 1800\n";
    assert!(serde_yaml::from_str::<SceneConfig>(yaml).is_err());
}

#[test]
fn validation_rejects_bad_values() {
    let cases = [
        "projection:\n  focal-length: 0\n",
        "projection:\n  depth-offset: -5\n",
        "scroll:\n  max-scroll-factor: 0\n",
        "scroll:\n  scale-start: -1\n",
        "render:\n  neck-segments: 3\n",
        "render:\n  base-segments: 2\n",
        "render:\n  texture-grid: 0\n",
    ];
    for yaml in cases {
        let cfg: SceneConfig = serde_yaml::from_str(yaml).expect("parse");
        assert!(cfg.validated().is_err(), "expected rejection for {yaml:?}");
    }
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "render:\n  neck-segments: 16").expect("write config");

    let cfg = SceneConfig::from_yaml_file(file.path()).expect("load config");
    assert_eq!(cfg.render.neck_segments, 16);
    cfg.validated().expect("validate");
}

#[test]
fn missing_file_reports_path() {
    let err = SceneConfig::from_yaml_file(std::path::Path::new("/nonexistent/scene.yaml"))
        .expect_err("missing file must fail");
    assert!(format!("{err:#}").contains("/nonexistent/scene.yaml"));
}
