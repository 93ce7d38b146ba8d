use super::*;

const MINIMAL: &str = r#"
paper:
  width: 800
  height: 1000
  margin_top: 100
  margin_bottom: 100
  margin_left: 50
  margin_right: 50
  line_height: 80
handwriting:
  size: 40
"#;

#[test]
fn minimal_yaml_fills_defaults() {
    let cfg = Config::from_yaml_str(MINIMAL).unwrap();
    assert_eq!(cfg.paper.max_chars_per_line, 80);
    assert_eq!(cfg.paper.template, None);
    assert_eq!(cfg.paper.rule_color, Rgb8::new(200, 200, 220));
    assert_eq!(cfg.handwriting.color, Rgb8::new(0, 51, 153));
    assert!(cfg.handwriting.variations);
    assert_eq!(cfg.handwriting.variation_params.rotation, 1.5);
    assert_eq!(cfg.handwriting.variation_params.jitter, 2.0);
    assert_eq!(cfg.handwriting.variation, GlyphVariation::default());
    assert_eq!(cfg.output, OutputConfig::default());
    assert_eq!(cfg.assets_dir, PathBuf::from("assets"));
}

#[test]
fn full_yaml_round_trips_known_keys() {
    let text = r#"
paper:
  template: "a4_lined.png"
  width: 2480
  height: 3508
  margin_top: 200
  margin_bottom: 200
  margin_left: 200
  margin_right: 200
  line_height: 100
  max_chars_per_line: 60
handwriting:
  default_font: "handwriting_regular.ttf"
  fonts:
    - name: "regular"
      file: "handwriting_regular.ttf"
    - name: "neat"
      file: "handwriting_neat.ttf"
  size: 60
  color: [0, 0, 0]
  variations: false
  variation_params: { rotation: 0.5, jitter: 1 }
output:
  format: "JPEG"
  dpi: 150
  quality: 80
"#;
    let cfg = Config::from_yaml_str(text).unwrap();
    assert_eq!(cfg.paper.template.as_deref(), Some("a4_lined.png"));
    assert_eq!(cfg.paper.max_chars_per_line, 60);
    assert_eq!(cfg.handwriting.fonts.len(), 2);
    assert_eq!(cfg.handwriting.color, Rgb8::new(0, 0, 0));
    assert!(!cfg.handwriting.variations);
    assert_eq!(cfg.handwriting.variation_params.jitter, 1.0);
    assert_eq!(cfg.output.format, OutputFormat::Jpeg);
    assert_eq!(cfg.output.quality, 80);
}

#[test]
fn json_is_accepted() {
    let text = r#"{
      "paper": { "width": 100, "height": 100, "margin_top": 0, "margin_bottom": 0,
                 "margin_left": 0, "margin_right": 0, "line_height": 10 },
      "handwriting": { "size": 12 },
      "output": { "format": "png" }
    }"#;
    let cfg = Config::from_json_str(text).unwrap();
    assert_eq!(cfg.output.format, OutputFormat::Png);
}

#[test]
fn missing_required_key_names_the_key() {
    let text = MINIMAL.replace("  line_height: 80\n", "");
    let err = Config::from_yaml_str(&text).unwrap_err();
    assert!(err.to_string().contains("line_height"), "{err}");
}

#[test]
fn validation_reports_precise_paths() {
    let mut cfg = Config::from_yaml_str(MINIMAL).unwrap();
    cfg.paper.line_height = 0;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("$.paper.line_height"), "{err}");

    let mut cfg = Config::from_yaml_str(MINIMAL).unwrap();
    cfg.output.quality = 0;
    assert!(cfg.validate().unwrap_err().to_string().contains("$.output.quality"));

    let mut cfg = Config::from_yaml_str(MINIMAL).unwrap();
    cfg.handwriting.variation_params.jitter = -1.0;
    assert!(
        cfg.validate()
            .unwrap_err()
            .to_string()
            .contains("variation_params.jitter")
    );
}

#[test]
fn duplicate_style_names_are_rejected() {
    let mut cfg = Config::from_yaml_str(MINIMAL).unwrap();
    for _ in 0..2 {
        cfg.handwriting.fonts.push(FontEntry {
            name: "regular".to_string(),
            file: "a.ttf".to_string(),
        });
    }
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("fonts[1].name"), "{err}");
}

#[test]
fn margins_may_consume_the_whole_height() {
    let mut cfg = Config::from_yaml_str(MINIMAL).unwrap();
    cfg.paper.margin_top = 600;
    cfg.paper.margin_bottom = 600;
    cfg.validate().unwrap();
}

#[test]
fn from_path_resolves_assets_dir_next_to_config() {
    let dir = std::env::temp_dir().join(format!("scrawl_cfg_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.yaml");
    std::fs::write(&path, MINIMAL).unwrap();

    let cfg = Config::from_path(&path).unwrap();
    assert_eq!(cfg.assets_dir, dir.join("assets"));
    assert_eq!(cfg.fonts_dir(), dir.join("assets").join("fonts"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn from_path_missing_file_is_an_error() {
    let err = Config::from_path(Path::new("definitely/not/here.yaml")).unwrap_err();
    assert!(err.to_string().contains("read config"), "{err}");
}

#[test]
fn output_format_ignores_case() {
    for (name, want) in [
        ("pNg", OutputFormat::Png),
        ("Jpg", OutputFormat::Jpeg),
        ("jPeG", OutputFormat::Jpeg),
    ] {
        let text = format!("{MINIMAL}output:\n  format: {name}\n");
        let cfg = Config::from_yaml_str(&text).unwrap();
        assert_eq!(cfg.output.format, want, "{name}");
    }
}

#[test]
fn unknown_output_format_is_rejected() {
    let text = format!("{MINIMAL}output:\n  format: gif\n");
    let err = Config::from_yaml_str(&text).unwrap_err();
    assert!(err.to_string().contains("unknown output format 'gif'"), "{err}");
}

#[test]
fn output_format_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&OutputFormat::Jpeg).unwrap(), "\"jpeg\"");
}
