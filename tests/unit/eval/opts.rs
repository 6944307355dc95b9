use super::*;

#[test]
fn defaults_allow_the_global_maximum() {
    let opts = EvalOpts::default();
    assert_eq!(opts.max_dimension, MAX_DIMENSION);
    assert!(opts.search_paths.is_empty());
    assert!(opts.validate().is_ok());
}

#[test]
fn json_fills_missing_fields_with_defaults() {
    let opts = EvalOpts::from_json(r#"{ "search_paths": ["/a", "b"] }"#).unwrap();
    assert_eq!(opts.search_paths, vec![PathBuf::from("/a"), PathBuf::from("b")]);
    assert_eq!(opts.background, None);
    assert_eq!(opts.max_dimension, MAX_DIMENSION);
}

#[test]
fn json_rejects_bad_types_and_limits() {
    assert!(matches!(
        EvalOpts::from_json(r#"{ "search_paths": "not a list" }"#),
        Err(RasterError::Validation(_))
    ));
    assert!(EvalOpts::from_json(r#"{ "max_dimension": 0 }"#).is_err());
    assert!(EvalOpts::from_json(r#"{ "max_dimension": 99999 }"#).is_err());
}

#[test]
fn from_path_reads_a_file() {
    let path = std::env::temp_dir().join(format!("rastermark_opts_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "background": "bg.png", "max_dimension": 64 }"#).unwrap();
    let opts = EvalOpts::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(opts.background, Some(PathBuf::from("bg.png")));
    assert_eq!(opts.max_dimension, 64);

    assert!(matches!(
        EvalOpts::from_path(Path::new("/definitely/not/here.json")),
        Err(RasterError::Other(_))
    ));
}

#[test]
fn sizes_must_be_positive_and_within_limit() {
    let opts = EvalOpts {
        max_dimension: 100,
        ..EvalOpts::default()
    };
    let size = |raw: &str| opts.size_from(&Attributes::parse(raw).unwrap());
    assert_eq!(size(r#"width=10 height="0x20""#), Some((10, 32)));
    assert_eq!(size("width=100 height=1"), Some((100, 1)));
    assert_eq!(size("width=101 height=1"), None);
    assert_eq!(size("width=0 height=5"), None);
    assert_eq!(size("width=-4 height=5"), None);
    assert_eq!(size("width=5"), None);
}
