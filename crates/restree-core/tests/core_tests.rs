use restree_core::{Attributes, ErrorKind, NodeId, NodeTypeId, TreeConfig, TreeError, Value};

#[test]
fn test_id_operations() {
    let id = NodeId::new(7);
    assert_eq!(id.0, 7);
    assert_eq!(id.index(), 7);

    assert!(NodeTypeId::BASE.is_base());
    assert!(!NodeTypeId::new(3).is_base());
    assert_eq!(NodeTypeId::new(3).index(), 3);
}

#[test]
fn test_value_from_json() {
    let value: Value = serde_json::from_str(r#"{"id": 5, "tags": ["a", "b"], "live": true}"#)
        .expect("valid json");

    let obj = value.as_object().expect("object");
    assert_eq!(obj.get("id").and_then(Value::as_i64), Some(5));
    assert_eq!(obj.get("live").and_then(Value::as_bool), Some(true));
    assert_eq!(obj.get("tags").and_then(Value::as_array).map(<[Value]>::len), Some(2));

    // Insertion order survives.
    let keys: Vec<_> = obj.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["id", "tags", "live"]);
}

#[test]
fn test_value_display_nested() {
    let mut obj = Attributes::new();
    obj.insert("name".into(), Value::from("Widget 5"));
    obj.insert("ids".into(), Value::from(vec![1i64, 2]));

    assert_eq!(Value::from(obj).to_string(), r#"{"name": "Widget 5", "ids": [1, 2]}"#);
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::from(NodeTypeId::new(4)).to_string(), "<type #4>");
}

#[test]
fn test_error_kinds() {
    let cases = [
        (TreeError::not_found("15"), ErrorKind::NotFound),
        (TreeError::invalid_child(Value::from(42i64)), ErrorKind::InvalidChild),
        (
            TreeError::NotAttached {
                type_name: "Widget".into(),
            },
            ErrorKind::IllegalState,
        ),
        (
            TreeError::NameResolution {
                reference: ".Missing".into(),
                namespace: "app".into(),
            },
            ErrorKind::NameResolution,
        ),
        (
            TreeError::PrivateAttribute {
                type_name: "Child".into(),
                name: "_secret".into(),
            },
            ErrorKind::AttributeNotFound,
        ),
    ];

    for (err, kind) in cases {
        assert_eq!(err.kind(), kind, "{err}");
    }
}

#[test]
fn test_invalid_child_names_value() {
    let err = TreeError::invalid_child(Value::from("oops"));
    assert!(err.to_string().contains("\"oops\""));
}

#[test]
fn test_config_from_toml() {
    let config = TreeConfig::from_toml("private_prefix = \"__\"\nmax_depth = 4\n")
        .expect("valid config");
    assert_eq!(config.private_prefix, "__");
    assert_eq!(config.max_depth, Some(4));
    assert!(config.is_private("__hidden"));
    assert!(!config.is_private("_shown"));
    assert!(config.allows_depth(4));
    assert!(!config.allows_depth(5));
}

#[test]
fn test_config_defaults_from_empty_toml() {
    let config = TreeConfig::from_toml("").expect("empty config");
    assert_eq!(config.private_prefix, "_");
    assert!(config.max_depth.is_none());
    assert!(config.allows_depth(u32::MAX));
}

#[test]
fn test_config_rejects_bad_input() {
    let err = TreeConfig::from_toml("private_prefix = \"\"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    let err = TreeConfig::from_toml("max_depth = \"deep\"").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_config_builder() {
    let config = TreeConfig::builder()
        .private_prefix("~")
        .max_depth(Some(2))
        .build()
        .expect("valid builder");
    assert!(config.is_private("~x"));
    assert_eq!(config.max_depth, Some(2));

    assert!(TreeConfig::builder().private_prefix("").build().is_err());
}
