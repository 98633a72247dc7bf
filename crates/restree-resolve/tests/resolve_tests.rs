use restree_resolve::{NameResolver, Namespace, NodeTypeId, Reference, SymbolTable, TreeError};

fn table() -> SymbolTable {
    let mut table = SymbolTable::new();
    for (name, id) in [
        ("Child", 1),
        ("app.Child", 2),
        ("app.views.Child", 3),
        ("app.views.Detail", 4),
        ("shared.Base", 5),
    ] {
        table.insert(name, NodeTypeId::new(id)).expect("unique name");
    }
    table
}

#[test]
fn test_bare_name_prefers_declaring_namespace() {
    let table = table();
    let ns = Namespace::new("app.views");

    assert_eq!(table.resolve("Child", &ns).unwrap(), NodeTypeId::new(3));
    assert_eq!(table.resolve("Detail", &ns).unwrap(), NodeTypeId::new(4));
}

#[test]
fn test_bare_name_falls_back_to_global() {
    let table = table();

    let id = table.resolve("shared.Base", &Namespace::new("app.views")).unwrap();
    assert_eq!(id, NodeTypeId::new(5));
    assert_eq!(table.resolve("Child", &Namespace::new("other")).unwrap(), NodeTypeId::new(1));
}

#[test]
fn test_leading_dots_walk_up_namespaces() {
    let table = table();
    let ns = Namespace::new("app.views");

    assert_eq!(table.resolve(".Child", &ns).unwrap(), NodeTypeId::new(3));
    assert_eq!(table.resolve("..Child", &ns).unwrap(), NodeTypeId::new(2));
    assert_eq!(table.resolve("...Child", &ns).unwrap(), NodeTypeId::new(1));
}

#[test]
fn test_dots_past_root_still_try_global() {
    let table = table();
    let id = table.resolve(".....Child", &Namespace::new("app")).unwrap();
    assert_eq!(id, NodeTypeId::new(1));
}

#[test]
fn test_resolution_failure_names_reference() {
    let table = table();
    let err = table.resolve(".Missing", &Namespace::new("app")).unwrap_err();

    match &err {
        TreeError::NameResolution {
            reference,
            namespace,
        } => {
            assert_eq!(reference, ".Missing");
            assert_eq!(namespace, "app");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains(".Missing"));
}

#[test]
fn test_malformed_references() {
    let table = table();
    let ns = Namespace::root();

    for reference in ["", "...", "app..Child", "Child."] {
        assert!(Reference::parse(reference).is_none(), "{reference:?}");
        assert!(table.resolve(reference, &ns).is_err(), "{reference:?}");
    }
}

#[test]
fn test_closure_resolver() {
    let resolver = |name: &str| (name == "plugins.Widget").then_some(NodeTypeId::new(9));

    let id = resolver.resolve(".Widget", &Namespace::new("plugins")).unwrap();
    assert_eq!(id, NodeTypeId::new(9));
    assert!(resolver.resolve("Widget", &Namespace::root()).is_err());
}

#[test]
fn test_duplicate_names_rejected() {
    let mut table = table();
    let err = table.insert("app.Child", NodeTypeId::new(10)).unwrap_err();
    assert!(matches!(err, TreeError::DuplicateType { .. }));
    assert_eq!(table.len(), 5);
}
