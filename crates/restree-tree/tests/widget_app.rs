use std::collections::BTreeMap;
use std::sync::Arc;

use restree_tree::{
    Child, ErrorKind, Manifest, NodeId, NodeType, NodeTypeId, Registry, ResourceTree, TreeError,
    Value,
};

/// Per-interaction state handed to every node.
struct Request {
    widget_db: BTreeMap<i64, String>,
}

impl Request {
    fn new() -> Self {
        let widget_db = [(1, "Widget 1"), (2, "Widget 2"), (5, "Widget 5")]
            .into_iter()
            .map(|(id, name)| (id, name.to_string()))
            .collect();
        Self { widget_db }
    }
}

struct App {
    registry: Arc<Registry<Request>>,
    root: NodeTypeId,
    widget: NodeTypeId,
}

fn widget_app() -> App {
    let mut registry = Registry::new();

    let root = registry
        .declare(
            NodeType::new("Root")
                .in_namespace("widgetapp")
                .with_child("widget", ".WidgetContainer"),
        )
        .unwrap();

    let widget = registry
        .declare(
            NodeType::new("Widget")
                .in_namespace("widgetapp")
                .with_property("widget", |node| {
                    let id = node.attribute("widget_id")?;
                    Ok(Value::from(format!("mywidget:{id}")))
                })
                .with_property("title", |node| {
                    let request: &Request = node.context()?;
                    let id = node.attribute("widget_id")?.as_i64().unwrap_or_default();
                    Ok(request
                        .widget_db
                        .get(&id)
                        .map_or(Value::Null, |name| Value::from(name.as_str())))
                }),
        )
        .unwrap();

    registry
        .declare(
            NodeType::new("WidgetContainer")
                .in_namespace("widgetapp")
                .with_dynamic_children(move |_node, key| {
                    let id: i64 = key.parse().map_err(|_| TreeError::not_found(key))?;
                    if !(0..10).contains(&id) {
                        return Err(TreeError::not_found(key));
                    }
                    Ok(Child::with(widget, [("widget_id", id)]))
                }),
        )
        .unwrap();

    assert_eq!(registry.resolve_pending().unwrap(), 1);

    App {
        registry: Arc::new(registry),
        root,
        widget,
    }
}

fn interaction(app: &App) -> (ResourceTree<Request>, NodeId) {
    let mut tree = ResourceTree::new(Arc::clone(&app.registry));
    let root = tree.create_root(app.root, Request::new()).unwrap();
    (tree, root)
}

#[test]
fn test_get_widget_id() {
    let app = widget_app();
    let (mut tree, root) = interaction(&app);

    let container = tree.lookup(root, "widget").unwrap();
    let widget = tree.lookup(container, "5").unwrap();

    assert_eq!(tree.node(widget).unwrap().type_id(), app.widget);
    assert_eq!(tree.resolve_attribute(widget, "widget_id").unwrap(), Value::from(5));
}

#[test]
fn test_get_widget() {
    let app = widget_app();
    let (mut tree, root) = interaction(&app);

    let widget = tree.resolve_path(root, "/widget/5/").unwrap();
    assert_eq!(
        tree.resolve_attribute(widget, "widget").unwrap(),
        Value::from("mywidget:5")
    );
    assert_eq!(
        tree.resolve_attribute(widget, "title").unwrap(),
        Value::from("Widget 5")
    );
}

#[test]
fn test_get_widget_not_found() {
    let app = widget_app();
    let (mut tree, root) = interaction(&app);

    let container = tree.lookup(root, "widget").unwrap();
    let err = tree.lookup(container, "15").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_get_widget_bad_id() {
    let app = widget_app();
    let (mut tree, root) = interaction(&app);

    let container = tree.lookup(root, "widget").unwrap();
    let err = tree.lookup(container, "abc").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(tree.resolve_path(root, "widget/not-an-int").unwrap_err().is_not_found());
}

#[test]
fn test_get_widget_list() {
    let app = widget_app();
    let (mut tree, root) = interaction(&app);

    let container = tree.lookup(root, "widget").unwrap();
    let mut paths = Vec::new();
    for id in [1, 2, 5] {
        let widget = tree.lookup(container, &id.to_string()).unwrap();
        paths.push(format!("/{}/", tree.path_segments(widget).unwrap().join("/")));
    }

    assert_eq!(paths, vec!["/widget/1/", "/widget/2/", "/widget/5/"]);
}

#[test]
fn test_widget_container_has_no_widget_id() {
    let app = widget_app();
    let (mut tree, root) = interaction(&app);

    let container = tree.lookup(root, "widget").unwrap();
    assert!(!tree.has_attribute(container, "widget_id").unwrap());
}

#[test]
fn test_manifest_app_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.toml");
    std::fs::write(
        &path,
        r#"
root = "site.Root"

[[resource]]
name = "Root"
namespace = "site"
children = { about = ".pages.About" }
attributes = { site_name = "Example" }

[[resource]]
name = "About"
namespace = "site.pages"
"#,
    )
    .unwrap();

    let manifest = Manifest::from_path(&path).unwrap();
    let mut registry: Registry<()> = Registry::new();
    registry.load_manifest(&manifest).unwrap();
    registry.resolve_pending().unwrap();
    let root_type = registry.manifest_root(&manifest).unwrap();

    let mut tree = ResourceTree::new(Arc::new(registry));
    let root = tree.create_root(root_type, ()).unwrap();
    let about = tree.lookup(root, "about").unwrap();

    assert_eq!(tree.node(about).unwrap().type_name(), "About");
    assert_eq!(
        tree.resolve_attribute(about, "site_name").unwrap(),
        Value::from("Example")
    );
}

#[test]
fn test_manifest_missing_file() {
    let err = Manifest::from_path("/definitely/not/here.toml").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}
