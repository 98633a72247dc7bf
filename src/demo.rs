//! Built-in demo application: a widget catalogue.
//!
//! ```text
//! /                 Root
//! /widget/          WidgetContainer
//! /widget/<id>/     Widget          (ids 0-9 present in the widget database)
//! /widget/<id>/foo  Foo
//! ```

use std::collections::BTreeMap;

use restree_tree::{
    Child, NodeType, NodeTypeId, NodeView, Registry, TreeError, TreeResult, Value,
};

/// Namespace the demo types are declared in.
pub const NAMESPACE: &str = "demo";

/// Per-interaction state handed to every node.
#[derive(Debug, Clone)]
pub struct Request {
    /// Path being served.
    pub path: String,
    /// Widget names by id.
    pub widget_db: WidgetDb,
}

impl Request {
    /// Create a request for `path` backed by the sample database.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            widget_db: WidgetDb::sample(),
        }
    }
}

/// An imitation of a widget database.
#[derive(Debug, Clone, Default)]
pub struct WidgetDb {
    widgets: BTreeMap<i64, String>,
}

impl WidgetDb {
    /// The sample catalogue.
    pub fn sample() -> Self {
        let widgets = [(1, "Widget 1"), (2, "Widget 2"), (5, "Widget 5")]
            .into_iter()
            .map(|(id, name)| (id, name.to_string()))
            .collect();
        Self { widgets }
    }

    /// Check if a widget exists.
    pub fn exists(&self, id: i64) -> bool {
        self.widgets.contains_key(&id)
    }

    /// Get a widget's name.
    pub fn find(&self, id: i64) -> Option<&str> {
        self.widgets.get(&id).map(String::as_str)
    }

    /// Ids of every widget.
    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.widgets.keys().copied()
    }
}

/// Declare the demo types and return the root type.
///
/// Symbolic children are left for the caller's discovery step.
pub fn declare(registry: &mut Registry<Request>) -> TreeResult<NodeTypeId> {
    let root = registry.declare(
        NodeType::new("Root")
            .in_namespace(NAMESPACE)
            .with_child("widget", ".WidgetContainer")
            .with_attribute("site_name", "Widget Catalogue")
            .with_property("request_path", |node: &NodeView<'_, Request>| {
                Ok(Value::from(node.context()?.path.as_str()))
            }),
    )?;

    let foo = registry.declare(NodeType::new("Foo").in_namespace(NAMESPACE))?;

    let widget = registry.declare(
        NodeType::new("Widget")
            .in_namespace(NAMESPACE)
            .with_child("foo", foo)
            .with_property("widget", |node| {
                let id = node.attribute("widget_id")?;
                Ok(Value::from(format!("mywidget:{id}")))
            })
            .with_property("title", |node: &NodeView<'_, Request>| {
                let request = node.context()?;
                let Some(id) = node.attribute("widget_id")?.as_i64() else {
                    return Ok(Value::Null);
                };
                Ok(request.widget_db.find(id).map_or(Value::Null, Value::from))
            }),
    )?;

    registry.declare(
        NodeType::new("WidgetContainer")
            .in_namespace(NAMESPACE)
            .with_property("widget_ids", |node: &NodeView<'_, Request>| {
                let request = node.context()?;
                Ok(Value::from(request.widget_db.ids().collect::<Vec<_>>()))
            })
            .with_dynamic_children(move |node, key| {
                let id: i64 = key.parse().map_err(|_| TreeError::not_found(key))?;
                if !(0..10).contains(&id) || !node.context()?.widget_db.exists(id) {
                    return Err(TreeError::not_found(key));
                }
                Ok(Child::with(widget, [("widget_id", id)]))
            }),
    )?;

    Ok(root)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use restree_tree::ResourceTree;

    use super::*;

    fn tree() -> (ResourceTree<Request>, restree_tree::NodeId) {
        let mut registry = Registry::new();
        let root_type = declare(&mut registry).unwrap();
        registry.resolve_pending().unwrap();
        let mut tree = ResourceTree::new(Arc::new(registry));
        let root = tree.create_root(root_type, Request::new("/")).unwrap();
        (tree, root)
    }

    #[test]
    fn test_demo_widget() {
        let (mut tree, root) = tree();
        let widget = tree.resolve_path(root, "widget/2").unwrap();
        assert_eq!(tree.resolve_attribute(widget, "title").unwrap(), Value::from("Widget 2"));
        assert_eq!(
            tree.resolve_attribute(widget, "site_name").unwrap(),
            Value::from("Widget Catalogue")
        );

        let foo = tree.lookup(widget, "foo").unwrap();
        assert_eq!(tree.resolve_attribute(foo, "widget_id").unwrap(), Value::from(2));
    }

    #[test]
    fn test_demo_missing_widget() {
        let (mut tree, root) = tree();
        assert!(tree.resolve_path(root, "widget/3").unwrap_err().is_not_found());
        assert!(tree.resolve_path(root, "widget/15").unwrap_err().is_not_found());
    }
}
