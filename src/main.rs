//! restree - walk hierarchical resource trees.
//!
//! Usage:
//!   restree walk [PATHS...]       Resolve paths against the demo app
//!   restree walk -m app.toml /a   Resolve paths against a manifest
//!   restree attr PATH NAME        Resolve an inherited attribute
//!   restree types                 List declared resource types
//!   restree --help                Show help

mod demo;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use restree_tree::{
    Attributes, ChildRef, Manifest, NodeTypeId, Registry, ResourceTree, TreeConfig,
};

use crate::demo::Request;

#[derive(Parser)]
#[command(
    name = "restree",
    version,
    about = "Walk hierarchical resource trees",
    long_about = "restree resolves paths one segment at a time through a tree of typed \
                  resources.\n\n\
                  Without a manifest the built-in widget catalogue is used."
)]
struct Cli {
    /// Tree configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resource manifest to load instead of the demo app
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    /// Qualified name of the root type (defaults to the app's own root)
    #[arg(short, long, global = true)]
    root: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one or more paths
    Walk {
        /// Paths to resolve
        #[arg(default_value = "/")]
        paths: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Resolve an attribute on the node at a path
    Attr {
        /// Path of the node
        path: String,

        /// Attribute name
        name: String,
    },

    /// List declared resource types
    Types,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// A resolved registry and the type used for roots.
struct App {
    registry: Arc<Registry<Request>>,
    root: NodeTypeId,
}

/// Outcome of resolving one path.
#[derive(Debug, Serialize)]
struct WalkReport {
    path: String,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    segments: Vec<String>,
    attributes: Attributes,
    properties: Attributes,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "restree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let app = load_app(cli.manifest.as_deref(), cli.root.as_deref())?;

    match cli.command {
        Command::Walk { paths, format } => run_walk(&app, &config, &paths, format)?,
        Command::Attr { path, name } => run_attr(&app, &config, &path, &name)?,
        Command::Types => run_types(&app),
    }

    Ok(())
}

/// Read the tree configuration from `path`, or from the user config
/// directory when present.
fn load_config(path: Option<&Path>) -> Result<TreeConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match dirs::config_dir().map(|dir| dir.join("restree").join("config.toml")) {
            Some(default) if default.is_file() => default,
            _ => return Ok(TreeConfig::default()),
        },
    };

    debug!(path = %path.display(), "loading tree config");
    let text = std::fs::read_to_string(&path)
        .wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
    TreeConfig::from_toml(&text).wrap_err("Invalid tree config")
}

/// Declare the application's types and run discovery.
fn load_app(manifest: Option<&Path>, root_name: Option<&str>) -> Result<App> {
    let mut registry = Registry::new();

    let default_root = match manifest {
        Some(path) => {
            let manifest = Manifest::from_path(path)
                .wrap_err_with(|| format!("Failed to load manifest {}", path.display()))?;
            registry.load_manifest(&manifest)?;
            manifest
                .root
                .is_some()
                .then(|| registry.manifest_root(&manifest))
                .transpose()?
        }
        None => Some(demo::declare(&mut registry)?),
    };

    let root = match root_name {
        Some(name) => registry
            .find(name)
            .ok_or_else(|| eyre!("Root type '{name}' is not declared"))?,
        None => default_root.ok_or_else(|| eyre!("Manifest declares no root type; pass --root"))?,
    };

    let resolved = registry
        .resolve_pending()
        .wrap_err("Resource discovery failed")?;
    info!(types = registry.len() - 1, resolved, "discovery complete");

    Ok(App {
        registry: Arc::new(registry),
        root,
    })
}

/// Build a fresh tree for one interaction and resolve `path` in it.
fn walk(app: &App, config: &TreeConfig, path: &str) -> Result<WalkReport> {
    let mut tree = ResourceTree::with_config(Arc::clone(&app.registry), config.clone());
    let root = tree.create_root(app.root, Request::new(path))?;

    let mut report = WalkReport {
        path: path.to_string(),
        found: false,
        resource: None,
        name: None,
        segments: Vec::new(),
        attributes: Attributes::new(),
        properties: Attributes::new(),
    };

    let id = match tree.resolve_path(root, path) {
        Ok(id) => id,
        Err(err) if err.is_not_found() => return Ok(report),
        Err(err) => return Err(err.into()),
    };

    let node = tree.node(id)?;
    let node_type = app.registry.get(node.type_id())?;

    report.found = true;
    report.resource = Some(node_type.qualified_name().to_string());
    report.name = Some(node.name().to_string());
    report.segments = tree
        .path_segments(id)?
        .into_iter()
        .map(str::to_string)
        .collect();
    report.attributes = node.attributes().clone();
    for name in node_type.property_names() {
        let value = tree.resolve_attribute(id, name)?;
        report.properties.insert(name.into(), value);
    }

    Ok(report)
}

/// Resolve every path concurrently, one tree per path.
fn run_walk(app: &App, config: &TreeConfig, paths: &[String], format: OutputFormat) -> Result<()> {
    let reports = paths
        .par_iter()
        .map(|path| walk(app, config, path))
        .collect::<Result<Vec<_>>>()?;

    match format {
        OutputFormat::Text => {
            for report in &reports {
                print_report(report);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    Ok(())
}

/// Resolve `name` on the node at `path` through its ancestors.
fn run_attr(app: &App, config: &TreeConfig, path: &str, name: &str) -> Result<()> {
    let mut tree = ResourceTree::with_config(Arc::clone(&app.registry), config.clone());
    let root = tree.create_root(app.root, Request::new(path))?;

    let id = tree
        .resolve_path(root, path)
        .wrap_err_with(|| format!("No resource at {path}"))?;

    let value = tree.resolve_attribute(id, name)?;
    println!("{value}");

    Ok(())
}

/// Print every declared type with its child table.
fn run_types(app: &App) {
    for (id, node_type) in app.registry.iter() {
        let state = if node_type.is_abstract() {
            "abstract"
        } else if node_type.is_resolved() {
            "resolved"
        } else {
            "pending"
        };
        println!("#{:<3} {} ({state})", id.0, node_type.qualified_name());

        for (key, child) in node_type.children() {
            let target = match child {
                ChildRef::Concrete(target) => app
                    .registry
                    .get(*target)
                    .map(|ty| ty.qualified_name().to_string())
                    .unwrap_or_else(|_| format!("#{}", target.0)),
                ChildRef::Symbolic(reference) => format!("{reference} (unresolved)"),
            };
            println!("       {key} -> {target}");
        }
        if node_type.child_source().is_some() {
            println!("       * -> <dynamic>");
        }

        let properties = node_type.property_names().join(", ");
        if !properties.is_empty() {
            println!("       properties: {properties}");
        }
    }
}

fn print_report(report: &WalkReport) {
    if !report.found {
        println!("{:<24} not found", report.path);
        return;
    }

    let resource = report.resource.as_deref().unwrap_or_default();
    let values = report
        .attributes
        .iter()
        .chain(report.properties.iter())
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| format!("{name}={value}"))
        .join(" ");
    println!("{:<24} {resource:<28} {values}", report.path);
}
