//! Output formatting for CLI commands.

use std::borrow::Cow;

use colored::Colorize;
use resv_resources::labels;
use resv_resources::ResourceDescriptor;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated header and rows.
    #[default]
    Tsv,
    /// Human-readable table format.
    Table,
    /// JSON format.
    Json,
}

/// Sink for status lines and resource listings.
pub trait Printer: Send + Sync {
    /// Emit a status line.
    fn message(&self, message: &str);

    /// Emit the reserved-resource listing.
    fn resources(&self, rows: &[ResourceRow]);

    /// Emit the executor resource listing.
    fn executor_resources(&self, rows: &[ExecutorResourceRow]);
}

/// One reserved resource as listed to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ResourceRow {
    #[tabled(rename = "Role")]
    pub role: String,

    #[tabled(rename = "Principal")]
    pub principal: String,

    #[tabled(rename = "FrameworkID")]
    pub framework_id: String,

    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    pub kind: String,

    #[tabled(rename = "Value")]
    pub value: String,

    #[tabled(rename = "ResourceID")]
    pub resource_id: String,

    #[tabled(rename = "PersistentID")]
    pub persistent_id: String,

    #[tabled(rename = "ContainerPath")]
    pub container_path: String,
}

impl ResourceRow {
    /// Describe a descriptor. Labels that cannot be decoded leave the id
    /// columns empty; listing never fails on them.
    pub fn from_descriptor(descriptor: &ResourceDescriptor) -> Self {
        let ids = labels::decode(descriptor.labels()).unwrap_or_default();

        Self {
            role: descriptor.role.clone(),
            principal: descriptor.principal().to_string(),
            framework_id: ids.framework_id,
            kind: descriptor.kind().to_string(),
            value: descriptor.display_value(),
            resource_id: ids.resource_id,
            persistent_id: descriptor.persistence_id().to_string(),
            container_path: descriptor.container_path().to_string(),
        }
    }
}

/// One executor resource as listed to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ExecutorResourceRow {
    #[tabled(rename = "ExecutorID")]
    pub executor_id: String,

    #[tabled(inline)]
    #[serde(flatten)]
    pub resource: ResourceRow,
}

/// Printer writing to stdout in the selected format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePrinter {
    format: OutputFormat,
}

impl ConsolePrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Printer for ConsolePrinter {
    fn message(&self, message: &str) {
        match self.format {
            OutputFormat::Table => println!("{} {}", "=>".green().bold(), message),
            // Keep stdout machine-readable.
            OutputFormat::Json => eprintln!("{}", message),
            OutputFormat::Tsv => println!("{}", message),
        }
    }

    fn resources(&self, rows: &[ResourceRow]) {
        println!("{}", render(rows, self.format));
    }

    fn executor_resources(&self, rows: &[ExecutorResourceRow]) {
        println!("{}", render(rows, self.format));
    }
}

/// Render rows in the given format.
pub fn render<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Tsv => render_tsv(rows),
        OutputFormat::Table => {
            if rows.is_empty() {
                format!("{}", "No items found.".dimmed())
            } else {
                Table::new(rows).to_string()
            }
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
        }
    }
}

fn render_tsv<T: Tabled>(rows: &[T]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_tabs(T::headers()));
    lines.extend(rows.iter().map(|row| join_tabs(row.fields())));
    lines.join("\n")
}

fn join_tabs(cells: Vec<Cow<'_, str>>) -> String {
    cells.join("\t")
}
