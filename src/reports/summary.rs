//! Summary and table report generators for shell output.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::changes::{Change, ChangeKind};
use crate::codec::ChangeCodec;
use crate::diff::Diff;
use crate::metamodel::{ClassKind, MetadataSource, TypeMapper};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

fn plural(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

/// Summary reporter for shell output
#[derive(Debug, Default)]
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: false }
    }

    /// Enable or disable colored output
    #[must_use]
    pub const fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn count_line(&self, lines: &mut Vec<String>, count: usize, sign: &str, color: &str, label: &str) {
        if count > 0 {
            lines.push(format!(
                "  {} {label}",
                self.color(&format!("{sign}{count}"), color)
            ));
        }
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_diff_report(
        &self,
        diff: &Diff,
        _codec: &ChangeCodec<'_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let summary = &diff.summary;
        let mut lines = Vec::new();

        lines.push(self.color("Graph Diff Summary", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));
        if summary.pairs_compared > 0 {
            lines.push(format!(
                "{}  {} node {}",
                self.color("Compared:", "cyan"),
                summary.pairs_compared,
                plural(summary.pairs_compared, "pair", "pairs")
            ));
        }
        if let Some(metadata) = &config.commit_metadata {
            lines.push(format!(
                "{}  {} by {}",
                self.color("Commit:", "cyan"),
                metadata.id,
                metadata.author
            ));
        }
        lines.push(String::new());

        lines.push(self.color("Changes:", "bold"));
        self.count_line(&mut lines, summary.objects_added, "+", "green", "new objects");
        self.count_line(&mut lines, summary.objects_removed, "-", "red", "removed objects");
        self.count_line(&mut lines, summary.values_changed, "~", "yellow", "values changed");
        self.count_line(&mut lines, summary.values_added, "+", "green", "collection elements added");
        self.count_line(&mut lines, summary.values_removed, "-", "red", "collection elements removed");
        self.count_line(&mut lines, summary.references_changed, "~", "yellow", "references changed");
        self.count_line(&mut lines, summary.maps_changed, "~", "yellow", "maps changed");
        if summary.has_changes() {
            lines.push(format!(
                "  {} {} across {} {}",
                summary.total_changes,
                plural(summary.total_changes, "change", "changes"),
                summary.objects_changed,
                plural(summary.objects_changed, "object", "objects")
            ));
        } else {
            lines.push(format!("  {}", self.color("No changes", "dim")));
        }

        Ok(lines.join("\n"))
    }

    fn generate_metamodel_report(
        &self,
        mapper: &TypeMapper,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        lines.push(self.color("Metamodel", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        for class in mapper.classes() {
            let kind = match class.kind() {
                ClassKind::Entity { id_property, .. } => format!("entity, id: {id_property}"),
                ClassKind::ValueObject => "value object".to_string(),
            };
            lines.push(format!("{} ({kind})", self.color(class.name(), "cyan")));
            for property in mapper.properties_of(class) {
                lines.push(format!(
                    "  {:<20} {:<32} {}",
                    property.name(),
                    property.declared_type().to_string(),
                    self.color(property.category().name(), "dim")
                ));
            }
        }
        if mapper.is_empty() {
            lines.push(format!("  {}", self.color("No classes", "dim")));
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

/// Compact reporter printing one line per change
#[derive(Debug, Default)]
pub struct TableReporter {
    /// Use colored output
    colored: bool,
}

impl TableReporter {
    /// Create a new table reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: false }
    }

    /// Enable or disable colored output
    #[must_use]
    pub const fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn status(&self, change: &Change) -> String {
        let (label, color) = match change.kind() {
            ChangeKind::NewObject => ("+ New", "green"),
            ChangeKind::ObjectRemoved => ("- Removed", "red"),
            ChangeKind::ValueAdded { .. } => ("+ Added", "green"),
            ChangeKind::ValueRemoved { .. } => ("- Removed", "red"),
            ChangeKind::ValueChanged { .. }
            | ChangeKind::ReferenceChanged { .. }
            | ChangeKind::MapChanged { .. } => ("~ Changed", "yellow"),
        };
        self.color(&format!("{label:<12}"), color)
    }
}

impl ReportGenerator for TableReporter {
    fn generate_diff_report(
        &self,
        diff: &Diff,
        _codec: &ChangeCodec<'_>,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        lines.push(format!(
            "{:<12} {:<16} {:<28} {:<16}",
            "STATUS", "TYPE", "OBJECT", "PROPERTY"
        ));
        lines.push("─".repeat(75));

        for change in &diff.changes {
            lines.push(format!(
                "{} {:<16} {:<28} {:<16}",
                self.status(change),
                change.kind().type_name(),
                change.global_id().to_string(),
                change.property().unwrap_or("-")
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "{} changes across {} objects",
            diff.summary.total_changes, diff.summary.objects_changed
        ));
        Ok(lines.join("\n"))
    }

    fn generate_metamodel_report(
        &self,
        mapper: &TypeMapper,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        lines.push(format!(
            "{:<20} {:<20} {:<32} {:<16}",
            "CLASS", "PROPERTY", "TYPE", "CATEGORY"
        ));
        lines.push("─".repeat(88));
        for class in mapper.classes() {
            for property in mapper.properties_of(class) {
                lines.push(format!(
                    "{:<20} {:<20} {:<32} {:<16}",
                    class.name(),
                    property.name(),
                    property.declared_type().to_string(),
                    property.category().name()
                ));
            }
        }
        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}
