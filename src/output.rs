//! @ai:module:intent Format output for different formats (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_textgrid, format_check_report, render_error
//! @ai:module:depends_on textgrid, check, error
//! @ai:module:stateless true

use crate::check::CheckReport;
use crate::error::Error;
use crate::textgrid::{TextGrid, Tier};
use colored::Colorize;
use serde::{Deserialize, Serialize};

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Format a parsed TextGrid as a string
/// @ai:effects pure
pub fn format_textgrid(grid: &TextGrid, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(grid).unwrap_or_default(),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(grid).unwrap_or_default(),
        OutputFormat::Text => format_textgrid_text(grid),
    }
}

/// @ai:intent Format a parsed TextGrid as human-readable text
/// @ai:effects pure
fn format_textgrid_text(grid: &TextGrid) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} [{}, {}] ({} tiers)\n",
        "TextGrid".bold(),
        grid.xmin(),
        grid.xmax(),
        grid.len()
    ));

    for (idx, tier) in grid.tiers().iter().enumerate() {
        output.push_str(&format!(
            "\n  {} {} {} [{}, {}]\n",
            format!("{}.", idx + 1).dimmed(),
            tier.name().cyan(),
            tier.class_name().dimmed(),
            tier.xmin(),
            tier.xmax()
        ));

        match tier {
            Tier::Interval(t) => {
                for interval in t.intervals() {
                    output.push_str(&format!(
                        "    {:>10} - {:<10} {:?}\n",
                        interval.xmin(),
                        interval.xmax(),
                        interval.text()
                    ));
                }
            }
            Tier::Point(t) => {
                for point in t.points() {
                    output.push_str(&format!("    {:>10}   {:?}\n", point.time(), point.text()));
                }
            }
        }
    }

    output
}

/// @ai:intent Format check results as a string
/// @ai:effects pure
pub fn format_check_report(report: &CheckReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(report).unwrap_or_default(),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Text => format_check_report_text(report),
    }
}

fn format_check_report_text(report: &CheckReport) -> String {
    let mut output = String::new();

    for failure in &report.failures {
        let location = match failure.position {
            Some(position) => format!("{}:{}", failure.path.display(), position),
            None => failure.path.display().to_string(),
        };
        output.push_str(&format!(
            "{} {} - {}\n",
            "FAIL".red().bold(),
            location.dimmed(),
            failure.message
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Checked {} files, {} tiers\n",
        report.files_checked, report.tiers_checked
    ));

    if report.passed() {
        output.push_str(&format!("{} No issues found\n", "OK".green().bold()));
    } else {
        output.push_str(&format!(
            "{} files failed\n",
            report.failures.len().to_string().red().bold()
        ));
    }

    output
}

/// @ai:intent Render an error with the offending source line and a caret
/// @ai:effects pure
pub fn render_error(err: &Error, source: &str) -> String {
    let Some(position) = err.position() else {
        return format!("{} {}", "error:".red().bold(), err);
    };

    let line_text = source
        .lines()
        .nth(position.line.saturating_sub(1))
        .unwrap_or("");
    format!(
        "{} {}\n  {}\n  {}{}",
        "error:".red().bold(),
        err,
        line_text,
        " ".repeat(position.column.saturating_sub(1)),
        "^".red()
    )
}
