//! Output formatting helpers for CLI commands.

use crate::dispatch::{DispatchReport, DispatchStatus, StatusSummary};
use crate::routing::RoutingDecision;
use crate::store::TaskOutcome;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// Format a routing decision as a table.
pub fn format_decision_table(decision: &RoutingDecision) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Backend", "Confidence", "Justification", "Alternates"]);

    table.add_row(vec![
        Cell::new(&decision.backend),
        Cell::new(format!("{:.2}", decision.confidence)),
        Cell::new(&decision.justification),
        Cell::new(decision.alternates.join(", ")),
    ]);

    table.to_string()
}

/// Format a routing decision as JSON.
pub fn format_decision_json(decision: &RoutingDecision) -> String {
    serde_json::to_string_pretty(&json!({ "decision": decision })).unwrap_or_default()
}

/// Format a dispatch report for humans.
pub fn format_report(report: &DispatchReport) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Task:    {}", report.task_id));
    lines.push(format!(
        "Routed:  {} (confidence {:.2})",
        report.decision.backend, report.decision.confidence
    ));

    match &report.status {
        DispatchStatus::Completed {
            backend,
            content,
            duration_ms,
            cost_estimate,
        } => {
            lines.push(format!(
                "Status:  {} via {} in {}ms (est. ${:.4})",
                "completed".green(),
                backend,
                duration_ms,
                cost_estimate
            ));
            lines.push(String::new());
            lines.push(content.clone());
        }
        DispatchStatus::Blocked { reason } => {
            lines.push(format!("Status:  {}", "blocked".yellow()));
            lines.push(format!("Reason:  {}", reason));
        }
        DispatchStatus::Exhausted { attempts } => {
            lines.push(format!("Status:  {}", "failed".red()));
            for attempt in attempts {
                lines.push(format!("  {} -> {}", attempt.backend, attempt.error));
            }
        }
    }

    lines.join("\n")
}

/// Format a dispatch report as JSON.
pub fn format_report_json(report: &DispatchReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_default()
}

/// Format the orchestrator status as a table.
pub fn format_status_table(summary: &StatusSummary) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    let mode = if summary.fallback_enabled {
        "fallback".yellow().to_string()
    } else {
        "normal".green().to_string()
    };

    table.add_row(vec![Cell::new("Mode"), Cell::new(mode)]);
    table.add_row(vec![
        Cell::new("Reason"),
        Cell::new(summary.fallback_reason.as_deref().unwrap_or("-")),
    ]);
    table.add_row(vec![
        Cell::new("Rate limit until"),
        Cell::new(
            summary
                .rate_limit_until
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Active tasks"),
        Cell::new(summary.active_tasks),
    ]);
    table.add_row(vec![
        Cell::new("Completed tasks"),
        Cell::new(summary.completed_tasks),
    ]);
    table.add_row(vec![
        Cell::new("Unreported outcomes"),
        Cell::new(summary.unreported_outcomes),
    ]);

    table.to_string()
}

/// Format the orchestrator status as JSON.
pub fn format_status_json(summary: &StatusSummary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_default()
}

/// Format outcomes as a table.
pub fn format_outcomes_table(outcomes: &[TaskOutcome]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Task", "Backend", "Finished", "Success", "Duration", "Reported",
    ]);

    for outcome in outcomes {
        let success = if outcome.success {
            "yes".green().to_string()
        } else {
            "no".red().to_string()
        };
        table.add_row(vec![
            Cell::new(&outcome.id),
            Cell::new(&outcome.backend),
            Cell::new(outcome.finished_at.to_rfc3339()),
            Cell::new(success),
            Cell::new(format!("{}ms", outcome.duration_ms)),
            Cell::new(if outcome.reported { "yes" } else { "no" }),
        ]);
    }

    table.to_string()
}

/// Format outcomes as JSON.
pub fn format_outcomes_json(outcomes: &[TaskOutcome]) -> String {
    serde_json::to_string_pretty(&json!({ "outcomes": outcomes })).unwrap_or_default()
}
