//! Shared helpers for the `tripdesk` operator CLI.

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;
use tripdesk_core::RemovalReport;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// JSON shape of a removal report, matching the HTTP response body.
pub fn report_json(report: &RemovalReport) -> serde_json::Value {
    let mut body = serde_json::json!({
        "ok": true,
        "removed": report.removed(),
    });
    let failures = report.failures();
    if !failures.is_empty() {
        body["cleanup_errors"] = serde_json::json!(failures);
    }
    body
}

/// One line per reference site, failures last.
pub fn format_report_table(media_id: &str, report: &RemovalReport) -> String {
    let mut out = format!("\n=== Media {} deleted ===\n\n", media_id);
    out.push_str(&format!("{:<24} {:>8}  {}\n", "SITE", "REMOVED", "ERROR"));
    out.push_str(&format!("{}\n", "-".repeat(72)));

    for (site, count) in report.removed() {
        let error = report
            .failures()
            .into_iter()
            .find(|f| f.site == site)
            .map(|f| truncate_string(&f.error, 38))
            .unwrap_or_default();
        out.push_str(&format!("{:<24} {:>8}  {}\n", site, count, error).trim_end());
        out.push('\n');
    }

    out.push_str(&format!("\nTotal rows changed: {}\n", report.total_removed()));
    if report.has_failures() {
        out.push_str(&format!(
            "Sites with errors: {} (the media row was still deleted)\n",
            report.failures().len()
        ));
    }
    out
}

/// Initialize tracing for the CLI. Logs go to stderr so stdout stays parseable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
