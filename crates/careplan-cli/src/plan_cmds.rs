//! CLI handlers that work on an already-generated plan.
//!
//! Implements:
//! - `careplan present <file>` -- process a raw plan and walk it day by day
//! - `careplan check <file|->` -- process a raw plan and summarize each day

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use careplan_core::disclosure::{
    Responder, SessionEnd, SessionReport, StdioResponder, benefit_section, consequence_section,
    preview_section, run_session,
};
use careplan_core::markers::REQUIRED_DAYS;
use careplan_core::plan::{ProcessedPlan, process_plan};

// -----------------------------------------------------------------------
// Input
// -----------------------------------------------------------------------

/// Read raw plan text from a file, or from stdin when `source` is `-`.
pub fn read_plan_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read plan from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(source).with_context(|| format!("failed to read plan file: {source}"))
}

/// Read and process a raw plan file.
pub fn load_plan(path: &Path) -> Result<ProcessedPlan> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read plan file: {}", path.display()))?;
    process_plan(raw).with_context(|| format!("plan in {} is not usable", path.display()))
}

// -----------------------------------------------------------------------
// careplan present <file>
// -----------------------------------------------------------------------

/// Run the disclosure session for `plan` against `responder`.
pub fn present(plan: &ProcessedPlan, responder: &mut dyn Responder) -> Result<SessionReport> {
    let report = run_session(&plan.days, responder).context("disclosure session aborted")?;
    Ok(report)
}

/// Run the disclosure session on the console and optionally save the report.
pub fn present_on_console(plan: &ProcessedPlan, save_report: Option<&Path>) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut responder = StdioResponder::new(stdin.lock(), stdout.lock());

    let report = present(plan, &mut responder)?;
    drop(responder);

    if let SessionEnd::Completed = report.end {
        println!("\nAll {} days reviewed.", report.days.len());
    }

    if let Some(path) = save_report {
        write_session_report(&report, path)?;
        eprintln!("Session report written to {}", path.display());
    }

    Ok(())
}

/// Write `report` as pretty-printed JSON.
pub fn write_session_report(report: &SessionReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize session report")?;
    std::fs::write(path, json)
        .with_context(|| format!("cannot write session report: {}", path.display()))
}

// -----------------------------------------------------------------------
// careplan check <file|->
// -----------------------------------------------------------------------

/// Process `raw` and write a per-day marker summary to `out`.
///
/// Fails (and writes nothing) when required days are missing.
pub fn run_check(raw: String, out: &mut dyn Write) -> Result<()> {
    let plan = process_plan(raw).context("plan failed validation")?;

    writeln!(out, "Plan OK: {} characters after cleanup.", plan.text.len())?;
    writeln!(out)?;

    let label_w = REQUIRED_DAYS.iter().map(|d| d.len()).max().unwrap_or(5);
    for label in REQUIRED_DAYS {
        let record = plan.days.get_or_empty(label);
        let body = record.body();
        writeln!(
            out,
            "  {label:<label_w$}  {} preview  {} benefit  {} consequence",
            flag(preview_section(body).is_some()),
            flag(benefit_section(body).is_some()),
            flag(consequence_section(body).is_some()),
        )?;
    }

    Ok(())
}

fn flag(present: bool) -> &'static str {
    if present { "[ok]" } else { "[--]" }
}
