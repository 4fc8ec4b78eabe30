//! CLI handlers that talk to the generation service.
//!
//! Implements:
//! - `careplan generate --report <file>` -- generate and print a cleaned plan
//! - `careplan run --report <file>`      -- generate, then present interactively

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};

use careplan_core::generator::{ChatCompletionsClient, GenerateError, GeneratorConfig};
use careplan_core::plan::{ProcessedPlan, generate_plan};

use crate::config::CareplanConfig;
use crate::plan_cmds;

/// Read the patient report, check the service is reachable, and produce a
/// processed plan.
async fn generate_from_report(config: &CareplanConfig, report_path: &Path) -> Result<ProcessedPlan> {
    let report = std::fs::read_to_string(report_path)
        .with_context(|| format!("failed to read report file: {}", report_path.display()))?;
    if report.trim().is_empty() {
        bail!("report file {} is empty", report_path.display());
    }

    let client = match ChatCompletionsClient::new(config.generator.clone()) {
        Err(GenerateError::MissingApiKey) => bail!(
            "no API key configured; pass --api-key, set CAREPLAN_API_KEY, or run `careplan init`"
        ),
        other => other.context("failed to build generation client")?,
    };

    if !client.probe(GeneratorConfig::DEFAULT_PROBE_MODEL).await
        && !client.probe(&config.generator.model).await
    {
        bail!(
            "generation service at {} is not reachable",
            config.generator.base_url
        );
    }

    let plan = generate_plan(&client, &report)
        .await
        .context("failed to produce a usable care plan")?;
    Ok(plan)
}

// -----------------------------------------------------------------------
// careplan generate
// -----------------------------------------------------------------------

pub async fn run_generate(
    config: &CareplanConfig,
    report_path: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let plan = generate_from_report(config, report_path).await?;

    let mut writer: Box<dyn Write> = if let Some(path) = output {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {}", path.display()))?,
        )
    } else {
        Box::new(std::io::stdout().lock())
    };
    writeln!(writer, "{}", plan.text)?;
    writer.flush()?;

    if let Some(path) = output {
        eprintln!("Plan written to {}", path.display());
    }
    Ok(())
}

// -----------------------------------------------------------------------
// careplan run
// -----------------------------------------------------------------------

pub async fn run_interactive(
    config: &CareplanConfig,
    report_path: &Path,
    save_report: Option<&Path>,
) -> Result<()> {
    let plan = generate_from_report(config, report_path).await?;
    plan_cmds::present_on_console(&plan, save_report)
}
