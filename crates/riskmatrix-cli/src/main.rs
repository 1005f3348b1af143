use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use riskmatrix_core::report::model::{MatrixSummary, ToolInfo};
use riskmatrix_core::report::render;
use riskmatrix_core::resolve::{
    InMemorySettingsSource, JsonFileSettingsSource, TenantSettingsSource,
};
use riskmatrix_core::{ColorValue, MatrixConfigResolver, TenantId, assess, classify};

mod args;

use args::{Args, Command, OutputFormat};

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let source: Arc<dyn TenantSettingsSource> = match &args.settings {
        Some(path) => Arc::new(JsonFileSettingsSource::new(path)),
        None => Arc::new(InMemorySettingsSource::new()),
    };
    let resolver = MatrixConfigResolver::new(source);
    let tenant = TenantId::new(args.tenant.as_str());

    match args.command {
        Command::Assess {
            risks,
            dimension,
            format,
            out,
            fail_on,
        } => {
            let inputs = riskmatrix_core::input::read_risk_inputs(&risks)?;
            let tool = ToolInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            };
            let report = assess(&resolver, &tenant, dimension, &inputs, tool);
            info!(
                tenant = %tenant,
                classified = report.risks.len(),
                skipped = report.distribution.skipped,
                "assessment complete"
            );

            let output = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&report)?,
                OutputFormat::Text => render::render_text(&report),
            };
            emit(&output, out.as_deref())?;

            if fail_on.is_some_and(|level| report.breaches(level)) {
                std::process::exit(1);
            }
        }
        Command::Classify {
            probability,
            impact,
            dimension,
            format,
        } => {
            let config = resolver.resolve(&tenant, dimension);
            let result = classify(probability, impact, &config);
            let output = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&result)?,
                OutputFormat::Text => format!(
                    "score {} [{}] row {} col {} {}",
                    result.score,
                    result.label,
                    result.position.row,
                    result.position.col,
                    result.color
                ),
            };
            emit(&output, None)?;
        }
        Command::Matrix { dimension, format } => {
            let config = resolver.resolve(&tenant, dimension);
            let output = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&MatrixSummary::from(&config))?,
                OutputFormat::Text => render::render_grid(&config),
            };
            emit(&output, None)?;
        }
        Command::Color { value } => {
            let color: ColorValue = value.parse()?;
            let output = serde_json::to_string_pretty(&serde_json::json!({
                "hex": color.to_hex(),
                "hsl": color.to_hsl().to_string(),
                "text": color.contrasting_text().to_hex(),
            }))?;
            emit(&output, None)?;
        }
    }

    Ok(())
}

fn emit(output: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", output.trim_end()),
    }
    Ok(())
}
