use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use riskmatrix_core::{MatrixDimension, RiskLevel};

#[derive(Debug, Parser)]
#[command(
    name = "riskmatrix",
    version,
    about = "Classify risks on tenant-configurable probability × impact matrices"
)]
pub struct Args {
    /// Tenant settings document (`{"<tenant>": {...}}`); built-in matrices if omitted
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Tenant whose matrix applies
    #[arg(long, global = true, default_value = "default")]
    pub tenant: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a risk register and summarize it per level
    Assess {
        /// JSON file holding an array of risks or `{"risks": [...]}`
        #[arg(long)]
        risks: PathBuf,

        /// Matrix size used when the tenant does not store one
        #[arg(long, value_parser = parse_dimension)]
        dimension: Option<MatrixDimension>,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Exit with status 1 if any risk reaches this level
        #[arg(long, value_parser = parse_level)]
        fail_on: Option<RiskLevel>,
    },

    /// Classify a single probability/impact pair
    Classify {
        #[arg(long, allow_negative_numbers = true)]
        probability: i32,

        #[arg(long, allow_negative_numbers = true)]
        impact: i32,

        #[arg(long, value_parser = parse_dimension)]
        dimension: Option<MatrixDimension>,

        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Print the tenant's effective matrix
    Matrix {
        #[arg(long, value_parser = parse_dimension)]
        dimension: Option<MatrixDimension>,

        #[arg(long, default_value = "json")]
        format: OutputFormat,
    },

    /// Convert a color between hex and HSL
    Color {
        /// `#rrggbb` or `h s% l%`
        value: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

fn parse_dimension(s: &str) -> Result<MatrixDimension, String> {
    let size: i64 = s
        .trim()
        .parse()
        .map_err(|_| format!("`{s}` is not a number"))?;
    MatrixDimension::new(size).map_err(|e| e.to_string())
}

fn parse_level(s: &str) -> Result<RiskLevel, String> {
    s.parse().map_err(|e: riskmatrix_core::error::ParseLevelError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_must_be_supported() {
        assert_eq!(parse_dimension("5"), Ok(MatrixDimension::Five));
        assert!(parse_dimension("6").is_err());
        assert!(parse_dimension("big").is_err());
    }

    #[test]
    fn fail_on_accepts_critical_alias() {
        assert_eq!(parse_level("critical"), Ok(RiskLevel::VeryHigh));
        assert_eq!(parse_level("High"), Ok(RiskLevel::High));
        assert!(parse_level("severe").is_err());
    }

    #[test]
    fn global_options_follow_subcommand() {
        let args = Args::try_parse_from([
            "riskmatrix",
            "classify",
            "--probability",
            "-1",
            "--impact",
            "9",
            "--tenant",
            "acme",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.tenant, "acme");
        assert_eq!(args.verbose, 2);
        assert!(matches!(
            args.command,
            Command::Classify {
                probability: -1,
                impact: 9,
                ..
            }
        ));
    }
}
