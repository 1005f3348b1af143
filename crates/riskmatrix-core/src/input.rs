use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::classify::RiskInput;

/// Accepted layouts of a risk register file.
#[derive(Deserialize)]
#[serde(untagged)]
enum Register {
    Bare(Vec<RiskInput>),
    Wrapped { risks: Vec<RiskInput> },
}

/// Read a risk register: either a JSON array of records or an object with a
/// `risks` array.
pub fn read_risk_inputs(path: &Path) -> Result<Vec<RiskInput>> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read risk register: {}", path.display()))?;

    let register: Register = serde_json::from_slice(&bytes)
        .with_context(|| format!("invalid risk register: {}", path.display()))?;

    Ok(match register {
        Register::Bare(risks) | Register::Wrapped { risks } => risks,
    })
}
