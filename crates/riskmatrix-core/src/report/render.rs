use std::fmt::Write;

use crate::TOOL_NAME;
use crate::matrix::MatrixConfig;
use crate::report::model::RiskReport;

pub fn render_text(report: &RiskReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", TOOL_NAME, report.tool.version);
    let _ = writeln!(
        out,
        "Tenant: {} ({} matrix, {:?})",
        report.tenant, report.matrix.dimension, report.matrix.source
    );
    out.push_str("Levels:\n");
    for t in &report.matrix.thresholds {
        let _ = writeln!(
            out,
            "  - {:<10} {:>2}..={:<2} {}",
            t.label, t.min_score, t.max_score, t.color
        );
    }
    out.push_str("Distribution:\n");
    for c in &report.distribution.counts {
        let _ = writeln!(out, "  - {:<10} {}", c.label, c.count);
    }
    if report.distribution.skipped > 0 {
        let _ = writeln!(out, "  ({} incomplete records skipped)", report.distribution.skipped);
    }
    out.push_str("Risks:\n");
    for r in &report.risks {
        let c = &r.classification;
        let _ = writeln!(
            out,
            "  - {} score {} [{}] row {} col {}",
            r.id.as_deref().unwrap_or("-"),
            c.score,
            c.label,
            c.position.row,
            c.position.col
        );
    }
    out
}

/// The matrix as a grid of scores, highest impact on top.
pub fn render_grid(config: &MatrixConfig) -> String {
    let mut out = String::new();
    for row in config.grid() {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| format!("{:>3} {:<10}", cell.score, cell.label))
            .collect();
        let _ = writeln!(out, "{}", cells.join(" | ").trim_end());
    }
    out
}
