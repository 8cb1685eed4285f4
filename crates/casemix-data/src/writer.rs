//! Export of verification results and plain-text summary reports.
//!
//! The exported file is tab-delimited like the input: a leading `note`
//! column followed by the verified table's columns in their original order.

use std::io::Write;
use std::path::Path;

use casemix_core::error::Result;
use casemix_core::formatting::{format_number, format_rupiah};
use casemix_core::models::VerificationResult;
use tracing::{info, warn};

use crate::aggregator::{ClaimSummary, CodeFrequency};
use crate::reader::DELIMITER;

/// Default file name offered for exports.
pub const DEFAULT_EXPORT_NAME: &str = "hasil_verifikasi.txt";

/// Write `result` as TSV to `out`.
pub fn write_verification_to<W: Write>(result: &VerificationResult, out: &mut W) -> Result<()> {
    write_record(out, result.export_header())?;
    for idx in 0..result.len() {
        write_record(out, result.export_record(idx))?;
    }
    out.flush()?;
    Ok(())
}

/// Write `result` as TSV to `path`, creating parent directories if needed.
///
/// The file is written to a temporary sibling first and renamed into place.
/// On failure the temporary file is removed and `path` is left untouched.
pub fn write_verification(result: &VerificationResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("tmp");
    let written = write_file(result, &tmp).and_then(|()| {
        std::fs::rename(&tmp, path)?;
        Ok(())
    });
    if let Err(e) = written {
        if let Err(cleanup) = std::fs::remove_file(&tmp) {
            warn!("could not remove {}: {cleanup}", tmp.display());
        }
        return Err(e);
    }

    info!("Exported {} flagged rows to {}", result.len(), path.display());
    Ok(())
}

fn write_file(result: &VerificationResult, path: &Path) -> Result<()> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_verification_to(result, &mut out)
}

/// Render `summary` as a plain-text report.
pub fn render_report(summary: &ClaimSummary) -> String {
    let m = &summary.metrics;
    let mut lines = vec![
        format!("Casemix summary ({})", summary.generated_at),
        "=".repeat(60),
        format!("{:<24}{}", "Claims", format_number(m.row_count as f64, 0)),
        format!("{:<24}{}", "Total tariff", format_rupiah(m.total_tariff)),
        format!("{:<24}{}", "Hospital tariff", format_rupiah(m.hospital_tariff)),
        format!("{:<24}{}", "Difference", format_rupiah(m.tariff_delta())),
        format!("{:<24}{}", "Inpatient", format_number(m.inpatient_count as f64, 0)),
        format!("{:<24}{}", "Outpatient", format_number(m.outpatient_count as f64, 0)),
        format!(
            "{:<24}{} ({:.1}%)",
            "Flagged",
            format_number(m.flagged_count as f64, 0),
            m.flagged_percentage()
        ),
    ];
    push_breakdown(&mut lines, "Top diagnoses", &summary.top_diagnoses);
    push_breakdown(&mut lines, "Top procedures", &summary.top_procedures);
    lines.join("\n") + "\n"
}

/// Render `summary` as pretty-printed JSON.
pub fn render_report_json(summary: &ClaimSummary) -> Result<String> {
    let json = serde_json::to_string_pretty(summary).map_err(std::io::Error::other)?;
    Ok(json + "\n")
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn push_breakdown(lines: &mut Vec<String>, title: &str, codes: &[CodeFrequency]) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push("-".repeat(60));
    if codes.is_empty() {
        lines.push("(no codes)".to_string());
        return;
    }
    for (rank, f) in codes.iter().enumerate() {
        lines.push(format!("{:>3}. {:<16}{:>8}", rank + 1, f.code, f.count));
    }
}

/// Write one TSV record. Tabs and line breaks inside a cell would break the
/// format, so they become spaces.
fn write_record<W: Write>(out: &mut W, cells: Vec<&str>) -> Result<()> {
    let separator = DELIMITER.to_string();
    let line = cells
        .into_iter()
        .map(|c| c.replace([DELIMITER, '\n', '\r'], " "))
        .collect::<Vec<_>>()
        .join(separator.as_str());
    writeln!(out, "{line}")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
