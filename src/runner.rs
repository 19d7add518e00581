use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::category::CategoryMap;
use crate::engine::{self, EngineKind};
use crate::error::{CategorizerError, Result};
use crate::report::RunReport;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub path: PathBuf,
    pub engine: EngineKind,
    pub indent: String,
    pub map: CategoryMap,
    /// Compute the report without touching the file
    pub dry_run: bool,
    /// Fail, without writing, when the report has warnings, conflicts or missing categories
    pub strict: bool,
    /// Copy the original to `<path>.bak` before overwriting
    pub backup: bool,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Reads the target, categorizes it and writes it back in place.
///
/// The file is rewritten even when nothing changed, unless `dry_run` is set or
/// strict mode rejects the result. The write is a plain overwrite.
pub fn run(options: &RunOptions) -> Result<RunReport> {
    let path = &options.path;
    let source = fs::read_to_string(path).map_err(|e| CategorizerError::io(path, e))?;
    info!(
        "Categorizing {} ({} bytes, {} engine)",
        path.display(),
        source.len(),
        options.engine.as_str()
    );

    let categorizer = engine::build(options.engine, &options.indent);
    let result = categorizer.categorize(&source, &options.map)?;

    let changed = result.text != source;
    let mut report = RunReport {
        path: path.clone(),
        engine: categorizer.kind(),
        outcomes: result.outcomes,
        changed,
        written: false,
        digest_before: sha256_hex(source.as_bytes()),
        digest_after: sha256_hex(result.text.as_bytes()),
    };

    for missing in report.not_found() {
        debug!("category {} not present in {}", missing, path.display());
    }

    if options.strict && report.has_findings() {
        return Err(CategorizerError::Strict(strict_summary(&report)));
    }

    if options.dry_run {
        info!("Dry run: {} insertions, file left untouched", report.total_inserted());
        return Ok(report);
    }

    if options.backup {
        let backup = backup_path(path);
        fs::copy(path, &backup).map_err(|e| CategorizerError::io(&backup, e))?;
        info!("Backup written to {}", backup.display());
    }

    fs::write(path, &result.text).map_err(|e| CategorizerError::io(path, e))?;
    report.written = true;

    let missing = report.not_found().len();
    if missing > 0 {
        warn!("{} of {} categories not found", missing, report.outcomes.len());
    }
    info!(
        "Wrote {} ({} insertions)",
        path.display(),
        report.total_inserted()
    );
    Ok(report)
}

fn strict_summary(report: &RunReport) -> String {
    let mut parts = Vec::new();
    let missing: Vec<String> = report.not_found().iter().map(|c| c.to_string()).collect();
    if !missing.is_empty() {
        parts.push(format!("categories not found: {}", missing.join(", ")));
    }
    let conflicts: usize = report.outcomes.iter().map(|o| o.conflicts.len()).sum();
    if conflicts > 0 {
        parts.push(format!("{} conflicting records", conflicts));
    }
    let warnings: usize = report.outcomes.iter().map(|o| o.warnings.len()).sum();
    if warnings > 0 {
        parts.push(format!("{} warnings", warnings));
    }
    parts.join("; ")
}
