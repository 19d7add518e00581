//! What the binary prints and the status it exits with for a finished run.

use crate::constants::CONFIRMATION;
use crate::error::Result;
use crate::report::RunReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub stdout: String,
    pub stderr: Option<String>,
    pub exit_code: i32,
}

/// Renders the report for the terminal.
///
/// The confirmation line follows the text report whenever the file was
/// written, including runs that matched nothing. `check` turns pending
/// changes into exit status 1.
pub fn render(report: &RunReport, json: bool, check: bool) -> Result<Rendered> {
    let mut stdout = if json {
        let mut out = report.render_json()?;
        out.push('\n');
        out
    } else {
        report.render_text()
    };
    if !json && report.written {
        stdout.push_str(CONFIRMATION);
        stdout.push('\n');
    }

    let (stderr, exit_code) = if check && report.changed {
        (
            Some(format!(
                "❌ {} records are missing a category",
                report.total_inserted()
            )),
            1,
        )
    } else {
        (None, 0)
    };

    Ok(Rendered {
        stdout,
        stderr,
        exit_code,
    })
}
