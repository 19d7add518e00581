use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::category::Category;
use crate::engine::EngineKind;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    /// At least one record received a category field
    Patched,
    /// Block found, nothing to insert
    Unchanged,
    NotFound,
}

impl CategoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryStatus::Patched => "patched",
            CategoryStatus::Unchanged => "unchanged",
            CategoryStatus::NotFound => "not_found",
        }
    }
}

/// A record whose existing category disagrees with its block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub record: String,
    pub found: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryOutcome {
    pub source: Category,
    pub target: String,
    pub status: CategoryStatus,
    pub blocks: usize,
    pub inserted: usize,
    pub already_tagged: usize,
    pub conflicts: Vec<Conflict>,
    pub warnings: Vec<String>,
}

impl CategoryOutcome {
    pub fn new(source: Category, target: &str) -> Self {
        Self {
            source,
            target: target.to_string(),
            status: CategoryStatus::NotFound,
            blocks: 0,
            inserted: 0,
            already_tagged: 0,
            conflicts: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Derives the status from the counters.
    pub fn finish(&mut self) {
        self.status = if self.blocks == 0 {
            CategoryStatus::NotFound
        } else if self.inserted > 0 {
            CategoryStatus::Patched
        } else {
            CategoryStatus::Unchanged
        };
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub path: PathBuf,
    pub engine: EngineKind,
    pub outcomes: Vec<CategoryOutcome>,
    pub changed: bool,
    pub written: bool,
    pub digest_before: String,
    pub digest_after: String,
}

impl RunReport {
    pub fn total_inserted(&self) -> usize {
        self.outcomes.iter().map(|o| o.inserted).sum()
    }

    pub fn not_found(&self) -> Vec<Category> {
        self.outcomes
            .iter()
            .filter(|o| o.status == CategoryStatus::NotFound)
            .map(|o| o.source)
            .collect()
    }

    pub fn has_findings(&self) -> bool {
        self.outcomes.iter().any(|o| {
            o.status == CategoryStatus::NotFound
                || !o.conflicts.is_empty()
                || !o.warnings.is_empty()
        })
    }

    /// Human-readable table followed by conflicts and warnings.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let width = self
            .outcomes
            .iter()
            .map(|o| o.source.as_str().len().max(o.target.len()))
            .max()
            .unwrap_or(8)
            .max("category".len());

        let _ = writeln!(out, "📊 {} ({} engine)", self.path.display(), self.engine.as_str());
        let _ = writeln!(
            out,
            "   {:<width$}  {:<10} {:>6} {:>8} {:>7} {:>9}",
            "category", "status", "blocks", "inserted", "tagged", "conflicts"
        );
        for o in &self.outcomes {
            let label = if o.target == o.source.as_str() {
                o.target.clone()
            } else {
                format!("{}→{}", o.source, o.target)
            };
            let _ = writeln!(
                out,
                "   {:<width$}  {:<10} {:>6} {:>8} {:>7} {:>9}",
                label,
                o.status.as_str(),
                o.blocks,
                o.inserted,
                o.already_tagged,
                o.conflicts.len()
            );
        }

        for o in &self.outcomes {
            for c in &o.conflicts {
                let _ = writeln!(
                    out,
                    "⚠️  {}: record {} already has category {}",
                    o.source, c.record, c.found
                );
            }
            for w in &o.warnings {
                let _ = writeln!(out, "⚠️  {}: {}", o.source, w);
            }
        }

        let _ = writeln!(
            out,
            "   Total inserted: {} | changed: {} | written: {}",
            self.total_inserted(),
            self.changed,
            self.written
        );
        out
    }

    pub fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        let mut patched = CategoryOutcome::new(Category::Technology, "technology");
        patched.blocks = 1;
        patched.inserted = 2;
        patched.finish();

        let mut missing = CategoryOutcome::new(Category::Retail, "retail");
        missing.finish();

        RunReport {
            path: PathBuf::from("taxonomy.ts"),
            engine: EngineKind::Structured,
            outcomes: vec![patched, missing],
            changed: true,
            written: false,
            digest_before: "a".into(),
            digest_after: "b".into(),
        }
    }

    #[test]
    fn test_status_derivation() {
        let mut o = CategoryOutcome::new(Category::Energy, "energy");
        o.finish();
        assert_eq!(o.status, CategoryStatus::NotFound);
        o.blocks = 1;
        o.finish();
        assert_eq!(o.status, CategoryStatus::Unchanged);
        o.inserted = 1;
        o.finish();
        assert_eq!(o.status, CategoryStatus::Patched);
    }

    #[test]
    fn test_text_report_lists_every_category() {
        let text = report().render_text();
        assert!(text.contains("technology"));
        assert!(text.contains("patched"));
        assert!(text.contains("not_found"));
        assert!(text.contains("Total inserted: 2"));
    }

    #[test]
    fn test_json_report_uses_snake_case() {
        let json: serde_json::Value = serde_json::from_str(&report().render_json().unwrap()).unwrap();
        assert_eq!(json["engine"], "structured");
        assert_eq!(json["outcomes"][0]["source"], "technology");
        assert_eq!(json["outcomes"][1]["status"], "not_found");
        assert_eq!(report().not_found(), vec![Category::Retail]);
        assert!(report().has_findings());
    }
}
