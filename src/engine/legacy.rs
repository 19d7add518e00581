//! Regex find-and-replace categorizer.
//!
//! Kept for comparison with the structured engine. Block boundaries are the
//! first `]` followed by `}` after `industries: [`, so a record ending in an
//! array (`sicCodes: ["1"] }`) closes its block early.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, info_span, warn};

use super::{Categorized, Categorizer, EngineKind};
use crate::category::CategoryMap;
use crate::constants::{category_line, SIC_CODES_FIELD};
use crate::error::Result;
use crate::report::{CategoryOutcome, Conflict};

static RECORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\{\s*code:\s*"[^"]+",)(\s*name:[^,]+,\s*sicCodes:)"#)
        .expect("record pattern is valid")
});

static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\{\s*code:\s*"([^"]+)""#).expect("code pattern is valid"));

static CATEGORY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"category:\s*"([^"]*)""#).expect("category pattern is valid"));

pub struct LegacyEngine {
    indent: String,
}

impl LegacyEngine {
    pub fn new(indent: &str) -> Self {
        Self {
            indent: indent.to_string(),
        }
    }
}

fn block_pattern(source_id: &str) -> Result<Regex> {
    Ok(Regex::new(&format!(
        r#"(?s)category:\s*"{}".*?industries:\s*\[(.*?)\]\s*\}}"#,
        regex::escape(source_id)
    ))?)
}

/// Classifies the code-first records of a block before it is patched.
///
/// A record spans from its `{ code:` to the next one. Records already carrying
/// a category count as tagged or conflicting; industry records (those with
/// `sicCodes`) that the insertion pattern will not match become warnings.
fn audit_block(inner: &str, target: &str, outcome: &mut CategoryOutcome) {
    let starts: Vec<(usize, &str)> = CODE_RE
        .captures_iter(inner)
        .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str())))
        .collect();

    for (i, (start, code)) in starts.iter().enumerate() {
        let end = starts.get(i + 1).map(|next| next.0).unwrap_or(inner.len());
        let record = &inner[*start..end];

        match CATEGORY_RE.captures(record) {
            Some(caps) if &caps[1] == target => outcome.already_tagged += 1,
            Some(caps) => outcome.conflicts.push(Conflict {
                record: format!("\"{}\"", code),
                found: format!("\"{}\"", &caps[1]),
            }),
            None if record.contains(SIC_CODES_FIELD) && !RECORD_RE.is_match(record) => {
                outcome.warnings.push(format!(
                    "record \"{}\": fields not in code, name, sicCodes order, skipped",
                    code
                ));
            }
            None => {}
        }
    }
}

impl Categorizer for LegacyEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Legacy
    }

    fn categorize(&self, source: &str, map: &CategoryMap) -> Result<Categorized> {
        let mut text = source.to_string();
        let mut outcomes = Vec::with_capacity(map.len());

        for (category, target) in map.iter() {
            let span = info_span!("category", category = %category);
            let _enter = span.enter();
            let mut outcome = CategoryOutcome::new(category, target);

            let block = block_pattern(category.as_str())?;
            let found = block
                .captures(&text)
                .and_then(|caps| caps.get(1))
                .map(|inner| (inner.range(), inner.as_str().to_string()));

            let Some((range, inner)) = found else {
                warn!("no block found for category {}", category);
                outcome.finish();
                outcomes.push(outcome);
                continue;
            };

            outcome.blocks = 1;
            audit_block(&inner, target, &mut outcome);

            let mut inserted = 0;
            let patched = RECORD_RE.replace_all(&inner, |caps: &Captures| {
                inserted += 1;
                format!(
                    "{}\n{}{}",
                    &caps[1],
                    category_line(&self.indent, target, true),
                    &caps[2]
                )
            });
            debug!("{} records patched in block of {} bytes", inserted, inner.len());

            if inserted > 0 {
                let patched = patched.into_owned();
                text.replace_range(range, &patched);
            }
            outcome.inserted = inserted;
            outcome.finish();
            outcomes.push(outcome);
        }

        Ok(Categorized { text, outcomes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::constants::DEFAULT_INDENT;
    use crate::report::CategoryStatus;

    fn run(source: &str) -> Categorized {
        LegacyEngine::new(DEFAULT_INDENT)
            .categorize(source, &CategoryMap::identity())
            .unwrap()
    }

    #[test]
    fn test_inserts_between_code_and_name() {
        let src = r#"{ category: "technology", industries: [ { code: "6201", name: "Software", sicCodes: ["62011"] } ] }"#;
        let result = run(src);
        assert_eq!(
            result.text,
            "{ category: \"technology\", industries: [ { code: \"6201\",\n        category: \"technology\", name: \"Software\", sicCodes: [\"62011\"] } ] }"
        );
        let tech = result
            .outcomes
            .iter()
            .find(|o| o.source == Category::Technology)
            .unwrap();
        assert_eq!(tech.status, CategoryStatus::Patched);
        assert_eq!(result.outcomes.len(), 15);
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let src = r#"{ category: "energy", industries: [ { code: "OIL", name: "Oil", sicCodes: ["06100"], uk: true } ] }"#;
        let once = run(src).text;
        let twice = run(&once);
        assert_eq!(twice.text, once);
        let energy = twice
            .outcomes
            .iter()
            .find(|o| o.source == Category::Energy)
            .unwrap();
        assert_eq!(energy.status, CategoryStatus::Unchanged);
        assert_eq!(energy.already_tagged, 1);
    }

    #[test]
    fn test_block_ends_at_first_array_before_brace() {
        let src = r#"{ category: "retail", industries: [
  { code: "A", name: "a", sicCodes: ["1"] },
  { code: "B", name: "b", sicCodes: ["2"] }
] }"#;
        let result = run(src);
        assert_eq!(result.text.matches("category: \"retail\"").count(), 2);
        assert!(result.text.contains("{ code: \"B\", name: \"b\""));
    }

    #[test]
    fn test_conflicts_and_unmatched_records_are_reported() {
        let src = r#"{ category: "retail", industries: [
  { code: "A", category: "wholesale", name: "a", sicCodes: [], uk: true },
  { code: "B", sicCodes: [], name: "b", uk: true },
  { code: "C", name: "c", sicCodes: [], uk: true },
  { code: "metric", name: "m", unit: "%" }
] }"#;
        let result = run(src);
        let retail = result
            .outcomes
            .iter()
            .find(|o| o.source == Category::Retail)
            .unwrap();
        assert_eq!(retail.inserted, 1);
        assert_eq!(
            retail.conflicts,
            vec![Conflict {
                record: "\"A\"".into(),
                found: "\"wholesale\"".into()
            }]
        );
        assert_eq!(retail.warnings.len(), 1);
        assert!(retail.warnings[0].contains("\"B\""));
    }

    #[test]
    fn test_missing_blocks_leave_text_identical() {
        let src = "export const NOTHING = [];\n";
        let result = run(src);
        assert_eq!(result.text, src);
        assert!(result
            .outcomes
            .iter()
            .all(|o| o.status == CategoryStatus::NotFound));
    }
}
