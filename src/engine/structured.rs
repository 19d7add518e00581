//! Category insertion over the TypeScript syntax tree.
//!
//! Blocks are object literals declaring `category: "<id>"` together with an
//! `industries: [...]` array. Each object element of that array (and of any
//! nested `subSectors` array) without a `category` pair gets one inserted
//! right after its `code` pair. Everything else in the file is left as is.

use tracing::{debug, info_span, warn};
use tree_sitter::Node;

use super::{Categorized, Categorizer, EngineKind};
use crate::category::CategoryMap;
use crate::constants::{
    category_line, expected_record_prefix, CATEGORY_FIELD, CODE_FIELD, INDUSTRIES_FIELD,
    SUB_SECTORS_FIELD,
};
use crate::error::{line_col, Result};
use crate::patch::{self, Insertion};
use crate::report::{CategoryOutcome, Conflict};
use crate::syntax::{self, TaxonomySyntax};

pub struct StructuredEngine {
    indent: String,
}

impl StructuredEngine {
    pub fn new(indent: &str) -> Self {
        Self {
            indent: indent.to_string(),
        }
    }

    fn visit_record(
        &self,
        source: &str,
        record: Node,
        target: &str,
        outcome: &mut CategoryOutcome,
        insertions: &mut Vec<Insertion>,
    ) {
        let pairs = syntax::pairs(record, source);
        let label = record_label(source, record);

        if let Some(existing) = pairs.iter().find(|p| p.key == CATEGORY_FIELD) {
            match existing.string_value(source) {
                Some(value) if value == target => outcome.already_tagged += 1,
                _ => {
                    debug!("record {} has conflicting category", label);
                    outcome.conflicts.push(Conflict {
                        record: label.clone(),
                        found: existing.value_text(source).to_string(),
                    });
                }
            }
        } else if let Some(code) = pairs.iter().find(|p| p.key == CODE_FIELD) {
            let indent = self.indent_for(source, code.key_node.start_byte());
            let insertion = match code.trailing_comma() {
                Some(comma) => Insertion::new(
                    comma.end_byte(),
                    format!("\n{}", category_line(&indent, target, true)),
                ),
                None => Insertion::new(
                    code.node.end_byte(),
                    format!(",\n{}", category_line(&indent, target, false)),
                ),
            };
            debug!("inserting category into record {} at byte {}", label, insertion.offset);
            insertions.push(insertion);
            outcome.inserted += 1;

            let keys: Vec<&str> = pairs.iter().map(|p| p.key).collect();
            let expected = expected_record_prefix();
            if !keys.starts_with(&expected) {
                outcome.warnings.push(format!(
                    "record {}: unexpected field order ({}), expected {}",
                    label,
                    keys.join(", "),
                    expected.join(", ")
                ));
            }
        } else {
            outcome
                .warnings
                .push(format!("record {}: no '{}' field, skipped", label, CODE_FIELD));
        }

        if let Some(sub) = pairs
            .iter()
            .find(|p| p.key == SUB_SECTORS_FIELD)
            .and_then(|p| p.array_value())
        {
            self.visit_list(source, sub, target, outcome, insertions);
        }
    }

    fn visit_list(
        &self,
        source: &str,
        list: Node,
        target: &str,
        outcome: &mut CategoryOutcome,
        insertions: &mut Vec<Insertion>,
    ) {
        for element in syntax::elements(list) {
            if element.kind() == "object" {
                self.visit_record(source, element, target, outcome, insertions);
            } else {
                let (line, _) = line_col(source, element.start_byte());
                outcome.warnings.push(format!(
                    "non-object element ({}) at line {}, skipped",
                    element.kind(),
                    line
                ));
            }
        }
    }

    /// Leading whitespace of the line holding `offset` when nothing else
    /// precedes it there; the configured indent otherwise.
    fn indent_for(&self, source: &str, offset: usize) -> String {
        let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let prefix = &source[line_start..offset];
        if prefix.chars().all(|c| c == ' ' || c == '\t') {
            prefix.to_string()
        } else {
            self.indent.clone()
        }
    }
}

fn record_label(source: &str, record: Node) -> String {
    match syntax::field(record, source, CODE_FIELD).and_then(|p| p.string_value(source)) {
        Some(code) => format!("\"{}\"", code),
        None => format!("at line {}", line_col(source, record.start_byte()).0),
    }
}

impl Categorizer for StructuredEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Structured
    }

    fn categorize(&self, source: &str, map: &CategoryMap) -> Result<Categorized> {
        let mut syntax = TaxonomySyntax::new()?;
        let tree = syntax.parse(source)?;
        let mut outcomes: Vec<CategoryOutcome> = map
            .iter()
            .map(|(category, target)| CategoryOutcome::new(category, target))
            .collect();
        let mut insertions = Vec::new();

        for object in syntax.category_objects(&tree, source) {
            let Some((category, target)) = map.resolve(object.category) else {
                continue;
            };
            let Some(industries) = syntax::field(object.node, source, INDUSTRIES_FIELD)
                .and_then(|p| p.array_value())
            else {
                continue;
            };
            let Some(outcome) = outcomes.iter_mut().find(|o| o.source == category) else {
                continue;
            };

            let span = info_span!("category", category = %category);
            let _enter = span.enter();
            debug!(
                "block at line {} with {} entries",
                line_col(source, object.node.start_byte()).0,
                industries.named_child_count()
            );
            outcome.blocks += 1;
            self.visit_list(source, industries, target, outcome, &mut insertions);
        }

        for outcome in &mut outcomes {
            outcome.finish();
            if outcome.blocks == 0 {
                warn!("no block found for category {}", outcome.source);
            }
        }

        Ok(Categorized {
            text: patch::apply(source, insertions),
            outcomes,
        })
    }
}
