use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::category::CategoryMap;
use crate::error::Result;
use crate::report::CategoryOutcome;

pub mod legacy;
pub mod structured;

pub use legacy::LegacyEngine;
pub use structured::StructuredEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Delimiter-tree based editing
    #[default]
    Structured,
    /// Regex find-and-replace
    Legacy,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Structured => "structured",
            EngineKind::Legacy => "legacy",
        }
    }
}

/// Result of one categorization pass over a source text.
#[derive(Debug, Clone)]
pub struct Categorized {
    pub text: String,
    /// One entry per mapped category, in map order.
    pub outcomes: Vec<CategoryOutcome>,
}

pub trait Categorizer {
    fn kind(&self) -> EngineKind;

    fn categorize(&self, source: &str, map: &CategoryMap) -> Result<Categorized>;
}

pub fn build(kind: EngineKind, indent: &str) -> Box<dyn Categorizer> {
    match kind {
        EngineKind::Structured => Box::new(StructuredEngine::new(indent)),
        EngineKind::Legacy => Box::new(LegacyEngine::new(indent)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_INDENT;

    const SINGLE_LINE: &str = r#"const TAXONOMY = [
  {
    category: "technology",
    name: "Technology",
    industries: [
      { code: "6201", name: "Software", sicCodes: ["62011"], ukSpecific: true },
      { code: "6202", name: "IT Consultancy", sicCodes: ["62020"], ukSpecific: true }
    ]
  }
];
"#;

    const MULTI_LINE: &str = r#"const TAXONOMY = [
  {
    category: "retail",
    name: "Retail",
    industries: [
      {
        code: "SHOP",
        name: "High Street Retail",
        sicCodes: ["47190"],
        keywords: ["shop"]
      }
    ]
  }
];
"#;

    #[test]
    fn test_engines_agree_on_well_formed_input() {
        let map = CategoryMap::identity();
        for source in [SINGLE_LINE, MULTI_LINE] {
            let structured = build(EngineKind::Structured, DEFAULT_INDENT)
                .categorize(source, &map)
                .unwrap();
            let legacy = build(EngineKind::Legacy, DEFAULT_INDENT)
                .categorize(source, &map)
                .unwrap();
            assert_eq!(structured.text, legacy.text);
            assert_ne!(structured.text, source);
        }
    }

    #[test]
    fn test_engine_kind_parses_from_config() {
        #[derive(Deserialize)]
        struct Wrapper {
            engine: EngineKind,
        }
        let w: Wrapper = toml::from_str("engine = \"legacy\"").unwrap();
        assert_eq!(w.engine, EngineKind::Legacy);
        assert_eq!(EngineKind::default(), EngineKind::Structured);
    }
}
