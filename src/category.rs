use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{CategorizerError, Result};

/// Category identifiers used by the industry taxonomy, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ProfessionalServices,
    Technology,
    Creative,
    ConstructionProperty,
    Healthcare,
    Hospitality,
    Retail,
    Manufacturing,
    Wholesale,
    Energy,
    Charity,
    Travel,
    Agriculture,
    FinancialServices,
    OtherServices,
}

impl Category {
    pub const ALL: [Category; 15] = [
        Category::ProfessionalServices,
        Category::Technology,
        Category::Creative,
        Category::ConstructionProperty,
        Category::Healthcare,
        Category::Hospitality,
        Category::Retail,
        Category::Manufacturing,
        Category::Wholesale,
        Category::Energy,
        Category::Charity,
        Category::Travel,
        Category::Agriculture,
        Category::FinancialServices,
        Category::OtherServices,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ProfessionalServices => "professional_services",
            Category::Technology => "technology",
            Category::Creative => "creative",
            Category::ConstructionProperty => "construction_property",
            Category::Healthcare => "healthcare",
            Category::Hospitality => "hospitality",
            Category::Retail => "retail",
            Category::Manufacturing => "manufacturing",
            Category::Wholesale => "wholesale",
            Category::Energy => "energy",
            Category::Charity => "charity",
            Category::Travel => "travel",
            Category::Agriculture => "agriculture",
            Category::FinancialServices => "financial_services",
            Category::OtherServices => "other_services",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategorizerError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CategorizerError::Config(format!("unknown category '{}'", s)))
    }
}

/// Ordered mapping from the category a block is declared with to the value
/// written into its records. Identity unless renames are configured.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    entries: Vec<(Category, String)>,
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::identity()
    }
}

impl CategoryMap {
    pub fn identity() -> Self {
        Self {
            entries: Category::ALL
                .iter()
                .map(|c| (*c, c.as_str().to_string()))
                .collect(),
        }
    }

    /// Identity mapping with the given overrides applied.
    pub fn with_renames(renames: &BTreeMap<String, String>) -> Result<Self> {
        let mut map = Self::identity();
        for (from, to) in renames {
            let category: Category = from.parse()?;
            if !is_valid_value(to) {
                return Err(CategorizerError::Config(format!(
                    "invalid rename target '{}' for category '{}'",
                    to, from
                )));
            }
            if let Some(entry) = map.entries.iter_mut().find(|(c, _)| *c == category) {
                entry.1 = to.clone();
            }
        }
        Ok(map)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        self.entries.iter().map(|(c, v)| (*c, v.as_str()))
    }

    pub fn target(&self, category: Category) -> &str {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| category.as_str())
    }

    /// Looks up a block's declared identifier.
    pub fn resolve(&self, source: &str) -> Option<(Category, &str)> {
        self.iter().find(|(c, _)| c.as_str() == source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_valid_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping_covers_all_categories() {
        let map = CategoryMap::identity();
        assert_eq!(map.len(), 15);
        for (category, target) in map.iter() {
            assert_eq!(category.as_str(), target);
        }
    }

    #[test]
    fn test_parse_round_trips_every_identifier() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("fintech".parse::<Category>().is_err());
    }

    #[test]
    fn test_renames_only_touch_named_category() {
        let mut renames = BTreeMap::new();
        renames.insert("creative".to_string(), "creative_media".to_string());
        let map = CategoryMap::with_renames(&renames).unwrap();

        assert_eq!(map.target(Category::Creative), "creative_media");
        assert_eq!(map.target(Category::Retail), "retail");
        assert_eq!(
            map.resolve("creative"),
            Some((Category::Creative, "creative_media"))
        );
        assert_eq!(map.resolve("creative_media"), None);
    }

    #[test]
    fn test_renames_reject_unknown_and_invalid() {
        let mut unknown = BTreeMap::new();
        unknown.insert("space".to_string(), "space".to_string());
        assert!(CategoryMap::with_renames(&unknown).is_err());

        let mut invalid = BTreeMap::new();
        invalid.insert("retail".to_string(), "re\"tail".to_string());
        assert!(CategoryMap::with_renames(&invalid).is_err());
    }
}
