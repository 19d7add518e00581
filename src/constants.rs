/// Defaults shared by the CLI, the config layer and the engines

// Taxonomy file the tool was written for, relative to the app repository root
pub const DEFAULT_TARGET: &str = "src/config/industries/industry-taxonomy.ts";

// Config file picked up from the working directory when --config is not given
pub const DEFAULT_CONFIG_FILE: &str = "categorizer.toml";

// Fallback indent for inserted fields; matches record fields in the taxonomy file
pub const DEFAULT_INDENT: &str = "        ";

pub const CONFIRMATION: &str = "✅ Category fields added to industry taxonomy";

// Field names the engines look for
pub const CATEGORY_FIELD: &str = "category";
pub const INDUSTRIES_FIELD: &str = "industries";
pub const CODE_FIELD: &str = "code";
pub const NAME_FIELD: &str = "name";
pub const SIC_CODES_FIELD: &str = "sicCodes";
pub const SUB_SECTORS_FIELD: &str = "subSectors";

/// Field order a well-formed industry record starts with
pub fn expected_record_prefix() -> [&'static str; 3] {
    [CODE_FIELD, NAME_FIELD, SIC_CODES_FIELD]
}

/// Line inserted into a record, without the leading newline.
pub fn category_line(indent: &str, value: &str, trailing_comma: bool) -> String {
    format!(
        "{}{}: \"{}\"{}",
        indent,
        CATEGORY_FIELD,
        value,
        if trailing_comma { "," } else { "" }
    )
}
