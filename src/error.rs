use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CategorizerError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to load TypeScript grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("Invalid syntax query: {0}")]
    Query(#[from] tree_sitter::QueryError),

    #[error("Failed to initialize log file: {0}")]
    LogInit(#[from] tracing_appender::rolling::InitError),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Strict mode violation: {0}")]
    Strict(String),
}

impl CategorizerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CategorizerError::Io {
            path: path.into(),
            source,
        }
    }

    /// Builds a parse error positioned at a byte offset of `source`.
    pub fn parse_at(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let (line, column) = line_col(source, offset);
        CategorizerError::Parse {
            line,
            column,
            message: message.into(),
        }
    }
}

/// 1-based line and column (in chars) of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

pub type Result<T> = std::result::Result<T, CategorizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_counts_from_one() {
        let src = "ab\ncd\nef";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 4), (2, 2));
        assert_eq!(line_col(src, 6), (3, 1));
    }

    #[test]
    fn test_parse_error_message() {
        let err = CategorizerError::parse_at("{\n  ]", 4, "unexpected ']'");
        assert_eq!(
            err.to_string(),
            "Parse error at line 2, column 3: unexpected ']'"
        );
    }
}
