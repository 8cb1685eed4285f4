use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Casemix verifier.
#[derive(Error, Debug)]
pub enum CasemixError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The claim export is not valid UTF-8 text.
    #[error("File {path} is not valid UTF-8 text (line {line})")]
    Decode { path: PathBuf, line: usize },

    /// The claim export has no header row.
    #[error("File {0} is empty or has no header row")]
    EmptyFile(PathBuf),

    /// The header row looks delimited by something other than tabs.
    #[error("File {path} does not look tab-delimited (header appears to use '{found}')")]
    WrongDelimiter { path: PathBuf, found: char },

    /// A rule was rejected before being added to the rule set.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// A rule removal referenced a position past the end of the rule set.
    #[error("Rule index {index} out of range (rule set has {len} rules)")]
    RuleIndexOutOfRange { index: usize, len: usize },

    /// A rules file could not be parsed.
    #[error("Failed to parse rules file {path}: {source}")]
    RulesFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the casemix crates.
pub type Result<T> = std::result::Result<T, CasemixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CasemixError::FileRead {
            path: PathBuf::from("/exports/klaim.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/exports/klaim.txt"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_decode() {
        let err = CasemixError::Decode {
            path: PathBuf::from("klaim.txt"),
            line: 3,
        };
        assert_eq!(
            err.to_string(),
            "File klaim.txt is not valid UTF-8 text (line 3)"
        );
    }

    #[test]
    fn test_error_display_empty_file() {
        let err = CasemixError::EmptyFile(PathBuf::from("empty.txt"));
        assert_eq!(err.to_string(), "File empty.txt is empty or has no header row");
    }

    #[test]
    fn test_error_display_wrong_delimiter() {
        let err = CasemixError::WrongDelimiter {
            path: PathBuf::from("klaim.csv"),
            found: ',',
        };
        let msg = err.to_string();
        assert!(msg.contains("does not look tab-delimited"));
        assert!(msg.contains("','"));
    }

    #[test]
    fn test_error_display_rule_index() {
        let err = CasemixError::RuleIndexOutOfRange { index: 5, len: 2 };
        assert_eq!(
            err.to_string(),
            "Rule index 5 out of range (rule set has 2 rules)"
        );
    }

    #[test]
    fn test_error_display_config() {
        let err = CasemixError::Config("missing input".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing input");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CasemixError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }
}
