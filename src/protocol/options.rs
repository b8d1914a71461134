//! Submission options sent in the MOSS preamble.
//!
//! Options are collected while the client is being configured and frozen
//! once the session starts; the session only ever holds an owned copy.

use serde::{Deserialize, Serialize};

use super::Language;
use crate::error::{MossError, Result};

/// Default `-m`: passages found in more than this many programs are ignored.
pub const DEFAULT_IGNORE_LIMIT: u32 = 10;

/// Default `-n`: number of matching file pairs shown in the report.
pub const DEFAULT_SHOW_MATCHES: u32 = 250;

/// Option set attached to a single submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOptions {
    /// Language of every uploaded file
    pub language: Language,
    /// Maximum appearances of a passage before it is treated as shared code
    pub ignore_limit: u32,
    /// Maximum number of matching files to show
    pub show: u32,
    /// Submissions are grouped by directory rather than by file
    pub directory: bool,
    /// Enable the server's experimental matcher
    pub experimental: bool,
    /// Comment attached to the generated report
    pub comment: String,
}

impl SubmissionOptions {
    /// Create options for `language` with the service defaults.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ignore_limit: DEFAULT_IGNORE_LIMIT,
            show: DEFAULT_SHOW_MATCHES,
            directory: false,
            experimental: false,
            comment: String::new(),
        }
    }

    /// Set the report comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the ignore limit
    pub fn with_ignore_limit(mut self, limit: u32) -> Self {
        self.ignore_limit = limit;
        self
    }

    /// Set the number of matching files to show
    pub fn with_show(mut self, show: u32) -> Self {
        self.show = show;
        self
    }

    /// Enable or disable directory mode
    pub fn with_directory(mut self, directory: bool) -> Self {
        self.directory = directory;
        self
    }

    /// Enable or disable the experimental matcher
    pub fn with_experimental(mut self, experimental: bool) -> Self {
        self.experimental = experimental;
        self
    }

    /// Check the options can be written on the line-oriented wire.
    pub fn validate(&self) -> Result<()> {
        if self.comment.contains(['\n', '\r']) {
            return Err(MossError::Config(
                "Comment must not contain line breaks".to_string(),
            ));
        }
        if self.ignore_limit == 0 {
            return Err(MossError::Config(
                "Ignore limit must be at least 1".to_string(),
            ));
        }
        if self.show == 0 {
            return Err(MossError::Config(
                "Number of matching files to show must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = SubmissionOptions::new(Language::Python);
        assert_eq!(opts.ignore_limit, 10);
        assert_eq!(opts.show, 250);
        assert!(!opts.directory);
        assert!(!opts.experimental);
        assert!(opts.comment.is_empty());
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let opts = SubmissionOptions::new(Language::C)
            .with_comment("hw3")
            .with_ignore_limit(4)
            .with_show(50)
            .with_directory(true);
        assert_eq!(opts.comment, "hw3");
        assert_eq!(opts.ignore_limit, 4);
        assert_eq!(opts.show, 50);
        assert!(opts.directory);
    }

    #[test]
    fn test_validate_rejects_multiline_comment() {
        let opts = SubmissionOptions::new(Language::C).with_comment("a\nquery 1");
        assert!(opts.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        assert!(SubmissionOptions::new(Language::C)
            .with_show(0)
            .validate()
            .is_err());
        assert!(SubmissionOptions::new(Language::C)
            .with_ignore_limit(0)
            .validate()
            .is_err());
    }
}
