//! Wire messages for the MOSS line protocol.
//!
//! Outbound traffic is a sequence of newline-terminated [`Command`] lines,
//! with raw file bodies following each `file` header. Inbound traffic is
//! classified line by line into a [`Response`].

use std::fmt;

use super::Language;

/// Outbound protocol line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `moss <userId>`
    Moss {
        /// Registered MOSS user id
        user_id: String,
    },
    /// `directory <0|1>`
    Directory(bool),
    /// `X <0|1>`
    Experimental(bool),
    /// `maxmatches <int>`
    MaxMatches(u32),
    /// `show <int>`
    Show(u32),
    /// `language <tag>`
    Language(Language),
    /// `file <id> <tag> <len> <description>`, followed by `len` raw bytes
    File {
        /// File id (0 for base files)
        id: u32,
        /// Language tag
        language: Language,
        /// Byte length of the body that follows
        len: usize,
        /// Label shown in the report
        description: String,
    },
    /// `query 0 <comment>`
    Query {
        /// Report comment
        comment: String,
    },
    /// `end`
    End,
}

impl Command {
    /// Encode as a newline-terminated wire line.
    pub fn encode(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moss { user_id } => write!(f, "moss {}", user_id),
            Self::Directory(on) => write!(f, "directory {}", u8::from(*on)),
            Self::Experimental(on) => write!(f, "X {}", u8::from(*on)),
            Self::MaxMatches(n) => write!(f, "maxmatches {}", n),
            Self::Show(n) => write!(f, "show {}", n),
            Self::Language(lang) => write!(f, "language {}", lang),
            Self::File {
                id,
                language,
                len,
                description,
            } => write!(f, "file {} {} {} {}", id, language, len, description),
            Self::Query { comment } => write!(f, "query 0 {}", comment),
            Self::End => f.write_str("end"),
        }
    }
}

/// Classified inbound line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `yes`: preamble accepted, uploads may begin
    Yes,
    /// `no`: submission declined
    No,
    /// Result location; terminal success
    ResultUrl(String),
    /// Anything else
    Other(String),
}

impl Response {
    /// Classify a single inbound line.
    ///
    /// The trailing line terminator is stripped before matching; lines
    /// starting with `result_prefix` are result locations.
    pub fn parse(line: &str, result_prefix: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        match line {
            "yes" => Self::Yes,
            "no" => Self::No,
            _ if !result_prefix.is_empty() && line.starts_with(result_prefix) => {
                Self::ResultUrl(line.to_string())
            },
            _ => Self::Other(line.to_string()),
        }
    }
}
