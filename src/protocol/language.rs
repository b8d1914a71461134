//! Closed set of language tags accepted by the MOSS service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MossError;

/// Source language of the submitted files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    /// C
    C,
    /// C++
    Cc,
    /// Java
    Java,
    /// ML
    Ml,
    /// Pascal
    Pascal,
    /// Ada
    Ada,
    /// Lisp
    Lisp,
    /// Scheme
    Scheme,
    /// Haskell
    Haskell,
    /// Fortran
    Fortran,
    /// Plain text
    Ascii,
    /// VHDL
    Vhdl,
    /// Perl
    Perl,
    /// Matlab
    Matlab,
    /// Python
    Python,
    /// MIPS assembly
    Mips,
    /// Prolog
    Prolog,
    /// Spice
    Spice,
    /// Visual Basic
    Vb,
    /// C#
    Csharp,
    /// Modula-2
    Modula2,
    /// 8086 assembly
    A8086,
    /// JavaScript
    Javascript,
    /// PL/SQL
    Plsql,
    /// Verilog
    Verilog,
}

impl Language {
    /// Every accepted language, in the order the service documents them.
    pub const ALL: [Language; 25] = [
        Self::C,
        Self::Cc,
        Self::Java,
        Self::Ml,
        Self::Pascal,
        Self::Ada,
        Self::Lisp,
        Self::Scheme,
        Self::Haskell,
        Self::Fortran,
        Self::Ascii,
        Self::Vhdl,
        Self::Perl,
        Self::Matlab,
        Self::Python,
        Self::Mips,
        Self::Prolog,
        Self::Spice,
        Self::Vb,
        Self::Csharp,
        Self::Modula2,
        Self::A8086,
        Self::Javascript,
        Self::Plsql,
        Self::Verilog,
    ];

    /// Wire tag sent in the `language` and `file` lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cc => "cc",
            Self::Java => "java",
            Self::Ml => "ml",
            Self::Pascal => "pascal",
            Self::Ada => "ada",
            Self::Lisp => "lisp",
            Self::Scheme => "scheme",
            Self::Haskell => "haskell",
            Self::Fortran => "fortran",
            Self::Ascii => "ascii",
            Self::Vhdl => "vhdl",
            Self::Perl => "perl",
            Self::Matlab => "matlab",
            Self::Python => "python",
            Self::Mips => "mips",
            Self::Prolog => "prolog",
            Self::Spice => "spice",
            Self::Vb => "vb",
            Self::Csharp => "csharp",
            Self::Modula2 => "modula2",
            Self::A8086 => "a8086",
            Self::Javascript => "javascript",
            Self::Plsql => "plsql",
            Self::Verilog => "verilog",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = MossError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.as_str() == tag)
            .ok_or_else(|| MossError::Config(format!("Invalid language specified: {}", s)))
    }
}

impl TryFrom<String> for Language {
    type Error = MossError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.as_str().to_string()
    }
}
