//! # Error Types
//!
//! This module defines the diagnostic model used throughout the cebra
//! library.
//!
//! Every diagnostic carries a numeric message tag that appears literally in
//! the symbol's `errtxt`, prefixed with `"Error "` or `"Warning "`. Encode
//! calls return `Result<Diagnostic, EncodeError>`: warnings ride the `Ok`
//! side so a caller still gets a usable matrix, errors are terminal.
//!
//! Status numbering follows the classic convention: `0` = clean,
//! `2..=4` = warnings, `5..` = errors.

use thiserror::Error;

/// Warning classes, ordered least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarnKind {
    /// An out-of-range option was substituted with a usable default
    InvalidOption = 2,
    /// Output uses ECI protocol not supported by all readers
    UsesEci = 3,
    /// Symbol produced but does not comply with its standard
    NonCompliant = 4,
}

/// Error classes. Values continue the status numbering after warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input exceeds pinned or maximum symbol capacity
    TooLong = 5,
    /// Malformed or out-of-range input data
    InvalidData = 6,
    /// Check character mismatch
    InvalidCheck = 7,
    /// Option not supported by the selected symbology
    InvalidOption = 8,
    /// Internal encoding failure
    EncodingProblem = 9,
    /// Warning promoted by WERROR: output uses ECI
    UsesEci = 14,
    /// Warning promoted by WERROR: symbol is non-compliant
    NonCompliant = 15,
}

/// A non-fatal diagnostic: the symbol was produced and may be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarnKind,
    /// Numeric message tag, e.g. 261 for GS1 lint findings
    pub code: u16,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarnKind, code: u16, message: impl Into<String>) -> Self {
        Warning { kind, code, message: message.into() }
    }

    /// The `errtxt` form, e.g. `"Warning 261: AI (01) position 14: ..."`.
    pub fn errtxt(&self) -> String {
        format!("Warning {}: {}", self.code, self.message)
    }
}

/// Result payload of a successful encode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Diagnostic {
    /// Fully compliant output
    #[default]
    Clean,
    /// Output produced with a warning; the most severe warning wins
    Warn(Warning),
}

impl Diagnostic {
    /// Merge a new warning, keeping the more severe of the two.
    pub fn merge(&mut self, warning: Warning) {
        match self {
            Diagnostic::Clean => *self = Diagnostic::Warn(warning),
            Diagnostic::Warn(existing) => {
                if warning.kind > existing.kind {
                    *existing = warning;
                }
            }
        }
    }

    pub fn warning(&self) -> Option<&Warning> {
        match self {
            Diagnostic::Clean => None,
            Diagnostic::Warn(w) => Some(w),
        }
    }

    /// Numeric status: 0 for clean, 2..=4 for warnings.
    pub fn status(&self) -> i32 {
        match self {
            Diagnostic::Clean => 0,
            Diagnostic::Warn(w) => w.kind as i32,
        }
    }
}

/// Terminal encode failure. No matrix is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error {code}: {message}")]
pub struct EncodeError {
    pub kind: ErrorKind,
    /// Numeric message tag, e.g. 252 for "Data does not start with an AI"
    pub code: u16,
    pub message: String,
}

impl EncodeError {
    pub fn new(kind: ErrorKind, code: u16, message: impl Into<String>) -> Self {
        EncodeError { kind, code, message: message.into() }
    }

    pub fn too_long(code: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TooLong, code, message)
    }

    pub fn invalid_data(code: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidData, code, message)
    }

    pub fn invalid_option(code: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidOption, code, message)
    }

    /// Numeric status, 5 or greater.
    pub fn status(&self) -> i32 {
        self.kind as i32
    }

    /// Append a component tag (composite symbols qualify the failing side).
    pub fn in_component(mut self, tag: &str) -> Self {
        self.message.push_str(tag);
        self
    }
}

/// Promote a warning to the corresponding error (WERROR handling).
pub fn promote(warning: Warning) -> EncodeError {
    let kind = match warning.kind {
        WarnKind::InvalidOption => ErrorKind::InvalidOption,
        WarnKind::UsesEci => ErrorKind::UsesEci,
        WarnKind::NonCompliant => ErrorKind::NonCompliant,
    };
    EncodeError::new(kind, warning.code, warning.message)
}
