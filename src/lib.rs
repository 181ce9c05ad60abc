//! # Cebra - Barcode Symbol Encoding Library
//!
//! Cebra turns application payloads into one- and two-dimensional barcode
//! symbols: a matrix of dark/light modules plus a human-readable text
//! line. It provides:
//!
//! - **GS1 parsing and linting**: the full Application Identifier
//!   registry with structural checks and per-field lint rules
//! - **Han Xin Code**: eight encodation modes, 84 sizes, four ECC levels,
//!   Reed-Solomon over GF(2^8) and penalty-scored data masking
//! - **GS1-128**: the Code 128 subset carrying GS1 element strings
//! - **Code 49**: a stacked reference symbology
//! - **Composites**: GS1-128 bound to a MicroPDF417-derived 2-D stack
//!
//! ## Quick Start
//!
//! ```
//! use cebra::{Symbol, Symbology};
//!
//! let mut symbol = Symbol::new(Symbology::Gs1_128);
//! symbol.encode(b"[01]12345678901231[20]12")?;
//!
//! assert_eq!(symbol.text(), "(01)12345678901231(20)12");
//! for col in 0..symbol.width() {
//!     let _dark = symbol.module(0, col);
//! }
//! # Ok::<(), cebra::EncodeError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`symbol`] | Symbol object, options, encode entry points |
//! | [`gs1`] | GS1 AI parsing, registry and lint rules |
//! | [`hanxin`] | Han Xin Code encoder |
//! | [`code128`] | GS1-128 linear carrier |
//! | [`code49`] | Code 49 reference encoder |
//! | [`composite`] | Linear + 2-D composite driver |
//! | [`eci`] | ECI charset registry and segment planner |
//! | [`input`] | Escape-sequence expansion |
//! | [`gf256`] | GF(2^8) tables and Reed-Solomon |
//! | [`matrix`] | Bit-packed module matrix |
//! | [`error`] | Diagnostics and error codes |
//!
//! ## Error model
//!
//! Encode calls return `Result<Diagnostic, EncodeError>`. A warning
//! (status 2..=4) still produces a complete matrix; an error (status 5+)
//! leaves none. Every diagnostic carries a numeric tag that appears
//! literally in [`Symbol::errtxt`], e.g.
//! `"Warning 261: AI (01) position 14: Bad checksum '4', expected '1'"`.

pub mod code128;
pub mod code49;
pub mod composite;
pub mod eci;
pub mod error;
pub mod gf256;
pub mod gs1;
pub mod hanxin;
pub mod input;
pub mod matrix;
pub mod symbol;

// Re-exports for convenience
pub use eci::Segment;
pub use error::{Diagnostic, EncodeError, ErrorKind, Warning, WarnKind};
pub use symbol::{BaseMode, InputMode, OutputOptions, Symbol, Symbology, WarnLevel, FULL_MULTIBYTE};
