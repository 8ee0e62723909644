//! @ai:module:intent TextGrid parser library for reading Praat annotation files
//! @ai:module:layer infrastructure
//! @ai:module:public_api textgrid, parser, lexer, format, consistency, check, config, output, error
//! @ai:module:stateless true
//!
//! # TextGrid Parser
//!
//! Parses Praat TextGrid files, in either the full (labeled) or short
//! (positional) text encoding, into a read-only tree of tiers. An optional
//! pass checks that intervals tile their tier and points are ordered.
//!
//! ## Example
//!
//! ```rust,no_run
//! use textgrid_parser::{parse_textgrid, ParseOptions, Source, TextGridFormat, Tier};
//! use std::path::Path;
//!
//! let options = ParseOptions::strict().with_format(TextGridFormat::Auto);
//! let tiers = parse_textgrid(Source::Path(Path::new("speech.TextGrid")), &options).unwrap();
//!
//! for tier in &tiers {
//!     if let Tier::Interval(t) = tier {
//!         println!("{}: {} intervals", t.name(), t.intervals().len());
//!     }
//! }
//! ```

pub mod check;
pub mod config;
pub mod consistency;
pub mod error;
pub mod format;
mod grammar;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod textgrid;

pub use check::{check_directory, check_file, is_textgrid_file, CheckReport, FileFailure};
pub use config::{CliConfig, ParseOptions};
pub use consistency::check_consistency;
pub use error::{ConsistencyError, Error, Position, Result, Violation};
pub use format::{Syntax, TextGridFormat};
pub use output::{format_check_report, format_textgrid, render_error, OutputFormat};
pub use parser::{parse_file, parse_str, parse_textgrid, Parser, Source};
pub use textgrid::{Interval, IntervalTier, Point, PointTier, TextGrid, Tier, TierKind};
