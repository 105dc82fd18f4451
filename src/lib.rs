//! svgshrink - a rule-based SVG optimizer
//!
//! svgshrink parses an SVG document, runs an ordered list of independent
//! rewrite rules over the tree, and serializes the result.
//!
//! ```
//! use svgshrink::{Optimizer, RuleKind};
//!
//! let optimizer = Optimizer::builder().rule(RuleKind::ConvertColorsToHex).build();
//! let out = optimizer.optimize(r#"<svg><rect fill="rgb(255,0,0)"/></svg>"#).unwrap();
//! assert_eq!(out.markup, r##"<svg><rect fill="#ff0000"/></svg>"##);
//! ```

mod ast;
mod config;
mod error;
mod metadata;
mod parse;
mod pipeline;
pub mod rules;
mod serialize;
mod source;
mod validate;

pub use ast::*;
pub use config::*;
pub use error::*;
pub use metadata::*;
pub use parse::*;
pub use pipeline::*;
pub use rules::{Rule, RuleKind};
pub use serialize::*;
pub use source::*;
pub use validate::is_valid;

/// Optimize an SVG string with every rule enabled.
pub fn optimize(svg: &str) -> Result<Optimized, ShrinkError> {
    optimize_with_options(svg, &Options::default())
}

/// Optimize an SVG string with custom options.
pub fn optimize_with_options(svg: &str, options: &Options) -> Result<Optimized, ShrinkError> {
    Optimizer::new(options).optimize(svg)
}
