//! Coder PHP
//!
//! Host adapter between PHP source files and the ordered-insertion engine.
//!
//! # Core Concepts
//!
//! - [`parse_source`]: tree-sitter parse of a file into a [`SourceUnit`],
//!   whose tree lists class properties and methods as declarations
//! - [`render`]: prints a unit back, changing only the arrays that gained
//!   entries and keeping everything else byte for byte
//! - [`parse_fragment`]: turns a PHP expression into an opaque value
//! - [`Runner`]: applies [`Job`]s to files on disk
//!
//! # Example
//!
//! ```rust
//! use coder_order::{insert_into_property_array, Value};
//! use coder_php::{parse_source, render};
//! use coder_syntax::ArrayPath;
//!
//! let source = "<?php\nclass Kernel\n{\n    protected $middleware = ['auth', 'web'];\n}\n";
//! let mut unit = parse_source(source).unwrap();
//! insert_into_property_array(unit.tree_mut(), "middleware", &ArrayPath::root(), &Value::from("throttle")).unwrap();
//!
//! assert_eq!(
//!     render(&unit).unwrap(),
//!     "<?php\nclass Kernel\n{\n    protected $middleware = ['auth', 'throttle', 'web'];\n}\n"
//! );
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod egress;
mod error;
mod ingress;
mod literal;
mod runner;

// Re-exports
pub use egress::render;
pub use error::{ParseError, RunError, SerializeError};
pub use ingress::{parse_fragment, parse_source, SourceUnit};
pub use runner::{apply_job, BatchReport, Job, JobReport, JobTarget, Runner};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
