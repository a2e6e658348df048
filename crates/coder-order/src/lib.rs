//! Coder Order
//!
//! Ordered, duplicate-free insertion of one value into an array literal,
//! possibly nested below a target array and addressed by a path of keys.
//!
//! # Core Concepts
//!
//! - [`Value`]: the element to insert, a literal or an opaque [`Fragment`]
//! - [`ValueKind`]: classification of existing elements, ordered by
//!   [`compare`]
//! - [`resolve`]: walks an [`ArrayPath`](coder_syntax::ArrayPath), creating
//!   missing arrays
//! - [`insert`]: skips duplicates and places typed values in order,
//!   opaque values at the end
//! - [`insert_into_property_array`] / [`insert_into_return_array`]: locate
//!   the target declaration and run the above
//!
//! # Example
//!
//! ```rust
//! use coder_order::{insert, InsertionOutcome, Value};
//! use coder_syntax::{ArrayStyle, Layout, SyntaxTree};
//!
//! let mut tree = SyntaxTree::new();
//! let array = tree.create_array(ArrayStyle::Short, Layout::Inline);
//!
//! insert(&mut tree, array, &Value::Int(2)).unwrap();
//! insert(&mut tree, array, &Value::Null).unwrap();
//! let again = insert(&mut tree, array, &Value::Int(2)).unwrap();
//!
//! assert_eq!(again, InsertionOutcome::SkippedDuplicate { existing: 1 });
//! assert_eq!(tree.display(array).to_string(), "[null, 2]");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod api;
mod classify;
mod duplicate;
mod error;
mod insertion;
mod locator;
mod navigator;
mod ordering;
mod value;

// Re-exports
pub use api::{insert_into_property_array, insert_into_return_array, Outcome};
pub use classify::{classify, classify_kind, ValueKind};
pub use duplicate::{exists, find_duplicate};
pub use error::{CoderError, CoderResult};
pub use insertion::{insert, insertion_index, InsertionOutcome};
pub use locator::{locate_property, locate_return, MethodMatcher, MethodQuery};
pub use navigator::{find_keyed, resolve};
pub use ordering::{compare, OrderClass};
pub use value::{Fragment, Value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
