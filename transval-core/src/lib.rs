//! # transval-core
//!
//! Transition rule sets for transval.
//!
//! This crate provides:
//! - A compact rule DSL (`1=>2,3;2=>3`) and its parser
//! - A registry of named, incrementally merged rule sets
//! - One-hop transition validity lookups
//!
//! ```
//! use transval_core::Registry;
//!
//! let mut registry = Registry::new();
//! registry.set("order", "1=>2,3;2=>3").unwrap();
//!
//! assert!(registry.is_transition_valid("order", 1, 3));
//! assert!(!registry.is_transition_valid("order", 3, 1));
//! assert_eq!(registry.allowed_to("order", 1), Some(&[2, 3][..]));
//! ```

pub mod error;
pub mod registry;
pub mod rules;

pub use error::{RuleError, RuleErrorKind};
pub use registry::Registry;
pub use rules::{
    format_adjacency, parse, parse_targets, parse_with_policy, Adjacency, EmptyInputPolicy,
    RuleSet, StateId,
};
