//! Hang signature analysis
//!
//! This module contains the pure rule logic applied to a parsed transcript,
//! separated from parsing and from report rendering.

pub mod evaluator;
pub mod rules;

pub use evaluator::{threads_matching, Finding, RelatedThreads, RuleEvaluator};
pub use rules::{Rule, RuleId, CATALOGUE};
