//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the seiri crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use seiri::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document = load_source(Path::new("raw/n8n_nodes_library.json"))?;
//! for node in normalize_document(&document) {
//!     println!("{}: {} rules", node.display_name(), node.configuration_logic.conditional_rules.len());
//! }
//! # Ok(())
//! # }
//! ```

// Pipeline
pub use crate::locate::locate_nodes;
pub use crate::node::{ConfigurationLogic, NodeNormalizer, NormalizedNode};
pub use crate::pipeline::{Pipeline, RunConfig, RunSummary, load_source, normalize_document};

// Building blocks
pub use crate::params::hints::synthesize_hint;
pub use crate::params::{Canonicalizer, OptionSummary, ParameterMap, ParameterSpec};
pub use crate::rules::{
    Accepted, Condition, ConditionRule, Visibility, dedupe_rules, rules_from_display_options,
};
pub use crate::sanitize::{sanitize_text, sanitize_value};

// Classification boundary
pub use crate::manifest::{
    ClassificationRequest, Classifier, IdsManifest, Role, parse_manifest_response,
};

// Error types
pub use crate::error::{ClassifyError, NodeError, SourceError};

// Standard library re-exports commonly used with this crate
pub use std::path::Path;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
