//! # Seiri - Node Library Normalizer
//!
//! **Seiri** ingests a library of automation-platform node definitions (JSON descriptors
//! of integration building blocks, with their parameters and show/hide conditions) and
//! emits one normalized JSON record per node, enriched with derived natural-language
//! hints, flattened visibility rules and, optionally, a model-generated IDS manifest.
//!
//! ## Core Workflow
//!
//! 1.  **Locate**: [`locate::locate_nodes`] finds the node records inside the source
//!     document, whatever its top-level shape.
//! 2.  **Normalize**: [`node::NodeNormalizer`] turns each record into a
//!     [`node::NormalizedNode`]. Parameters are canonicalized into a keyed map, free text is
//!     sanitized, and every `displayOptions` block at any depth becomes an
//!     `IF ... THEN SHOW|HIDE` rule.
//! 3.  **Enrich** (optional): a [`manifest::Classifier`] annotates the node with its
//!     data-flow role. Failures here never drop the node.
//! 4.  **Write**: [`pipeline::Pipeline`] writes one file per node and an aggregate array.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seiri::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     // Normalize a single record in memory.
//!     let raw = json!({
//!         "name": "Slack",
//!         "parameters": [
//!             {"name": "resource", "type": "options", "options": [{"name": "Message", "value": "message"}]},
//!             {"name": "token", "type": "string"},
//!             {
//!                 "name": "channel",
//!                 "type": "string",
//!                 "displayOptions": {"show": {"resource": ["message"]}}
//!             }
//!         ]
//!     });
//!     let node = NodeNormalizer::new().normalize_value(0, &raw)?;
//!     for rule in &node.configuration_logic.conditional_rules {
//!         println!("{}", rule); // IF resource == 'message' THEN SHOW parameter 'channel'
//!     }
//!
//!     // Or run the whole batch against files on disk.
//!     let config = RunConfig::new("raw/n8n_nodes_library.json").with_output_dir("output");
//!     let summary = Pipeline::new(config).run()?;
//!     println!("Wrote {} of {} nodes", summary.written, summary.discovered);
//!     Ok(())
//! }
//! ```

pub mod conventions;
pub mod error;
pub mod locate;
pub mod manifest;
pub mod node;
pub mod params;
pub mod pipeline;
pub mod prelude;
pub mod rules;
pub mod sanitize;
