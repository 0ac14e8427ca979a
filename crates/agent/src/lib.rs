//! Agent Runtime - query routing plus language-model phrasing
//!
//! This crate turns a free-text supply-chain question into a reply:
//! - Routes the query to one store lookup (`supplybot_core::router`)
//! - Renders the instruction prompt around the query and data string
//! - Asks a hosted text-generation model to phrase the answer
//!
//! # Architecture
//!
//! 1. **Routing** - keyword intent + entity extraction produce a data string
//! 2. **Composition** (`composer`) - prompt rendering and trimming
//! 3. **Generation** (`llm`) - pluggable [`llm::LlmClient`], Hugging Face by default
//!
//! # Safety Principle
//!
//! The model only words the answer. Stock levels, order states and prices
//! always come from the store; guidance and apology replies skip the model.

pub mod composer;
pub mod llm;
pub mod runtime;
