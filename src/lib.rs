// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # tsweave: source-text synthesis toolkit
//!
//! Assembles TypeScript source files from incremental text and import
//! requests, and generates whole declaration families from small
//! declarative configs.
//!
//! ## Core Concept
//!
//! Template functions should decide *what* to say, never *how imports are
//! kept in order*. Every call site writes into an [`Emitter`]:
//!
//! - **Body lines** are kept exactly as given, in call order
//! - **Imports** are deduplicated, grouped into priority buckets and sorted,
//!   so no generated file has a duplicate, missing or mis-ordered import
//! - **Factories** drive the emitter from an [`ArtifactConfig`] so related
//!   declarations (an error family, a set of environment layers) can't drift
//!   apart
//!
//! ## Quick Start
//!
//! ```rust
//! use tsweave::{Emitter, ImportSymbol};
//!
//! let mut emitter = Emitter::new();
//! emitter.add_import("effect", ImportSymbol::aliased("Layer", "L"), false);
//! emitter.add_import("effect", "Effect", false);
//! emitter.add_import("effect", "Effect", false);
//! emitter.add_line("export const program = Effect.succeed(1)");
//!
//! assert_eq!(
//!     emitter.render(),
//!     "import { Effect, Layer as L } from \"effect\"\n\nexport const program = Effect.succeed(1)\n"
//! );
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │  ArtifactConfig (YAML / JSON / Rust)                         │
//! │       │                                                      │
//! │       ├──► emit_tagged_errors ──┐                            │
//! │       │                         ├──► Emitter                 │
//! │       └──► emit_layers ─────────┘      │                     │
//! │                                        ├─ ImportRegistry     │
//! │  template call sites ─────────────────►├─ line buffer        │
//! │                                        │                     │
//! │                                        └──► render() ─► String
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Import Ordering
//!
//! Statements are sorted by `(bucket, module path)`. With the default
//! [`ImportGrouping`] the buckets are `@effect/*`, other scoped packages,
//! `effect`, other packages, then relative paths. Groupings are
//! configurable through [`EmitterConfig`].

pub mod config;
pub mod emitter;
pub mod error;
pub mod factory;

// Re-exports
pub use config::{content_hash, EmitterConfig, Provenance, QuoteStyle};
pub use emitter::{
    BucketRule, Emitter, FunctionShape, ImportGrouping, ImportRecord, ImportRegistry,
    ImportRequest, ImportSymbol, InterfaceShape, ModuleMatcher, ModulePattern, Param, Property,
};
pub use error::{Error, Result};
pub use factory::{
    emit_layers, emit_tagged_errors, generate, ArtifactConfig, Environment, ErrorStyle, FieldDef,
    HelperConstructor, LayerConfig, SelectorConfig, TaggedErrorConfig, VariantDef,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
