// Copyright 2025 Cowboy AI, LLC.

//! # catreview
//!
//! Categorical review of codebases.
//!
//! A codebase is modeled as a category and analysed through it:
//! - **Category**: software entities are objects, relationships are morphisms,
//!   every object owns an identity morphism
//! - **Analysis**: diagram complexity, compressed-size complexity, coupling,
//!   instability and dependency cycles
//! - **Functors**: structure-preserving abstraction, e.g. files to packages
//! - **Visualization**: a layered dependency graph and text renderers
//!
//! ## Design Principles
//!
//! 1. **Atomic identities**: an identity morphism only ever exists alongside
//!    its object
//! 2. **Tolerant analysis**: dangling references and missing metadata are
//!    skipped, never fatal
//! 3. **Sampled verification**: law checks inspect a configurable number of
//!    compositions; a pass covers the sample only
//! 4. **Determinism**: storage keeps insertion order so every result is
//!    reproducible

#![warn(missing_docs)]

pub mod analysis;
pub mod category;
pub mod config;
pub mod errors;
pub mod persistence;
pub mod viz;

pub use analysis::{
    generate_report, generate_report_with, ComplexityAnalyzer, CouplingMetrics, Cycle,
    CycleAnalyzer, Report,
};
pub use category::{
    apply_functor, Category, CategoryFunctor, CategoryStats, IdentityFunctor, MappingSummary,
    Metadata, Morphism, MorphismKind, Object, ObjectKind, PackageAbstractionFunctor,
};
pub use config::{AnalysisConfig, ReportConfig, VerificationConfig};
pub use errors::{CategoryError, CategoryResult, Law};
pub use persistence::{load_category, save_json, to_json_string};
pub use viz::{FilterOptions, Format, Graph, GraphBuilder};
