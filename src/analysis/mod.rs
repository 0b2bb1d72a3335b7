// Copyright 2025 Cowboy AI, LLC.

//! Read-only metrics over a codebase category
//!
//! Coupling, diagram complexity, a compression-based complexity estimate and
//! cycle detection, aggregated into a serializable [`Report`].

pub mod complexity;
pub mod coupling;
pub mod cycles;
pub mod report;

pub use complexity::ComplexityAnalyzer;
pub use coupling::{abstractness, compute_coupling, CouplingMap, CouplingMetrics};
pub use cycles::{Cycle, CycleAnalyzer};
pub use report::{find_top_n, generate_report, generate_report_with, Report};
