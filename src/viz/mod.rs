// Copyright 2025 Cowboy AI, LLC.

//! Visualization graphs and their text renderers

pub mod graph;
pub mod output;

pub use graph::{
    assign_layer, label_of, Edge, FilterOptions, Graph, GraphBuilder, GraphStats, Layer, Node,
};
pub use output::{render_heatmap, render_layered_ascii, renderer_for, Format, Renderer};
