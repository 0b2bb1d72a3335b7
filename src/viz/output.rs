// Copyright 2025 Cowboy AI, LLC.

//! Text renderers for dependency graphs
//!
//! ASCII boxes, Mermaid flowcharts, Graphviz DOT and JSON, plus a detailed
//! layered listing and a coupling heatmap. Long listings are capped per layer
//! so large codebases stay readable.

use std::fmt::{self, Write};

use super::graph::{Graph, Node, CROSS_LAYER, LAYER_COUNT};
use crate::errors::{CategoryError, CategoryResult};

const ASCII_WIDTH: usize = 78;
const ASCII_NODES_PER_LAYER: usize = 5;
const MERMAID_NODES_PER_LAYER: usize = 10;
const MERMAID_MAX_EDGES: usize = 50;
const MERMAID_SIGNIFICANT_COUPLING: usize = 10;
const DOT_NODES_PER_LAYER: usize = 15;
const DOT_MAX_EDGES: usize = 100;
const LAYERED_WIDTH: usize = 80;
const LAYERED_NODES_PER_LAYER: usize = 8;
const HEATMAP_ROWS: usize = 20;
const HEATMAP_BAR: usize = 15;

const MERMAID_STYLES: [&str; LAYER_COUNT] =
    ["fill:#e8f5e9", "fill:#fff3e0", "fill:#e3f2fd", "fill:#fce4ec"];
const DOT_COLORS: [&str; LAYER_COUNT] = ["#c8e6c9", "#ffe0b2", "#bbdefb", "#f8bbd0"];

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Boxed ASCII art
    #[default]
    Ascii,
    /// Mermaid flowchart in a fenced block
    Mermaid,
    /// Graphviz DOT
    Dot,
    /// Pretty-printed JSON
    Json,
}

impl From<&str> for Format {
    /// Unknown names fall back to ASCII
    fn from(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "mermaid" => Format::Mermaid,
            "dot" => Format::Dot,
            "json" => Format::Json,
            _ => Format::Ascii,
        }
    }
}

/// Renders a graph as text
pub trait Renderer {
    /// Render the whole graph
    fn render(&self, graph: &Graph) -> CategoryResult<String>;
}

/// Renderer for a format
pub fn renderer_for(format: Format) -> Box<dyn Renderer> {
    match format {
        Format::Ascii => Box::new(AsciiRenderer),
        Format::Mermaid => Box::new(MermaidRenderer),
        Format::Dot => Box::new(DotRenderer),
        Format::Json => Box::new(JsonRenderer),
    }
}

fn written(result: fmt::Result, out: String) -> CategoryResult<String> {
    result
        .map(|()| out)
        .map_err(|e| CategoryError::SerializationError(e.to_string()))
}

/// Boxed overview, applications on top
pub struct AsciiRenderer;

impl Renderer for AsciiRenderer {
    fn render(&self, graph: &Graph) -> CategoryResult<String> {
        let mut out = String::new();
        let result = write_ascii(&mut out, graph);
        written(result, out)
    }
}

fn write_ascii(out: &mut String, graph: &Graph) -> fmt::Result {
    let width = ASCII_WIDTH;
    let inner = width - 4;

    out.push_str(&box_rule('╔', '╗', width));
    out.push_str(&box_line(&center(&format!("{} DEPENDENCY GRAPH", graph.name), inner), width));
    out.push_str(&box_rule('╠', '╣', width));

    let dag = if graph.is_dag { "YES" } else { "NO (cycles detected)" };
    out.push_str(&box_line(
        &format!(
            "Nodes: {}  Edges: {}  DAG: {}",
            graph.stats.total_nodes, graph.stats.total_edges, dag
        ),
        width,
    ));
    out.push_str(&box_rule('╠', '╣', width));

    for (index, layer) in graph.layers.iter().enumerate().rev() {
        out.push_str(&box_line("", width));
        out.push_str(&box_line(
            &format!("LAYER {}: {}", layer.id, layer.name.to_uppercase()),
            width,
        ));

        if layer.node_ids.is_empty() {
            out.push_str(&box_line("  (no nodes)", width));
        } else {
            for node in layer_nodes(graph, &layer.node_ids, ASCII_NODES_PER_LAYER) {
                out.push_str(&box_line(
                    &format!(
                        "  [{}] A:{} E:{} I:{:.2}",
                        truncate(&node.label, 20),
                        node.afferent,
                        node.efferent,
                        node.instability
                    ),
                    width,
                ));
            }
            if layer.node_ids.len() > ASCII_NODES_PER_LAYER {
                out.push_str(&box_line(
                    &format!("  ... and {} more", layer.node_ids.len() - ASCII_NODES_PER_LAYER),
                    width,
                ));
            }
        }

        if index > 0 {
            out.push_str(&box_line(&center("|", inner), width));
            out.push_str(&box_line(&center("v", inner), width));
        }
    }

    out.push_str(&box_rule('╚', '╝', width));
    writeln!(out)?;
    writeln!(out, "Legend: A=Afferent, E=Efferent, I=Instability")?;
    writeln!(out, "Layers: 0=Foundations, 1=Core, 2=Support, 3=Applications")
}

/// Mermaid `flowchart BT` with one subgraph per non-empty layer
///
/// Only edges touching a node with total coupling of at least 10 are drawn.
pub struct MermaidRenderer;

impl Renderer for MermaidRenderer {
    fn render(&self, graph: &Graph) -> CategoryResult<String> {
        let mut out = String::new();
        let result = write_mermaid(&mut out, graph);
        written(result, out)
    }
}

fn write_mermaid(out: &mut String, graph: &Graph) -> fmt::Result {
    writeln!(out, "```mermaid")?;
    writeln!(out, "flowchart BT")?;

    for (index, layer) in graph.layers.iter().enumerate() {
        if layer.node_ids.is_empty() {
            continue;
        }
        writeln!(out, "    subgraph L{}[\"{}\"]", index, layer.name)?;
        for node in layer_nodes(graph, &layer.node_ids, MERMAID_NODES_PER_LAYER) {
            writeln!(
                out,
                "        {}[\"{}<br/>A:{} E:{}\"]",
                sanitize_id(&node.id),
                escape_html(&truncate(&node.label, 15)),
                node.afferent,
                node.efferent
            )?;
        }
        writeln!(out, "    end")?;
    }
    writeln!(out)?;

    let significant = |node: &Node| node.total_coupling() >= MERMAID_SIGNIFICANT_COUPLING;
    let edges = graph
        .edges
        .iter()
        .filter(|edge| match (graph.node(&edge.source), graph.node(&edge.target)) {
            (Some(source), Some(target)) => significant(source) || significant(target),
            _ => false,
        })
        .take(MERMAID_MAX_EDGES);
    for edge in edges {
        writeln!(
            out,
            "    {} --> {}",
            sanitize_id(&edge.source),
            sanitize_id(&edge.target)
        )?;
    }
    writeln!(out)?;

    for (index, style) in MERMAID_STYLES.iter().enumerate() {
        writeln!(out, "    style L{index} {style}")?;
    }
    writeln!(out, "```")
}

/// Graphviz DOT with one cluster per non-empty layer
pub struct DotRenderer;

impl Renderer for DotRenderer {
    fn render(&self, graph: &Graph) -> CategoryResult<String> {
        let mut out = String::new();
        let result = write_dot(&mut out, graph);
        written(result, out)
    }
}

fn write_dot(out: &mut String, graph: &Graph) -> fmt::Result {
    writeln!(out, "digraph G {{")?;
    writeln!(out, "    rankdir=BT;")?;
    writeln!(out, "    node [shape=box, style=filled];")?;
    writeln!(out, "    edge [arrowsize=0.7];")?;
    writeln!(out)?;

    for (index, layer) in graph.layers.iter().enumerate() {
        if layer.node_ids.is_empty() {
            continue;
        }
        writeln!(out, "    // Layer {}: {}", index, layer.name)?;
        writeln!(out, "    subgraph cluster_{index} {{")?;
        writeln!(out, "        label=\"{}\";", layer.name)?;
        writeln!(out, "        style=filled;")?;
        writeln!(
            out,
            "        fillcolor=\"{}\";",
            DOT_COLORS.get(index).copied().unwrap_or("#ffffff")
        )?;

        for node in layer_nodes(graph, &layer.node_ids, DOT_NODES_PER_LAYER) {
            let intensity = (128 + node.total_coupling() * 3).min(255);
            writeln!(
                out,
                "        {} [label=\"{}\\nA:{} E:{}\", fillcolor=\"#{:02x}{:02x}{:02x}\"];",
                dot_id(&node.id),
                escape_dot(&truncate(&node.label, 20)),
                node.afferent,
                node.efferent,
                intensity,
                intensity,
                intensity
            )?;
        }
        writeln!(out, "    }}")?;
        writeln!(out)?;
    }

    writeln!(out, "    // Edges")?;
    for edge in graph.edges.iter().take(DOT_MAX_EDGES) {
        let color = if edge.kind == CROSS_LAYER { "#cc0000" } else { "#666666" };
        writeln!(
            out,
            "    {} -> {} [penwidth={:.1}, color=\"{}\"];",
            dot_id(&edge.source),
            dot_id(&edge.target),
            0.5 + f64::from(edge.weight) * 0.2,
            color
        )?;
    }
    writeln!(out, "}}")
}

/// The graph as pretty-printed JSON
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, graph: &Graph) -> CategoryResult<String> {
        Ok(serde_json::to_string_pretty(graph)?)
    }
}

/// Detailed listing of every layer, applications first
pub fn render_layered_ascii(graph: &Graph) -> CategoryResult<String> {
    let mut out = String::new();
    let result = write_layered(&mut out, graph);
    written(result, out)
}

fn write_layered(out: &mut String, graph: &Graph) -> fmt::Result {
    let width = LAYERED_WIDTH;
    let heavy = "═".repeat(width);
    let light = "─".repeat(width);

    writeln!(out, "{heavy}")?;
    writeln!(
        out,
        "{}",
        center(&format!("{} - LAYERED DEPENDENCY VISUALIZATION", graph.name), width)
    )?;
    writeln!(out, "{heavy}")?;
    writeln!(out)?;

    let dag = if graph.is_dag { "✓ DAG Verified" } else { "✗ Cycles Detected" };
    writeln!(
        out,
        "Stats: {} nodes, {} edges, {}",
        graph.stats.total_nodes, graph.stats.total_edges, dag
    )?;
    writeln!(out)?;

    for (index, layer) in graph.layers.iter().enumerate().rev() {
        writeln!(out, "{light}")?;
        writeln!(
            out,
            "LAYER {}: {} ({})",
            layer.id,
            layer.name.to_uppercase(),
            layer.description
        )?;
        writeln!(out, "{light}")?;

        if layer.node_ids.is_empty() {
            writeln!(out, "  (empty)")?;
            continue;
        }

        let mut nodes = layer_nodes(graph, &layer.node_ids, usize::MAX);
        nodes.sort_by_key(|n| std::cmp::Reverse(n.total_coupling()));
        for node in nodes.iter().take(LAYERED_NODES_PER_LAYER) {
            writeln!(
                out,
                "  ┌ {:<25} A:{:<3} E:{:<3} I:{:.2}",
                truncate(&node.label, 25),
                node.afferent,
                node.efferent,
                node.instability
            )?;
        }
        if nodes.len() > LAYERED_NODES_PER_LAYER {
            writeln!(
                out,
                "  ... and {} more components",
                nodes.len() - LAYERED_NODES_PER_LAYER
            )?;
        }
        writeln!(out)?;

        if index > 0 {
            writeln!(out, "{}", center("│", width))?;
            writeln!(out, "{}", center("▼ depends on", width))?;
        }
    }

    writeln!(out, "{heavy}")
}

/// Table of the most coupled nodes with a proportional bar
pub fn render_heatmap(graph: &Graph) -> CategoryResult<String> {
    let mut out = String::new();
    let result = write_heatmap(&mut out, graph);
    written(result, out)
}

fn write_heatmap(out: &mut String, graph: &Graph) -> fmt::Result {
    let rule_heavy = "═".repeat(59);
    let rule_light = "─".repeat(59);

    writeln!(out, "COUPLING HEATMAP (sorted by total coupling)")?;
    writeln!(out, "{rule_heavy}")?;
    writeln!(out, "{:<30} {:>6} {:>6} {:>6} Coupling", "Component", "Ca", "Ce", "I")?;
    writeln!(out, "{rule_light}")?;

    let mut nodes: Vec<&Node> = graph.nodes.values().collect();
    nodes.sort_by_key(|n| std::cmp::Reverse(n.total_coupling()));
    let max_coupling = nodes
        .iter()
        .map(|n| n.total_coupling())
        .max()
        .unwrap_or(0)
        .max(1);

    for node in nodes.iter().take(HEATMAP_ROWS) {
        let filled = node.total_coupling() * HEATMAP_BAR / max_coupling;
        writeln!(
            out,
            "{:<30} {:>6} {:>6} {:>6.2} {}{}",
            truncate(&node.label, 30),
            node.afferent,
            node.efferent,
            node.instability,
            "█".repeat(filled),
            "░".repeat(HEATMAP_BAR - filled)
        )?;
    }

    writeln!(out, "{rule_light}")?;
    writeln!(out, "Ca=Afferent (incoming), Ce=Efferent (outgoing), I=Instability")
}

fn layer_nodes<'g>(graph: &'g Graph, ids: &[String], limit: usize) -> Vec<&'g Node> {
    ids.iter()
        .take(limit)
        .filter_map(|id| graph.node(id))
        .collect()
}

fn box_rule(left: char, right: char, width: usize) -> String {
    format!("{left}{}{right}\n", "═".repeat(width - 2))
}

fn box_line(content: &str, width: usize) -> String {
    let inner = width - 4;
    let text = if content.chars().count() > inner {
        format!("{}...", content.chars().take(inner - 3).collect::<String>())
    } else {
        content.to_string()
    };
    let padding = inner.saturating_sub(text.chars().count());
    format!("║ {}{} ║\n", text, " ".repeat(padding))
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Shorten to `max` characters, ending in `...` when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    format!("{}...", text.chars().take(keep).collect::<String>())
}

/// Replace `/ . : - *` with `_`
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| match c {
            '/' | '.' | ':' | '-' | '*' => '_',
            other => other,
        })
        .collect()
}

fn dot_id(id: &str) -> String {
    format!("n_{}", sanitize_id(id))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_dot(text: &str) -> String {
    text.replace('"', "\\\"").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, Morphism, Object};
    use crate::viz::graph::GraphBuilder;

    fn sample() -> Graph {
        let mut category = Category::new("demo");
        for id in ["cmd/main.go", "pkg/core.go", "pkg/util.go"] {
            category.add_object(Object::new(id, "file", id)).unwrap();
        }
        category
            .add_morphism(Morphism::new("m1", "cmd/main.go", "pkg/core.go", "import"))
            .unwrap();
        category
            .add_morphism(Morphism::new("m2", "pkg/core.go", "pkg/util.go", "import"))
            .unwrap();
        GraphBuilder::new(&category).build()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(Format::from("mermaid"), Format::Mermaid);
        assert_eq!(Format::from("DOT"), Format::Dot);
        assert_eq!(Format::from("json"), Format::Json);
        assert_eq!(Format::from("svg"), Format::Ascii);
    }

    #[test]
    fn test_sanitize_and_truncate() {
        assert_eq!(sanitize_id("pkg:a/b.go-x*"), "pkg_a_b_go_x_");
        assert_eq!(dot_id("a/b"), "n_a_b");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn ascii_lines_have_fixed_width() {
        let text = AsciiRenderer.render(&sample()).unwrap();
        assert!(text.starts_with('╔'));
        assert!(text.contains("demo DEPENDENCY GRAPH"));
        assert!(text.contains("[main.go] A:0 E:1 I:1.00"));
        for line in text.lines().filter(|l| l.starts_with('║')) {
            assert_eq!(line.chars().count(), ASCII_WIDTH);
        }
    }

    #[test]
    fn mermaid_skips_insignificant_edges() {
        let text = MermaidRenderer.render(&sample()).unwrap();
        assert!(text.starts_with("```mermaid\nflowchart BT\n"));
        assert!(text.contains("cmd_main_go[\"main.go<br/>A:0 E:1\"]"));
        assert!(!text.contains("-->"));
        assert!(text.contains("style L3 fill:#fce4ec"));
    }

    #[test]
    fn dot_colors_cross_layer_edges() {
        let text = DotRenderer.render(&sample()).unwrap();
        assert!(text.contains("rankdir=BT;"));
        assert!(text.contains("n_cmd_main_go -> n_pkg_core_go [penwidth=0.7, color=\"#cc0000\"];"));
        assert!(text.contains("fillcolor=\"#838383\""));
    }

    #[test]
    fn json_renderer_round_trips() {
        let graph = sample();
        let text = JsonRenderer.render(&graph).unwrap();
        let parsed: Graph = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.nodes, graph.nodes);
        assert_eq!(parsed.edges, graph.edges);
        assert_eq!(parsed.layers, graph.layers);
        assert_eq!(parsed.stats.layer_counts, graph.stats.layer_counts);
    }

    #[test]
    fn heatmap_lists_most_coupled_first() {
        let text = render_heatmap(&sample()).unwrap();
        let first_row = text.lines().nth(4).unwrap();
        assert!(first_row.starts_with("core.go"));
        assert!(first_row.ends_with(&"█".repeat(HEATMAP_BAR)));
    }

    #[test]
    fn layered_view_lists_every_layer() {
        let text = render_layered_ascii(&sample()).unwrap();
        assert!(text.contains("LAYER 3: APPLICATIONS (Application code (I=1.0))"));
        assert!(text.contains("LAYER 1: CORE"));
        assert!(text.contains("  (empty)"));
        assert!(text.contains("✓ DAG Verified"));
    }
}
