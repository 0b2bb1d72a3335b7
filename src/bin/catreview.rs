// Copyright 2025 Cowboy AI, LLC.

//! catreview - categorical codebase review
//!
//! Loads a categorical model (JSON) produced by an extractor and analyses,
//! verifies, abstracts or visualizes it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use schemars::{schema_for, JsonSchema};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use catreview::analysis::CycleAnalyzer;
use catreview::viz::{render_heatmap, render_layered_ascii, renderer_for};
use catreview::{
    apply_functor, generate_report_with, load_category, save_json, AnalysisConfig, Category,
    CategoryFunctor, FilterOptions, Format, Graph, GraphBuilder, PackageAbstractionFunctor, Report,
};

const SUMMARY_ROWS: usize = 5;

#[derive(Parser)]
#[command(name = "catreview")]
#[command(about = "Categorical codebase review and analysis", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML file with verification and report settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a categorical model and write a report
    Analyze {
        /// Model file
        model: PathBuf,

        /// Report file
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        pretty: bool,
    },

    /// Verify category axioms and, optionally, a cycle budget
    Verify {
        /// Model file
        model: PathBuf,

        /// Maximum allowed cycles
        #[arg(long)]
        max_cycles: Option<usize>,

        /// Exit with an error on any violation
        #[arg(long)]
        fail_on_violation: bool,
    },

    /// Abstract files into packages through a functor
    Abstract {
        /// Model file
        model: PathBuf,

        /// Output file for the package-level model
        #[arg(short, long, default_value = "abstract.json")]
        output: PathBuf,

        /// Pretty-print the JSON output
        #[arg(long, default_value_t = true, action = ArgAction::Set)]
        pretty: bool,
    },

    /// Visualize a model as a layered dependency graph
    Viz {
        /// Model file
        model: PathBuf,

        /// Output format: ascii, mermaid, dot, json
        #[arg(short, long, default_value = "ascii")]
        format: String,

        /// Extract one layer (0-3)
        #[arg(short, long)]
        layer: Option<usize>,

        /// Minimum total coupling of a node
        #[arg(long, default_value_t = 0)]
        min_coupling: usize,

        /// Maximum number of nodes (0 = unlimited)
        #[arg(long, default_value_t = 0)]
        max_nodes: usize,

        /// Coupling heatmap instead of a graph
        #[arg(long)]
        heatmap: bool,

        /// Detailed layered ASCII view
        #[arg(long)]
        layered: bool,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the JSON Schema of a persisted format
    Schema {
        /// Which document
        #[arg(value_enum)]
        kind: SchemaKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    Category,
    Report,
    Graph,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    match cli.command {
        Commands::Analyze {
            model,
            output,
            pretty,
        } => run_analyze(&model, &output, pretty, &config),
        Commands::Verify {
            model,
            max_cycles,
            fail_on_violation,
        } => run_verify(&model, max_cycles, fail_on_violation, &config),
        Commands::Abstract {
            model,
            output,
            pretty,
        } => run_abstract(&model, &output, pretty, &config),
        Commands::Viz {
            model,
            format,
            layer,
            min_coupling,
            max_nodes,
            heatmap,
            layered,
            output,
        } => {
            let options = FilterOptions {
                min_total_coupling: min_coupling,
                max_nodes,
                ..FilterOptions::default()
            };
            let view = if heatmap {
                View::Heatmap
            } else if layered {
                View::Layered
            } else {
                View::Graph(Format::from(format.as_str()))
            };
            run_viz(&model, &options, layer, view, output.as_deref())
        }
        Commands::Schema { kind } => run_schema(kind),
    }
}

fn load(model: &Path) -> Result<Category> {
    load_category(model).with_context(|| format!("failed to load model {}", model.display()))
}

fn run_analyze(model: &Path, output: &Path, pretty: bool, config: &AnalysisConfig) -> Result<()> {
    println!("Analyzing categorical model: {}", model.display());
    let category = load(model)?;
    let report = generate_report_with(&category, config).context("analysis failed")?;

    print_summary(&report);

    save_json(&report, output, pretty).context("failed to save report")?;
    println!("\nFull report saved to: {}", output.display());
    Ok(())
}

fn print_summary(report: &Report) {
    let stat = |key: &str| report.category_stats.get(key).copied().unwrap_or(0);

    println!("\nCategorical Analysis Report");
    println!("===========================\n");
    println!("Category Statistics:");
    println!("  Objects:    {}", stat("objects"));
    println!("  Morphisms:  {}", stat("morphisms"));
    println!("\nComplexity Metrics:");
    println!("  Diagram Complexity:    {:.2}", report.diagram_complexity);
    println!("  Kolmogorov Complexity: {} bytes", report.kolmogorov_complexity);
    println!("\nDependency Analysis:");
    println!("  Cycles Found: {}", report.cycles.len());

    if !report.cycles.is_empty() {
        println!("\n  Top {SUMMARY_ROWS} Cycles:");
        for (i, cycle) in report.cycles.iter().take(SUMMARY_ROWS).enumerate() {
            println!(
                "    Cycle {} (length {}): {}",
                i + 1,
                cycle.length,
                cycle.objects.join(" -> ")
            );
        }
    }

    println!("\nTop {SUMMARY_ROWS} Most Unstable Components:");
    for m in report.top_unstable.iter().take(SUMMARY_ROWS) {
        println!(
            "  {}: I={:.2} (Ce={}, Ca={})",
            m.object_id, m.instability, m.efferent_coupling, m.afferent_coupling
        );
    }

    println!("\nTop {SUMMARY_ROWS} Most Coupled Components:");
    for m in report.top_coupled.iter().take(SUMMARY_ROWS) {
        println!(
            "  {}: {} total (Ce={}, Ca={})",
            m.object_id,
            m.total_coupling(),
            m.efferent_coupling,
            m.afferent_coupling
        );
    }
}

fn run_verify(
    model: &Path,
    max_cycles: Option<usize>,
    fail_on_violation: bool,
    config: &AnalysisConfig,
) -> Result<()> {
    println!("Verifying category axioms: {}", model.display());
    let category = load(model)?;

    println!("Checking associativity and identity laws...");
    if let Err(e) = category.verify_axioms_with(&config.verification) {
        println!("❌ Axiom verification FAILED: {e}");
        if fail_on_violation {
            return Err(e.into());
        }
        return Ok(());
    }
    println!("✅ Category axioms verified successfully");

    if let Some(limit) = max_cycles {
        println!("\nChecking for dependency cycles (max allowed: {limit})...");
        let cycles = CycleAnalyzer::new(&category).find_cycles();
        println!("Found {} cycles", cycles.len());

        if cycles.len() > limit {
            println!("❌ Cycle limit exceeded: {} > {}", cycles.len(), limit);
            if fail_on_violation {
                bail!("too many cycles: {} > {}", cycles.len(), limit);
            }
        } else {
            println!("✅ Cycle count within limit");
        }
    }
    Ok(())
}

fn run_abstract(model: &Path, output: &Path, pretty: bool, config: &AnalysisConfig) -> Result<()> {
    println!("Creating package-level abstraction from: {}", model.display());
    let files = load(model)?;

    let mut functor = PackageAbstractionFunctor::new(&files, Category::new("package_level"));
    println!("Mapping files and dependencies to packages...");
    let summary = apply_functor(&mut functor);
    for (id, e) in &summary.failed_objects {
        println!("Warning: failed to map {id}: {e}");
    }

    println!("Verifying functor laws...");
    match functor.verify_laws_with(&config.verification) {
        Ok(()) => println!("✅ Functor laws verified"),
        Err(e) => {
            warn!(error = %e, "functor law verification failed");
            println!("Warning: functor law verification failed: {e}");
        }
    }

    let packages = functor.into_target();
    let stats = packages.stats();
    println!("\nAbstracted Category:");
    println!("  Packages:             {}", stats.objects);
    println!("  Package Dependencies: {}", stats.morphisms);

    save_json(&packages, output, pretty).context("failed to save abstracted model")?;
    println!("\nAbstracted model saved to: {}", output.display());
    Ok(())
}

enum View {
    Graph(Format),
    Heatmap,
    Layered,
}

fn run_viz(
    model: &Path,
    options: &FilterOptions,
    layer: Option<usize>,
    view: View,
    output: Option<&Path>,
) -> Result<()> {
    eprintln!("Loading categorical model: {}", model.display());
    let category = load(model)?;

    let mut graph: Graph = GraphBuilder::new(&category).build();
    eprintln!(
        "Built graph: {} nodes, {} edges, DAG: {}",
        graph.stats.total_nodes, graph.stats.total_edges, graph.is_dag
    );

    if options.min_total_coupling > 0 || options.max_nodes > 0 {
        graph = graph.filter(options);
        eprintln!(
            "After filtering: {} nodes, {} edges",
            graph.stats.total_nodes, graph.stats.total_edges
        );
    }

    if let Some(layer) = layer {
        graph = graph.extract_layer(layer);
        eprintln!(
            "Extracted layer {}: {} nodes, {} edges",
            layer, graph.stats.total_nodes, graph.stats.total_edges
        );
    }

    let text = match view {
        View::Heatmap => render_heatmap(&graph)?,
        View::Layered => render_layered_ascii(&graph)?,
        View::Graph(format) => renderer_for(format)
            .render(&graph)
            .context("generation failed")?,
    };

    match output {
        Some(path) => {
            fs::write(path, text)
                .with_context(|| format!("failed to write output {}", path.display()))?;
            info!(path = %path.display(), "visualization written");
            eprintln!("Output written to: {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn schema_json<T: JsonSchema>() -> Result<String> {
    Ok(serde_json::to_string_pretty(&schema_for!(T))?)
}

fn run_schema(kind: SchemaKind) -> Result<()> {
    let schema = match kind {
        SchemaKind::Category => schema_json::<Category>()?,
        SchemaKind::Report => schema_json::<Report>()?,
        SchemaKind::Graph => schema_json::<Graph>()?,
    };
    println!("{schema}");
    Ok(())
}
