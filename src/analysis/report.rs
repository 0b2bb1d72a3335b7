// Copyright 2025 Cowboy AI, LLC.

//! Aggregate analysis report

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::complexity::ComplexityAnalyzer;
use super::coupling::{CouplingMap, CouplingMetrics};
use super::cycles::{Cycle, CycleAnalyzer};
use crate::category::Category;
use crate::config::AnalysisConfig;
use crate::errors::CategoryResult;

/// Everything the analyzers compute for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    /// `objects`, `morphisms` and `identities` counts
    pub category_stats: IndexMap<String, usize>,
    /// Basu-Isik diagram complexity
    pub diagram_complexity: f64,
    /// Compressed-size complexity estimate, in bytes
    pub kolmogorov_complexity: usize,
    /// Coupling record per object
    pub coupling_metrics: CouplingMap,
    /// Every cycle record found
    pub cycles: Vec<Cycle>,
    /// Highest instability first
    pub top_unstable: Vec<CouplingMetrics>,
    /// Highest total coupling first
    pub top_coupled: Vec<CouplingMetrics>,
}

/// Generate a report with default settings
pub fn generate_report(category: &Category) -> CategoryResult<Report> {
    generate_report_with(category, &AnalysisConfig::default())
}

/// Generate a report, taking the top-N length from `config`
pub fn generate_report_with(category: &Category, config: &AnalysisConfig) -> CategoryResult<Report> {
    let complexity = ComplexityAnalyzer::new(category);
    let diagram_complexity = complexity.diagram_complexity();
    let kolmogorov_complexity = complexity.kolmogorov_complexity()?;
    let coupling_metrics = complexity.compute_coupling();
    let cycles = CycleAnalyzer::new(category).find_cycles();

    let top_n = config.report.top_n;
    let top_unstable = find_top_n(&coupling_metrics, top_n, |m| m.instability);
    let top_coupled = find_top_n(&coupling_metrics, top_n, |m| m.total_coupling() as f64);

    let stats = category.stats();
    let category_stats = IndexMap::from([
        ("objects".to_string(), stats.objects),
        ("morphisms".to_string(), stats.morphisms),
        ("identities".to_string(), stats.identities),
    ]);

    info!(
        category = %category.name(),
        diagram_complexity,
        kolmogorov_complexity,
        cycles = cycles.len(),
        "report generated"
    );

    Ok(Report {
        category_stats,
        diagram_complexity,
        kolmogorov_complexity,
        coupling_metrics,
        cycles,
        top_unstable,
        top_coupled,
    })
}

/// The `n` highest-scoring records by partial selection sort
///
/// Only a strictly greater score displaces the current pick, and the pick is
/// rotated into place so the unselected records keep their relative order.
/// Ties therefore follow object insertion order.
pub fn find_top_n<F>(metrics: &CouplingMap, n: usize, score: F) -> Vec<CouplingMetrics>
where
    F: Fn(&CouplingMetrics) -> f64,
{
    let mut records: Vec<&CouplingMetrics> = metrics.values().collect();

    for i in 0..n.min(records.len()) {
        let mut best = i;
        let mut best_score = score(records[i]);
        for (j, candidate) in records.iter().enumerate().skip(i + 1) {
            let candidate_score = score(*candidate);
            if candidate_score > best_score {
                best = j;
                best_score = candidate_score;
            }
        }
        records[i..=best].rotate_right(1);
    }

    records.into_iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Morphism, Object};

    fn record(id: &str, afferent: usize, efferent: usize) -> (String, CouplingMetrics) {
        (
            id.to_string(),
            CouplingMetrics {
                object_id: id.to_string(),
                afferent_coupling: afferent,
                efferent_coupling: efferent,
                instability: crate::analysis::coupling::instability(afferent, efferent),
                abstractness: 0.0,
            },
        )
    }

    #[test]
    fn test_find_top_n_orders_by_score() {
        let metrics: CouplingMap =
            [record("a", 1, 0), record("b", 5, 5), record("c", 0, 3)].into_iter().collect();

        let top: Vec<_> = find_top_n(&metrics, 2, |m| m.total_coupling() as f64)
            .into_iter()
            .map(|m| m.object_id)
            .collect();
        assert_eq!(top, vec!["b", "c"]);
    }

    #[test]
    fn top_n_larger_than_input_returns_everything() {
        let metrics: CouplingMap = [record("a", 1, 0), record("b", 0, 1)].into_iter().collect();
        assert_eq!(find_top_n(&metrics, 10, |m| m.instability).len(), 2);
        assert!(find_top_n(&metrics, 0, |m| m.instability).is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let metrics: CouplingMap =
            [record("x", 0, 1), record("y", 0, 1), record("z", 0, 1)].into_iter().collect();
        let top: Vec<_> = find_top_n(&metrics, 3, |m| m.instability)
            .into_iter()
            .map(|m| m.object_id)
            .collect();
        assert_eq!(top, vec!["x", "y", "z"]);
    }

    #[test]
    fn ties_keep_insertion_order_around_a_higher_score() {
        let metrics: CouplingMap =
            [record("a", 1, 0), record("b", 1, 0), record("c", 2, 0)].into_iter().collect();
        let top: Vec<_> = find_top_n(&metrics, 3, |m| m.total_coupling() as f64)
            .into_iter()
            .map(|m| m.object_id)
            .collect();
        assert_eq!(top, vec!["c", "a", "b"]);
    }

    #[test]
    fn report_respects_configured_top_n() {
        let mut category = Category::new("top");
        for id in ["A", "B", "C", "D"] {
            category.add_object(Object::new(id, "module", id)).unwrap();
        }
        category
            .add_morphism(Morphism::new("ab", "A", "B", "import"))
            .unwrap();

        let mut config = AnalysisConfig::default();
        config.report.top_n = 2;
        let report = generate_report_with(&category, &config).unwrap();

        assert_eq!(report.top_unstable.len(), 2);
        assert_eq!(report.top_unstable[0].object_id, "A");
        assert_eq!(report.coupling_metrics.len(), 4);
        assert_eq!(report.category_stats["identities"], 4);
    }
}
