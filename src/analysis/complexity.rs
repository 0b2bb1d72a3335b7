// Copyright 2025 Cowboy AI, LLC.

//! Diagram complexity and compression-based complexity estimates
//!
//! Diagram complexity follows `c(D) = Σ c_obj(o) + Σ c_morph(m) + c_comp(D)`.
//! The Kolmogorov estimate is the zstd-compressed size of the category's JSON
//! encoding, an upper bound rather than the true value.

use std::collections::HashMap;

use tracing::debug;

use super::coupling::{compute_coupling, CouplingMap};
use crate::category::{Category, Morphism, MorphismKind, Object, ObjectKind};
use crate::errors::{CategoryError, CategoryResult};

/// zstd level for the complexity estimate; fixed so results are reproducible
const COMPRESSION_LEVEL: i32 = 3;

/// Read-only complexity metrics over a category
pub struct ComplexityAnalyzer<'a> {
    category: &'a Category,
}

impl<'a> ComplexityAnalyzer<'a> {
    /// Create an analyzer borrowing `category`
    pub fn new(category: &'a Category) -> Self {
        Self { category }
    }

    /// Weighted sum of object, morphism and composition-chain complexity
    pub fn diagram_complexity(&self) -> f64 {
        let objects = self.object_complexity();
        let morphisms = self.morphism_complexity();
        let composition = self.composition_complexity();
        debug!(objects, morphisms, composition, "diagram complexity components");
        objects + morphisms + composition
    }

    /// `Σ weight(o) * (1 + log2(1 + |metadata|))`
    pub fn object_complexity(&self) -> f64 {
        self.category.objects().map(object_complexity).sum()
    }

    /// `Σ weight(m)` over non-identity morphisms
    pub fn morphism_complexity(&self) -> f64 {
        self.category.morphisms().map(morphism_weight).sum()
    }

    /// `log2(1 + chains)` where `chains` counts directly composable
    /// predecessor links
    pub fn composition_complexity(&self) -> f64 {
        let mut incoming: HashMap<&str, usize> = HashMap::new();
        for m in self.category.non_identity_morphisms() {
            *incoming.entry(m.target.as_str()).or_default() += 1;
        }

        let chains: usize = self
            .category
            .non_identity_morphisms()
            .filter_map(|m| incoming.get(m.source.as_str()))
            .sum();

        (1.0 + chains as f64).log2()
    }

    /// Compressed size in bytes of the category's JSON encoding
    pub fn kolmogorov_complexity(&self) -> CategoryResult<usize> {
        let data = serde_json::to_vec(self.category)?;
        let compressed = zstd::encode_all(data.as_slice(), COMPRESSION_LEVEL)
            .map_err(|e| CategoryError::Compression(e.to_string()))?;
        Ok(compressed.len())
    }

    /// Coupling records for every object
    pub fn compute_coupling(&self) -> CouplingMap {
        compute_coupling(self.category)
    }
}

/// Complexity of one object
pub fn object_complexity(object: &Object) -> f64 {
    let weight = match object.kind {
        ObjectKind::Struct | ObjectKind::Interface => 2.0,
        ObjectKind::Function => 1.5,
        ObjectKind::File | ObjectKind::Package => 0.5,
        _ => 1.0,
    };
    weight * (1.0 + (1.0 + object.metadata.len() as f64).log2())
}

/// Complexity of one morphism; identities contribute nothing
pub fn morphism_weight(morphism: &Morphism) -> f64 {
    match morphism.kind {
        MorphismKind::Identity => 0.0,
        MorphismKind::Import | MorphismKind::Dependency => 1.5,
        MorphismKind::FunctionCall => 2.0,
        MorphismKind::TypeDependency => 1.8,
        MorphismKind::Composed => 2.5,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn empty_category_has_zero_complexity() {
        let category = Category::new("empty");
        let analyzer = ComplexityAnalyzer::new(&category);
        assert_eq!(analyzer.diagram_complexity(), 0.0);
    }

    #[test]
    fn test_object_weights() {
        let plain = Object::new("s", ObjectKind::Struct, "S");
        assert!((object_complexity(&plain) - 2.0).abs() < EPSILON);

        // one metadata entry: 0.5 * (1 + log2(2))
        let file = Object::new("f.go", ObjectKind::File, "f.go").with_metadata("package", "main");
        assert!((object_complexity(&file) - 1.0).abs() < EPSILON);

        let other = Object::new("t", "trait", "T");
        assert!((object_complexity(&other) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_morphism_weights() {
        assert_eq!(morphism_weight(&Morphism::identity("A")), 0.0);
        assert_eq!(morphism_weight(&Morphism::new("m", "A", "B", "import")), 1.5);
        assert_eq!(morphism_weight(&Morphism::new("m", "A", "B", "function_call")), 2.0);
        assert_eq!(morphism_weight(&Morphism::new("m", "A", "B", "type_dependency")), 1.8);
        assert_eq!(morphism_weight(&Morphism::new("m", "A", "B", "composed")), 2.5);
        assert_eq!(morphism_weight(&Morphism::new("m", "A", "B", "inheritance")), 1.0);
    }

    #[test]
    fn chain_counts_predecessor_links() {
        let mut category = Category::new("chain");
        for id in ["A", "B", "C"] {
            category.add_object(Object::new(id, ObjectKind::Module, id)).unwrap();
        }
        category
            .add_morphism(Morphism::new("f", "A", "B", "dependency"))
            .unwrap();
        category
            .add_morphism(Morphism::new("g", "B", "C", "dependency"))
            .unwrap();

        // g has one predecessor (f), f has none
        let analyzer = ComplexityAnalyzer::new(&category);
        assert!((analyzer.composition_complexity() - 1.0).abs() < EPSILON);
        assert!((analyzer.morphism_complexity() - 3.0).abs() < EPSILON);
        assert!((analyzer.diagram_complexity() - 7.0).abs() < EPSILON);
    }

    #[test]
    fn kolmogorov_estimate_is_deterministic() {
        let mut category = Category::new("k");
        category.add_object(Object::new("A", ObjectKind::Module, "A")).unwrap();
        let analyzer = ComplexityAnalyzer::new(&category);

        let first = analyzer.kolmogorov_complexity().unwrap();
        assert!(first > 0);
        assert_eq!(analyzer.kolmogorov_complexity().unwrap(), first);
        assert_eq!(ComplexityAnalyzer::new(&category.clone()).kolmogorov_complexity().unwrap(), first);
    }
}
