// Copyright 2025 Cowboy AI, LLC.

//! Property tests for the category model
//!
//! Random codebases are built from object counts and edge index pairs; the
//! structural invariants must hold for every one of them.

use catreview::analysis::compute_coupling;
use catreview::{Category, CategoryError, Morphism, Object, ObjectKind};
use proptest::prelude::*;

fn random_category(objects: usize, edges: &[(usize, usize)]) -> Category {
    let mut category = Category::new("random");
    for i in 0..objects {
        category
            .add_object(Object::new(format!("o{i}"), ObjectKind::Module, format!("o{i}")))
            .unwrap();
    }
    for (k, (a, b)) in edges.iter().enumerate() {
        let source = format!("o{}", a % objects);
        let target = format!("o{}", b % objects);
        category
            .add_morphism(Morphism::new(format!("e{k}"), source, target, "dependency"))
            .unwrap();
    }
    category
}

fn edges() -> impl Strategy<Value = Vec<(usize, usize)>> {
    proptest::collection::vec((any::<usize>(), any::<usize>()), 0..40)
}

proptest! {
    #[test]
    fn every_object_owns_exactly_one_identity(n in 1usize..16, edges in edges()) {
        let category = random_category(n, &edges);
        let stats = category.stats();

        prop_assert_eq!(stats.identities, stats.objects);
        for object in category.objects() {
            let identity = category.identity(&object.id).unwrap();
            prop_assert_eq!(&identity.source, &object.id);
            prop_assert_eq!(&identity.target, &object.id);
            prop_assert!(identity.is_identity());
        }
        prop_assert_eq!(category.morphisms().count(), stats.morphisms + stats.identities);
        prop_assert!(category.check_integrity().is_ok());
    }

    #[test]
    fn composition_defined_exactly_when_endpoints_meet(n in 1usize..10, edges in edges()) {
        let category = random_category(n, &edges);
        let morphisms: Vec<&Morphism> = category.morphisms().collect();

        for f in morphisms.iter().take(12) {
            for g in morphisms.iter().take(12) {
                match category.compose(f, g) {
                    Ok(composed) => {
                        prop_assert_eq!(&f.target, &g.source);
                        prop_assert_eq!(&composed.source, &f.source);
                        prop_assert_eq!(&composed.target, &g.target);
                    }
                    Err(e) => {
                        prop_assert_ne!(&f.target, &g.source);
                        let is_not_composable = matches!(e, CategoryError::NotComposable { .. });
                        prop_assert!(is_not_composable);
                    }
                }
            }
        }
    }

    #[test]
    fn axioms_hold_on_built_categories(n in 1usize..12, edges in edges()) {
        let category = random_category(n, &edges);
        prop_assert!(category.verify_axioms().is_ok());
    }

    #[test]
    fn dangling_morphism_leaves_category_unchanged(n in 1usize..8, edges in edges()) {
        let mut category = random_category(n, &edges);
        let before = category.clone();

        let dangling = Morphism::new("dangling", "o0", "missing", "import");
        let err = category.add_morphism(dangling).unwrap_err();
        prop_assert!(err.is_structural());
        prop_assert_eq!(&category, &before);

        let backwards = Morphism::new("backwards", "missing", "o0", "import");
        prop_assert!(category.add_morphism(backwards).is_err());
        prop_assert_eq!(&category, &before);
    }

    #[test]
    fn coupling_is_conserved(n in 1usize..16, edges in edges()) {
        let category = random_category(n, &edges);
        let coupling = compute_coupling(&category);

        let afferent: usize = coupling.values().map(|m| m.afferent_coupling).sum();
        let efferent: usize = coupling.values().map(|m| m.efferent_coupling).sum();
        prop_assert_eq!(afferent, edges.len());
        prop_assert_eq!(efferent, edges.len());

        for record in coupling.values() {
            prop_assert!((0.0..=1.0).contains(&record.instability));
            if record.total_coupling() == 0 {
                prop_assert_eq!(record.instability, 0.0);
            }
        }
    }
}

#[test]
fn test_two_object_scenario() {
    let mut category = Category::new("scenario");
    category.add_object(Object::new("A", "module", "A")).unwrap();
    category.add_object(Object::new("B", "module", "B")).unwrap();
    category
        .add_morphism(Morphism::new("f", "A", "B", "dependency"))
        .unwrap();

    let stats = category.stats();
    assert_eq!((stats.objects, stats.morphisms, stats.identities), (2, 1, 2));
    assert!(category.verify_axioms().is_ok());

    let coupling = compute_coupling(&category);
    assert_eq!(coupling["A"].afferent_coupling, 0);
    assert_eq!(coupling["A"].efferent_coupling, 1);
    assert_eq!(coupling["A"].instability, 1.0);
    assert_eq!(coupling["B"].afferent_coupling, 1);
    assert_eq!(coupling["B"].efferent_coupling, 0);
    assert_eq!(coupling["B"].instability, 0.0);
}

#[test]
fn duplicate_insertions_are_reported() {
    let mut category = Category::new("dups");
    category.add_object(Object::new("A", "module", "A")).unwrap();
    category.add_object(Object::new("B", "module", "B")).unwrap();
    category
        .add_morphism(Morphism::new("f", "A", "B", "dependency"))
        .unwrap();

    assert!(category.add_object(Object::new("A", "struct", "other")).is_err());
    assert!(category
        .add_morphism(Morphism::new("f", "B", "A", "import"))
        .is_err());
    assert_eq!(category.object("A").unwrap().kind, ObjectKind::Module);
    assert_eq!(category.morphism("f").unwrap().source, "A");
}

#[test]
fn loaded_category_with_dangling_edge_is_still_analysable() {
    let json = r#"{
        "name": "partial",
        "objects": {"A": {"id": "A", "type": "module", "name": "A", "metadata": {}}},
        "morphisms": {
            "id_A": {"id": "id_A", "source": "A", "target": "A", "type": "identity", "metadata": {"is_identity": true}},
            "ext": {"id": "ext", "source": "A", "target": "fmt", "type": "import", "metadata": {}}
        },
        "identities": {"A": {"id": "id_A", "source": "A", "target": "A", "type": "identity", "metadata": {"is_identity": true}}}
    }"#;
    let category: Category = serde_json::from_str(json).unwrap();
    assert!(category.check_integrity().is_ok());

    let coupling = compute_coupling(&category);
    assert_eq!(coupling.len(), 1);
    assert_eq!(coupling["A"].efferent_coupling, 1);
    assert_eq!(coupling["A"].instability, 1.0);
}
