// Copyright 2025 Cowboy AI, LLC.

//! Functors for mapping between codebase categories
//!
//! Functors preserve the structure of a category while changing its level of
//! detail, for example collapsing files into the packages that contain them.
//! Both mappings memoize by source ID: mapping the same source entity twice
//! yields the same target entity.

use std::collections::HashMap;

use serde_json::json;
use tracing::{debug, info, warn};

use super::codebase_category::Category;
use super::kinds::{MorphismKind, ObjectKind};
use super::morphism::Morphism;
use super::object::{append_to_list, metadata_str, Object};
use crate::config::VerificationConfig;
use crate::errors::{CategoryError, CategoryResult, Law};

/// Metadata key holding the package an object belongs to
pub const PACKAGE_KEY: &str = "package";

/// ID prefix of package objects created by [`PackageAbstractionFunctor`]
pub const PACKAGE_PREFIX: &str = "pkg:";

/// A structure-preserving map `F: C → D`
///
/// `map_*` register images in the target category. `*_image` compute the same
/// images without registering anything; law verification uses only those, so
/// checking the laws never alters the target.
pub trait CategoryFunctor<'a> {
    /// Name of the functor
    fn name(&self) -> &str;

    /// Source category `C`
    fn source(&self) -> &'a Category;

    /// Target category `D`
    fn target(&self) -> &Category;

    /// Map an object, registering its image in the target if needed
    fn map_object(&mut self, object: &Object) -> CategoryResult<Object>;

    /// Map a morphism, registering its image in the target if needed
    fn map_morphism(&mut self, morphism: &Morphism) -> CategoryResult<Morphism>;

    /// ID of the image of an object, without side effects
    fn object_image(&self, object: &Object) -> CategoryResult<String>;

    /// Image of a morphism, without side effects
    fn morphism_image(&self, morphism: &Morphism) -> CategoryResult<Morphism>;

    /// Verify the functor laws with the default sampling cap
    fn verify_laws(&self) -> CategoryResult<()> {
        self.verify_laws_with(&VerificationConfig::default())
    }

    /// Verify `F(id_A) = id_F(A)` for every object and `F(g∘f) = F(g)∘F(f)`
    /// for at most `max_composition_checks` composable pairs
    fn verify_laws_with(&self, config: &VerificationConfig) -> CategoryResult<()> {
        verify_identity_law(self)?;
        let checked = verify_composition_law(self, config.max_composition_checks)?;
        info!(functor = %self.name(), sampled_pairs = checked, "functor laws verified");
        Ok(())
    }
}

/// `F(id_A) = id_F(A)`, compared at endpoint level
pub fn verify_identity_law<'a, F>(functor: &F) -> CategoryResult<()>
where
    F: CategoryFunctor<'a> + ?Sized,
{
    for object in functor.source().objects() {
        let image = functor.object_image(object).map_err(|e| {
            CategoryError::law(
                Law::FunctorIdentity,
                format!("cannot map object {}: {}", object.id, e),
            )
        })?;

        let identity = functor
            .source()
            .identity(&object.id)
            .cloned()
            .unwrap_or_else(|| Morphism::identity(&object.id));
        let mapped = functor.morphism_image(&identity).map_err(|e| {
            CategoryError::law(
                Law::FunctorIdentity,
                format!("cannot map identity of {}: {}", object.id, e),
            )
        })?;

        if mapped.source != image || mapped.target != image {
            return Err(CategoryError::law(
                Law::FunctorIdentity,
                format!("F(id_{}) is not id_F({})", object.id, object.id),
            ));
        }
    }
    Ok(())
}

/// `F(g∘f) = F(g)∘F(f)` on a bounded sample of composable pairs
///
/// Returns the number of pairs checked.
pub fn verify_composition_law<'a, F>(functor: &F, max_checks: usize) -> CategoryResult<usize>
where
    F: CategoryFunctor<'a> + ?Sized,
{
    let source = functor.source();
    let mut by_source: HashMap<&str, Vec<&Morphism>> = HashMap::new();
    for m in source.morphisms() {
        by_source.entry(m.source.as_str()).or_default().push(m);
    }

    let mut checked = 0;
    for f in source.morphisms() {
        for g in by_source.get(f.target.as_str()).into_iter().flatten() {
            if checked >= max_checks {
                return Ok(checked);
            }

            let composed = source.compose(f, g)?;
            let violation = |reason: String| {
                CategoryError::law(
                    Law::FunctorComposition,
                    format!("F({}∘{}): {}", g.id, f.id, reason),
                )
            };

            let mapped_composite = functor
                .morphism_image(&composed)
                .map_err(|e| violation(format!("cannot map composite: {e}")))?;
            let mapped_f = functor
                .morphism_image(f)
                .map_err(|e| violation(format!("cannot map {}: {}", f.id, e)))?;
            let mapped_g = functor
                .morphism_image(g)
                .map_err(|e| violation(format!("cannot map {}: {}", g.id, e)))?;
            let composite_of_images = functor
                .target()
                .compose(&mapped_f, &mapped_g)
                .map_err(|e| violation(format!("images do not compose: {e}")))?;

            if !mapped_composite.same_endpoints(&composite_of_images) {
                return Err(violation(format!(
                    "{}→{} != {}→{}",
                    mapped_composite.source,
                    mapped_composite.target,
                    composite_of_images.source,
                    composite_of_images.target
                )));
            }
            checked += 1;
        }
    }
    Ok(checked)
}

/// Outcome of applying a functor to a whole source category
#[derive(Debug, Clone, Default)]
pub struct MappingSummary {
    /// Objects mapped successfully
    pub mapped_objects: usize,
    /// Morphisms mapped successfully
    pub mapped_morphisms: usize,
    /// Objects that could not be mapped, with the reason
    pub failed_objects: Vec<(String, CategoryError)>,
    /// Morphisms that could not be mapped, with the reason
    pub failed_morphisms: Vec<(String, CategoryError)>,
}

impl MappingSummary {
    /// Whether every object and morphism was mapped
    pub fn is_complete(&self) -> bool {
        self.failed_objects.is_empty() && self.failed_morphisms.is_empty()
    }
}

/// Map every object, then every morphism, of the functor's source category
///
/// Best effort: a failing item is recorded and skipped.
pub fn apply_functor<'a, F>(functor: &mut F) -> MappingSummary
where
    F: CategoryFunctor<'a> + ?Sized,
{
    let source = functor.source();
    let mut summary = MappingSummary::default();

    for object in source.objects() {
        match functor.map_object(object) {
            Ok(_) => summary.mapped_objects += 1,
            Err(e) => {
                warn!(functor = %functor.name(), object = %object.id, error = %e, "failed to map object");
                summary.failed_objects.push((object.id.clone(), e));
            }
        }
    }

    for morphism in source.morphisms() {
        match functor.map_morphism(morphism) {
            Ok(_) => summary.mapped_morphisms += 1,
            Err(e) => {
                debug!(functor = %functor.name(), morphism = %morphism.id, error = %e, "skipping morphism");
                summary.failed_morphisms.push((morphism.id.clone(), e));
            }
        }
    }

    info!(
        functor = %functor.name(),
        objects = summary.mapped_objects,
        morphisms = summary.mapped_morphisms,
        failed_objects = summary.failed_objects.len(),
        failed_morphisms = summary.failed_morphisms.len(),
        "functor applied"
    );
    summary
}

/// Identity functor - copies a category into a fresh target verbatim
pub struct IdentityFunctor<'a> {
    source: &'a Category,
    target: Category,
}

impl<'a> IdentityFunctor<'a> {
    /// Create an identity functor; the target starts empty with the source's name
    pub fn new(source: &'a Category) -> Self {
        Self {
            source,
            target: Category::new(source.name()),
        }
    }

    /// Consume the functor, returning the target category
    pub fn into_target(self) -> Category {
        self.target
    }

    fn source_object(&self, id: &str) -> CategoryResult<&'a Object> {
        self.source
            .object(id)
            .ok_or_else(|| CategoryError::NotFound(format!("source object {id} not found")))
    }
}

impl<'a> CategoryFunctor<'a> for IdentityFunctor<'a> {
    fn name(&self) -> &str {
        "Identity"
    }

    fn source(&self) -> &'a Category {
        self.source
    }

    fn target(&self) -> &Category {
        &self.target
    }

    fn map_object(&mut self, object: &Object) -> CategoryResult<Object> {
        if let Some(existing) = self.target.object(&object.id) {
            return Ok(existing.clone());
        }
        self.target.add_object(object.clone())?;
        Ok(object.clone())
    }

    fn map_morphism(&mut self, morphism: &Morphism) -> CategoryResult<Morphism> {
        let source = self.source_object(&morphism.source)?;
        let target = self.source_object(&morphism.target)?;
        self.map_object(source)?;
        self.map_object(target)?;

        if morphism.is_identity() {
            return self
                .target
                .identity(&morphism.source)
                .cloned()
                .ok_or_else(|| CategoryError::NotFound(format!("identity of {}", morphism.source)));
        }
        if let Some(existing) = self.target.morphism(&morphism.id) {
            return Ok(existing.clone());
        }
        self.target.add_morphism(morphism.clone())?;
        Ok(morphism.clone())
    }

    fn object_image(&self, object: &Object) -> CategoryResult<String> {
        Ok(object.id.clone())
    }

    fn morphism_image(&self, morphism: &Morphism) -> CategoryResult<Morphism> {
        Ok(morphism.clone())
    }
}

/// Package abstraction - maps a file-level category to a package-level one
///
/// - File objects map to `pkg:<name>` objects keyed by their `"package"`
///   metadata; each package lists its files under `"files"`.
/// - A dependency between files in different packages maps to a single
///   `dep:<pkgA>-><pkgB>` morphism accumulating `"source_files"` and
///   `"target_files"`.
/// - A relationship inside one package maps to that package's identity.
pub struct PackageAbstractionFunctor<'a> {
    source: &'a Category,
    target: Category,
    object_map: HashMap<String, String>,
    morphism_map: HashMap<String, String>,
}

impl<'a> PackageAbstractionFunctor<'a> {
    /// Create a functor from `source` into `target`
    pub fn new(source: &'a Category, target: Category) -> Self {
        Self {
            source,
            target,
            object_map: HashMap::new(),
            morphism_map: HashMap::new(),
        }
    }

    /// Consume the functor, returning the package-level category
    pub fn into_target(self) -> Category {
        self.target
    }

    fn package_of(object: &Object) -> CategoryResult<(String, &str)> {
        let name = metadata_str(&object.metadata, PACKAGE_KEY).ok_or_else(|| {
            CategoryError::MissingMetadata {
                object: object.id.clone(),
                key: PACKAGE_KEY.to_string(),
            }
        })?;
        Ok((format!("{PACKAGE_PREFIX}{name}"), name))
    }

    fn source_object(&self, id: &str, endpoint: &str) -> CategoryResult<&'a Object> {
        self.source
            .object(id)
            .ok_or_else(|| CategoryError::NotFound(format!("{endpoint} object {id} not found")))
    }

    fn dependency_id(source_pkg: &str, target_pkg: &str) -> String {
        format!("dep:{source_pkg}->{target_pkg}")
    }

    fn registered_object(&self, id: &str) -> CategoryResult<Object> {
        self.target
            .object(id)
            .cloned()
            .ok_or_else(|| CategoryError::NotFound(format!("target object {id} not found")))
    }

    fn registered_morphism(&self, id: &str) -> CategoryResult<Morphism> {
        self.target
            .morphism(id)
            .cloned()
            .ok_or_else(|| CategoryError::NotFound(format!("target morphism {id} not found")))
    }
}

impl<'a> CategoryFunctor<'a> for PackageAbstractionFunctor<'a> {
    fn name(&self) -> &str {
        "FileToPackage"
    }

    fn source(&self) -> &'a Category {
        self.source
    }

    fn target(&self) -> &Category {
        &self.target
    }

    fn map_object(&mut self, object: &Object) -> CategoryResult<Object> {
        if let Some(package_id) = self.object_map.get(&object.id) {
            return self.registered_object(package_id);
        }

        let (package_id, package_name) = Self::package_of(object)?;
        match self.target.object_metadata_mut(&package_id) {
            Some(metadata) => {
                append_to_list(metadata, "files", &object.id);
            }
            None => {
                let package = Object::new(&package_id, ObjectKind::Package, package_name)
                    .with_metadata("files", json!([object.id]));
                self.target.add_object(package)?;
            }
        }

        self.object_map.insert(object.id.clone(), package_id.clone());
        self.registered_object(&package_id)
    }

    fn map_morphism(&mut self, morphism: &Morphism) -> CategoryResult<Morphism> {
        if let Some(mapped_id) = self.morphism_map.get(&morphism.id) {
            return self.registered_morphism(mapped_id);
        }

        let source_obj = self.source_object(&morphism.source, "source")?;
        let target_obj = self.source_object(&morphism.target, "target")?;
        let source_pkg = self.map_object(source_obj)?.id;
        let target_pkg = self.map_object(target_obj)?.id;

        // intra-package relationships collapse onto the package identity
        if source_pkg == target_pkg {
            let identity = self.target.identity(&source_pkg).cloned().ok_or_else(|| {
                CategoryError::NotFound(format!("identity of {source_pkg}"))
            })?;
            self.morphism_map.insert(morphism.id.clone(), identity.id.clone());
            return Ok(identity);
        }

        let dependency_id = Self::dependency_id(&source_pkg, &target_pkg);
        match self.target.morphism_metadata_mut(&dependency_id) {
            Some(metadata) => {
                append_to_list(metadata, "source_files", &morphism.source);
                append_to_list(metadata, "target_files", &morphism.target);
            }
            None => {
                let dependency = Morphism::new(
                    &dependency_id,
                    source_pkg,
                    target_pkg,
                    MorphismKind::Dependency,
                )
                .with_metadata("source_files", json!([morphism.source]))
                .with_metadata("target_files", json!([morphism.target]));
                self.target.add_morphism(dependency)?;
            }
        }

        self.morphism_map.insert(morphism.id.clone(), dependency_id.clone());
        self.registered_morphism(&dependency_id)
    }

    fn object_image(&self, object: &Object) -> CategoryResult<String> {
        match self.object_map.get(&object.id) {
            Some(package_id) => Ok(package_id.clone()),
            None => Self::package_of(object).map(|(id, _)| id),
        }
    }

    fn morphism_image(&self, morphism: &Morphism) -> CategoryResult<Morphism> {
        if let Some(mapped_id) = self.morphism_map.get(&morphism.id) {
            return self.registered_morphism(mapped_id);
        }

        let source_pkg = self.object_image(self.source_object(&morphism.source, "source")?)?;
        let target_pkg = self.object_image(self.source_object(&morphism.target, "target")?)?;

        if source_pkg == target_pkg {
            return Ok(self
                .target
                .identity(&source_pkg)
                .cloned()
                .unwrap_or_else(|| Morphism::identity(&source_pkg)));
        }

        let dependency_id = Self::dependency_id(&source_pkg, &target_pkg);
        Ok(self.target.morphism(&dependency_id).cloned().unwrap_or_else(|| {
            Morphism::new(dependency_id, source_pkg, target_pkg, MorphismKind::Dependency)
        }))
    }
}
