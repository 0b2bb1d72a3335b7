// Copyright 2025 Cowboy AI, LLC.

//! Category theory model of a codebase
//!
//! Source entities become objects, relationships between them become
//! morphisms. Functors map one codebase category into another while
//! preserving composition and identities.

pub mod codebase_category;
pub mod functor;
pub mod kinds;
pub mod morphism;
pub mod object;

pub use codebase_category::{Category, CategoryStats};
pub use functor::{
    apply_functor, CategoryFunctor, IdentityFunctor, MappingSummary, PackageAbstractionFunctor,
};
pub use kinds::{MorphismKind, ObjectKind};
pub use morphism::Morphism;
pub use object::{Metadata, Object};
