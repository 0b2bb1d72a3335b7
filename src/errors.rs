// Copyright 2025 Cowboy AI, LLC.

//! Error types for category operations

use std::fmt;

use thiserror::Error;

/// The law a verification routine was checking when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Law {
    /// `id_B ∘ f = f` for `f: A → B`
    LeftIdentity,
    /// `f ∘ id_A = f` for `f: A → B`
    RightIdentity,
    /// `(h ∘ g) ∘ f = h ∘ (g ∘ f)`
    Associativity,
    /// `F(id_A) = id_F(A)`
    FunctorIdentity,
    /// `F(g ∘ f) = F(g) ∘ F(f)`
    FunctorComposition,
}

impl fmt::Display for Law {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Law::LeftIdentity => "left identity",
            Law::RightIdentity => "right identity",
            Law::Associativity => "associativity",
            Law::FunctorIdentity => "functor identity",
            Law::FunctorComposition => "functor composition",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while building or analysing a category
#[derive(Debug, Clone, Error)]
pub enum CategoryError {
    /// An object or morphism with the same ID is already registered
    #[error("{kind} {id} already exists")]
    AlreadyExists {
        /// What was being inserted ("object" or "morphism")
        kind: &'static str,
        /// The duplicated ID
        id: String,
    },

    /// A morphism references an object that is not registered
    #[error("morphism {morphism}: {endpoint} object {object} does not exist")]
    DanglingEndpoint {
        /// ID of the rejected morphism
        morphism: String,
        /// Which end was missing ("source" or "target")
        endpoint: &'static str,
        /// The unresolved object ID
        object: String,
    },

    /// An identity morphism offered to `add_morphism`; identities only come
    /// into existence with their object
    #[error("morphism {0} is an identity; identities are created by add_object")]
    StandaloneIdentity(String),

    /// Generic lookup failure
    #[error("Not found: {0}")]
    NotFound(String),

    /// Two morphisms do not share the required endpoint
    #[error("morphisms not composable: target({first})={first_target} != source({second})={second_source}")]
    NotComposable {
        /// ID of the first morphism `f`
        first: String,
        /// ID of the second morphism `g`
        second: String,
        /// Target of `f`
        first_target: String,
        /// Source of `g`
        second_source: String,
    },

    /// A categorical or functorial law did not hold
    #[error("{law} law violated: {subject}")]
    LawViolation {
        /// Which law failed
        law: Law,
        /// The offending morphism(s) or object
        subject: String,
    },

    /// An object lacks a metadata field a mapping depends on
    #[error("object {object} has no {key} metadata")]
    MissingMetadata {
        /// Object ID
        object: String,
        /// Metadata key that was absent or of the wrong type
        key: String,
    },

    /// Structural invariant broken in a loaded model
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Compression backend failure
    #[error("Compression error: {0}")]
    Compression(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filesystem failure while loading or saving
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type for category operations
pub type CategoryResult<T> = Result<T, CategoryError>;

impl From<serde_json::Error> for CategoryError {
    fn from(err: serde_json::Error) -> Self {
        CategoryError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for CategoryError {
    fn from(err: std::io::Error) -> Self {
        CategoryError::Io(err.to_string())
    }
}

impl CategoryError {
    /// Create a law violation error
    pub fn law(law: Law, subject: impl Into<String>) -> Self {
        CategoryError::LawViolation {
            law,
            subject: subject.into(),
        }
    }

    /// Check if this is a lookup failure
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CategoryError::NotFound(_) | CategoryError::DanglingEndpoint { .. }
        )
    }

    /// Check if this error reports a failed law check
    pub fn is_law_violation(&self) -> bool {
        matches!(self, CategoryError::LawViolation { .. })
    }

    /// Check if this is a structural violation raised at insertion time
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CategoryError::AlreadyExists { .. }
                | CategoryError::DanglingEndpoint { .. }
                | CategoryError::StandaloneIdentity(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = CategoryError::AlreadyExists {
            kind: "object",
            id: "A".to_string(),
        };
        assert_eq!(err.to_string(), "object A already exists");

        let err = CategoryError::DanglingEndpoint {
            morphism: "f".to_string(),
            endpoint: "target",
            object: "Z".to_string(),
        };
        assert_eq!(err.to_string(), "morphism f: target object Z does not exist");

        let err = CategoryError::NotComposable {
            first: "f".to_string(),
            second: "g".to_string(),
            first_target: "B".to_string(),
            second_source: "C".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "morphisms not composable: target(f)=B != source(g)=C"
        );

        let err = CategoryError::law(Law::Associativity, "(h∘g)∘f");
        assert_eq!(err.to_string(), "associativity law violated: (h∘g)∘f");

        let err = CategoryError::MissingMetadata {
            object: "main.go".to_string(),
            key: "package".to_string(),
        };
        assert_eq!(err.to_string(), "object main.go has no package metadata");
    }

    #[test]
    fn test_classification_helpers() {
        let dangling = CategoryError::DanglingEndpoint {
            morphism: "f".to_string(),
            endpoint: "source",
            object: "X".to_string(),
        };
        assert!(dangling.is_not_found());
        assert!(dangling.is_structural());
        assert!(!dangling.is_law_violation());

        let duplicate = CategoryError::AlreadyExists {
            kind: "morphism",
            id: "f".to_string(),
        };
        assert!(duplicate.is_structural());
        assert!(!duplicate.is_not_found());

        let violation = CategoryError::law(Law::FunctorIdentity, "id_A");
        assert!(violation.is_law_violation());
        assert!(!violation.is_structural());
    }

    #[test]
    fn test_serde_json_conversion() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let err: CategoryError = serde_err.into();
        match err {
            CategoryError::SerializationError(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected SerializationError, got {other:?}"),
        }
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "model.json");
        let err: CategoryError = io_err.into();
        assert!(matches!(err, CategoryError::Io(ref msg) if msg.contains("model.json")));
    }
}
