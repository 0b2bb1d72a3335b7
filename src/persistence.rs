// Copyright 2025 Cowboy AI, LLC.

//! JSON persistence of categories, reports and graphs

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::category::Category;
use crate::errors::{CategoryError, CategoryResult};

/// Load a category from a JSON file and check its identity invariant
///
/// Non-identity morphisms with unresolved endpoints are accepted; analysis
/// skips them.
pub fn load_category(path: impl AsRef<Path>) -> CategoryResult<Category> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| CategoryError::Io(format!("cannot read {}: {}", path.display(), e)))?;
    let category = category_from_str(&text)?;
    debug!(
        path = %path.display(),
        objects = category.object_count(),
        "category loaded"
    );
    Ok(category)
}

/// Parse a category from JSON text and check its identity invariant
///
/// Documents without an `identities` index (as written by extractors) get
/// it rebuilt from their identity morphisms before the check.
pub fn category_from_str(text: &str) -> CategoryResult<Category> {
    let mut category: Category = serde_json::from_str(text)?;
    if category.identities().is_empty() {
        category.rebuild_identities();
    }
    category.check_integrity()?;
    Ok(category)
}

/// Serialize any value to JSON text, compact or indented
pub fn to_json_string<T: Serialize + ?Sized>(value: &T, pretty: bool) -> CategoryResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// Write any value as JSON to `path`
pub fn save_json<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
    pretty: bool,
) -> CategoryResult<()> {
    let path = path.as_ref();
    let text = to_json_string(value, pretty)?;
    fs::write(path, text)
        .map_err(|e| CategoryError::Io(format!("cannot write {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "json saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Morphism, Object};

    #[test]
    fn test_round_trip_through_text() {
        let mut category = Category::new("rt");
        category.add_object(Object::new("A", "module", "A")).unwrap();
        category.add_object(Object::new("B", "module", "B")).unwrap();
        category
            .add_morphism(Morphism::new("f", "A", "B", "dependency"))
            .unwrap();

        let text = to_json_string(&category, false).unwrap();
        assert_eq!(category_from_str(&text).unwrap(), category);
    }

    #[test]
    fn missing_identity_index_is_rebuilt() {
        let text = r#"{"name": "bare", "objects": {"A": {"id": "A", "type": "module", "name": "A"}}}"#;
        let category = category_from_str(text).unwrap();
        assert_eq!(category.identity("A").unwrap().id, "id_A");
    }

    #[test]
    fn object_missing_from_partial_index_is_rejected() {
        let text = r#"{
            "name": "bad",
            "objects": {
                "A": {"id": "A", "type": "module", "name": "A"},
                "B": {"id": "B", "type": "module", "name": "B"}
            },
            "morphisms": {"id_A": {"id": "id_A", "source": "A", "target": "A", "type": "identity"}},
            "identities": {"A": {"id": "id_A", "source": "A", "target": "A", "type": "identity"}}
        }"#;
        assert!(matches!(
            category_from_str(text),
            Err(CategoryError::InvariantViolation(_))
        ));
    }

    #[test]
    fn malformed_json_is_serialization_error() {
        assert!(matches!(
            category_from_str("{"),
            Err(CategoryError::SerializationError(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_category("/nonexistent/model.json"),
            Err(CategoryError::Io(_))
        ));
    }
}
