//! Parsing of the catalog document received from the data source.

use serde_json::Value;

use super::{CatalogEntry, CatalogError, CatalogPayload};

/// Parse a catalog document of the shape `{ exams: [...], lastUpdated? }`.
///
/// Anything else (not JSON, `exams` missing or not an array, an element that
/// is not an entry) is a [`CatalogError::DataFormat`].
pub fn parse_payload(bytes: &[u8]) -> Result<CatalogPayload, CatalogError> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| CatalogError::DataFormat(format!("not valid JSON: {}", e)))?;

    let Value::Object(mut document) = document else {
        return Err(CatalogError::DataFormat(
            "catalog document is not an object".to_string(),
        ));
    };

    let exams = match document.remove("exams") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(CatalogError::DataFormat(
                "'exams' is not an array".to_string(),
            ))
        }
        None => return Err(CatalogError::DataFormat("'exams' is missing".to_string())),
    };

    let exams = exams
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<CatalogEntry>(item)
                .map_err(|e| CatalogError::DataFormat(format!("exams[{}]: {}", i, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let last_updated = match document.remove("lastUpdated") {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    Ok(CatalogPayload {
        exams,
        last_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_payload() {
        let payload = parse_payload(
            br#"{"version": "1.1.0", "lastUpdated": "2024-05-01T00:00:00Z",
                 "exams": [{"id": "a", "name": "A"}, {"id": "b", "name": "B"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.exams.len(), 2);
        assert_eq!(payload.last_updated.as_deref(), Some("2024-05-01T00:00:00Z"));
    }

    #[test]
    fn test_parse_empty_exams() {
        let payload = parse_payload(br#"{"exams": []}"#).unwrap();
        assert!(payload.exams.is_empty());
        assert!(payload.last_updated.is_none());
    }

    #[test]
    fn test_missing_exams_is_data_format_error() {
        let err = parse_payload(br#"{"version": "1.1.0"}"#).unwrap_err();
        assert!(matches!(err, CatalogError::DataFormat(ref m) if m.contains("missing")));
    }

    #[test]
    fn test_exams_not_array_is_data_format_error() {
        let err = parse_payload(br#"{"exams": "lots"}"#).unwrap_err();
        assert!(matches!(err, CatalogError::DataFormat(ref m) if m.contains("not an array")));
    }

    #[test]
    fn test_top_level_array_is_rejected() {
        let err = parse_payload(br#"[{"id": "a", "name": "A"}]"#).unwrap_err();
        assert!(matches!(err, CatalogError::DataFormat(_)));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let err = parse_payload(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, CatalogError::DataFormat(ref m) if m.contains("JSON")));
    }

    #[test]
    fn test_bad_element_names_its_position() {
        let err = parse_payload(br#"{"exams": [{"id": "a", "name": "A"}, {"id": 7}]}"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::DataFormat(ref m) if m.starts_with("exams[1]")));
    }

    #[test]
    fn test_null_optional_fields_read_as_empty() {
        use crate::favorites::{FavoritesSet, MemoryStorage};
        use crate::filter::{compute_view, FilterSpec};

        let payload = parse_payload(
            r#"{"exams": [
                {"id": "a", "name": "A", "tags": null, "description": null, "subject": null,
                 "views": null, "previewImages": null, "hasAnswer": null},
                {"id": "b", "name": "B", "subject": "数学", "tags": ["函数"]}
            ]}"#
            .as_bytes(),
        )
        .unwrap();
        let a = &payload.exams[0];
        assert!(a.tags.is_empty());
        assert_eq!(a.description, "");
        assert_eq!(a.subject, "");
        assert_eq!(a.views, 0);

        let favorites = FavoritesSet::load(Box::new(MemoryStorage::new()), "f");
        let ids = |spec: FilterSpec| -> Vec<String> {
            compute_view(&payload.exams, &favorites, &spec)
                .entries(&payload.exams)
                .map(|e| e.id.clone())
                .collect()
        };
        assert_eq!(ids(FilterSpec::new().with_search("函数")), vec!["b"]);

        let subject = compute_view(
            &payload.exams,
            &favorites,
            &FilterSpec::new().with_subject("数学"),
        );
        assert_eq!(subject.len(), 1);

        assert_eq!(ids(FilterSpec::new().with_search("a")), vec!["a"]);
    }
}
