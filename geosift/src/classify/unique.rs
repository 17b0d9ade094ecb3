use indexmap::IndexMap;

use crate::errors::{ErrorKind, GeosiftError, GeosiftResult};
use crate::Feature;

/// One distinct combination of grouping-field values and its record count.
///
/// `value` carries the raw per-field strings; any display delimiter is
/// applied by the caller and never participates in key comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueValueGroup {
    pub count: usize,
    pub value: Vec<String>,
}

/// Groups features by distinct combinations of one to three field values.
///
/// The feature sequence is scanned once; each new distinct key tuple appends
/// a new group and subsequent occurrences increment its count, so groups
/// come back in first-encounter order. Missing attributes stringify to the
/// null marker consistently.
///
/// # Arguments
///
/// * `features` - The filtered feature sequence
/// * `fields` - One to three grouping field names
///
/// # Returns
///
/// The ordered groups, or a `ValidationError` before scanning begins when
/// the field count is out of range or a requested field is unknown to every
/// feature.
pub fn unique_values(
    features: &[Feature],
    fields: &[String],
) -> GeosiftResult<Vec<UniqueValueGroup>> {
    if fields.is_empty() || fields.len() > 3 {
        log::error!(
            "Unique-value grouping takes 1 to 3 fields, got {}",
            fields.len()
        );
        return Err(GeosiftError::new(
            &format!("unique-value grouping takes 1 to 3 fields, got {}", fields.len()),
            ErrorKind::ValidationError,
        ));
    }

    for field in fields {
        if field.is_empty() {
            return Err(GeosiftError::new(
                "unique-value field names must not be empty",
                ErrorKind::ValidationError,
            ));
        }
        if !features.is_empty() && !features.iter().any(|f| f.contains_attribute(field)) {
            log::error!("Unknown unique-value field '{}'", field);
            return Err(GeosiftError::new(
                &format!("unknown unique-value field '{}'", field),
                ErrorKind::ValidationError,
            ));
        }
    }

    let mut groups: IndexMap<Vec<String>, usize> = IndexMap::new();
    for feature in features {
        let key: Vec<String> = fields
            .iter()
            .map(|field| feature.get(field).as_text())
            .collect();
        *groups.entry(key).or_insert(0) += 1;
    }

    log::debug!(
        "Grouped {} features into {} unique-value groups over {:?}",
        features.len(),
        groups.len(),
        fields
    );

    Ok(groups
        .into_iter()
        .map(|(value, count)| UniqueValueGroup { count, value })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    fn genus(features: &[Feature]) -> GeosiftResult<Vec<UniqueValueGroup>> {
        unique_values(features, &["Genus".to_string()])
    }

    fn trees() -> Vec<Feature> {
        vec![
            attrs! { "Genus": "MAGNOLIA" },
            attrs! { "Genus": "MAGNOLIA" },
            attrs! { "Genus": "MAGNOLIA" },
            attrs! { "Genus": "LIQUIDAMBAR" },
            attrs! { "Genus": "PINUS" },
            attrs! { "Genus": "LIQUIDAMBAR" },
            attrs! { "Genus": "MELALEUCA" },
        ]
    }

    #[test]
    fn test_groups_in_first_encounter_order() {
        let groups = genus(&trees()).unwrap();
        assert_eq!(groups.len(), 4);
        assert_eq!(
            groups[0],
            UniqueValueGroup {
                count: 3,
                value: vec!["MAGNOLIA".to_string()],
            }
        );
        assert_eq!(
            groups[1],
            UniqueValueGroup {
                count: 2,
                value: vec!["LIQUIDAMBAR".to_string()],
            }
        );
        assert_eq!(
            groups[3],
            UniqueValueGroup {
                count: 1,
                value: vec!["MELALEUCA".to_string()],
            }
        );
    }

    #[test]
    fn test_counts_sum_to_record_count() {
        let features = trees();
        let groups = genus(&features).unwrap();
        let total: usize = groups.iter().map(|g| g.count).sum();
        assert_eq!(total, features.len());
    }

    #[test]
    fn test_multi_field_grouping() {
        let orders = vec![
            attrs! { "EmployeeID": "John", "ShipperID": "Marc" },
            attrs! { "EmployeeID": "Leeroy", "ShipperID": "Marc" },
            attrs! { "EmployeeID": "Leeroy", "ShipperID": "Marc" },
            attrs! { "EmployeeID": "Leeroy", "ShipperID": "Eric" },
        ];
        let groups = unique_values(
            &orders,
            &["EmployeeID".to_string(), "ShipperID".to_string()],
        )
        .unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(
            groups[0],
            UniqueValueGroup {
                count: 1,
                value: vec!["John".to_string(), "Marc".to_string()],
            }
        );
        assert_eq!(
            groups[1],
            UniqueValueGroup {
                count: 2,
                value: vec!["Leeroy".to_string(), "Marc".to_string()],
            }
        );
    }

    #[test]
    fn test_missing_attribute_uses_null_marker() {
        let features = vec![
            attrs! { "Genus": "MAGNOLIA" },
            attrs! { "Common_Name": "UNKNOWN TREE", "Genus": "MAGNOLIA" },
            attrs! { "Common_Name": "UNKNOWN TREE" },
        ];
        let groups = unique_values(
            &features,
            &["Genus".to_string(), "Common_Name".to_string()],
        )
        .unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].value, vec!["MAGNOLIA", "null"]);
        assert_eq!(groups[2].value, vec!["null", "UNKNOWN TREE"]);
    }

    #[test]
    fn test_numeric_values_stringify() {
        let features = vec![attrs! { "ZoneID": 7 }, attrs! { "ZoneID": 7.0 }];
        let groups = unique_values(&features, &["ZoneID".to_string()]).unwrap();
        // I64(7) and F64(7.0) form the same key
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].value, vec!["7"]);
    }

    #[test]
    fn test_four_fields_is_validation_error() {
        let fields: Vec<String> = ["EmployeeID", "ShipperID", "Department", "Date"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let err = unique_values(&trees(), &fields).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_unknown_field_is_validation_error() {
        let err = unique_values(&trees(), &["Unacceptable Field".to_string()]).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_empty_feature_set_yields_no_groups() {
        let groups = unique_values(&[], &["Genus".to_string()]).unwrap();
        assert!(groups.is_empty());
    }
}
