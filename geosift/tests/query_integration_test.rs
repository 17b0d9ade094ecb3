use geosift::{attrs, query_json, ErrorKind, Feature, QueryOutcome, Value};

#[ctor::ctor]
fn init() {
    colog::init();
}

/// A street-tree inventory slice. The predicate `OBJECTID < 11310` keeps the
/// first sixteen records and drops the two eucalypts at the end.
fn trees() -> Vec<Feature> {
    vec![
        attrs! { "OBJECTID": 11294, "Trunk_Diameter": 13, "House_Number": 505,
                 "Genus": "MAGNOLIA", "Common_Name": "SOUTHERN MAGNOLIA" },
        attrs! { "OBJECTID": 11295, "Trunk_Diameter": 0, "House_Number": 560,
                 "Genus": "MAGNOLIA", "Common_Name": "SOUTHERN MAGNOLIA" },
        attrs! { "OBJECTID": 11296, "Trunk_Diameter": 1, "House_Number": 610,
                 "Genus": "MAGNOLIA", "Common_Name": "SOUTHERN MAGNOLIA" },
        attrs! { "OBJECTID": 11297, "Trunk_Diameter": 2, "House_Number": 655,
                 "Genus": "LIQUIDAMBAR", "Common_Name": "AMERICAN SWEETGUM" },
        attrs! { "OBJECTID": 11298, "Trunk_Diameter": 3, "House_Number": 2180,
                 "Genus": "LIQUIDAMBAR", "Common_Name": "AMERICAN SWEETGUM" },
        attrs! { "OBJECTID": 11299, "Trunk_Diameter": 5, "House_Number": 740,
                 "Genus": "PINUS", "Common_Name": "CANARY ISLAND PINE" },
        attrs! { "OBJECTID": 11300, "Trunk_Diameter": 7, "House_Number": 800,
                 "Genus": "PINUS", "Common_Name": "CANARY ISLAND PINE" },
        attrs! { "OBJECTID": 11301, "Trunk_Diameter": 9, "House_Number": 865,
                 "Genus": "JACARANDA", "Common_Name": "JACARANDA" },
        attrs! { "OBJECTID": 11302, "Trunk_Diameter": 10, "House_Number": 920,
                 "Genus": "JACARANDA", "Common_Name": "JACARANDA" },
        attrs! { "OBJECTID": 11303, "Trunk_Diameter": 10, "House_Number": 1010,
                 "Genus": "CINNAMOMUM", "Common_Name": "CAMPHOR" },
        attrs! { "OBJECTID": 11304, "Trunk_Diameter": 11, "House_Number": 1150,
                 "Genus": "CINNAMOMUM", "Common_Name": "CAMPHOR" },
        attrs! { "OBJECTID": 11305, "Trunk_Diameter": 11, "House_Number": 1290,
                 "Genus": "PLATANUS", "Common_Name": "LONDON PLANE" },
        attrs! { "OBJECTID": 11306, "Trunk_Diameter": 12, "House_Number": 1400,
                 "Genus": "PLATANUS", "Common_Name": "LONDON PLANE" },
        attrs! { "OBJECTID": 11307, "Trunk_Diameter": 12, "House_Number": 1555,
                 "Genus": "QUERCUS", "Common_Name": "COAST LIVE OAK" },
        attrs! { "OBJECTID": 11308, "Trunk_Diameter": 0, "House_Number": 1760,
                 "Genus": "QUERCUS", "Common_Name": "COAST LIVE OAK" },
        attrs! { "OBJECTID": 11309, "Trunk_Diameter": 0, "House_Number": 2190,
                 "Genus": "MELALEUCA", "Common_Name": "FLAX-LEAF PAPERBARK" },
        attrs! { "OBJECTID": 11311, "Trunk_Diameter": 27, "House_Number": 1860,
                 "Genus": "EUCALYPTUS", "Common_Name": "RED IRONBARK" },
        attrs! { "OBJECTID": 11312, "Trunk_Diameter": 20, "House_Number": 2050,
                 "Genus": "EUCALYPTUS", "Common_Name": "RED IRONBARK" },
    ]
}

fn breaks_of(options: serde_json::Value) -> Vec<[f64; 2]> {
    query_json(&trees(), options)
        .unwrap()
        .breaks()
        .expect("expected a class-breaks outcome")
}

#[test]
fn test_where_filtering_pass_through() {
    let outcome = query_json(
        &trees(),
        serde_json::json!({ "where": "Trunk_Diameter > 10 AND Genus = 'PLATANUS'" }),
    )
    .unwrap();
    let filtered = outcome.features().unwrap();
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered[0].get("OBJECTID"), Value::I64(11305));
    assert_eq!(filtered[1].get("OBJECTID"), Value::I64(11306));
}

#[test]
fn test_where_with_like_and_in() {
    let outcome = query_json(
        &trees(),
        serde_json::json!({
            "where": "Common_Name LIKE '%MAGNOLIA%' OR Genus IN ('PINUS', 'MELALEUCA')"
        }),
    )
    .unwrap();
    assert_eq!(outcome.features().unwrap().len(), 6);
}

#[test]
fn test_equal_interval_default_breaks() {
    let breaks = breaks_of(serde_json::json!({
        "where": "OBJECTID < 11310",
        "classification": {
            "type": "classes",
            "field": "Trunk_Diameter",
            "method": "equalInterval",
            "breakCount": 7
        }
    }));
    assert_eq!(breaks.len(), 7);
    assert_eq!(breaks[0], [0.0, 1.8571428571428572]);
    assert_eq!(breaks[6], [11.142857142857146, 13.0]);
}

#[test]
fn test_equal_interval_nine_breaks() {
    let breaks = breaks_of(serde_json::json!({
        "where": "OBJECTID < 11310",
        "classification": {
            "type": "classes",
            "field": "Trunk_Diameter",
            "breakCount": 9
        }
    }));
    assert_eq!(breaks.len(), 9);
    assert_eq!(breaks[0], [0.0, 1.4444444444444444]);
    assert_eq!(breaks[8], [11.555555555555557, 13.0]);
}

#[test]
fn test_without_where_the_range_widens() {
    let breaks = breaks_of(serde_json::json!({
        "classification": { "type": "classes", "field": "Trunk_Diameter" }
    }));
    assert_eq!(breaks.len(), 7);
    assert_eq!(breaks[0][0], 0.0);
    assert_eq!(breaks[6][1], 27.0);
}

#[test]
fn test_quantile_breaks() {
    let breaks = breaks_of(serde_json::json!({
        "where": "OBJECTID < 11310",
        "classification": {
            "type": "classes",
            "field": "Trunk_Diameter",
            "method": "quantile",
            "breakCount": 7
        }
    }));
    assert_eq!(
        breaks,
        vec![
            [0.0, 0.0],
            [1.0, 3.0],
            [5.0, 7.0],
            [9.0, 10.0],
            [10.0, 11.0],
            [11.0, 12.0],
            [12.0, 13.0],
        ]
    );
}

#[test]
fn test_natural_breaks() {
    let breaks = breaks_of(serde_json::json!({
        "where": "OBJECTID < 11310",
        "classification": {
            "type": "classes",
            "field": "Trunk_Diameter",
            "method": "naturalBreaks",
            "breakCount": 7
        }
    }));
    assert_eq!(breaks.len(), 7);
    assert_eq!(breaks[0], [0.0, 0.0]);
    assert_eq!(breaks[6], [13.0, 13.0]);
}

#[test]
fn test_standard_deviation_breaks_cover_the_range() {
    let breaks = breaks_of(serde_json::json!({
        "where": "OBJECTID < 11310",
        "classification": {
            "type": "classes",
            "field": "Trunk_Diameter",
            "method": "standardDeviation",
            "breakCount": 6
        }
    }));
    assert_eq!(breaks.len(), 6);
    assert_eq!(breaks[0][0], 0.0);
    assert_eq!(breaks[5][1], 13.0);
    for window in breaks.windows(2) {
        assert_eq!(window[0][1], window[1][0]);
    }
}

#[test]
fn test_field_normalization_reference_extremes() {
    let breaks = breaks_of(serde_json::json!({
        "where": "OBJECTID < 11310",
        "classification": {
            "type": "classes",
            "field": "House_Number",
            "method": "equalInterval",
            "breakCount": 7,
            "normType": "field",
            "normField": "Trunk_Diameter"
        }
    }));
    // zero-diameter records drop out; extremes are 505/13 and 2180/3
    assert_eq!(breaks[0][0], 38.84615384615385);
    assert_eq!(breaks[6][1], 726.6666666666666);
}

#[test]
fn test_percent_normalization_reference_maximum() {
    let breaks = breaks_of(serde_json::json!({
        "where": "OBJECTID < 11310",
        "classification": {
            "type": "classes",
            "field": "Trunk_Diameter",
            "normType": "percent"
        }
    }));
    // diameters sum to 106, so the largest trunk is 13/106 of the total
    assert_eq!(breaks[0][0], 0.0);
    assert_eq!(breaks[6][1], 12.264150943396226);
}

#[test]
fn test_log_normalization_stays_finite() {
    let breaks = breaks_of(serde_json::json!({
        "classification": {
            "type": "classes",
            "field": "Trunk_Diameter",
            "normType": "log"
        }
    }));
    assert_eq!(breaks[0][0], 0.0);
    assert_eq!(breaks[6][1], 27f64.log10());
    assert!(breaks.iter().flatten().all(|v| v.is_finite()));
}

#[test]
fn test_unique_values_single_field() {
    let outcome = query_json(
        &trees(),
        serde_json::json!({
            "where": "OBJECTID < 11310",
            "classification": { "type": "unique", "fields": ["Genus"] }
        }),
    )
    .unwrap();
    let groups = outcome.unique_values().unwrap();
    assert_eq!(groups.len(), 8);
    assert_eq!(groups[0].value, vec!["MAGNOLIA"]);
    assert_eq!(groups[0].count, 3);
    assert_eq!(groups[7].value, vec!["MELALEUCA"]);
    assert_eq!(groups[7].count, 1);
    let total: usize = groups.iter().map(|g| g.count).sum();
    assert_eq!(total, 16);
}

#[test]
fn test_unique_values_two_fields() {
    let outcome = query_json(
        &trees(),
        serde_json::json!({
            "where": "OBJECTID < 11310",
            "classification": {
                "type": "unique",
                "fields": ["Genus", "Common_Name"],
                "fieldDelimiter": ", "
            }
        }),
    )
    .unwrap();
    let groups = outcome.unique_values().unwrap();
    assert_eq!(groups.len(), 8);
    assert_eq!(groups[7].value, vec!["MELALEUCA", "FLAX-LEAF PAPERBARK"]);
}

#[test]
fn test_geoservices_class_breaks_def() {
    let breaks = breaks_of(serde_json::json!({
        "where": "OBJECTID < 11310",
        "classificationDef": {
            "type": "classBreaksDef",
            "classificationField": "Trunk_Diameter",
            "classificationMethod": "esriClassifyEqualInterval",
            "breakCount": 7
        }
    }));
    assert_eq!(breaks[0], [0.0, 1.8571428571428572]);
    assert_eq!(breaks[6], [11.142857142857146, 13.0]);
}

#[test]
fn test_geoservices_normalization() {
    let breaks = breaks_of(serde_json::json!({
        "where": "OBJECTID < 11310",
        "classificationDef": {
            "type": "classBreaksDef",
            "classificationField": "House_Number",
            "classificationMethod": "esriClassifyEqualInterval",
            "breakCount": 7,
            "normalizationType": "esriNormalizeByField",
            "normalizationField": "Trunk_Diameter"
        }
    }));
    assert_eq!(breaks[0][0], 38.84615384615385);
    assert_eq!(breaks[6][1], 726.6666666666666);
}

#[test]
fn test_geoservices_unique_value_def() {
    let outcome = query_json(
        &trees(),
        serde_json::json!({
            "where": "OBJECTID < 11310",
            "classificationDef": {
                "type": "uniqueValueDef",
                "uniqueValueFields": ["Genus"],
                "fieldDelimiter": ", "
            }
        }),
    )
    .unwrap();
    let groups = outcome.unique_values().unwrap();
    assert_eq!(groups.len(), 8);
    assert_eq!(groups[0].value, vec!["MAGNOLIA"]);
}

#[test]
fn test_geoservices_natural_breaks_log_combination() {
    let breaks = breaks_of(serde_json::json!({
        "where": "Trunk_Diameter > 3",
        "classificationDef": {
            "type": "classBreaksDef",
            "classificationField": "Trunk_Diameter",
            "classificationMethod": "esriClassifyNaturalBreaks",
            "breakCount": 9,
            "normalizationType": "esriNormalizeByLog"
        }
    }));
    assert_eq!(breaks.len(), 9);
    assert_eq!(breaks[0][0], 5f64.log10());
    assert_eq!(breaks[8][1], 27f64.log10());
    assert!(breaks.iter().flatten().all(|v| v.is_finite()));
}

#[test]
fn test_appending_features_extends_groups() {
    let mut features = trees();
    let options = serde_json::json!({
        "classification": { "type": "unique", "fields": ["Genus"] }
    });
    let before = query_json(&features, options.clone())
        .unwrap()
        .unique_values()
        .unwrap();
    assert_eq!(before.len(), 9);

    features.push(attrs! { "Genus": "MAGNOLIA" });
    features.push(attrs! { "Genus": "GINKGO" });
    let after = query_json(&features, options)
        .unwrap()
        .unique_values()
        .unwrap();
    // an existing group grows, a new genus appends at the end
    assert_eq!(after.len(), 10);
    assert_eq!(after[0].value, vec!["MAGNOLIA"]);
    assert_eq!(after[0].count, before[0].count + 1);
    assert_eq!(after[9].value, vec!["GINKGO"]);
    assert_eq!(after[9].count, 1);
}

#[test]
fn test_both_schemas_agree() {
    let native = breaks_of(serde_json::json!({
        "where": "OBJECTID < 11310",
        "classification": {
            "type": "classes",
            "field": "Trunk_Diameter",
            "method": "naturalBreaks",
            "breakCount": 5
        }
    }));
    let geoservices = breaks_of(serde_json::json!({
        "where": "OBJECTID < 11310",
        "classificationDef": {
            "type": "classBreaksDef",
            "classificationField": "Trunk_Diameter",
            "classificationMethod": "esriClassifyNaturalBreaks",
            "breakCount": 5
        }
    }));
    assert_eq!(native, geoservices);
}

#[test]
fn test_filtering_is_idempotent() {
    let options = serde_json::json!({ "where": "Trunk_Diameter >= 10" });
    let once = query_json(&trees(), options.clone())
        .unwrap()
        .features()
        .unwrap();
    let twice = query_json(&once, options).unwrap().features().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_malformed_predicate_is_syntax_error() {
    let err = query_json(&trees(), serde_json::json!({ "where": "Genus = " })).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::SyntaxError);
}

#[test]
fn test_unknown_method_is_validation_error() {
    let err = query_json(
        &trees(),
        serde_json::json!({
            "classification": {
                "type": "classes",
                "field": "Trunk_Diameter",
                "method": "headTails"
            }
        }),
    )
    .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);
}

#[test]
fn test_four_unique_fields_is_validation_error() {
    let err = query_json(
        &trees(),
        serde_json::json!({
            "classification": {
                "type": "unique",
                "fields": ["Genus", "Common_Name", "House_Number", "OBJECTID"]
            }
        }),
    )
    .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);
}

#[test]
fn test_text_break_field_is_data_error() {
    let err = query_json(
        &trees(),
        serde_json::json!({
            "classification": { "type": "classes", "field": "Common_Name" }
        }),
    )
    .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DataError);
}

#[test]
fn test_filter_that_drops_everything_then_classifies_is_data_error() {
    let err = query_json(
        &trees(),
        serde_json::json!({
            "where": "OBJECTID > 99999",
            "classification": { "type": "classes", "field": "Trunk_Diameter" }
        }),
    )
    .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DataError);
}

#[test]
fn test_features_parse_from_geojson_properties() {
    let features: Vec<Feature> = vec![
        Feature::from(serde_json::json!({
            "properties": { "Genus": "MAGNOLIA", "Trunk_Diameter": 13 }
        })),
        Feature::from(serde_json::json!({
            "attributes": { "Genus": "PINUS", "Trunk_Diameter": 5 }
        })),
    ];
    let outcome = query_json(&features, serde_json::json!({ "where": "Trunk_Diameter > 6" }))
        .unwrap();
    let filtered = outcome.features().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].get("Genus"), Value::from("MAGNOLIA"));
}

#[test]
fn test_outcome_accessors_are_exclusive() {
    let outcome = query_json(&trees(), serde_json::json!({})).unwrap();
    assert!(matches!(outcome, QueryOutcome::Features(_)));
    assert!(outcome.breaks().is_none());
}
