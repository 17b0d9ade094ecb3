use serde::Deserialize;

use crate::classify::{
    classify, extract_values, unique_values, BreakMethod, Classification, Normalization,
    UniqueValueGroup, DEFAULT_BREAK_COUNT, DEFAULT_FIELD_DELIMITER,
};
use crate::errors::{ErrorKind, GeosiftError, GeosiftResult};
use crate::expression::{self, evaluate};
use crate::Feature;

/// The native options schema's `classification` member.
///
/// All members are optional at the boundary; validation happens during
/// normalization into [Classification], before any record is processed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NativeClassification {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub field: Option<String>,
    pub method: Option<String>,
    #[serde(rename = "breakCount")]
    pub break_count: Option<usize>,
    #[serde(rename = "normType")]
    pub norm_type: Option<String>,
    #[serde(rename = "normField")]
    pub norm_field: Option<String>,
    pub fields: Option<Vec<String>>,
    #[serde(rename = "fieldDelimiter")]
    pub field_delimiter: Option<String>,
}

/// The geoservices options schema's `classificationDef` member, with
/// method and normalization values spelled `esriClassify*` /
/// `esriNormalizeBy*`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoservicesClassificationDef {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub field: Option<String>,
    #[serde(rename = "classificationField")]
    pub classification_field: Option<String>,
    #[serde(rename = "classificationMethod")]
    pub classification_method: Option<String>,
    #[serde(rename = "breakCount")]
    pub break_count: Option<usize>,
    #[serde(rename = "normalizationType")]
    pub normalization_type: Option<String>,
    #[serde(rename = "normalizationField")]
    pub normalization_field: Option<String>,
    #[serde(rename = "uniqueValueFields")]
    pub unique_value_fields: Option<Vec<String>>,
    #[serde(rename = "fieldDelimiter")]
    pub field_delimiter: Option<String>,
}

/// The external options document, accepted in either of two equivalent
/// surface schemas.
///
/// The native schema carries a `classification` member; the geoservices
/// schema carries a `classificationDef` member. Both collapse into the
/// canonical [Classification] before any core logic runs. Unrecognized
/// top-level members (such as a format token) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryOptions {
    #[serde(rename = "where")]
    pub where_clause: Option<String>,
    pub classification: Option<NativeClassification>,
    #[serde(rename = "classificationDef")]
    pub classification_def: Option<GeoservicesClassificationDef>,
    #[serde(rename = "classificationField")]
    pub classification_field: Option<String>,
}

/// The result of a [query] call: the filtered features in pass-through
/// mode, class-break pairs, or unique-value groups.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Features(Vec<Feature>),
    Breaks(Vec<[f64; 2]>),
    UniqueValues(Vec<UniqueValueGroup>),
}

impl QueryOutcome {
    /// The filtered features, when this outcome is pass-through filtering.
    pub fn features(self) -> Option<Vec<Feature>> {
        match self {
            QueryOutcome::Features(features) => Some(features),
            _ => None,
        }
    }

    /// The class-break pairs, when this outcome is a breaks classification.
    pub fn breaks(self) -> Option<Vec<[f64; 2]>> {
        match self {
            QueryOutcome::Breaks(breaks) => Some(breaks),
            _ => None,
        }
    }

    /// The unique-value groups, when this outcome is a grouping.
    pub fn unique_values(self) -> Option<Vec<UniqueValueGroup>> {
        match self {
            QueryOutcome::UniqueValues(groups) => Some(groups),
            _ => None,
        }
    }
}

/// Filters and classifies a feature collection according to an options
/// document.
///
/// Steps, each a fatal validation point raising before any record is
/// processed:
///
/// 1. the options document is normalized into the canonical classification
///    configuration; unknown type/method/normalization tokens raise a
///    `ValidationError`
/// 2. the `where` predicate, when present, is compiled (compile errors
///    propagate unchanged) and evaluated against every feature in original
///    order; non-matching features are dropped
/// 3. without a classification the filtered sequence comes back unchanged
/// 4. with one, the filtered sequence flows through extraction and
///    normalization into the classification engine
///
/// Every invocation is a pure function of its inputs: nothing is cached or
/// shared across calls, so independent calls may run concurrently over the
/// same collection.
pub fn query(features: &[Feature], options: &QueryOptions) -> GeosiftResult<QueryOutcome> {
    let classification = canonicalize(options)?;

    let filtered: Vec<Feature> = match &options.where_clause {
        Some(predicate) => {
            let expr = expression::compile(predicate)?;
            log::debug!("Compiled predicate {}", expr);
            features
                .iter()
                .filter(|feature| evaluate(&expr, feature))
                .cloned()
                .collect()
        }
        None => features.to_vec(),
    };
    log::debug!(
        "{} of {} features pass the filter",
        filtered.len(),
        features.len()
    );

    match classification {
        None => Ok(QueryOutcome::Features(filtered)),
        Some(Classification::ClassBreaks {
            field,
            method,
            break_count,
            normalization,
        }) => {
            let values = extract_values(&filtered, &field, &normalization)?;
            let breaks = classify(&values, method, break_count)?;
            Ok(QueryOutcome::Breaks(breaks))
        }
        Some(Classification::UniqueValue { fields, .. }) => {
            let groups = unique_values(&filtered, &fields)?;
            Ok(QueryOutcome::UniqueValues(groups))
        }
    }
}

/// Runs [query] against an options document still in JSON form.
///
/// # Returns
///
/// The query outcome, or an `EncodingError` when the document does not
/// deserialize as either accepted schema.
pub fn query_json(
    features: &[Feature],
    options: serde_json::Value,
) -> GeosiftResult<QueryOutcome> {
    let options: QueryOptions = serde_json::from_value(options)?;
    query(features, &options)
}

/// Collapses whichever external schema is present into the canonical
/// configuration. No downstream component sees the external shape.
fn canonicalize(options: &QueryOptions) -> GeosiftResult<Option<Classification>> {
    match (&options.classification, &options.classification_def) {
        (Some(_), Some(_)) => {
            log::error!("Options document carries both classification schemas");
            Err(GeosiftError::new(
                "options must carry at most one of classification and classificationDef",
                ErrorKind::ValidationError,
            ))
        }
        (Some(native), None) => native_to_canonical(native).map(Some),
        (None, Some(def)) => {
            geoservices_to_canonical(def, options.classification_field.as_deref()).map(Some)
        }
        (None, None) => Ok(None),
    }
}

fn native_to_canonical(native: &NativeClassification) -> GeosiftResult<Classification> {
    let is_unique = match native.kind.as_deref() {
        Some("unique") | Some("uniqueValue") => true,
        Some("classes") | Some("classBreaks") => false,
        None => native.fields.is_some(),
        Some(other) => {
            log::error!("Unknown classification type '{}'", other);
            return Err(GeosiftError::new(
                &format!("unknown classification type '{}'", other),
                ErrorKind::ValidationError,
            ));
        }
    };

    if is_unique {
        let fields = native.fields.clone().unwrap_or_default();
        let delimiter = native
            .field_delimiter
            .clone()
            .unwrap_or_else(|| DEFAULT_FIELD_DELIMITER.to_string());
        return Classification::unique_value(fields, delimiter);
    }

    let field = native.field.clone().ok_or_else(|| {
        log::error!("Class-breaks classification requires a field");
        GeosiftError::new(
            "class-breaks classification requires a field",
            ErrorKind::ValidationError,
        )
    })?;
    let method = match native.method.as_deref() {
        Some(token) => BreakMethod::parse(token)?,
        None => BreakMethod::default(),
    };
    let break_count = native.break_count.unwrap_or(DEFAULT_BREAK_COUNT);
    let normalization = match native.norm_type.as_deref() {
        Some(token) => Normalization::parse(token, native.norm_field.as_deref())?,
        None => Normalization::None,
    };
    Classification::class_breaks(field, method, break_count, normalization)
}

fn geoservices_to_canonical(
    def: &GeoservicesClassificationDef,
    fallback_field: Option<&str>,
) -> GeosiftResult<Classification> {
    let is_unique = match def.kind.as_deref() {
        Some("uniqueValueDef") => true,
        Some("classBreaksDef") => false,
        None => def.unique_value_fields.is_some(),
        Some(other) => {
            log::error!("Unknown classificationDef type '{}'", other);
            return Err(GeosiftError::new(
                &format!("unknown classificationDef type '{}'", other),
                ErrorKind::ValidationError,
            ));
        }
    };

    if is_unique {
        let fields = def.unique_value_fields.clone().unwrap_or_default();
        let delimiter = def
            .field_delimiter
            .clone()
            .unwrap_or_else(|| DEFAULT_FIELD_DELIMITER.to_string());
        return Classification::unique_value(fields, delimiter);
    }

    let field = def
        .field
        .clone()
        .or_else(|| def.classification_field.clone())
        .or_else(|| fallback_field.map(|f| f.to_string()))
        .ok_or_else(|| {
            log::error!("classificationDef requires a classification field");
            GeosiftError::new(
                "classificationDef requires a classification field",
                ErrorKind::ValidationError,
            )
        })?;
    let method = match def.classification_method.as_deref() {
        Some(token) => BreakMethod::parse_geoservices(token)?,
        None => BreakMethod::default(),
    };
    let break_count = def.break_count.unwrap_or(DEFAULT_BREAK_COUNT);
    let normalization = match def.normalization_type.as_deref() {
        Some(token) => {
            Normalization::parse_geoservices(token, def.normalization_field.as_deref())?
        }
        None => Normalization::None,
    };
    Classification::class_breaks(field, method, break_count, normalization)
}
