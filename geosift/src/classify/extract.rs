use crate::errors::{ErrorKind, GeosiftError, GeosiftResult};
use crate::Feature;

use super::config::Normalization;

/// Extracts and normalizes the classification field across a feature set.
///
/// For each feature the raw field value is coerced to a number; features
/// whose value is null, absent, or not parseable are skipped rather than
/// failing the call. The requested normalization is then applied per
/// included feature:
///
/// - [Normalization::None]: value unchanged
/// - [Normalization::Field]: divided by the same feature's norm-field value;
///   a zero, null, or non-numeric divisor skips the feature, same as a
///   coercion failure
/// - [Normalization::Log]: base-10 logarithm, with values at or below zero
///   mapped to `0.0` so no `-inf`/NaN ever reaches the break algorithms
/// - [Normalization::Percent]: percent of the sum of all included raw values
///
/// Output order matches the input feature order.
///
/// # Returns
///
/// The normalized numeric sequence, or a `DataError` naming the field when
/// the scan yields no numbers at all (a free-text column, for example).
pub fn extract_values(
    features: &[Feature],
    field: &str,
    normalization: &Normalization,
) -> GeosiftResult<Vec<f64>> {
    let values = match normalization {
        Normalization::None => collect_raw(features, field),
        Normalization::Log => collect_raw(features, field)
            .into_iter()
            .map(|v| if v > 0.0 { v.log10() } else { 0.0 })
            .collect(),
        Normalization::Percent => {
            let raw = collect_raw(features, field);
            let total: f64 = raw.iter().sum();
            if total == 0.0 {
                log::error!(
                    "Cannot normalize field '{}' by percent of total: sum of values is zero",
                    field
                );
                return Err(GeosiftError::new(
                    &format!("field '{}' sums to zero, percent normalization is undefined", field),
                    ErrorKind::DataError,
                ));
            }
            raw.into_iter().map(|v| v / total * 100.0).collect()
        }
        Normalization::Field(norm_field) => features
            .iter()
            .filter_map(|feature| {
                let value = feature.get(field).as_number()?;
                let divisor = feature.get(norm_field).as_number()?;
                if divisor == 0.0 {
                    None
                } else {
                    Some(value / divisor)
                }
            })
            .collect(),
    };

    if values.is_empty() {
        log::error!("Field '{}' yields no numeric values for classification", field);
        return Err(GeosiftError::new(
            &format!("field '{}' is not suitable for numeric classification", field),
            ErrorKind::DataError,
        ));
    }

    log::debug!(
        "Extracted {} numeric values for field '{}' ({:?} normalization)",
        values.len(),
        field,
        normalization
    );
    Ok(values)
}

fn collect_raw(features: &[Feature], field: &str) -> Vec<f64> {
    features
        .iter()
        .filter_map(|feature| feature.get(field).as_number())
        .collect()
}
