use crate::errors::{ErrorKind, GeosiftError, GeosiftResult};

/// Default number of class breaks when the options document leaves it unset.
pub const DEFAULT_BREAK_COUNT: usize = 7;

/// Default delimiter used when rendering multi-field unique-value keys.
pub const DEFAULT_FIELD_DELIMITER: &str = ", ";

/// Binning algorithm for class-break classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BreakMethod {
    /// Constant-width bins across the value range (the default).
    #[default]
    EqualInterval,
    /// Equal record counts per bin.
    Quantile,
    /// Jenks optimization minimizing within-class variance.
    NaturalBreaks,
    /// Bins centered on the mean at standard-deviation increments.
    StandardDeviation,
}

impl BreakMethod {
    /// Parses a native-schema method token.
    pub fn parse(token: &str) -> GeosiftResult<Self> {
        match token {
            "equalInterval" => Ok(BreakMethod::EqualInterval),
            "quantile" => Ok(BreakMethod::Quantile),
            "naturalBreaks" => Ok(BreakMethod::NaturalBreaks),
            "standardDeviation" => Ok(BreakMethod::StandardDeviation),
            other => {
                log::error!("Unknown classification method '{}'", other);
                Err(GeosiftError::new(
                    &format!("unknown classification method '{}'", other),
                    ErrorKind::ValidationError,
                ))
            }
        }
    }

    /// Parses a geoservices-schema method token (`esriClassify*`).
    pub fn parse_geoservices(token: &str) -> GeosiftResult<Self> {
        match token {
            "esriClassifyEqualInterval" => Ok(BreakMethod::EqualInterval),
            "esriClassifyQuantile" => Ok(BreakMethod::Quantile),
            "esriClassifyNaturalBreaks" => Ok(BreakMethod::NaturalBreaks),
            "esriClassifyStandardDeviation" => Ok(BreakMethod::StandardDeviation),
            other => {
                log::error!("Unknown classification method '{}'", other);
                Err(GeosiftError::new(
                    &format!("unknown classification method '{}'", other),
                    ErrorKind::ValidationError,
                ))
            }
        }
    }
}

/// Per-record numeric transform applied before break computation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Values are used unchanged (the default).
    #[default]
    None,
    /// Divide by the same record's value for the named field.
    Field(String),
    /// Base-10 logarithm; values at or below zero map to zero.
    Log,
    /// Percent of the sum of all included values.
    Percent,
}

impl Normalization {
    /// Parses a native-schema `normType` token, pairing `field` with its
    /// required `normField`.
    pub fn parse(token: &str, norm_field: Option<&str>) -> GeosiftResult<Self> {
        match token {
            "none" => Ok(Normalization::None),
            "log" => Ok(Normalization::Log),
            "percent" => Ok(Normalization::Percent),
            "field" => match norm_field {
                Some(field) if !field.is_empty() => Ok(Normalization::Field(field.to_string())),
                _ => {
                    log::error!("Normalization type 'field' requires a normField");
                    Err(GeosiftError::new(
                        "normalization by field requires a normField",
                        ErrorKind::ValidationError,
                    ))
                }
            },
            other => {
                log::error!("Unknown normalization type '{}'", other);
                Err(GeosiftError::new(
                    &format!("unknown normalization type '{}'", other),
                    ErrorKind::ValidationError,
                ))
            }
        }
    }

    /// Parses a geoservices-schema normalization token (`esriNormalizeBy*`).
    pub fn parse_geoservices(token: &str, norm_field: Option<&str>) -> GeosiftResult<Self> {
        match token {
            "esriNormalizeByLog" => Ok(Normalization::Log),
            "esriNormalizeByPercentOfTotal" => Ok(Normalization::Percent),
            "esriNormalizeByField" => match norm_field {
                Some(field) if !field.is_empty() => Ok(Normalization::Field(field.to_string())),
                _ => {
                    log::error!("esriNormalizeByField requires a normalizationField");
                    Err(GeosiftError::new(
                        "normalization by field requires a normalizationField",
                        ErrorKind::ValidationError,
                    ))
                }
            },
            other => {
                log::error!("Unknown normalization type '{}'", other);
                Err(GeosiftError::new(
                    &format!("unknown normalization type '{}'", other),
                    ErrorKind::ValidationError,
                ))
            }
        }
    }
}

/// Canonical classification configuration.
///
/// Exactly one variant is active per query. Both external options schemas
/// (native and geoservices) collapse into this type at the boundary; no
/// downstream component ever sees the external shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Choropleth class breaks over one numeric field.
    ClassBreaks {
        field: String,
        method: BreakMethod,
        break_count: usize,
        normalization: Normalization,
    },
    /// Distinct-value grouping over one to three fields.
    UniqueValue {
        fields: Vec<String>,
        field_delimiter: String,
    },
}

impl Classification {
    /// Builds a class-breaks configuration, validating before any record is
    /// processed.
    pub fn class_breaks(
        field: String,
        method: BreakMethod,
        break_count: usize,
        normalization: Normalization,
    ) -> GeosiftResult<Self> {
        if field.is_empty() {
            log::error!("Class-breaks classification requires a field");
            return Err(GeosiftError::new(
                "class-breaks classification requires a field",
                ErrorKind::ValidationError,
            ));
        }
        if break_count < 1 {
            log::error!("Break count must be at least 1, got {}", break_count);
            return Err(GeosiftError::new(
                "break count must be at least 1",
                ErrorKind::ValidationError,
            ));
        }
        Ok(Classification::ClassBreaks {
            field,
            method,
            break_count,
            normalization,
        })
    }

    /// Builds a unique-value configuration.
    ///
    /// Requesting more than three grouping fields is a `ValidationError`,
    /// never a silent truncation.
    pub fn unique_value(fields: Vec<String>, field_delimiter: String) -> GeosiftResult<Self> {
        if fields.is_empty() || fields.len() > 3 {
            log::error!(
                "Unique-value classification takes 1 to 3 fields, got {}",
                fields.len()
            );
            return Err(GeosiftError::new(
                &format!(
                    "unique-value classification takes 1 to 3 fields, got {}",
                    fields.len()
                ),
                ErrorKind::ValidationError,
            ));
        }
        if fields.iter().any(|f| f.is_empty()) {
            return Err(GeosiftError::new(
                "unique-value field names must not be empty",
                ErrorKind::ValidationError,
            ));
        }
        Ok(Classification::UniqueValue {
            fields,
            field_delimiter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_native_methods() {
        assert_eq!(
            BreakMethod::parse("equalInterval").unwrap(),
            BreakMethod::EqualInterval
        );
        assert_eq!(BreakMethod::parse("quantile").unwrap(), BreakMethod::Quantile);
        assert_eq!(
            BreakMethod::parse("naturalBreaks").unwrap(),
            BreakMethod::NaturalBreaks
        );
        assert_eq!(
            BreakMethod::parse("standardDeviation").unwrap(),
            BreakMethod::StandardDeviation
        );
    }

    #[test]
    fn test_parse_unknown_method_is_validation_error() {
        let err = BreakMethod::parse("invalidMethod").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_parse_geoservices_methods() {
        assert_eq!(
            BreakMethod::parse_geoservices("esriClassifyNaturalBreaks").unwrap(),
            BreakMethod::NaturalBreaks
        );
        assert!(BreakMethod::parse_geoservices("naturalBreaks").is_err());
    }

    #[test]
    fn test_default_method_is_equal_interval() {
        assert_eq!(BreakMethod::default(), BreakMethod::EqualInterval);
    }

    #[test]
    fn test_parse_normalization() {
        assert_eq!(Normalization::parse("none", None).unwrap(), Normalization::None);
        assert_eq!(Normalization::parse("log", None).unwrap(), Normalization::Log);
        assert_eq!(
            Normalization::parse("percent", None).unwrap(),
            Normalization::Percent
        );
        assert_eq!(
            Normalization::parse("field", Some("Trunk_Diameter")).unwrap(),
            Normalization::Field("Trunk_Diameter".to_string())
        );
    }

    #[test]
    fn test_field_normalization_requires_norm_field() {
        let err = Normalization::parse("field", None).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);

        let err = Normalization::parse_geoservices("esriNormalizeByField", None).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_unknown_normalization_is_validation_error() {
        let err = Normalization::parse("median", None).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_class_breaks_validation() {
        let err = Classification::class_breaks(
            String::new(),
            BreakMethod::EqualInterval,
            7,
            Normalization::None,
        )
        .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);

        let err = Classification::class_breaks(
            "Trunk_Diameter".to_string(),
            BreakMethod::EqualInterval,
            0,
            Normalization::None,
        )
        .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_unique_value_field_count_guard() {
        let four = vec![
            "EmployeeID".to_string(),
            "ShipperID".to_string(),
            "Department".to_string(),
            "Date".to_string(),
        ];
        let err = Classification::unique_value(four, ", ".to_string()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);

        let err = Classification::unique_value(vec![], ", ".to_string()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);

        let three = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert!(Classification::unique_value(three, ", ".to_string()).is_ok());
    }
}
