use indexmap::IndexMap;
use std::fmt::{Debug, Display, Formatter};

use crate::Value;

/// A single geo-tagged record: an identifier-less bag of named attributes.
///
/// `Feature` is the unit of input for filtering and classification. It is
/// analogous to a GeoJSON Feature's property bag; geometry handling lives
/// outside this engine, so only the attributes are modeled. Attribute order
/// is preserved (insertion order) so that repeated runs over the same input
/// are fully deterministic.
///
/// # Responsibilities
///
/// * **Attribute Access**: `get` resolves an attribute by name; an absent
///   attribute resolves to [Value::Null], never an error
/// * **Construction**: built programmatically via `put` / the [attrs!](crate::attrs)
///   macro, or decoded from a JSON object
///
/// # Examples
///
/// ```rust,ignore
/// use geosift::{attrs, Value};
///
/// let tree = attrs! { "Genus": "MAGNOLIA", "Trunk_Diameter": 13 };
/// assert_eq!(tree.get("Genus"), Value::from("MAGNOLIA"));
/// assert_eq!(tree.get("missing"), Value::Null);
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct Feature {
    attributes: IndexMap<String, Value>,
}

impl Feature {
    /// Creates an empty feature.
    pub fn new() -> Self {
        Feature {
            attributes: IndexMap::new(),
        }
    }

    /// Gets an attribute value by name.
    ///
    /// # Arguments
    ///
    /// * `key` - The attribute name (case-sensitive)
    ///
    /// # Returns
    ///
    /// The attribute value, or [Value::Null] when the attribute is absent.
    /// Missing attributes are never an error; bulk filtering must not abort
    /// because one record lacks a field.
    pub fn get(&self, key: &str) -> Value {
        self.attributes.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Sets an attribute value, replacing any previous value for the name.
    pub fn put<T: Into<Value>>(&mut self, key: impl Into<String>, value: T) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Checks whether the feature carries an attribute with the given name.
    pub fn contains_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Checks whether the feature has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.attributes.iter()
    }
}

impl Debug for Feature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.attributes.iter()).finish()
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.attributes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

impl From<serde_json::Value> for Feature {
    /// Decodes a feature from a JSON object.
    ///
    /// Accepts either a bare attribute object, a GeoJSON-style object with a
    /// `properties` member, or a geoservices-style object with an
    /// `attributes` member. Non-scalar attribute values collapse to null.
    fn from(json: serde_json::Value) -> Self {
        let object = match json {
            serde_json::Value::Object(mut map) => {
                if let Some(serde_json::Value::Object(props)) = map.remove("properties") {
                    props
                } else if let Some(serde_json::Value::Object(attrs)) = map.remove("attributes") {
                    attrs
                } else {
                    map
                }
            }
            _ => return Feature::new(),
        };

        let mut feature = Feature::new();
        for (key, value) in object {
            feature.put(key, Value::from(value));
        }
        feature
    }
}

/// Builds a [Feature] from literal attribute pairs.
///
/// # Examples
///
/// ```rust,ignore
/// use geosift::attrs;
///
/// let tree = attrs! { "Genus": "MAGNOLIA", "Trunk_Diameter": 13 };
/// let empty = attrs! {};
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::Feature::new()
    };

    ($($key:literal : $value:expr),* $(,)?) => {{
        let mut feature = $crate::Feature::new();
        $(
            feature.put($key, $crate::Value::from($value));
        )*
        feature
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_absent_attribute_is_null() {
        let feature = Feature::new();
        assert_eq!(feature.get("anything"), Value::Null);
    }

    #[test]
    fn test_put_and_get() {
        let mut feature = Feature::new();
        feature.put("Genus", "MAGNOLIA").put("Trunk_Diameter", 13);
        assert_eq!(feature.get("Genus"), Value::from("MAGNOLIA"));
        assert_eq!(feature.get("Trunk_Diameter"), Value::I64(13));
        assert_eq!(feature.len(), 2);
    }

    #[test]
    fn test_attribute_names_are_case_sensitive() {
        let feature = attrs! { "Genus": "MAGNOLIA" };
        assert_eq!(feature.get("genus"), Value::Null);
        assert!(feature.contains_attribute("Genus"));
        assert!(!feature.contains_attribute("genus"));
    }

    #[test]
    fn test_attrs_macro() {
        let feature = attrs! {
            "OBJECTID": 1101,
            "Common_Name": "SOUTHERN MAGNOLIA",
            "Trunk_Diameter": 13.5,
        };
        assert_eq!(feature.len(), 3);
        assert_eq!(feature.get("OBJECTID"), Value::I64(1101));
        assert_eq!(feature.get("Trunk_Diameter"), Value::F64(13.5));

        let empty = attrs! {};
        assert!(empty.is_empty());
    }

    #[test]
    fn test_from_bare_json_object() {
        let feature = Feature::from(serde_json::json!({
            "Genus": "MAGNOLIA",
            "Trunk_Diameter": 13
        }));
        assert_eq!(feature.get("Genus"), Value::from("MAGNOLIA"));
        assert_eq!(feature.get("Trunk_Diameter"), Value::I64(13));
    }

    #[test]
    fn test_from_geojson_style_object() {
        let feature = Feature::from(serde_json::json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
            "properties": { "Genus": "MAGNOLIA", "Trunk_Diameter": 13 }
        }));
        assert_eq!(feature.get("Genus"), Value::from("MAGNOLIA"));
        // the geometry member is not an attribute
        assert!(!feature.contains_attribute("geometry"));
    }

    #[test]
    fn test_from_geoservices_style_object() {
        let feature = Feature::from(serde_json::json!({
            "attributes": { "OBJECTID": 1, "Genus": "PINUS" }
        }));
        assert_eq!(feature.get("OBJECTID"), Value::I64(1));
        assert_eq!(feature.get("Genus"), Value::from("PINUS"));
    }

    #[test]
    fn test_from_non_object_is_empty() {
        let feature = Feature::from(serde_json::json!([1, 2, 3]));
        assert!(feature.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let feature = attrs! { "b": 1, "a": 2, "c": 3 };
        let names: Vec<&String> = feature.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }
}
