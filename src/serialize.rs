//! JSON export of query results, keyed by variable name in query order.

use serde_json::{Map, Number, Value};

use crate::error::{MtsError, Result};

/// Serialize a `(name, values)` query result as a JSON object.
///
/// Insertion order is preserved, so the object's keys follow the query's
/// variable order. Non-finite values have no JSON representation and
/// fail with [`MtsError::Serialization`].
pub fn query_to_json_str(query: &[(String, Vec<f64>)]) -> Result<String> {
    let mut object = Map::with_capacity(query.len());
    for (name, serie) in query {
        let values = serie
            .iter()
            .map(|&value| {
                Number::from_f64(value).map(Value::Number).ok_or_else(|| {
                    MtsError::Serialization(format!(
                        "non-finite value {value} in variable '{name}'"
                    ))
                })
            })
            .collect::<Result<Vec<Value>>>()?;
        object.insert(name.clone(), Value::Array(values));
    }

    serde_json::to_string(&Value::Object(object))
        .map_err(|e| MtsError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_variables_in_query_order() {
        let query = vec![
            ("temperature".to_string(), vec![1.0, 2.5]),
            ("humidity".to_string(), vec![3.0]),
        ];
        let json = query_to_json_str(&query).unwrap();
        assert_eq!(json, r#"{"temperature":[1.0,2.5],"humidity":[3.0]}"#);
    }

    #[test]
    fn empty_query_is_an_empty_object() {
        assert_eq!(query_to_json_str(&[]).unwrap(), "{}");
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let query = vec![("t".to_string(), vec![1.0, f64::NAN])];
        assert!(matches!(
            query_to_json_str(&query),
            Err(MtsError::Serialization(_))
        ));

        let query = vec![("t".to_string(), vec![f64::INFINITY])];
        assert!(matches!(
            query_to_json_str(&query),
            Err(MtsError::Serialization(_))
        ));
    }
}
