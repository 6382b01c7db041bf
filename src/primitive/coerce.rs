//! Coercion functions from raw column values to typed values.

use serde_json::Value;

use super::errors::{CoerceError, CoerceResult};

/// Returns the raw kind name of a value for error messages.
pub fn raw_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Coerces a raw value to a 64-bit float.
pub fn to_scalar(raw: &Value) -> CoerceResult<f64> {
    raw.as_f64().ok_or_else(|| CoerceError::TypeMismatch {
        expected: "number",
        got: raw_kind(raw).into(),
    })
}

/// Coerces a raw value to a non-negative integer count.
///
/// Floats are rejected even when integral; counts must arrive as integers.
pub fn to_count(raw: &Value) -> CoerceResult<u64> {
    raw.as_u64().ok_or_else(|| CoerceError::TypeMismatch {
        expected: "non-negative integer",
        got: raw_kind(raw).into(),
    })
}

/// Coerces a raw value to a string.
pub fn to_text(raw: &Value) -> CoerceResult<&str> {
    raw.as_str().ok_or_else(|| CoerceError::TypeMismatch {
        expected: "string",
        got: raw_kind(raw).into(),
    })
}

/// Coerces a raw value to a boolean.
pub fn to_flag(raw: &Value) -> CoerceResult<bool> {
    raw.as_bool().ok_or_else(|| CoerceError::TypeMismatch {
        expected: "bool",
        got: raw_kind(raw).into(),
    })
}

/// Coerces a raw triple to an (x, y, z) coordinate.
///
/// A non-array fails with `TypeMismatch`; an array of the wrong arity
/// fails with `ShapeMismatch`; a non-numeric component fails with
/// `TypeMismatch` on the component.
pub fn to_vector3(raw: &Value) -> CoerceResult<[f64; 3]> {
    let items = as_tuple(raw, 3)?;
    Ok([
        to_scalar(&items[0])?,
        to_scalar(&items[1])?,
        to_scalar(&items[2])?,
    ])
}

/// Coerces a raw triple of non-spatial floats (ranges, rotations, spacings).
pub fn to_triple(raw: &Value) -> CoerceResult<[f64; 3]> {
    to_vector3(raw)
}

/// Coerces a raw pair of floats.
pub fn to_pair(raw: &Value) -> CoerceResult<[f64; 2]> {
    let items = as_tuple(raw, 2)?;
    Ok([to_scalar(&items[0])?, to_scalar(&items[1])?])
}

/// Coerces a raw value to an index strictly below `bound`.
pub fn to_index(raw: &Value, bound: usize) -> CoerceResult<usize> {
    let index = to_count(raw)?;
    if (index as usize) < bound {
        Ok(index as usize)
    } else {
        Err(CoerceError::IndexOutOfRange { index, bound })
    }
}

/// Coerces a raw sequence to a boolean mask.
pub fn to_bool_mask(raw: &Value) -> CoerceResult<Vec<bool>> {
    let items = raw.as_array().ok_or_else(|| CoerceError::TypeMismatch {
        expected: "bool array",
        got: raw_kind(raw).into(),
    })?;
    items.iter().map(to_flag).collect()
}

fn as_tuple(raw: &Value, arity: usize) -> CoerceResult<&[Value]> {
    let items = raw.as_array().ok_or_else(|| CoerceError::TypeMismatch {
        expected: "array",
        got: raw_kind(raw).into(),
    })?;
    if items.len() != arity {
        return Err(CoerceError::ShapeMismatch {
            expected: format!("{} components", arity),
            got: format!("{} components", items.len()),
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_accepts_ints_and_floats() {
        assert_eq!(to_scalar(&json!(3)).unwrap(), 3.0);
        assert_eq!(to_scalar(&json!(2.5)).unwrap(), 2.5);
    }

    #[test]
    fn test_scalar_rejects_string() {
        let err = to_scalar(&json!("3")).unwrap_err();
        assert_eq!(err.code(), "GEO_TYPE_MISMATCH");
    }

    #[test]
    fn test_count_rejects_float_and_negative() {
        assert!(to_count(&json!(2.0)).is_err());
        assert!(to_count(&json!(-1)).is_err());
        assert_eq!(to_count(&json!(7)).unwrap(), 7);
    }

    #[test]
    fn test_vector3_happy_path() {
        assert_eq!(to_vector3(&json!([1, 2.5, -3])).unwrap(), [1.0, 2.5, -3.0]);
    }

    #[test]
    fn test_vector3_wrong_arity_is_shape_mismatch() {
        let err = to_vector3(&json!([1, 2])).unwrap_err();
        assert_eq!(err.code(), "GEO_SHAPE_MISMATCH");
    }

    #[test]
    fn test_vector3_non_array_is_type_mismatch() {
        let err = to_vector3(&json!("1,2,3")).unwrap_err();
        assert_eq!(err.code(), "GEO_TYPE_MISMATCH");
    }

    #[test]
    fn test_index_bound_is_exclusive() {
        assert_eq!(to_index(&json!(2), 3).unwrap(), 2);
        let err = to_index(&json!(3), 3).unwrap_err();
        assert_eq!(
            err,
            CoerceError::IndexOutOfRange { index: 3, bound: 3 }
        );
    }

    #[test]
    fn test_bool_mask() {
        assert_eq!(
            to_bool_mask(&json!([true, false, true])).unwrap(),
            vec![true, false, true]
        );
        assert!(to_bool_mask(&json!([true, 1])).is_err());
        assert!(to_bool_mask(&json!("tf")).is_err());
    }

    #[test]
    fn test_no_silent_defaults() {
        // Null never coerces to anything.
        assert!(to_scalar(&Value::Null).is_err());
        assert!(to_count(&Value::Null).is_err());
        assert!(to_text(&Value::Null).is_err());
        assert!(to_flag(&Value::Null).is_err());
        assert!(to_vector3(&Value::Null).is_err());
    }
}
