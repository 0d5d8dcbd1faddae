use serde::Serialize;
use serde_json::{Number, Value};
use sha2::{Digest, Sha256};

use crate::error::ChainError;
use crate::finite::ensure_finite;

/// Largest integer magnitude an IEEE-754 double represents exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// SHA-256 of a UTF-8 string as 64 lowercase hex characters.
pub fn sha256(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Digest of any serializable value after canonicalization.
///
/// Fails with [`ChainError::Serialization`] if the value cannot be
/// represented as JSON (a failing `Serialize` impl, non-string map keys,
/// NaN or an infinity).
pub fn hash_object<T: Serialize + ?Sized>(value: &T) -> Result<String, ChainError> {
    ensure_finite(value)?;
    let value = serde_json::to_value(value)?;
    Ok(sha256(&canonical_json(&value)?))
}

/// Canonical JSON text of a value.
///
/// - objects: keys in lexicographic order, regardless of insertion order
/// - arrays: element order preserved
/// - numbers: integral floats within ±2^53 render without a fraction,
///   so `1` and `1.0` canonicalize identically
/// - strings: standard JSON escaping
pub fn canonical_json(value: &Value) -> Result<String, ChainError> {
    let mut out = String::new();
    write_canonical(value, &mut out)?;
    Ok(out)
}

fn write_canonical(value: &Value, out: &mut String) -> Result<(), ChainError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&canonical_number(n)),
        Value::String(s) => out.push_str(&serde_json::to_string(s)?),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key)?);
                out.push(':');
                write_canonical(&map[key.as_str()], out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn canonical_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::json;

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            sha256("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_is_64_lowercase_hex() {
        let digest = sha256("warden");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn key_order_does_not_matter() {
        let a = hash_object(&json!({"a": 1, "b": 2})).unwrap();
        let b = hash_object(&json!({"b": 2, "a": 1})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn nested_keys_are_sorted() {
        let value = json!({"z": {"y": 1, "x": [3, {"q": true, "p": null}]}, "a": "s"});
        assert_eq!(
            canonical_json(&value).unwrap(),
            r#"{"a":"s","z":{"x":[3,{"p":null,"q":true}],"y":1}}"#
        );
    }

    #[test]
    fn array_order_is_significant() {
        let a = hash_object(&json!([1, 2, 3])).unwrap();
        let b = hash_object(&json!([3, 2, 1])).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn integral_floats_render_as_integers() {
        assert_eq!(canonical_json(&json!(1.0)).unwrap(), "1");
        assert_eq!(canonical_json(&json!(-3.0)).unwrap(), "-3");
        assert_eq!(canonical_json(&json!(0.25)).unwrap(), "0.25");
        assert_eq!(
            hash_object(&json!({"n": 1})).unwrap(),
            hash_object(&json!({"n": 1.0})).unwrap()
        );
    }

    #[test]
    fn changed_field_changes_digest() {
        let a = hash_object(&json!({"a": 1, "b": 2})).unwrap();
        let b = hash_object(&json!({"a": 1, "b": 3})).unwrap();
        assert_ne!(a, b);
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("value cannot be represented"))
        }
    }

    #[test]
    fn unserializable_value_is_a_serialization_error() {
        let err = hash_object(&Unserializable).unwrap_err();
        assert!(matches!(err, ChainError::Serialization(_)));
    }

    #[test]
    fn non_string_map_keys_are_a_serialization_error() {
        let mut map = std::collections::BTreeMap::new();
        map.insert((1u8, 2u8), "pair");
        assert!(matches!(
            hash_object(&map),
            Err(ChainError::Serialization(_))
        ));
    }

    #[test]
    fn non_finite_numbers_are_a_serialization_error() {
        for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut map = std::collections::BTreeMap::new();
            map.insert("x", x);
            assert!(matches!(
                hash_object(&map),
                Err(ChainError::Serialization(_))
            ));
        }

        let mut finite = std::collections::BTreeMap::new();
        finite.insert("x", 1.5);
        assert_eq!(
            hash_object(&finite).unwrap(),
            hash_object(&json!({"x": 1.5})).unwrap()
        );
        assert!(hash_object(&json!({"x": null})).is_ok());
    }
}
