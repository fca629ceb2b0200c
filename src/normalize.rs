//! The value normalizer (§4.2): maps host-language values onto the canonical
//! value tree before they ever reach the encoder.
//!
//! Most of this mapping already happens for free: [`crate::ser::ToonValueSerializer`]
//! is the only path that produces a [`ToonValue`] from an arbitrary `Serialize`
//! type, and it already routes every float through [`crate::Number::normalize_f64`]
//! and every non-string map key through `ToonValue::to_string`. What's left here
//! is the part that isn't a side effect of implementing `serde::Serializer`:
//! an explicit, idempotent `normalize` entry point for values that already
//! exist as a `ToonValue` (round-trip testing, values rebuilt by the decoder,
//! values assembled by hand via the `toon!` macro), plus the handful of
//! host-type conversions (dates, arbitrary-precision integers, unordered
//! collections) that §4.2 calls out by name.

use crate::{Number, ToonMap, ToonValue};

/// Re-applies the normalizer's rules to an already-built [`ToonValue`].
///
/// `ToonValue` itself can only hold the seven canonical cases, so most of
/// §4.2's work — collapsing non-finite floats, rejecting Table/Date/BigInt
/// shapes — is a type-level invariant rather than something this function
/// has to check. What remains: floats get a second pass through
/// [`Number::normalize_f64`] (covers values built directly via
/// `ToonValue::Number(Number::Float(f64::NAN))`, which bypasses the `From`
/// impls), and the recursion into children. This makes the function
/// idempotent: `normalize(normalize(v)) == normalize(v)`.
pub fn normalize(value: &ToonValue) -> ToonValue {
    match value {
        ToonValue::Null | ToonValue::Bool(_) | ToonValue::String(_) => value.clone(),
        ToonValue::Number(Number::Integer(i)) => ToonValue::Number(Number::Integer(*i)),
        ToonValue::Number(Number::Float(f)) => match Number::normalize_f64(*f) {
            Some(n) => ToonValue::Number(n),
            None => ToonValue::Null,
        },
        ToonValue::Array(arr) => ToonValue::Array(arr.iter().map(normalize).collect()),
        ToonValue::Object(obj) => {
            let mut out = ToonMap::with_capacity(obj.len());
            for (k, v) in obj.iter() {
                out.insert(k.clone(), normalize(v));
            }
            ToonValue::Object(out)
        }
    }
}

/// Sorts values from a source with no inherent order (a `HashSet`, a
/// `HashMap`'s keys) by natural order when every element is the same
/// primitive kind, otherwise by the stable string representation of each
/// element (§4.2 "sorted by natural order if comparable, else by a stable
/// string representation").
///
/// Rust's own container types already encode most of this rule at the type
/// level — `BTreeSet`/`BTreeMap` serialize in sorted order and `Vec`/`IndexMap`
/// preserve insertion order — so callers only need this helper when they are
/// assembling a `ToonValue::Array` from a source that carries no order of its
/// own.
pub fn sort_unordered(mut values: Vec<ToonValue>) -> Vec<ToonValue> {
    let all_numbers = values.iter().all(|v| v.is_number());
    let all_strings = values.iter().all(|v| v.is_string());

    if all_numbers {
        values.sort_by(|a, b| {
            a.as_f64()
                .unwrap_or(0.0)
                .partial_cmp(&b.as_f64().unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    } else if all_strings {
        values.sort_by(|a, b| a.as_str().unwrap_or("").cmp(b.as_str().unwrap_or("")));
    } else {
        values.sort_by_key(|v| v.to_string());
    }

    values
}

/// Normalizes a UTC timestamp to its ISO-8601/RFC3339 string form (§4.2
/// "Dates/datetimes -> ISO-8601 strings"). Grounded on the `chrono` dependency
/// carried from the teacher's `Cargo.toml`.
pub fn datetime_to_value(dt: &chrono::DateTime<chrono::Utc>) -> ToonValue {
    ToonValue::String(dt.to_rfc3339())
}

/// Normalizes an arbitrary-precision integer to the nearest finite `f64`,
/// mapping non-finite results to `Null` (§4.2 "Arbitrary-precision decimals:
/// non-finite -> Null; otherwise -> Float"). Grounded on the `num-bigint`
/// dependency carried from the teacher's `Cargo.toml`.
pub fn bigint_to_value(b: &num_bigint::BigInt) -> ToonValue {
    match b.to_string().parse::<f64>() {
        Ok(f) => match Number::normalize_f64(f) {
            Some(n) => ToonValue::Number(n),
            None => ToonValue::Null,
        },
        Err(_) => ToonValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        let value = ToonValue::Object({
            let mut m = ToonMap::new();
            m.insert("a".into(), ToonValue::Number(Number::Float(1.5)));
            m.insert(
                "b".into(),
                ToonValue::Array(vec![ToonValue::Null, ToonValue::Bool(true)]),
            );
            m
        });
        let once = normalize(&value);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn normalize_collapses_non_finite_float() {
        let value = ToonValue::Number(Number::Float(f64::NAN));
        assert_eq!(normalize(&value), ToonValue::Null);
    }

    #[test]
    fn normalize_negative_zero_becomes_integer() {
        let value = ToonValue::Number(Number::Float(-0.0));
        assert_eq!(normalize(&value), ToonValue::Number(Number::Integer(0)));
    }

    #[test]
    fn sort_unordered_numbers() {
        let values = vec![
            ToonValue::Number(Number::Integer(3)),
            ToonValue::Number(Number::Integer(1)),
            ToonValue::Number(Number::Integer(2)),
        ];
        let sorted = sort_unordered(values);
        assert_eq!(
            sorted,
            vec![
                ToonValue::Number(Number::Integer(1)),
                ToonValue::Number(Number::Integer(2)),
                ToonValue::Number(Number::Integer(3)),
            ]
        );
    }

    #[test]
    fn sort_unordered_strings() {
        let values = vec![
            ToonValue::String("banana".into()),
            ToonValue::String("apple".into()),
        ];
        let sorted = sort_unordered(values);
        assert_eq!(
            sorted,
            vec![
                ToonValue::String("apple".into()),
                ToonValue::String("banana".into()),
            ]
        );
    }

    #[test]
    fn datetime_normalizes_to_rfc3339_string() {
        use chrono::TimeZone;
        let dt = chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let value = datetime_to_value(&dt);
        assert!(matches!(value, ToonValue::String(s) if s.starts_with("2024-01-01")));
    }

    #[test]
    fn bigint_normalizes_to_float() {
        use std::str::FromStr;
        let big = num_bigint::BigInt::from_str("123456789012345678901234567890").unwrap();
        let value = bigint_to_value(&big);
        assert!(value.is_number());
    }
}
