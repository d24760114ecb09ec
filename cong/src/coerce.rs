//! Conversion of raw candidates into values of the declared leaf type.

use crate::error::{CongError, CongResult};
use crate::schema::{LeafKind, LeafType};
use crate::value::{Scalar, Value};

/// Where a resolved candidate came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// The named environment variable.
    Env(String),
    /// The merged document tree.
    Document,
}

/// A raw candidate for a leaf, before coercion.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    /// Raw value; environment candidates are always strings.
    pub value: Value,
    /// Source of the value.
    pub origin: Origin,
}

/// Coerce a scalar candidate into `leaf`.
pub(crate) fn coerce_scalar(key: &str, leaf: LeafType, resolved: &Resolved) -> CongResult<Value> {
    let scalar = match &resolved.value {
        Value::Scalar(scalar) => scalar,
        other => {
            return Err(CongError::coercion(
                key,
                leaf.type_name,
                format!("expected a scalar, found a {}", other.kind_name()),
            ));
        }
    };
    let text = scalar.to_string();
    // Environment values are typed by hand; tolerate stray whitespace except
    // for strings, which are taken verbatim.
    let trimmed = match resolved.origin {
        Origin::Env(_) => text.trim(),
        Origin::Document => text.as_str(),
    };
    coerce_text(key, leaf, scalar, trimmed)
}

/// Coerce a document sequence into a sequence of `leaf` values.
pub(crate) fn coerce_sequence(key: &str, leaf: LeafType, value: &Value) -> CongResult<Value> {
    let Value::Sequence(items) = value else {
        return Err(CongError::coercion(
            key,
            format!("Vec<{}>", leaf.type_name),
            format!("expected a sequence, found a {}", value.kind_name()),
        ));
    };
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let element = format!("{key}[{idx}]");
            coerce_scalar(
                &element,
                leaf,
                &Resolved {
                    value: item.clone(),
                    origin: Origin::Document,
                },
            )
        })
        .collect::<CongResult<Vec<_>>>()
        .map(Value::Sequence)
}

fn coerce_text(key: &str, leaf: LeafType, scalar: &Scalar, text: &str) -> CongResult<Value> {
    match leaf.kind {
        LeafKind::String => Ok(Value::from(match scalar {
            Scalar::String(s) => s.clone(),
            _ => text.to_owned(),
        })),
        LeafKind::Integer => match scalar {
            Scalar::Integer(_) | Scalar::Unsigned(_) => Ok(Value::Scalar(scalar.clone())),
            Scalar::Boolean(_) => Err(mismatch(key, leaf, text)),
            _ => parse_integer(text).map_err(|err| {
                CongError::coercion(key, leaf.type_name, format!("'{text}': {err}"))
            }),
        },
        LeafKind::Float => match scalar {
            Scalar::Float(x) => Ok(Value::from(*x)),
            Scalar::Boolean(_) => Err(mismatch(key, leaf, text)),
            _ => text
                .parse::<f64>()
                .map(Value::from)
                .map_err(|err| {
                    CongError::coercion(key, leaf.type_name, format!("'{text}': {err}"))
                }),
        },
        LeafKind::Boolean => match scalar {
            Scalar::Boolean(b) => Ok(Value::from(*b)),
            _ => parse_bool(text)
                .map(Value::from)
                .ok_or_else(|| mismatch(key, leaf, text)),
        },
    }
}

/// Parse integer text, keeping the unsigned range above `i64::MAX`.
///
/// Narrowing to the declared field type happens during extraction.
fn parse_integer(text: &str) -> Result<Value, std::num::ParseIntError> {
    text.parse::<i64>()
        .map(Value::from)
        .or_else(|err| text.parse::<u64>().map(Value::from).map_err(|_| err))
}

fn mismatch(key: &str, leaf: LeafType, text: &str) -> CongError {
    CongError::coercion(
        key,
        leaf.type_name,
        format!("'{text}' is not a valid {}", leaf.kind),
    )
}

/// Parse the boolean spellings accepted from any source.
fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const INT: LeafType = LeafType::new(LeafKind::Integer, "u16");
    const FLOAT: LeafType = LeafType::new(LeafKind::Float, "f64");
    const BOOL: LeafType = LeafType::new(LeafKind::Boolean, "bool");
    const STRING: LeafType = LeafType::new(LeafKind::String, "String");
    const U64: LeafType = LeafType::new(LeafKind::Integer, "u64");

    fn env(text: &str) -> Resolved {
        Resolved {
            value: Value::from(text),
            origin: Origin::Env("HELLO_X".into()),
        }
    }

    fn doc(value: Value) -> Resolved {
        Resolved {
            value,
            origin: Origin::Document,
        }
    }

    #[rstest]
    #[case(BOOL, env("TRUE"), Value::from(true))]
    #[case(BOOL, env("off"), Value::from(false))]
    #[case(BOOL, env(" yes "), Value::from(true))]
    #[case(BOOL, doc(Value::from("0")), Value::from(false))]
    #[case(INT, env(" 8080 "), Value::from(8080))]
    #[case(INT, doc(Value::from(3.0)), Value::from(3))]
    #[case(FLOAT, doc(Value::from(3.141_592_653_59)), Value::from(3.141_592_653_59))]
    #[case(FLOAT, doc(Value::from(80)), Value::from(80.0))]
    #[case(FLOAT, env("2.5"), Value::from(2.5))]
    #[case(STRING, doc(Value::from(80)), Value::from("80"))]
    #[case(STRING, env(" padded "), Value::from(" padded "))]
    #[case(U64, env("18446744073709551615"), Value::from(u64::MAX))]
    #[case(U64, doc(Value::from(u64::MAX)), Value::from(u64::MAX))]
    #[case(INT, env("-9223372036854775808"), Value::from(i64::MIN))]
    fn coerces_scalars(#[case] leaf: LeafType, #[case] input: Resolved, #[case] expected: Value) {
        let coerced = coerce_scalar("server.port", leaf, &input);
        assert_eq!(coerced.ok(), Some(expected));
    }

    #[rstest]
    #[case(INT, env("eighty"))]
    #[case(U64, env("18446744073709551616"))]
    #[case(INT, doc(Value::from(true)))]
    #[case(INT, doc(Value::from(2.5)))]
    #[case(FLOAT, env("pi"))]
    #[case(BOOL, env("maybe"))]
    #[case(STRING, doc(Value::Sequence(vec![])))]
    #[case(INT, doc(Value::mapping()))]
    fn rejects_malformed_input(#[case] leaf: LeafType, #[case] input: Resolved) {
        let err = coerce_scalar("server.port", leaf, &input).err();
        assert!(
            matches!(err, Some(CongError::Coercion { ref key, .. }) if key == "server.port"),
            "unexpected result: {err:?}"
        );
    }

    #[test]
    fn sequences_coerce_each_element() {
        let items = Value::Sequence(vec![Value::from("item1"), Value::from(2)]);
        assert_eq!(
            coerce_sequence("list", STRING, &items).ok(),
            Some(Value::Sequence(vec![Value::from("item1"), Value::from("2")]))
        );
    }

    #[test]
    fn sequence_errors_name_the_element() {
        let items = Value::Sequence(vec![Value::from(1), Value::from("x")]);
        let err = coerce_sequence("ports", INT, &items).err();
        assert_eq!(err.as_ref().and_then(CongError::key), Some("ports[1]"));
    }

    #[test]
    fn scalars_are_not_sequences() {
        let err = coerce_sequence("list", STRING, &Value::from("a,b")).err();
        assert!(matches!(err, Some(CongError::Coercion { .. })));
    }
}
