//! Bindable scalar values for dynamically built statements.
//!
//! Builders collect values of mixed types into one ordered sequence, so they
//! need a single owned type that is both comparable (for tests and range
//! checks) and bindable through `tokio-postgres`.

use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A JSON-shaped scalar bound to a positional parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// SQL NULL; binds to any column type.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Values a filter treats as "not supplied": null, `false` and the empty string.
    ///
    /// Numbers are never blank; `minEmployees: 0` is a real bound.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null | Self::Bool(false) => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric ordering; `None` unless both sides are numbers.
    pub fn compare_numeric(&self, other: &SqlValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64()?.partial_cmp(&other.as_f64()?),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[derive(Debug)]
struct TypeMismatch {
    value: &'static str,
    column: Type,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot bind {} value to {} column", self.value, self.column)
    }
}

impl Error for TypeMismatch {}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        let mismatch = || -> Box<dyn Error + Sync + Send> {
            Box::new(TypeMismatch {
                value: self.kind(),
                column: ty.clone(),
            })
        };

        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(v) if <bool as ToSql>::accepts(ty) => v.to_sql(ty, out),
            Self::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql(ty, out),
                Type::INT8 => v.to_sql(ty, out),
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                Type::FLOAT8 => (*v as f64).to_sql(ty, out),
                Type::NUMERIC => Decimal::from(*v).to_sql(ty, out),
                _ => Err(mismatch()),
            },
            Self::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql(ty, out),
                Type::FLOAT8 => v.to_sql(ty, out),
                Type::NUMERIC => Decimal::try_from(*v)?.to_sql(ty, out),
                _ => Err(mismatch()),
            },
            Self::Text(v) if *ty == Type::NUMERIC => v.trim().parse::<Decimal>()?.to_sql(ty, out),
            Self::Text(v) if <String as ToSql>::accepts(ty) => v.to_sql(ty, out),
            _ => Err(mismatch()),
        }
    }

    // The concrete check depends on the variant, so it happens in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_json_primitives() {
        let values: Vec<SqlValue> =
            serde_json::from_str(r#"[null, true, 32, 0.5, "Aliya"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                SqlValue::Null,
                SqlValue::Bool(true),
                SqlValue::Int(32),
                SqlValue::Float(0.5),
                SqlValue::Text("Aliya".into()),
            ]
        );
    }

    #[test]
    fn serializes_back_to_plain_json() {
        let json = serde_json::to_string(&vec![SqlValue::Null, SqlValue::from("%hi%")]).unwrap();
        assert_eq!(json, r#"[null,"%hi%"]"#);
    }

    #[test]
    fn blank_values() {
        assert!(SqlValue::Null.is_blank());
        assert!(SqlValue::from(false).is_blank());
        assert!(SqlValue::from("").is_blank());
        assert!(!SqlValue::from(0).is_blank());
        assert!(!SqlValue::from(true).is_blank());
        assert!(!SqlValue::from("c").is_blank());
    }

    #[test]
    fn numeric_comparison_mixes_ints_and_floats() {
        assert_eq!(
            SqlValue::from(50).compare_numeric(&SqlValue::from(20)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            SqlValue::from(1.5).compare_numeric(&SqlValue::from(2)),
            Some(Ordering::Less)
        );
        assert_eq!(SqlValue::from("a").compare_numeric(&SqlValue::from(2)), None);
    }

    #[test]
    fn option_none_is_null() {
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some("x")), SqlValue::Text("x".into()));
    }

    #[test]
    fn binds_integers_to_narrow_columns() {
        let mut buf = BytesMut::new();
        let r = SqlValue::from(20).to_sql(&Type::INT4, &mut buf).unwrap();
        assert!(matches!(r, IsNull::No));
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn numeric_text_binds_to_numeric_column() {
        let mut buf = BytesMut::new();
        let r = SqlValue::from("0.1").to_sql(&Type::NUMERIC, &mut buf).unwrap();
        assert!(matches!(r, IsNull::No));
        assert!(SqlValue::from("lots").to_sql(&Type::NUMERIC, &mut BytesMut::new()).is_err());
    }

    #[test]
    fn null_binds_to_any_column() {
        let mut buf = BytesMut::new();
        let r = SqlValue::Null.to_sql(&Type::NUMERIC, &mut buf).unwrap();
        assert!(matches!(r, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[test]
    fn rejects_mismatched_types() {
        let mut buf = BytesMut::new();
        assert!(SqlValue::from("hi").to_sql(&Type::INT4, &mut buf).is_err());
        assert!(SqlValue::from(1.5).to_sql(&Type::TEXT, &mut buf).is_err());
        assert!(SqlValue::from(i64::MAX).to_sql(&Type::INT4, &mut buf).is_err());
    }
}
