use crate::{
    term::Datum,
    value::{Value, ValueKind},
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Default nesting limit for converted values.
pub const DEFAULT_MAX_DEPTH: usize = 20;

const F64_SAFE_I64: i64 = 1i64 << 53;
const F64_SAFE_U64: u64 = 1u64 << 53;

///
/// DatumConverterFactory
///
/// Collaborator that maps host values onto the wire's datum representation.
/// Consulted only while a term is generated, never while a chain is built.
///

pub trait DatumConverterFactory {
    /// Whether values of this kind can be converted at all.
    fn supports(&self, kind: ValueKind) -> bool;

    /// Convert a host value into a datum.
    fn convert(&self, value: &Value) -> Result<Datum, ConvertError>;
}

///
/// ConvertError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{kind} value cannot be represented as {target}: {reason}")]
pub struct ConvertError {
    pub kind: ValueKind,
    pub target: &'static str,
    pub reason: String,
}

impl ConvertError {
    pub fn new(kind: ValueKind, target: &'static str, reason: impl Into<String>) -> Self {
        Self {
            kind,
            target,
            reason: reason.into(),
        }
    }

    /// The factory declared this kind unsupported.
    #[must_use]
    pub fn unsupported(kind: ValueKind) -> Self {
        Self::new(kind, "datum", "converter does not support this kind")
    }
}

///
/// ConverterConfig
///
/// Knobs for `DefaultConverterFactory`. The default is strict: integers must
/// be exactly representable as wire numbers.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ConverterConfig {
    pub max_depth: usize,
    pub allow_lossy_integers: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_lossy_integers: false,
        }
    }
}

///
/// DefaultConverterFactory
///
/// Converter for the built-in `Value` shapes. Blobs are not supported;
/// map keys must be text and unique.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultConverterFactory {
    config: ConverterConfig,
}

impl DefaultConverterFactory {
    #[must_use]
    pub const fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> ConverterConfig {
        self.config
    }

    #[expect(clippy::cast_precision_loss)]
    fn convert_at(&self, value: &Value, depth: usize) -> Result<Datum, ConvertError> {
        if depth > self.config.max_depth {
            return Err(ConvertError::new(
                value.kind(),
                "datum",
                format!("nesting exceeds {} levels", self.config.max_depth),
            ));
        }

        let datum = match value {
            Value::Null => Datum::Null,
            Value::Bool(v) => Datum::Bool(*v),
            Value::Text(v) => Datum::String(v.clone()),
            Value::Float(v) => {
                if !v.is_finite() {
                    return Err(ConvertError::new(
                        ValueKind::Float,
                        "number",
                        format!("{v} is not finite"),
                    ));
                }
                Datum::Number(*v)
            }
            Value::Int(v) => {
                if !self.config.allow_lossy_integers && v.unsigned_abs() > F64_SAFE_I64.unsigned_abs()
                {
                    return Err(ConvertError::new(
                        ValueKind::Int,
                        "number",
                        format!("{v} is outside the exactly representable range"),
                    ));
                }
                Datum::Number(*v as f64)
            }
            Value::Uint(v) => {
                if !self.config.allow_lossy_integers && *v > F64_SAFE_U64 {
                    return Err(ConvertError::new(
                        ValueKind::Uint,
                        "number",
                        format!("{v} is outside the exactly representable range"),
                    ));
                }
                Datum::Number(*v as f64)
            }
            Value::List(items) => Datum::Array(
                items
                    .iter()
                    .map(|item| self.convert_at(item, depth + 1))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(entries) => {
                let mut object = BTreeMap::new();
                for (key, item) in entries {
                    let Some(key) = key.as_text() else {
                        return Err(ConvertError::new(
                            ValueKind::Map,
                            "object",
                            format!("key of kind {} is not text", key.kind()),
                        ));
                    };
                    let item = self.convert_at(item, depth + 1)?;
                    if object.insert(key.to_string(), item).is_some() {
                        return Err(ConvertError::new(
                            ValueKind::Map,
                            "object",
                            format!("duplicate key '{key}'"),
                        ));
                    }
                }
                Datum::Object(object)
            }
            Value::Blob(_) => return Err(ConvertError::unsupported(ValueKind::Blob)),
        };

        Ok(datum)
    }
}

impl DatumConverterFactory for DefaultConverterFactory {
    fn supports(&self, kind: ValueKind) -> bool {
        !matches!(kind, ValueKind::Blob)
    }

    fn convert(&self, value: &Value) -> Result<Datum, ConvertError> {
        self.convert_at(value, 0)
    }
}
