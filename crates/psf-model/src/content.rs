//! Typed element values.
//!
//! Mirrors the controller's memory type system: fixed-width integers and
//! IEEE floats, either as a single value or as an array of one type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Element type of a [`TypedContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Sint8,
    Sint16,
    Sint32,
    Sint64,
    Float32,
    Float64,
}

impl ContentType {
    pub const ALL: [ContentType; 10] = [
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Sint8,
        Self::Sint16,
        Self::Sint32,
        Self::Sint64,
        Self::Float32,
        Self::Float64,
    ];

    /// Name used in files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Sint8 => "sint8",
            Self::Sint16 => "sint16",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type name is not known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown content type \"{0}\"")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|content_type| content_type.as_str() == s)
            .ok_or_else(|| UnknownContentType(s.to_string()))
    }
}

/// Values of one element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum ContentValues {
    Uint8(Vec<u8>),
    Uint16(Vec<u16>),
    Uint32(Vec<u32>),
    Uint64(Vec<u64>),
    Sint8(Vec<i8>),
    Sint16(Vec<i16>),
    Sint32(Vec<i32>),
    Sint64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl ContentValues {
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Uint8(_) => ContentType::Uint8,
            Self::Uint16(_) => ContentType::Uint16,
            Self::Uint32(_) => ContentType::Uint32,
            Self::Uint64(_) => ContentType::Uint64,
            Self::Sint8(_) => ContentType::Sint8,
            Self::Sint16(_) => ContentType::Sint16,
            Self::Sint32(_) => ContentType::Sint32,
            Self::Sint64(_) => ContentType::Sint64,
            Self::Float32(_) => ContentType::Float32,
            Self::Float64(_) => ContentType::Float64,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Uint8(values) => values.len(),
            Self::Uint16(values) => values.len(),
            Self::Uint32(values) => values.len(),
            Self::Uint64(values) => values.len(),
            Self::Sint8(values) => values.len(),
            Self::Sint16(values) => values.len(),
            Self::Sint32(values) => values.len(),
            Self::Sint64(values) => values.len(),
            Self::Float32(values) => values.len(),
            Self::Float64(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values as displayed text, one string per value.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        fn strings<T: ToString>(values: &[T]) -> Vec<String> {
            values.iter().map(ToString::to_string).collect()
        }
        match self {
            Self::Uint8(values) => strings(values),
            Self::Uint16(values) => strings(values),
            Self::Uint32(values) => strings(values),
            Self::Uint64(values) => strings(values),
            Self::Sint8(values) => strings(values),
            Self::Sint16(values) => strings(values),
            Self::Sint32(values) => strings(values),
            Self::Sint64(values) => strings(values),
            Self::Float32(values) => strings(values),
            Self::Float64(values) => strings(values),
        }
    }
}

/// Error returned when a scalar does not hold exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("scalar value must hold exactly one value, found {0}")]
pub struct NotScalar(pub usize);

/// A typed element value.
///
/// A scalar always holds exactly one value; an array holds any number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedContent {
    values: ContentValues,
    is_array: bool,
}

impl TypedContent {
    /// Array content.
    #[must_use]
    pub fn array(values: ContentValues) -> Self {
        Self {
            values,
            is_array: true,
        }
    }

    /// Scalar content; fails unless exactly one value is given.
    pub fn scalar(values: ContentValues) -> Result<Self, NotScalar> {
        if values.len() == 1 {
            Ok(Self {
                values,
                is_array: false,
            })
        } else {
            Err(NotScalar(values.len()))
        }
    }

    #[must_use]
    pub fn values(&self) -> &ContentValues {
        &self.values
    }

    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.values.content_type()
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        self.is_array
    }
}

impl fmt::Display for TypedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values.to_strings();
        if self.is_array {
            write!(f, "[{}]", values.join(", "))
        } else {
            f.write_str(values.first().map_or("", String::as_str))
        }
    }
}

macro_rules! impl_from_values {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for TypedContent {
                fn from(value: $ty) -> Self {
                    Self {
                        values: ContentValues::$variant(vec![value]),
                        is_array: false,
                    }
                }
            }

            impl From<Vec<$ty>> for TypedContent {
                fn from(values: Vec<$ty>) -> Self {
                    Self::array(ContentValues::$variant(values))
                }
            }
        )*
    };
}

impl_from_values! {
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    i8 => Sint8,
    i16 => Sint16,
    i32 => Sint32,
    i64 => Sint64,
    f32 => Float32,
    f64 => Float64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        for content_type in ContentType::ALL {
            assert_eq!(content_type.as_str().parse::<ContentType>(), Ok(content_type));
        }
        let err = "int16".parse::<ContentType>().expect_err("unknown");
        assert_eq!(err.to_string(), "unknown content type \"int16\"");
    }

    #[test]
    fn test_scalar_requires_one_value() {
        assert!(TypedContent::scalar(ContentValues::Uint8(vec![1])).is_ok());
        assert_eq!(
            TypedContent::scalar(ContentValues::Uint8(vec![1, 2])),
            Err(NotScalar(2))
        );
        assert_eq!(
            TypedContent::scalar(ContentValues::Uint8(vec![])),
            Err(NotScalar(0))
        );
        assert_eq!(
            NotScalar(2).to_string(),
            "scalar value must hold exactly one value, found 2"
        );
    }

    #[test]
    fn test_from_conversions() {
        let scalar = TypedContent::from(1000u16);
        assert!(!scalar.is_array());
        assert_eq!(scalar.content_type(), ContentType::Uint16);
        assert_eq!(scalar.to_string(), "1000");

        let array = TypedContent::from(vec![-1i32, 2]);
        assert!(array.is_array());
        assert_eq!(array.to_string(), "[-1, 2]");
    }
}
