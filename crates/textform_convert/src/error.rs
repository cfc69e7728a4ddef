//! The failure surface of conversion and factory operations.

use core::any::TypeId;
use core::error::Error;
use core::fmt;

use crate::convention::BoxError;

// -----------------------------------------------------------------------------
// ConvertError

/// Errors raised by the converter factory and the per-type converter.
///
/// A negative capability probe is *not* an error: it is reported as `false`
/// by [`ConverterFactory::can_convert`](crate::ConverterFactory::can_convert)
/// or `None` by [`probe::resolve`](crate::probe::resolve). `ConvertError`
/// covers the cases where an operation was actually attempted and failed.
#[derive(Debug)]
pub enum ConvertError {
    /// An absent value was passed where a map key had to be produced.
    /// Keys cannot be null.
    NullKey {
        /// Path of the converter's type.
        type_path: &'static str,
    },
    /// A converter was requested for a type the registry has no record of.
    Unregistered {
        /// Identity of the requested type.
        type_id: TypeId,
    },
    /// A converter was requested for a registered type on which resolution
    /// yields no governing conversion method.
    NotConvertible {
        /// Path of the requested type.
        type_path: &'static str,
    },
    /// Resolution chose a construction entry, but the record carries no
    /// string-rendering entry to write values back with.
    MissingRender {
        /// Path of the requested type.
        type_path: &'static str,
    },
    /// The type's own construction method failed. `source` is that method's
    /// error, unwrapped, and can be downcast to its concrete type.
    Construct {
        /// Path of the converter's type.
        type_path: &'static str,
        /// The construction method's own error.
        source: BoxError,
    },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullKey { type_path } => {
                write!(f, "cannot render an absent `{type_path}` as a map key")
            }
            Self::Unregistered { type_id } => {
                write!(f, "no conversion record registered for type {type_id:?}")
            }
            Self::NotConvertible { type_path } => {
                write!(f, "type `{type_path}` is not string-convertible")
            }
            Self::MissingRender { type_path } => {
                write!(f, "type `{type_path}` has no string rendering registered")
            }
            Self::Construct { type_path, source } => {
                write!(f, "failed to construct `{type_path}` from a string: {source}")
            }
        }
    }
}

impl Error for ConvertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Construct { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct_error_exposes_the_original_source() {
        let original = "x".parse::<u32>().unwrap_err();
        let err = ConvertError::Construct {
            type_path: "my_crate::Widget",
            source: Box::new(original),
        };

        let source = Error::source(&err).unwrap();
        assert!(source.downcast_ref::<core::num::ParseIntError>().is_some());
    }

    #[test]
    fn display_names_the_type() {
        let err = ConvertError::NotConvertible {
            type_path: "my_crate::Widget",
        };
        assert_eq!(
            err.to_string(),
            "type `my_crate::Widget` is not string-convertible"
        );
    }
}
