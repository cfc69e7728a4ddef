//! The per-type converter.

use core::fmt;

use serde_core::de::{self, Visitor};
use serde_core::ser;
use serde_core::{Deserializer, Serializer};

use crate::convention::{Convention, ConvertImpl, RenderImpl};
use crate::error::ConvertError;
use crate::info::TypeDesc;
use crate::probe::{self, Resolved};
use crate::registry::TypeRecord;
use crate::value::TextValue;

// -----------------------------------------------------------------------------
// StringConverter

/// Converts values of one specific type to and from their serialized string
/// form, in value position and in map-key position.
///
/// A converter is produced in two phases: the
/// [prober](crate::probe::resolve) picks the governing construction entry,
/// then [`bind`](StringConverter::bind) closes that entry and the record's
/// rendering entry over the type's descriptor. The
/// [factory](crate::TextConverterFactory) runs both phases and memoizes the
/// result once per type.
///
/// The four serde-facing operations hand the host's serializer or
/// deserializer straight through; the converter itself touches nothing but
/// strings.
///
/// # Examples
///
/// ```
/// use core::str::FromStr;
///
/// use textform_convert::converter::StringConverter;
/// use textform_convert::registry::TypeRecord;
/// use textform_convert::{Convention, ConvertImpl, RenderImpl};
/// # use textform_convert::info::{Describe, TypeDesc, TypeKind, TypePath};
///
/// #[derive(Debug, PartialEq)]
/// struct Code(u16);
/// # impl TypePath for Code {
/// #     fn type_path() -> &'static str { "my_crate::Code" }
/// # }
/// # impl Describe for Code {
/// #     fn type_desc() -> &'static TypeDesc {
/// #         static DESC: TypeDesc = TypeDesc::new::<Code>(TypeKind::Struct);
/// #         &DESC
/// #     }
/// # }
///
/// impl FromStr for Code {
///     type Err = core::num::ParseIntError;
///     fn from_str(s: &str) -> Result<Self, Self::Err> {
///         Ok(Code(s.parse()?))
///     }
/// }
///
/// impl core::fmt::Display for Code {
///     fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
///         self.0.fmt(f)
///     }
/// }
///
/// let record = TypeRecord::of::<Code>()
///     .with_impl(Convention::Parse, ConvertImpl::parse::<Code>())
///     .with_render(RenderImpl::display::<Code>());
///
/// let converter = StringConverter::for_record(&record).unwrap();
///
/// let value = converter.construct("17").unwrap();
/// assert_eq!(converter.render(value.as_ref()), "17");
/// ```
pub struct StringConverter {
    desc: &'static TypeDesc,
    convention: Convention,
    imp: ConvertImpl,
    render: RenderImpl,
}

impl StringConverter {
    /// Phase two of converter construction: close the resolved entry and the
    /// record's rendering entry over the record's type.
    ///
    /// Fails with [`ConvertError::MissingRender`] when the record has no
    /// rendering entry — resolution only vouches for the read side.
    pub fn bind(record: &TypeRecord, resolved: Resolved<'_>) -> Result<Self, ConvertError> {
        let Some(render) = record.render() else {
            return Err(ConvertError::MissingRender {
                type_path: record.desc().path(),
            });
        };
        Ok(Self {
            desc: record.desc(),
            convention: resolved.convention(),
            imp: *resolved.convert_impl(),
            render: *render,
        })
    }

    /// Runs both phases — resolution, then [`bind`](Self::bind) — for a
    /// record.
    pub fn for_record(record: &TypeRecord) -> Result<Self, ConvertError> {
        match probe::resolve(record) {
            Some(resolved) => Self::bind(record, resolved),
            None => Err(ConvertError::NotConvertible {
                type_path: record.desc().path(),
            }),
        }
    }

    /// The descriptor of the converted type.
    #[inline(always)]
    pub const fn type_desc(&self) -> &'static TypeDesc {
        self.desc
    }

    /// The convention that governs deserialization for this type.
    #[inline(always)]
    pub const fn convention(&self) -> Convention {
        self.convention
    }

    /// Constructs an instance from its text form via the governing entry.
    ///
    /// On failure the returned [`ConvertError::Construct`] carries the
    /// construction method's own error as its source; callers can downcast
    /// it to the concrete error type.
    pub fn construct(&self, text: &str) -> Result<Box<dyn TextValue>, ConvertError> {
        self.imp
            .construct(text)
            .map_err(|source| ConvertError::Construct {
                type_path: self.desc.path(),
                source,
            })
    }

    /// Renders a value to its canonical string form.
    ///
    /// # Panic
    /// - The value's concrete type does not match the converter's type.
    #[inline]
    pub fn render(&self, value: &dyn TextValue) -> String {
        self.render.render(value)
    }

    /// Serializes a value in value position.
    ///
    /// An absent value becomes the format's null; a present one is rendered
    /// and written as a string.
    pub fn write_value<S: Serializer>(
        &self,
        value: Option<&dyn TextValue>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            None => serializer.serialize_none(),
            Some(value) => serializer.serialize_str(&self.render(value)),
        }
    }

    /// Serializes a value in map-key position.
    ///
    /// Keys cannot be null: an absent value fails with
    /// [`ConvertError::NullKey`].
    pub fn write_key<S: Serializer>(
        &self,
        value: Option<&dyn TextValue>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            None => Err(ser::Error::custom(ConvertError::NullKey {
                type_path: self.desc.path(),
            })),
            Some(value) => serializer.serialize_str(&self.render(value)),
        }
    }

    /// Deserializes a value in value position.
    ///
    /// A null token yields `Ok(None)` without invoking the construction
    /// entry. A string token is handed to the governing entry; the entry's
    /// own error surfaces through the deserializer's error type with its
    /// original message. Any other token kind fails with the format's
    /// `invalid type` error, naming the encountered token.
    pub fn read_value<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<Option<Box<dyn TextValue>>, D::Error> {
        deserializer.deserialize_option(NullableTextVisitor { converter: self })
    }

    /// Deserializes a value in map-key position. Keys are never null.
    pub fn read_key<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<Box<dyn TextValue>, D::Error> {
        deserializer.deserialize_str(TextVisitor { converter: self })
    }
}

impl fmt::Debug for StringConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringConverter")
            .field("type_path", &self.desc.path())
            .field("convention", &self.convention)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Visitors

struct TextVisitor<'a> {
    converter: &'a StringConverter,
}

impl<'de> Visitor<'de> for TextVisitor<'_> {
    type Value = Box<dyn TextValue>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "a string convertible to `{}`",
            self.converter.desc.path()
        )
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<Self::Value, E> {
        self.converter.imp.construct(text).map_err(E::custom)
    }
}

struct NullableTextVisitor<'a> {
    converter: &'a StringConverter,
}

impl<'de> Visitor<'de> for NullableTextVisitor<'_> {
    type Value = Option<Box<dyn TextValue>>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "null or a string convertible to `{}`",
            self.converter.desc.path()
        )
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer
            .deserialize_str(TextVisitor {
                converter: self.converter,
            })
            .map(Some)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::fmt;
    use core::str::FromStr;

    use super::StringConverter;
    use crate::convention::{Convention, ConvertImpl, RenderImpl};
    use crate::error::ConvertError;
    use crate::info::{Describe, TypeDesc, TypeKind, TypePath};
    use crate::registry::TypeRecord;
    use crate::value::TextValue;

    #[derive(Debug, PartialEq)]
    struct Port(u16);

    #[derive(Debug, PartialEq)]
    struct BadPort;

    impl fmt::Display for BadPort {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("not a valid port")
        }
    }

    impl core::error::Error for BadPort {}

    impl TypePath for Port {
        fn type_path() -> &'static str {
            "textform_convert::converter::tests::Port"
        }
    }

    impl Describe for Port {
        fn type_desc() -> &'static TypeDesc {
            static DESC: TypeDesc = TypeDesc::new::<Port>(TypeKind::Struct);
            &DESC
        }
    }

    impl FromStr for Port {
        type Err = BadPort;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            s.parse().map(Port).map_err(|_| BadPort)
        }
    }

    impl fmt::Display for Port {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fmt(f)
        }
    }

    fn port_record() -> TypeRecord {
        TypeRecord::of::<Port>()
            .with_impl(Convention::Parse, ConvertImpl::parse::<Port>())
            .with_render(RenderImpl::display::<Port>())
    }

    fn port_converter() -> StringConverter {
        StringConverter::for_record(&port_record()).unwrap()
    }

    #[test]
    fn bind_requires_a_render_entry() {
        let record =
            TypeRecord::of::<Port>().with_impl(Convention::Parse, ConvertImpl::parse::<Port>());

        let err = StringConverter::for_record(&record).unwrap_err();
        assert!(matches!(err, ConvertError::MissingRender { .. }));
    }

    #[test]
    fn empty_record_is_not_convertible() {
        let record = TypeRecord::of::<Port>();
        let err = StringConverter::for_record(&record).unwrap_err();
        assert!(matches!(err, ConvertError::NotConvertible { .. }));
    }

    #[test]
    fn construct_preserves_the_methods_error_type() {
        let converter = port_converter();
        let err = converter.construct("not a number").unwrap_err();

        let source = core::error::Error::source(&err).unwrap();
        assert_eq!(source.downcast_ref::<BadPort>(), Some(&BadPort));
    }

    #[test]
    fn write_value_renders_a_json_string() {
        let converter = port_converter();
        let port = Port(8080);

        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::new(&mut out);
        converter
            .write_value(Some(&port), &mut serializer)
            .unwrap();
        assert_eq!(out, br#""8080""#);
    }

    #[test]
    fn write_value_of_absent_is_null() {
        let converter = port_converter();

        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::new(&mut out);
        converter.write_value(None, &mut serializer).unwrap();
        assert_eq!(out, b"null");
    }

    #[test]
    fn write_key_of_absent_is_an_error() {
        let converter = port_converter();

        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::new(&mut out);
        let err = converter.write_key(None, &mut serializer).unwrap_err();
        assert!(err.to_string().contains("as a map key"));
    }

    #[test]
    fn read_value_constructs_from_a_string() {
        let converter = port_converter();

        let mut deserializer = serde_json::Deserializer::from_str(r#""8080""#);
        let value = converter.read_value(&mut deserializer).unwrap().unwrap();
        assert_eq!(value.take::<Port>().unwrap(), Port(8080));
    }

    #[test]
    fn read_value_of_null_is_none_without_construction() {
        let converter = port_converter();

        let mut deserializer = serde_json::Deserializer::from_str("null");
        let value = converter.read_value(&mut deserializer).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn read_value_rejects_non_string_tokens() {
        let converter = port_converter();

        for input in ["8080", "true", "[1]", r#"{"a":1}"#] {
            let mut deserializer = serde_json::Deserializer::from_str(input);
            let err = converter.read_value(&mut deserializer).unwrap_err();
            assert!(
                err.to_string().contains("invalid type"),
                "input {input}: {err}"
            );
        }
    }

    #[test]
    fn read_value_surfaces_the_methods_error_message() {
        let converter = port_converter();

        let mut deserializer = serde_json::Deserializer::from_str(r#""nope""#);
        let err = converter.read_value(&mut deserializer).unwrap_err();
        assert!(err.to_string().contains("not a valid port"));
    }

    #[test]
    fn read_key_constructs_without_a_null_case() {
        let converter = port_converter();

        let mut deserializer = serde_json::Deserializer::from_str(r#""443""#);
        let value = converter.read_key(&mut deserializer).unwrap();
        assert_eq!(value.take::<Port>().unwrap(), Port(443));
    }

    #[test]
    fn round_trip_law_for_lossless_types() {
        let converter = port_converter();

        let original = converter.construct("17").unwrap();
        let rendered = converter.render(original.as_ref());
        let rebuilt = converter.construct(&rendered).unwrap();
        assert_eq!(
            rebuilt.take::<Port>().unwrap(),
            *original.downcast_ref::<Port>().unwrap()
        );
    }

    #[test]
    fn value_type_mismatch_panics_with_both_paths() {
        let converter = port_converter();
        let result = std::panic::catch_unwind(|| {
            let value: Box<dyn TextValue> = Box::new(String::from("x"));
            converter.render(value.as_ref())
        });
        assert!(result.is_err());
    }
}
