//! Object-safe converter operations over erased serde handles.

use erased_serde::Serialize as _;
use serde_core::ser::Error as _;

use crate::converter::StringConverter;
use crate::error::ConvertError;
use crate::value::TextValue;

// -----------------------------------------------------------------------------
// TokenConverter

/// The host-facing, object-safe converter contract.
///
/// Hosts that cache converters behind a uniform handle cannot use the
/// generic operations of [`StringConverter`] directly; this trait exposes the
/// same four operations over [`erased_serde`] trait objects, so a
/// `Arc<dyn TokenConverter>` can be driven by whatever serializer or
/// deserializer the host is holding.
///
/// # Examples
///
/// ```
/// use core::str::FromStr;
///
/// use textform_convert::converter::StringConverter;
/// use textform_convert::registry::TypeRecord;
/// use textform_convert::{Convention, ConvertImpl, RenderImpl, TokenConverter};
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
/// # impl FromStr for Code {
/// #     type Err = core::num::ParseIntError;
/// #     fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Code(s.parse()?)) }
/// # }
/// # impl core::fmt::Display for Code {
/// #     fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
/// #         self.0.fmt(f)
/// #     }
/// # }
///
/// let record = TypeRecord::of::<Code>()
///     .with_impl(Convention::Parse, ConvertImpl::parse::<Code>())
///     .with_render(RenderImpl::display::<Code>());
/// let converter: Box<dyn TokenConverter> =
///     Box::new(StringConverter::for_record(&record).unwrap());
///
/// let mut out = Vec::new();
/// let mut serializer = serde_json::Serializer::new(&mut out);
/// let mut erased = <dyn erased_serde::Serializer>::erase(&mut serializer);
///
/// let code = Code(443);
/// converter.write_value_erased(Some(&code), &mut erased).unwrap();
/// assert_eq!(out, br#""443""#);
/// ```
pub trait TokenConverter: Send + Sync {
    /// Erased [`StringConverter::write_value`].
    fn write_value_erased(
        &self,
        value: Option<&dyn TextValue>,
        serializer: &mut dyn erased_serde::Serializer,
    ) -> Result<(), erased_serde::Error>;

    /// Erased [`StringConverter::write_key`].
    fn write_key_erased(
        &self,
        value: Option<&dyn TextValue>,
        serializer: &mut dyn erased_serde::Serializer,
    ) -> Result<(), erased_serde::Error>;

    /// Erased [`StringConverter::read_value`].
    fn read_value_erased(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
    ) -> Result<Option<Box<dyn TextValue>>, erased_serde::Error>;

    /// Erased [`StringConverter::read_key`].
    fn read_key_erased(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
    ) -> Result<Box<dyn TextValue>, erased_serde::Error>;
}

impl TokenConverter for StringConverter {
    fn write_value_erased(
        &self,
        value: Option<&dyn TextValue>,
        serializer: &mut dyn erased_serde::Serializer,
    ) -> Result<(), erased_serde::Error> {
        match value {
            None => Option::<&str>::None.erased_serialize(serializer),
            Some(value) => self.render(value).erased_serialize(serializer),
        }
    }

    fn write_key_erased(
        &self,
        value: Option<&dyn TextValue>,
        serializer: &mut dyn erased_serde::Serializer,
    ) -> Result<(), erased_serde::Error> {
        match value {
            None => Err(erased_serde::Error::custom(ConvertError::NullKey {
                type_path: self.type_desc().path(),
            })),
            Some(value) => self.render(value).erased_serialize(serializer),
        }
    }

    fn read_value_erased(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
    ) -> Result<Option<Box<dyn TextValue>>, erased_serde::Error> {
        self.read_value(deserializer)
    }

    fn read_key_erased(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
    ) -> Result<Box<dyn TextValue>, erased_serde::Error> {
        self.read_key(deserializer)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::fmt;
    use core::str::FromStr;

    use super::TokenConverter;
    use crate::convention::{Convention, ConvertImpl, RenderImpl};
    use crate::converter::StringConverter;
    use crate::info::{Describe, TypeDesc, TypeKind, TypePath};
    use crate::registry::TypeRecord;

    #[derive(Debug, PartialEq)]
    struct Slot(u8);

    impl TypePath for Slot {
        fn type_path() -> &'static str {
            "textform_convert::erased::tests::Slot"
        }
    }

    impl Describe for Slot {
        fn type_desc() -> &'static TypeDesc {
            static DESC: TypeDesc = TypeDesc::new::<Slot>(TypeKind::Struct);
            &DESC
        }
    }

    impl FromStr for Slot {
        type Err = core::num::ParseIntError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Ok(Slot(s.parse()?))
        }
    }

    impl fmt::Display for Slot {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fmt(f)
        }
    }

    fn slot_converter() -> StringConverter {
        let record = TypeRecord::of::<Slot>()
            .with_impl(Convention::Parse, ConvertImpl::parse::<Slot>())
            .with_render(RenderImpl::display::<Slot>());
        StringConverter::for_record(&record).unwrap()
    }

    #[test]
    fn erased_round_trip() {
        let converter: Box<dyn TokenConverter> = Box::new(slot_converter());

        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::new(&mut out);
        let mut erased = <dyn erased_serde::Serializer>::erase(&mut serializer);
        let slot = Slot(7);
        converter.write_value_erased(Some(&slot), &mut erased).unwrap();
        assert_eq!(out, br#""7""#);

        let mut deserializer = serde_json::Deserializer::from_str(r#""7""#);
        let mut erased = <dyn erased_serde::Deserializer>::erase(&mut deserializer);
        let value = converter.read_value_erased(&mut erased).unwrap().unwrap();
        assert_eq!(value.take::<Slot>().unwrap(), Slot(7));
    }
}
