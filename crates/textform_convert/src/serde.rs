//! Serde driver adapters around the per-type converter.
//!
//! The converter's four operations take a serializer or deserializer as an
//! argument; serde's traits want the opposite shape. These drivers wrap a
//! converter (plus, on the write side, a value) into something that
//! implements [`Serialize`] or [`DeserializeSeed`], so converters plug
//! directly into `serde_json`, `ron`, map-access loops and the like.
//!
//! ## Menu
//!
//! - [`SerializeDriver`]: Value-position serialization, null-aware.
//! - [`KeySerializeDriver`]: Map-key serialization.
//! - [`DeserializeDriver`]: Value-position deserialization, null-aware.
//! - [`KeyDeserializeDriver`]: Map-key deserialization.

use serde_core::de::DeserializeSeed;
use serde_core::{Deserializer, Serialize, Serializer};

use crate::converter::StringConverter;
use crate::value::TextValue;

// -----------------------------------------------------------------------------
// SerializeDriver

/// Serializes a value of a converted type in value position.
///
/// An absent value serializes as the format's null.
///
/// # Examples
///
/// ```
/// use core::str::FromStr;
///
/// use textform_convert::converter::StringConverter;
/// use textform_convert::registry::TypeRecord;
/// use textform_convert::serde::SerializeDriver;
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
/// let converter = StringConverter::for_record(&record).unwrap();
///
/// let code = Code(443);
/// let json = serde_json::to_string(&SerializeDriver::new(Some(&code), &converter)).unwrap();
/// assert_eq!(json, r#""443""#);
///
/// let json = serde_json::to_string(&SerializeDriver::new(None, &converter)).unwrap();
/// assert_eq!(json, "null");
/// ```
pub struct SerializeDriver<'a> {
    value: Option<&'a dyn TextValue>,
    converter: &'a StringConverter,
}

impl<'a> SerializeDriver<'a> {
    /// Creates a value-position serializer.
    #[inline]
    pub const fn new(value: Option<&'a dyn TextValue>, converter: &'a StringConverter) -> Self {
        Self { value, converter }
    }
}

impl Serialize for SerializeDriver<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.converter.write_value(self.value, serializer)
    }
}

// -----------------------------------------------------------------------------
// KeySerializeDriver

/// Serializes a value of a converted type in map-key position.
///
/// Construction takes the value by reference, so the "absent key" failure of
/// [`StringConverter::write_key`] cannot be reached through this driver.
pub struct KeySerializeDriver<'a> {
    value: &'a dyn TextValue,
    converter: &'a StringConverter,
}

impl<'a> KeySerializeDriver<'a> {
    /// Creates a map-key serializer.
    #[inline]
    pub const fn new(value: &'a dyn TextValue, converter: &'a StringConverter) -> Self {
        Self { value, converter }
    }
}

impl Serialize for KeySerializeDriver<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.converter.write_key(Some(self.value), serializer)
    }
}

// -----------------------------------------------------------------------------
// DeserializeDriver

/// Deserializes a value of a converted type in value position.
///
/// A null token yields `None`; a string token yields the constructed value.
///
/// # Examples
///
/// ```
/// use serde::de::DeserializeSeed;
/// # use core::str::FromStr;
/// # use textform_convert::converter::StringConverter;
/// # use textform_convert::registry::TypeRecord;
/// use textform_convert::serde::DeserializeDriver;
/// # use textform_convert::{Convention, ConvertImpl, RenderImpl};
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
/// # let record = TypeRecord::of::<Code>()
/// #     .with_impl(Convention::Parse, ConvertImpl::parse::<Code>())
/// #     .with_render(RenderImpl::display::<Code>());
/// # let converter = StringConverter::for_record(&record).unwrap();
///
/// let mut deserializer = serde_json::Deserializer::from_str(r#""443""#);
/// let value = DeserializeDriver::new(&converter)
///     .deserialize(&mut deserializer)
///     .unwrap()
///     .unwrap();
/// assert_eq!(value.take::<Code>().unwrap(), Code(443));
/// ```
pub struct DeserializeDriver<'a> {
    converter: &'a StringConverter,
}

impl<'a> DeserializeDriver<'a> {
    /// Creates a value-position deserializer.
    #[inline]
    pub const fn new(converter: &'a StringConverter) -> Self {
        Self { converter }
    }
}

impl<'de> DeserializeSeed<'de> for DeserializeDriver<'_> {
    type Value = Option<Box<dyn TextValue>>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        self.converter.read_value(deserializer)
    }
}

// -----------------------------------------------------------------------------
// KeyDeserializeDriver

/// Deserializes a value of a converted type in map-key position.
///
/// Keys are never null, so the value type is not optional. Use with
/// [`MapAccess::next_key_seed`](serde_core::de::MapAccess::next_key_seed)
/// when reading maps keyed by a converted type.
pub struct KeyDeserializeDriver<'a> {
    converter: &'a StringConverter,
}

impl<'a> KeyDeserializeDriver<'a> {
    /// Creates a map-key deserializer.
    #[inline]
    pub const fn new(converter: &'a StringConverter) -> Self {
        Self { converter }
    }
}

impl<'de> DeserializeSeed<'de> for KeyDeserializeDriver<'_> {
    type Value = Box<dyn TextValue>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        self.converter.read_key(deserializer)
    }
}

// -----------------------------------------------------------------------------
// Tests
