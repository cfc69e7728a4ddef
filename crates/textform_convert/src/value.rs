//! The erased value type flowing through converters.

use core::any::Any;

use crate::info::{Describe, TypeDesc};

// -----------------------------------------------------------------------------
// TextValue

/// A type-erased value that can flow through text conversion.
///
/// Automatically implemented for every [`Describe`] type that is
/// `Send + Sync`, so there is nothing to implement by hand: deriving
/// [`Convertible`](crate::derive::Convertible) (or writing a manual
/// [`Describe`] impl) is enough.
///
/// Converters hand values around as `Box<dyn TextValue>`; use
/// [`downcast_ref`], [`downcast`] or [`take`] to get the concrete type back.
///
/// # Examples
///
/// ```
/// use textform_convert::TextValue;
///
/// let boxed: Box<dyn TextValue> = Box::new(String::from("W-42"));
///
/// assert!(boxed.is::<String>());
/// assert_eq!(boxed.take::<String>().unwrap(), "W-42");
/// ```
///
/// [`downcast_ref`]: dyn TextValue::downcast_ref
/// [`downcast`]: dyn TextValue::downcast
/// [`take`]: dyn TextValue::take
pub trait TextValue: Any + Send + Sync {
    /// Returns the descriptor of the value's concrete type.
    fn type_desc(&self) -> &'static TypeDesc;

    /// Returns the value as a [`&dyn Any`](Any).
    fn as_any(&self) -> &dyn Any;

    /// Returns the boxed value as a [`Box<dyn Any>`](Any).
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Describe + Send + Sync> TextValue for T {
    #[inline]
    fn type_desc(&self) -> &'static TypeDesc {
        <T as Describe>::type_desc()
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn TextValue {
    /// Check if the value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Returns a reference to the concrete value, or `None` on type mismatch.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Returns the boxed concrete value, or gives the box back on mismatch.
    pub fn downcast<T: Any>(self: Box<Self>) -> Result<Box<T>, Box<dyn TextValue>> {
        if self.is::<T>() {
            Ok(self
                .into_any()
                .downcast()
                .expect("type id was checked above"))
        } else {
            Err(self)
        }
    }

    /// Returns the concrete value, or gives the box back on mismatch.
    #[inline]
    pub fn take<T: Any>(self: Box<Self>) -> Result<T, Box<dyn TextValue>> {
        self.downcast().map(|boxed| *boxed)
    }
}

impl core::fmt::Debug for dyn TextValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "TextValue(`{}`)", self.type_desc().path())
    }
}

// -----------------------------------------------------------------------------
// Tests
