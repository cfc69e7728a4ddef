//! The conversion conventions and their type-erased entries.
//!
//! ## Menu
//!
//! - [`Convention`]: The closed, priority-ordered candidate list.
//! - [`ParamShape`]: The parameter signature of a conversion entry.
//! - [`ConvertImpl`]: A type-erased string-construction entry.
//! - [`RenderImpl`]: A type-erased string-rendering entry.

use core::error::Error;
use core::fmt;
use core::str::FromStr;

use crate::from_text::FromText;
use crate::info::Describe;
use crate::value::TextValue;

/// A boxed error as returned by a user-supplied conversion method.
///
/// The box carries the method's own error, never a wrapper: callers can
/// downcast it to the concrete error type.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

// -----------------------------------------------------------------------------
// Convention

/// The conversion conventions a type can register, in resolution order.
///
/// The list is closed and its priority is fixed: [`CANDIDATES`] is walked
/// front to back and the first tier holding a usable entry governs
/// deserialization for the type. Lower tiers are never consulted once a tier
/// matched, even if the chosen entry later fails.
///
/// | Convention | Rust trait | Priority |
/// |---|---|---|
/// | `FromText` | [`FromText`] | highest |
/// | `Parse` | [`FromStr`] | |
/// | `Create` | [`TryFrom<&str>`] / [`TryFrom<String>`] | |
/// | `Convert` | [`From<&str>`] / [`From<String>`] | lowest |
///
/// [`CANDIDATES`]: Convention::CANDIDATES
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    FromText,
    Parse,
    Create,
    Convert,
}

impl Convention {
    /// The candidate conventions in resolution order. Fixed at compile time.
    pub const CANDIDATES: [Convention; 4] = [
        Convention::FromText,
        Convention::Parse,
        Convention::Create,
        Convention::Convert,
    ];

    /// The tier index of this convention, `0` being the highest priority.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The attribute flag spelling of this convention, as accepted by
    /// [`#[convertible(...)]`](crate::derive::Convertible).
    pub const fn label(self) -> &'static str {
        match self {
            Self::FromText => "from_text",
            Self::Parse => "parse",
            Self::Create => "create",
            Self::Convert => "convert",
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

// -----------------------------------------------------------------------------
// ParamShape

/// The parameter signature of a [`ConvertImpl`].
///
/// `Text` is the canonical single-string signature. When a tier holds several
/// entries, resolution keeps the tier only if exactly one `Text` entry is
/// present; see [`probe::resolve`](crate::probe::resolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamShape {
    /// Borrows the input, `fn(&str)`.
    Text,
    /// Consumes an owned copy of the input, `fn(String)`.
    OwnedText,
}

// -----------------------------------------------------------------------------
// ConvertImpl

type ConstructFn = fn(&str) -> Result<Box<dyn TextValue>, BoxError>;

/// A type-erased string-construction entry.
///
/// Internally stores a function pointer closed over a concrete type's
/// construction method. Entries are built from the convention traits via the
/// constructors below and pushed into a
/// [`TypeRecord`](crate::registry::TypeRecord) tier.
///
/// # Examples
///
/// ```
/// use textform_convert::ConvertImpl;
///
/// let imp = ConvertImpl::parse::<u64>();
/// # // u64 is registry-excluded, but the entry itself still constructs.
/// let value = imp.construct("17").unwrap();
/// assert_eq!(value.take::<u64>().unwrap(), 17);
/// ```
#[derive(Clone, Copy)]
pub struct ConvertImpl {
    shape: ParamShape,
    func: ConstructFn,
}

impl ConvertImpl {
    /// Entry backed by [`FromText`].
    pub fn from_text<T>() -> Self
    where
        T: FromText + Describe + Send + Sync,
        T::Err: Error + Send + Sync + 'static,
    {
        Self {
            shape: ParamShape::Text,
            func: |text| {
                T::from_text(text)
                    .map(|value| Box::new(value) as Box<dyn TextValue>)
                    .map_err(|err| Box::new(err) as BoxError)
            },
        }
    }

    /// Entry backed by [`FromStr`].
    pub fn parse<T>() -> Self
    where
        T: FromStr + Describe + Send + Sync,
        T::Err: Error + Send + Sync + 'static,
    {
        Self {
            shape: ParamShape::Text,
            func: |text| {
                text.parse::<T>()
                    .map(|value| Box::new(value) as Box<dyn TextValue>)
                    .map_err(|err| Box::new(err) as BoxError)
            },
        }
    }

    /// Entry backed by `TryFrom<&str>`.
    pub fn create<T>() -> Self
    where
        T: for<'a> TryFrom<&'a str> + Describe + Send + Sync,
        for<'a> <T as TryFrom<&'a str>>::Error: Error + Send + Sync + 'static,
    {
        Self {
            shape: ParamShape::Text,
            func: |text| {
                T::try_from(text)
                    .map(|value| Box::new(value) as Box<dyn TextValue>)
                    .map_err(|err| Box::new(err) as BoxError)
            },
        }
    }

    /// Entry backed by `TryFrom<String>`.
    pub fn create_owned<T>() -> Self
    where
        T: TryFrom<String> + Describe + Send + Sync,
        <T as TryFrom<String>>::Error: Error + Send + Sync + 'static,
    {
        Self {
            shape: ParamShape::OwnedText,
            func: |text| {
                T::try_from(text.to_owned())
                    .map(|value| Box::new(value) as Box<dyn TextValue>)
                    .map_err(|err| Box::new(err) as BoxError)
            },
        }
    }

    /// Entry backed by `From<&str>`.
    pub fn convert<T>() -> Self
    where
        T: for<'a> From<&'a str> + Describe + Send + Sync,
    {
        Self {
            shape: ParamShape::Text,
            func: |text| Ok(Box::new(T::from(text)) as Box<dyn TextValue>),
        }
    }

    /// Entry backed by `From<String>`.
    pub fn convert_owned<T>() -> Self
    where
        T: From<String> + Describe + Send + Sync,
    {
        Self {
            shape: ParamShape::OwnedText,
            func: |text| Ok(Box::new(T::from(text.to_owned())) as Box<dyn TextValue>),
        }
    }

    /// The parameter signature of this entry.
    #[inline(always)]
    pub const fn shape(&self) -> ParamShape {
        self.shape
    }

    /// Invokes the underlying construction method.
    ///
    /// On failure, the boxed error is the method's own error, unwrapped.
    #[inline(always)]
    pub fn construct(&self, text: &str) -> Result<Box<dyn TextValue>, BoxError> {
        (self.func)(text)
    }
}

impl fmt::Debug for ConvertImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertImpl")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// RenderImpl

/// A type-erased string-rendering entry.
///
/// Internally stores a function pointer closed over a concrete type's
/// [`Display`](fmt::Display) implementation. When given a value, it downcasts
/// to the concrete type and renders it.
///
/// # Safety
///
/// Passing a value of a different concrete type will cause a panic.
#[derive(Clone, Copy)]
pub struct RenderImpl {
    func: fn(&dyn TextValue) -> String,
}

impl RenderImpl {
    /// Entry backed by the type's `Display` implementation.
    pub fn display<T>() -> Self
    where
        T: fmt::Display + Describe + Send + Sync,
    {
        Self {
            func: |value| match value.downcast_ref::<T>() {
                Some(value) => value.to_string(),
                None => panic!(
                    "render type mismatched, render type `{}` with value type `{}`",
                    T::type_path(),
                    value.type_desc().path(),
                ),
            },
        }
    }

    /// Renders the value to its canonical string form.
    ///
    /// # Panic
    /// - Mismatched type
    #[inline(always)]
    pub fn render(&self, value: &dyn TextValue) -> String {
        (self.func)(value)
    }
}

impl fmt::Debug for RenderImpl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderImpl").finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_order_is_fixed() {
        assert_eq!(
            Convention::CANDIDATES,
            [
                Convention::FromText,
                Convention::Parse,
                Convention::Create,
                Convention::Convert,
            ]
        );
        assert_eq!(Convention::FromText.index(), 0);
        assert_eq!(Convention::Convert.index(), 3);
    }

    #[test]
    fn parse_entry_constructs() {
        let imp = ConvertImpl::parse::<u32>();
        assert_eq!(imp.shape(), ParamShape::Text);

        let value = imp.construct("17").unwrap();
        assert_eq!(value.take::<u32>().unwrap(), 17);
    }

    #[test]
    fn parse_entry_surfaces_the_methods_own_error() {
        let imp = ConvertImpl::parse::<u32>();
        let err = imp.construct("not a number").unwrap_err();
        assert!(err.downcast_ref::<core::num::ParseIntError>().is_some());
    }

    #[test]
    fn convert_owned_entry_constructs() {
        let imp = ConvertImpl::convert_owned::<String>();
        assert_eq!(imp.shape(), ParamShape::OwnedText);

        let value = imp.construct("abc").unwrap();
        assert_eq!(value.take::<String>().unwrap(), "abc");
    }

    #[test]
    fn render_entry_uses_display() {
        let render = RenderImpl::display::<u32>();
        let value: Box<dyn crate::TextValue> = Box::new(17u32);
        assert_eq!(render.render(value.as_ref()), "17");
    }

    #[test]
    #[should_panic(expected = "render type mismatched")]
    fn render_entry_panics_on_mismatch() {
        let render = RenderImpl::display::<u32>();
        let value: Box<dyn crate::TextValue> = Box::new(String::from("x"));
        render.render(value.as_ref());
    }
}
