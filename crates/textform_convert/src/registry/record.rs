use core::any::TypeId;

use crate::convention::{Convention, ConvertImpl, RenderImpl};
use crate::info::{Describe, TypeDesc};

// -----------------------------------------------------------------------------
// TypeRecord

/// Runtime storage for a type's conversion capabilities, registered into the
/// [`ConvertRegistry`](crate::registry::ConvertRegistry).
///
/// A record holds the type's descriptor, one entry list per convention tier,
/// and an optional string-rendering entry. It is usually generated by
/// [`#[derive(Convertible)]`](crate::derive::Convertible) through the
/// [`GetTypeRecord`] trait, but can also be assembled by hand — which is the
/// way to register generic types, one concrete instantiation at a time.
///
/// # Examples
///
/// ```
/// use textform_convert::registry::TypeRecord;
/// use textform_convert::{Convention, ConvertImpl, RenderImpl};
/// use textform_convert::info::{Describe, TypeDesc, TypeKind, TypePath};
///
/// #[derive(PartialEq, Debug)]
/// struct Marker(String);
/// # impl core::str::FromStr for Marker {
/// #     type Err = core::convert::Infallible;
/// #     fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Marker(s.to_owned())) }
/// # }
/// # impl core::fmt::Display for Marker {
/// #     fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
/// #         f.write_str(&self.0)
/// #     }
/// # }
///
/// impl TypePath for Marker {
///     fn type_path() -> &'static str {
///         "my_crate::Marker"
///     }
/// }
///
/// impl Describe for Marker {
///     fn type_desc() -> &'static TypeDesc {
///         static DESC: TypeDesc = TypeDesc::new::<Marker>(TypeKind::Struct);
///         &DESC
///     }
/// }
///
/// let record = TypeRecord::of::<Marker>()
///     .with_impl(Convention::Parse, ConvertImpl::parse::<Marker>())
///     .with_render(RenderImpl::display::<Marker>());
///
/// assert_eq!(record.impls(Convention::Parse).len(), 1);
/// assert!(record.render().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct TypeRecord {
    desc: &'static TypeDesc,
    tiers: [Vec<ConvertImpl>; 4],
    render: Option<RenderImpl>,
}

impl TypeRecord {
    /// Create an empty record for a type.
    #[inline]
    pub fn of<T: Describe + ?Sized>() -> Self {
        Self {
            desc: T::type_desc(),
            tiers: Default::default(),
            render: None,
        }
    }

    /// Returns the type descriptor.
    #[inline(always)]
    pub const fn desc(&self) -> &'static TypeDesc {
        self.desc
    }

    /// Returns the [`TypeId`] of the described type.
    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.desc.id()
    }

    /// Appends a construction entry to the given convention tier.
    ///
    /// Tiers may hold several entries; resolution applies the ambiguity rule
    /// of [`probe::resolve`](crate::probe::resolve) when they do.
    pub fn push_impl(&mut self, convention: Convention, imp: ConvertImpl) {
        self.tiers[convention.index()].push(imp);
    }

    /// Builder-style [`push_impl`](Self::push_impl).
    #[must_use]
    pub fn with_impl(mut self, convention: Convention, imp: ConvertImpl) -> Self {
        self.push_impl(convention, imp);
        self
    }

    /// Sets the string-rendering entry, replacing any previous one.
    pub fn set_render(&mut self, render: RenderImpl) {
        self.render = Some(render);
    }

    /// Builder-style [`set_render`](Self::set_render).
    #[must_use]
    pub fn with_render(mut self, render: RenderImpl) -> Self {
        self.set_render(render);
        self
    }

    /// The entries registered under the given convention tier.
    #[inline]
    pub fn impls(&self, convention: Convention) -> &[ConvertImpl] {
        &self.tiers[convention.index()]
    }

    /// Returns the string-rendering entry, if one is registered.
    #[inline]
    pub fn render(&self) -> Option<&RenderImpl> {
        self.render.as_ref()
    }

    /// Returns `true` if any convention tier holds at least one entry.
    pub fn has_impls(&self) -> bool {
        self.tiers.iter().any(|tier| !tier.is_empty())
    }
}

// -----------------------------------------------------------------------------
// GetTypeRecord

/// A trait which allows a type to generate its [`TypeRecord`] for
/// registration into the
/// [`ConvertRegistry`](crate::registry::ConvertRegistry).
///
/// Automatically implemented by
/// [`#[derive(Convertible)]`](crate::derive::Convertible) according to the
/// `#[convertible(...)]` flags on the type.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `GetTypeRecord` so cannot be registered for text conversion",
    note = "consider annotating `{Self}` with `#[derive(Convertible)]`"
)]
pub trait GetTypeRecord: Describe {
    /// Returns the **default** [`TypeRecord`] for this type.
    fn get_type_record() -> TypeRecord;
}

// -----------------------------------------------------------------------------
// Tests
