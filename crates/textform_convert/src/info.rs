//! Type descriptors consumed by the resolution policy.
//!
//! ## Menu
//!
//! - [`TypePath`]: A static accessor to a stable type path and short name.
//! - [`Type`]: A [`TypeId`] paired with the path accessors.
//! - [`TypeKind`]: The shape discriminator used by the exclusion check.
//! - [`TypeDesc`]: The full descriptor — a [`Type`] plus its [`TypeKind`].
//! - [`Describe`]: A static accessor to a type's [`TypeDesc`].
//! - [`GenericTypeDescCell`]: Helper for implementing [`Describe`] on generic types.

use core::any::{Any, TypeId};
use core::fmt;

use std::sync::{OnceLock, PoisonError, RwLock};

use crate::registry::TypeIdMap;

// -----------------------------------------------------------------------------
// TypePath

/// A static accessor to type paths and names.
///
/// Provides a stable alternative to [`core::any::type_name`] for types that
/// participate in conversion: the path is part of the registry's lookup
/// surface and of error messages, so it should not change with compiler
/// versions.
///
/// Implemented by [`#[derive(Convertible)]`](crate::derive::Convertible).
/// Generic shapes implemented in this crate fall back to
/// [`core::any::type_name`], which is good enough for display purposes.
///
/// Paths must not carry a leading `::`.
pub trait TypePath: 'static {
    /// The full, unique path of the type, e.g. `my_crate::ids::Widget`.
    fn type_path() -> &'static str;

    /// The short name of the type, e.g. `Widget`. May be ambiguous
    /// between modules.
    fn type_name() -> &'static str {
        short_type_name(Self::type_path())
    }
}

/// Returns the last path segment, with any generic suffix removed.
///
/// # Examples
///
/// ```
/// use textform_convert::info::short_type_name;
///
/// assert_eq!(short_type_name("my_crate::ids::Widget"), "Widget");
/// assert_eq!(short_type_name("alloc::vec::Vec<u8>"), "Vec");
/// assert_eq!(short_type_name("bool"), "bool");
/// ```
pub fn short_type_name(path: &'static str) -> &'static str {
    let base = match path.find('<') {
        Some(index) => &path[..index],
        None => path,
    };
    match base.rfind("::") {
        Some(index) => &base[index + 2..],
        None => base,
    }
}

// -----------------------------------------------------------------------------
// Type

/// The base representation of a Rust type.
///
/// Includes a [`TypeId`] and the path accessors of [`TypePath`].
///
/// # Examples
///
/// ```
/// # use core::any::TypeId;
/// use textform_convert::info::Type;
///
/// let ty = Type::of::<String>();
///
/// assert!(ty.is::<String>());
/// assert_eq!(ty.id(), TypeId::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    type_path: fn() -> &'static str,
    type_name: fn() -> &'static str,
    type_id: TypeId,
}

impl Type {
    /// Creates a new [`Type`] from a type that implements [`TypePath`].
    #[inline]
    pub const fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            type_path: T::type_path,
            type_name: T::type_name,
            type_id: TypeId::of::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the type.
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.type_id
    }

    /// Check if the given type matches this one.
    ///
    /// This only compares the [`TypeId`] of the types.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        TypeId::of::<T>() == self.type_id
    }

    /// See [`TypePath::type_path`].
    #[inline]
    pub fn path(&self) -> &'static str {
        (self.type_path)()
    }

    /// See [`TypePath::type_name`].
    #[inline]
    pub fn name(&self) -> &'static str {
        (self.type_name)()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Type {}

impl core::hash::Hash for Type {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("path", &self.path())
            .field("id", &self.type_id)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeKind

/// An enumeration of the "shapes" a described type can have.
///
/// The kind drives the built-in exclusion check: collection and option
/// shapes are never string-convertible, whatever conversion entries their
/// records may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Struct,
    Enum,
    Opaque,
    List,
    Array,
    Map,
    Set,
    Optional,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct => f.pad("Struct"),
            Self::Enum => f.pad("Enum"),
            Self::Opaque => f.pad("Opaque"),
            Self::List => f.pad("List"),
            Self::Array => f.pad("Array"),
            Self::Map => f.pad("Map"),
            Self::Set => f.pad("Set"),
            Self::Optional => f.pad("Optional"),
        }
    }
}

// -----------------------------------------------------------------------------
// TypeDesc

/// The runtime descriptor of a type: identity, path accessors and shape.
///
/// Descriptors are `'static` and immutable; one is produced per type by the
/// [`Describe`] implementation and shared from there.
///
/// # Examples
///
/// ```
/// use textform_convert::info::{Describe, TypeKind};
///
/// let desc = String::type_desc();
/// assert_eq!(desc.kind(), TypeKind::Opaque);
/// assert_eq!(desc.path(), "alloc::string::String");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeDesc {
    ty: Type,
    kind: TypeKind,
}

impl TypeDesc {
    /// Creates a new [`TypeDesc`] with the given shape.
    #[inline]
    pub const fn new<T: TypePath + ?Sized>(kind: TypeKind) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
        }
    }

    /// Returns the underlying [`Type`].
    #[inline(always)]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the shape of the type.
    #[inline(always)]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// See [`Type::id`].
    #[inline]
    pub const fn id(&self) -> TypeId {
        self.ty.id()
    }

    /// See [`TypePath::type_path`].
    #[inline]
    pub fn path(&self) -> &'static str {
        self.ty.path()
    }

    /// See [`TypePath::type_name`].
    #[inline]
    pub fn name(&self) -> &'static str {
        self.ty.name()
    }
}

// -----------------------------------------------------------------------------
// Describe

/// A static accessor to a type's [`TypeDesc`].
///
/// Automatically implemented by
/// [`#[derive(Convertible)]`](crate::derive::Convertible), allowing access to
/// the descriptor without an instance of the type.
///
/// # Manually Impl
///
/// For non-generic types a `static` with a const initializer is enough:
///
/// ```
/// use textform_convert::info::{Describe, TypeDesc, TypeKind, TypePath};
///
/// struct Tag;
///
/// impl TypePath for Tag {
///     fn type_path() -> &'static str {
///         "my_crate::Tag"
///     }
/// }
///
/// impl Describe for Tag {
///     fn type_desc() -> &'static TypeDesc {
///         static DESC: TypeDesc = TypeDesc::new::<Tag>(TypeKind::Struct);
///         &DESC
///     }
/// }
/// ```
///
/// For generic types, use [`GenericTypeDescCell`].
pub trait Describe: TypePath {
    /// A static accessor to the type descriptor.
    fn type_desc() -> &'static TypeDesc;
}

// -----------------------------------------------------------------------------
// GenericTypeDescCell

/// Lazily interns one [`TypeDesc`] per concrete instantiation of a generic
/// type.
///
/// Generic types cannot hold one `static` descriptor per instantiation, so
/// implementations of [`Describe`] on generic shapes share a cell that leaks
/// a descriptor the first time each instantiation asks for it.
///
/// # Examples
///
/// ```
/// use textform_convert::info::{Describe, GenericTypeDescCell, TypeDesc, TypeKind, TypePath};
///
/// struct Pair<T>(T, T);
///
/// impl<T: 'static> TypePath for Pair<T> {
///     fn type_path() -> &'static str {
///         core::any::type_name::<Self>()
///     }
/// }
///
/// impl<T: 'static> Describe for Pair<T> {
///     fn type_desc() -> &'static TypeDesc {
///         static CELL: GenericTypeDescCell = GenericTypeDescCell::new();
///         CELL.get_or_insert::<Self>(|| TypeDesc::new::<Self>(TypeKind::Struct))
///     }
/// }
///
/// assert_eq!(Pair::<u8>::type_desc().kind(), TypeKind::Struct);
/// ```
pub struct GenericTypeDescCell {
    mapping: OnceLock<RwLock<TypeIdMap<&'static TypeDesc>>>,
}

impl GenericTypeDescCell {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self {
            mapping: OnceLock::new(),
        }
    }

    /// Returns the interned descriptor for `T`, inserting the result of `f`
    /// on first use.
    pub fn get_or_insert<T: Any + ?Sized>(&self, f: impl FnOnce() -> TypeDesc) -> &'static TypeDesc {
        let type_id = TypeId::of::<T>();
        let mapping = self.mapping.get_or_init(|| RwLock::new(TypeIdMap::new()));

        if let Some(desc) = mapping
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
        {
            return desc;
        }

        let mut mapping = mapping.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(desc) = mapping.get(&type_id).copied() {
            return desc;
        }
        let desc: &'static TypeDesc = Box::leak(Box::new(f()));
        mapping.insert(type_id, desc);
        desc
    }
}

impl Default for GenericTypeDescCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// Tests
