//! [`Describe`] implementations for built-in types and shapes.
//!
//! ## Implemented Menu
//!
//! - opaque (also pre-registered by
//!   [`ConvertRegistry::new`](crate::registry::ConvertRegistry::new)):
//!     - `()` `bool` `char`
//!     - `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//!     - `String` `&'static str`
//!     - `core::time::Duration` `std::time::SystemTime`
//! - shapes (excluded by kind):
//!     - `Vec<T>` `VecDeque<T>` `[T; N]`
//!     - `HashMap<K, V>` `BTreeMap<K, V>`
//!     - `HashSet<T>` `BTreeSet<T>`
//!     - `Option<T>`
//!
//! The opaque built-ins also implement
//! [`GetTypeRecord`](crate::registry::GetTypeRecord) with an empty record:
//! they are registrable — and pre-registered — so that path and name lookups
//! cover them, but the prober rejects them before any tier is consulted.

use core::time::Duration;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::time::SystemTime;

use crate::info::{Describe, GenericTypeDescCell, TypeDesc, TypeKind, TypePath};
use crate::registry::{GetTypeRecord, TypeRecord};

// -----------------------------------------------------------------------------
// Opaque built-ins

macro_rules! impl_describe_opaque {
    ($($path:literal => $ty:ty),* $(,)?) => {$(
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }
        }

        impl Describe for $ty {
            fn type_desc() -> &'static TypeDesc {
                static DESC: TypeDesc = TypeDesc::new::<$ty>(TypeKind::Opaque);
                &DESC
            }
        }

        impl GetTypeRecord for $ty {
            fn get_type_record() -> TypeRecord {
                TypeRecord::of::<$ty>()
            }
        }
    )*};
}

impl_describe_opaque!(
    "()" => (),
    "bool" => bool,
    "char" => char,
    "u8" => u8,
    "u16" => u16,
    "u32" => u32,
    "u64" => u64,
    "u128" => u128,
    "usize" => usize,
    "i8" => i8,
    "i16" => i16,
    "i32" => i32,
    "i64" => i64,
    "i128" => i128,
    "isize" => isize,
    "f32" => f32,
    "f64" => f64,
    "alloc::string::String" => String,
    "str" => &'static str,
    "core::time::Duration" => Duration,
    "std::time::SystemTime" => SystemTime,
);

// -----------------------------------------------------------------------------
// Collection shapes

macro_rules! impl_describe_shape {
    ($(<$($param:ident),+> $ty:ty => $kind:ident),* $(,)?) => {$(
        impl<$($param: 'static),+> TypePath for $ty {
            fn type_path() -> &'static str {
                core::any::type_name::<Self>()
            }
        }

        impl<$($param: 'static),+> Describe for $ty {
            fn type_desc() -> &'static TypeDesc {
                static CELL: GenericTypeDescCell = GenericTypeDescCell::new();
                CELL.get_or_insert::<Self>(|| TypeDesc::new::<Self>(TypeKind::$kind))
            }
        }
    )*};
}

impl_describe_shape!(
    <T> Vec<T> => List,
    <T> VecDeque<T> => List,
    <K, V> HashMap<K, V> => Map,
    <K, V> BTreeMap<K, V> => Map,
    <T> HashSet<T> => Set,
    <T> BTreeSet<T> => Set,
    <T> Option<T> => Optional,
);

impl<T: 'static, const N: usize> TypePath for [T; N] {
    fn type_path() -> &'static str {
        core::any::type_name::<Self>()
    }
}

impl<T: 'static, const N: usize> Describe for [T; N] {
    fn type_desc() -> &'static TypeDesc {
        static CELL: GenericTypeDescCell = GenericTypeDescCell::new();
        CELL.get_or_insert::<Self>(|| TypeDesc::new::<Self>(TypeKind::Array))
    }
}

// -----------------------------------------------------------------------------
// Tests
