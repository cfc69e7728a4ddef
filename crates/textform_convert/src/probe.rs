//! The capability prober: eligibility and method resolution.
//!
//! Given a [`TypeRecord`], [`resolve`] answers "can this type round-trip
//! through a string, and which construction entry governs it?". The answer is
//! pure and deterministic, so callers memoize it freely (the converter
//! factory does, once per type).

use core::any::TypeId;

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::convention::{Convention, ConvertImpl, ParamShape};
use crate::info::{TypeDesc, TypeKind};
use crate::registry::TypeRecord;

// -----------------------------------------------------------------------------
// Exclusion

static EXCLUDED_IDS: LazyLock<HashSet<TypeId>> = LazyLock::new(|| {
    HashSet::from([
        TypeId::of::<()>(),
        TypeId::of::<bool>(),
        TypeId::of::<char>(),
        TypeId::of::<u8>(),
        TypeId::of::<u16>(),
        TypeId::of::<u32>(),
        TypeId::of::<u64>(),
        TypeId::of::<u128>(),
        TypeId::of::<usize>(),
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<i128>(),
        TypeId::of::<isize>(),
        TypeId::of::<f32>(),
        TypeId::of::<f64>(),
        TypeId::of::<String>(),
        TypeId::of::<&'static str>(),
        TypeId::of::<core::time::Duration>(),
        TypeId::of::<std::time::SystemTime>(),
    ])
});

/// Whether the described type belongs to the built-in exclusion set.
///
/// Excluded are the primitive and textual types, the time types, and every
/// collection-like shape (`List`, `Array`, `Map`, `Set`, `Optional`). The
/// check runs before any convention tier is consulted: an excluded type is
/// never eligible, even if its record carries compatible entries.
///
/// # Examples
///
/// ```
/// use textform_convert::info::Describe;
/// use textform_convert::probe::is_excluded;
///
/// assert!(is_excluded(String::type_desc()));
/// assert!(is_excluded(Vec::<u8>::type_desc()));
/// assert!(is_excluded(Option::<u8>::type_desc()));
/// ```
pub fn is_excluded(desc: &TypeDesc) -> bool {
    matches!(
        desc.kind(),
        TypeKind::List | TypeKind::Array | TypeKind::Map | TypeKind::Set | TypeKind::Optional
    ) || EXCLUDED_IDS.contains(&desc.id())
}

// -----------------------------------------------------------------------------
// Resolution

/// The outcome of a successful resolution: the governing convention and its
/// construction entry.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    convention: Convention,
    imp: &'a ConvertImpl,
}

impl<'a> Resolved<'a> {
    /// The convention tier that matched.
    #[inline(always)]
    pub const fn convention(&self) -> Convention {
        self.convention
    }

    /// The construction entry that governs deserialization.
    #[inline(always)]
    pub const fn convert_impl(&self) -> &'a ConvertImpl {
        self.imp
    }
}

/// Resolves the governing construction entry for a record, or `None` when
/// the type is not string-convertible.
///
/// The walk over [`Convention::CANDIDATES`] is strict: the first tier that
/// yields an entry wins and lower tiers are never consulted, even if the
/// chosen entry turns out to be unusable downstream. Within one tier:
///
/// - one entry: chosen;
/// - several entries: the unique [`ParamShape::Text`] entry is chosen;
///   if zero or several `Text` entries exist the tier is ambiguous and is
///   treated as having no match.
///
/// A `None` result is a negative answer, not a failure; hosts fall back to
/// their other converters.
///
/// # Examples
///
/// ```
/// use textform_convert::probe::resolve;
/// use textform_convert::registry::TypeRecord;
/// use textform_convert::{Convention, ConvertImpl};
///
/// // `String` implements `FromStr`, but stays excluded.
/// let record = TypeRecord::of::<String>()
///     .with_impl(Convention::Parse, ConvertImpl::parse::<String>());
/// assert!(resolve(&record).is_none());
/// ```
pub fn resolve(record: &TypeRecord) -> Option<Resolved<'_>> {
    if is_excluded(record.desc()) {
        return None;
    }

    for convention in Convention::CANDIDATES {
        let imps = record.impls(convention);
        let chosen = match imps {
            [] => None,
            [single] => Some(single),
            many => {
                let mut canonical = many.iter().filter(|imp| imp.shape() == ParamShape::Text);
                match (canonical.next(), canonical.next()) {
                    (Some(imp), None) => Some(imp),
                    // Zero or several canonical entries: the tier is
                    // ambiguous, fall through to the next one.
                    _ => None,
                }
            }
        };
        if let Some(imp) = chosen {
            return Some(Resolved { convention, imp });
        }
    }

    None
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::fmt;
    use core::str::FromStr;

    use super::{is_excluded, resolve};
    use crate::convention::{Convention, ConvertImpl, RenderImpl};
    use crate::from_text::FromText;
    use crate::info::Describe;
    use crate::registry::TypeRecord;

    #[derive(Debug, PartialEq)]
    struct Sample(String);

    impl crate::info::TypePath for Sample {
        fn type_path() -> &'static str {
            "textform_convert::probe::tests::Sample"
        }
    }

    impl Describe for Sample {
        fn type_desc() -> &'static crate::info::TypeDesc {
            static DESC: crate::info::TypeDesc =
                crate::info::TypeDesc::new::<Sample>(crate::info::TypeKind::Struct);
            &DESC
        }
    }

    impl FromText for Sample {
        type Err = core::convert::Infallible;

        fn from_text(text: &str) -> Result<Self, Self::Err> {
            Ok(Sample(text.to_uppercase()))
        }
    }

    impl FromStr for Sample {
        type Err = core::convert::Infallible;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Ok(Sample(s.to_owned()))
        }
    }

    impl TryFrom<&str> for Sample {
        type Error = core::convert::Infallible;

        fn try_from(s: &str) -> Result<Self, Self::Error> {
            Ok(Sample(format!("create:{s}")))
        }
    }

    impl From<&str> for Sample {
        fn from(s: &str) -> Self {
            Sample(format!("convert:{s}"))
        }
    }

    impl TryFrom<String> for Sample {
        type Error = core::convert::Infallible;

        fn try_from(s: String) -> Result<Self, Self::Error> {
            Ok(Sample(s))
        }
    }

    impl fmt::Display for Sample {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    fn full_record() -> TypeRecord {
        TypeRecord::of::<Sample>()
            .with_impl(Convention::FromText, ConvertImpl::from_text::<Sample>())
            .with_impl(Convention::Parse, ConvertImpl::parse::<Sample>())
            .with_impl(Convention::Create, ConvertImpl::create::<Sample>())
            .with_impl(Convention::Convert, ConvertImpl::convert::<Sample>())
            .with_render(RenderImpl::display::<Sample>())
    }

    #[test]
    fn from_text_outranks_every_other_tier() {
        let resolved = resolve(&full_record()).unwrap();
        assert_eq!(resolved.convention(), Convention::FromText);

        // The chosen entry is really the `FromText` one: it uppercases.
        let value = resolved.convert_impl().construct("x").unwrap();
        assert_eq!(value.take::<Sample>().unwrap(), Sample("X".to_owned()));
    }

    #[test]
    fn parse_outranks_create_and_convert() {
        let record = TypeRecord::of::<Sample>()
            .with_impl(Convention::Parse, ConvertImpl::parse::<Sample>())
            .with_impl(Convention::Create, ConvertImpl::create::<Sample>());

        let resolved = resolve(&record).unwrap();
        assert_eq!(resolved.convention(), Convention::Parse);
    }

    #[test]
    fn empty_record_is_not_convertible() {
        assert!(resolve(&TypeRecord::of::<Sample>()).is_none());
    }

    #[test]
    fn ambiguous_tier_falls_through_to_the_next() {
        // Two canonical entries under `Create`: the tier is skipped entirely,
        // `Convert` governs.
        let record = TypeRecord::of::<Sample>()
            .with_impl(Convention::Create, ConvertImpl::create::<Sample>())
            .with_impl(Convention::Create, ConvertImpl::create::<Sample>())
            .with_impl(Convention::Convert, ConvertImpl::convert::<Sample>());

        let resolved = resolve(&record).unwrap();
        assert_eq!(resolved.convention(), Convention::Convert);
    }

    #[test]
    fn ambiguous_final_tier_means_not_convertible() {
        let record = TypeRecord::of::<Sample>()
            .with_impl(Convention::Convert, ConvertImpl::convert::<Sample>())
            .with_impl(Convention::Convert, ConvertImpl::convert::<Sample>());

        assert!(resolve(&record).is_none());
    }

    #[test]
    fn borrowed_entry_wins_over_an_owned_sibling() {
        // Borrowed and owned `Create` entries in one tier: the canonical
        // borrowed signature is unique, so the tier still matches.
        let record = TypeRecord::of::<Sample>()
            .with_impl(Convention::Create, ConvertImpl::create::<Sample>())
            .with_impl(Convention::Create, ConvertImpl::create_owned::<Sample>());

        let resolved = resolve(&record).unwrap();
        assert_eq!(resolved.convention(), Convention::Create);
        assert_eq!(
            resolved.convert_impl().shape(),
            crate::convention::ParamShape::Text
        );

        // It is really the borrowed `TryFrom<&str>` entry: it prefixes.
        let value = resolved.convert_impl().construct("x").unwrap();
        assert_eq!(value.take::<Sample>().unwrap(), Sample("create:x".to_owned()));
    }

    #[test]
    fn excluded_types_never_resolve() {
        // `String` has a perfectly good `FromStr`; the exclusion check still
        // rejects it before any tier is consulted.
        let record =
            TypeRecord::of::<String>().with_impl(Convention::Parse, ConvertImpl::parse::<String>());
        assert!(resolve(&record).is_none());
        assert!(is_excluded(String::type_desc()));
    }

    #[test]
    fn collection_shapes_are_excluded_by_kind() {
        assert!(is_excluded(Vec::<Sample>::type_desc()));
        assert!(is_excluded(std::collections::HashMap::<String, u32>::type_desc()));
        assert!(is_excluded(Option::<Sample>::type_desc()));
        assert!(is_excluded(<[u8; 4]>::type_desc()));
    }

    #[test]
    fn custom_structs_are_not_excluded() {
        assert!(!is_excluded(Sample::type_desc()));
    }
}
