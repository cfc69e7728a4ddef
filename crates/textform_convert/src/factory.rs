//! The converter factory consumed by host frameworks.

use core::any::TypeId;
use core::fmt;

use std::sync::{Arc, Mutex, PoisonError};

use crate::converter::StringConverter;
use crate::error::ConvertError;
use crate::probe;
use crate::registry::{ConvertRegistry, TypeIdMap};

// -----------------------------------------------------------------------------
// ConverterFactory

/// The factory contract a host framework drives, once per distinct type it
/// encounters.
///
/// `can_convert` is the cheap capability probe; `converter_for` resolves,
/// binds and returns the per-type converter. Hosts are expected to consult
/// `can_convert` first and only call `converter_for` on types it accepted.
pub trait ConverterFactory {
    /// Whether the type resolves to a governing conversion method.
    ///
    /// A `false` answer is a negative result, not a failure: the host simply
    /// tries its other converters.
    fn can_convert(&self, type_id: TypeId) -> bool;

    /// Returns the converter for the type, building it on first use.
    fn converter_for(&self, type_id: TypeId) -> Result<Arc<StringConverter>, ConvertError>;
}

// -----------------------------------------------------------------------------
// TextConverterFactory

/// The [`ConverterFactory`] over a [`ConvertRegistry`].
///
/// Resolution runs at most once per type: the bound converter is memoized in
/// the factory for its lifetime. Every factory instance owns its own cache,
/// so independent instances (one per test, say) never share memoization
/// state.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
///
/// use textform_convert::registry::ConvertRegistry;
/// use textform_convert::{ConverterFactory, TextConverterFactory};
///
/// let registry = ConvertRegistry::new();
/// let factory = TextConverterFactory::new(&registry);
///
/// // Built-in excluded types never convert.
/// assert!(!factory.can_convert(TypeId::of::<String>()));
/// assert!(!factory.can_convert(TypeId::of::<u32>()));
/// ```
pub struct TextConverterFactory<'a> {
    registry: &'a ConvertRegistry,
    converters: Mutex<TypeIdMap<Arc<StringConverter>>>,
}

impl<'a> TextConverterFactory<'a> {
    /// Creates a factory over the given registry, with an empty converter
    /// cache.
    pub fn new(registry: &'a ConvertRegistry) -> Self {
        Self {
            registry,
            converters: Mutex::new(TypeIdMap::new()),
        }
    }

    /// Typed convenience for [`ConverterFactory::converter_for`].
    pub fn for_type<T: 'static>(&self) -> Result<Arc<StringConverter>, ConvertError> {
        self.converter_for(TypeId::of::<T>())
    }
}

impl ConverterFactory for TextConverterFactory<'_> {
    fn can_convert(&self, type_id: TypeId) -> bool {
        self.registry
            .get(type_id)
            .is_some_and(|record| probe::resolve(record).is_some())
    }

    fn converter_for(&self, type_id: TypeId) -> Result<Arc<StringConverter>, ConvertError> {
        let mut converters = self
            .converters
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(converter) = converters.get(&type_id) {
            return Ok(Arc::clone(converter));
        }

        let record = self
            .registry
            .get(type_id)
            .ok_or(ConvertError::Unregistered { type_id })?;
        let converter = Arc::new(StringConverter::for_record(record)?);
        converters.insert(type_id, Arc::clone(&converter));
        Ok(converter)
    }
}

impl fmt::Debug for TextConverterFactory<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converters = self
            .converters
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("TextConverterFactory")
            .field("cached", &converters.len())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::{ConverterFactory, TextConverterFactory};
    use crate::error::ConvertError;
    use crate::registry::ConvertRegistry;

    #[derive(crate::derive::Convertible, Debug, PartialEq)]
    #[convertible(parse)]
    struct Badge(u32);

    impl core::str::FromStr for Badge {
        type Err = core::num::ParseIntError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Ok(Badge(s.parse()?))
        }
    }

    impl core::fmt::Display for Badge {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            self.0.fmt(f)
        }
    }

    struct Plain;

    #[test]
    fn can_convert_is_false_for_unregistered_and_excluded_types() {
        let mut registry = ConvertRegistry::new();
        registry.register::<Badge>();
        let factory = TextConverterFactory::new(&registry);

        assert!(factory.can_convert(TypeId::of::<Badge>()));
        assert!(!factory.can_convert(TypeId::of::<Plain>()));
        assert!(!factory.can_convert(TypeId::of::<String>()));
        assert!(!factory.can_convert(TypeId::of::<i64>()));
    }

    #[test]
    fn converter_is_memoized_per_type() {
        let mut registry = ConvertRegistry::new();
        registry.register::<Badge>();
        let factory = TextConverterFactory::new(&registry);

        let first = factory.for_type::<Badge>().unwrap();
        let second = factory.for_type::<Badge>().unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn independent_factories_do_not_share_caches() {
        let mut registry = ConvertRegistry::new();
        registry.register::<Badge>();

        let first = TextConverterFactory::new(&registry)
            .for_type::<Badge>()
            .unwrap();
        let second = TextConverterFactory::new(&registry)
            .for_type::<Badge>()
            .unwrap();
        assert!(!std::sync::Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unregistered_type_is_an_error() {
        let registry = ConvertRegistry::new();
        let factory = TextConverterFactory::new(&registry);

        let err = factory.for_type::<Plain>().unwrap_err();
        assert!(matches!(err, ConvertError::Unregistered { .. }));
    }

    #[test]
    fn excluded_type_is_not_convertible() {
        let registry = ConvertRegistry::new();
        let factory = TextConverterFactory::new(&registry);

        let err = factory.for_type::<String>().unwrap_err();
        assert!(matches!(err, ConvertError::NotConvertible { .. }));
    }
}
