use core::any::TypeId;
use core::time::Duration;

use std::collections::{HashMap, HashSet};
use std::time::SystemTime;

use crate::registry::{GetTypeRecord, TypeIdMap, TypeRecord};

// -----------------------------------------------------------------------------
// ConvertRegistry

/// A registry of conversion-capable types.
///
/// This struct is the central store for [`TypeRecord`]s. [Registering] a type
/// generates a new record using the type's [`GetTypeRecord`] implementation
/// (which is automatically implemented when using
/// [`#[derive(Convertible)]`](crate::derive::Convertible)).
///
/// The registry answers lookups by [`TypeId`], by full type path and by short
/// type name; the capability prober and the converter factory read records
/// from here.
///
/// # Example
///
/// ```
/// use textform_convert::registry::ConvertRegistry;
/// use textform_convert::info::TypeKind;
///
/// let registry = ConvertRegistry::new();
///
/// // `new` pre-registers the built-in excluded types.
/// let record = registry.get_with_type_name("String").unwrap();
/// assert_eq!(record.desc().kind(), TypeKind::Opaque);
/// assert!(!record.has_impls());
/// ```
///
/// [Registering]: ConvertRegistry::register
pub struct ConvertRegistry {
    records: TypeIdMap<TypeRecord>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for ConvertRegistry {
    /// See [`ConvertRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertRegistry {
    /// Create an empty [`ConvertRegistry`].
    #[inline]
    pub fn empty() -> Self {
        Self {
            records: TypeIdMap::new(),
            type_path_to_id: HashMap::new(),
            type_name_to_id: HashMap::new(),
            ambiguous_names: HashSet::new(),
        }
    }

    /// Create a registry with default registrations for the built-in
    /// excluded types.
    ///
    /// - `()` `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String` `&'static str`
    /// - `Duration` `SystemTime`
    ///
    /// Their records carry no conversion entries, and the prober rejects
    /// them up front; pre-registering them keeps path and name lookups
    /// working for the whole built-in set.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<()>();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<u128>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<i128>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<&'static str>();
        registry.register::<Duration>();
        registry.register::<SystemTime>();
        registry
    }

    // # Validity
    // The type must **not** already exist.
    fn add_new_type_indices(
        record: &TypeRecord,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let desc = record.desc();
        let type_name = desc.name();

        // Check for duplicate names.
        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, desc.id());
            }
        }

        // For a new type, the full path cannot be duplicated.
        type_path_to_id.insert(desc.path(), desc.id());
    }

    // - If the key [`TypeId`] already exists, do nothing and return `false`.
    // - If the key [`TypeId`] does not exist, insert and return `true`.
    fn register_internal(
        &mut self,
        type_id: TypeId,
        get_type_record: impl FnOnce() -> TypeRecord,
    ) -> bool {
        self.records.try_insert(type_id, || {
            let record = get_type_record();
            Self::add_new_type_indices(
                &record,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            record
        })
    }

    /// Attempts to register the type `T` if it has not yet been registered.
    ///
    /// If a record for `T` already exists, it is left untouched. To replace
    /// an existing record, use [`insert_record`](Self::insert_record).
    pub fn register<T: GetTypeRecord>(&mut self) {
        self.register_internal(TypeId::of::<T>(), T::get_type_record);
    }

    /// Try add or do nothing.
    ///
    /// - If the record's [`TypeId`] already exists, do nothing and return `false`.
    /// - If the record's [`TypeId`] does not exist, insert it and return `true`.
    pub fn try_insert_record(&mut self, record: TypeRecord) -> bool {
        self.records.try_insert(record.type_id(), || {
            Self::add_new_type_indices(
                &record,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            record
        })
    }

    /// Insert or **overwrite** a record.
    ///
    /// - If the record's [`TypeId`] already exists, the record is replaced,
    ///   but the path and name indexes are left as they are.
    /// - If the record's [`TypeId`] does not exist, it is inserted and
    ///   indexed.
    pub fn insert_record(&mut self, record: TypeRecord) {
        if !self.records.contains(&record.type_id()) {
            Self::add_new_type_indices(
                &record,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
        }
        self.records.insert(record.type_id(), record);
    }

    /// Automatically registers all types annotated with
    /// `#[convertible(auto_register)]`.
    ///
    /// Repeated calls are cheap and will not insert duplicates.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration ran. When the
    /// `auto_register` feature is disabled this method does nothing and
    /// returns `false`.
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&mut self) -> bool {
        for registration in inventory::iter::<Registration> {
            registration.apply(self);
        }
        true
    }

    /// Automatic registration is a no-op without the `auto_register`
    /// feature.
    #[cfg(not(feature = "auto_register"))]
    #[inline(always)]
    pub fn auto_register(&mut self) -> bool {
        false
    }

    /// Whether the type with given [`TypeId`] has been registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.records.contains(&type_id)
    }

    /// Returns a reference to the [`TypeRecord`] of the type with the given
    /// [`TypeId`].
    ///
    /// If the specified type has not been registered, returns `None`.
    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeRecord> {
        self.records.get(&type_id)
    }

    /// Returns a mutable reference to the [`TypeRecord`] of the type with
    /// the given [`TypeId`].
    ///
    /// If the specified type has not been registered, returns `None`.
    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeRecord> {
        self.records.get_mut(&type_id)
    }

    /// Returns a reference to the [`TypeRecord`] of the type with the given
    /// [type path](crate::info::TypePath::type_path).
    ///
    /// If no type with the given path has been registered, returns `None`.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeRecord> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns a reference to the [`TypeRecord`] of the type with the given
    /// [type name](crate::info::TypePath::type_name).
    ///
    /// If the type name is ambiguous, or if no type with the given name has
    /// been registered, returns `None`.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeRecord> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if the given [type name] is ambiguous, that is, it
    /// matches multiple registered types.
    ///
    /// [type name]: crate::info::TypePath::type_name
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Returns an iterator over the registered [`TypeRecord`]s.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeRecord> {
        self.records.values()
    }

    /// Returns a mutable iterator over the registered [`TypeRecord`]s.
    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut TypeRecord> {
        self.records.values_mut()
    }
}

// -----------------------------------------------------------------------------
// Registration

/// A registration hook collected by [`inventory`] for
/// [`ConvertRegistry::auto_register`].
///
/// Emitted by `#[convertible(auto_register)]`; rarely constructed by hand.
#[cfg(feature = "auto_register")]
pub struct Registration(fn(&mut ConvertRegistry));

#[cfg(feature = "auto_register")]
impl Registration {
    /// Creates a registration hook from a plain function.
    pub const fn new(func: fn(&mut ConvertRegistry)) -> Self {
        Self(func)
    }

    /// Applies the hook to a registry.
    #[inline]
    pub fn apply(&self, registry: &mut ConvertRegistry) {
        (self.0)(registry);
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(Registration);

// -----------------------------------------------------------------------------
// ConvertRegistryArc

use std::sync::{Arc, PoisonError};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared, lock-guarded [`ConvertRegistry`] handle for hosts that hand the
/// registry to several components.
#[derive(Clone, Default)]
pub struct ConvertRegistryArc {
    /// The wrapped [`ConvertRegistry`].
    pub internal: Arc<RwLock<ConvertRegistry>>,
}

impl ConvertRegistryArc {
    /// Takes a read lock on the underlying [`ConvertRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, ConvertRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`ConvertRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, ConvertRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for ConvertRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.internal
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .type_path_to_id
            .keys()
            .fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests
