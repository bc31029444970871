//! Workspace: name-keyed slot table of lazily constructed, type-erased objects.

use crate::erased::ErasedBox;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::key::{build_key, Args, FromArgs};
use core::any::type_name;
use core::fmt;
use core::hash::BuildHasher;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;
use tracing::{debug, trace};

struct Entry {
    key: Box<[u8]>,
    hash: u64,
    // Creation order; dense from 0 since entries are only removed at teardown.
    ordinal: usize,
    object: ErasedBox,
}

/// Store of reusable scratch objects, keyed by name plus keyed arguments.
///
/// Objects are constructed on the first request for their key and returned
/// again on every later request that resolves to the same key. The store
/// owns every object and destroys them, most recently created first, when
/// it is dropped. References handed out borrow the store, so they cannot
/// outlive it.
///
/// Single-threaded: the store holds non-`Send` trait objects and is itself
/// `!Send + !Sync`.
pub struct Workspace<S = RandomState> {
    hasher: S,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry>,
    in_use: bool,
}

impl Workspace {
    /// Empty workspace with the use flag set.
    pub fn new() -> Self {
        Self::with_use(true)
    }

    /// Empty workspace with an explicit use flag.
    pub fn with_use(in_use: bool) -> Self {
        Self::with_use_and_hasher(in_use, Default::default())
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Workspace<S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_use_and_hasher(true, hasher)
    }

    pub fn with_use_and_hasher(in_use: bool, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::new(),
            slots: SlotMap::with_key(),
            in_use,
        }
    }

    /// Whether callers should route through this workspace at all.
    ///
    /// The flag has no effect on the workspace itself; it lets algorithm
    /// code pick between cached and per-call objects.
    #[inline]
    pub fn in_use(&self) -> bool {
        self.in_use
    }

    /// Number of live objects. Also the ordinal the next object will get.
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn lookup(&self, key: &[u8], hash: u64) -> Option<DefaultKey> {
        self.index
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .map(|e| *e.key == *key)
                    .unwrap_or(false)
            })
            .copied()
    }

    /// Whether an object exists for `name` and the keyed members of `args`.
    pub fn contains<A: Args>(&self, name: &str, args: &A) -> bool {
        let key = build_key(name, args);
        let hash = self.hasher.hash_one(&key[..]);
        self.lookup(&key, hash).is_some()
    }

    /// Borrow an existing object without constructing one.
    ///
    /// Returns `Ok(None)` when no object exists for the key, and
    /// `TypeMismatch` when it exists with a type other than `T`.
    pub fn find<T, A>(&self, name: &str, args: &A) -> WorkspaceResult<Option<&T>>
    where
        T: 'static,
        A: Args,
    {
        let key = build_key(name, args);
        let hash = self.hasher.hash_one(&key[..]);
        let Some(slot) = self.lookup(&key, hash) else {
            return Ok(None);
        };
        self.slots[slot]
            .object
            .downcast_ref::<T>()
            .map(Some)
            .map_err(|stored| WorkspaceError::type_mismatch(name, stored, type_name::<T>()))
    }

    /// Get the `T` stored under `name` and the keyed members of `args`,
    /// constructing it with `T::from_args` on first request.
    ///
    /// All arguments, keyed and plain, are forwarded to the constructor in
    /// order. On a hit nothing is constructed and the plain arguments are
    /// dropped unused, so the object keeps whatever state it was left in.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if the key was first created with a type other than `T`.
    pub fn get<T, A>(&mut self, name: &str, args: A) -> WorkspaceResult<&mut T>
    where
        T: FromArgs<A::Values> + 'static,
        A: Args,
    {
        self.get_with(name, args, T::from_args)
    }

    /// Like [`get`](Self::get), constructing with `construct` on a miss.
    pub fn get_with<T, A, F>(&mut self, name: &str, args: A, construct: F) -> WorkspaceResult<&mut T>
    where
        T: 'static,
        A: Args,
        F: FnOnce(A::Values) -> T,
    {
        let key = build_key(name, &args);
        let hash = self.hasher.hash_one(&key[..]);
        let slot = match self.lookup(&key, hash) {
            Some(slot) => slot,
            None => self.insert(name, key, hash, construct(args.into_values())),
        };
        self.slots[slot]
            .object
            .downcast_mut::<T>()
            .map_err(|stored| WorkspaceError::type_mismatch(name, stored, type_name::<T>()))
    }

    /// Get the `T` stored under `name`, default-constructing it on first request.
    pub fn get_default<T>(&mut self, name: &str) -> WorkspaceResult<&mut T>
    where
        T: Default + 'static,
    {
        self.get_with(name, (), |()| T::default())
    }

    fn insert<T: 'static>(&mut self, name: &str, key: Vec<u8>, hash: u64, value: T) -> DefaultKey {
        let ordinal = self.slots.len();
        let object = ErasedBox::new(value);
        trace!(slot = name, ordinal, ty = object.type_name(), "constructed workspace object");
        let slot = self.slots.insert(Entry {
            key: key.into_boxed_slice(),
            hash,
            ordinal,
            object,
        });
        let slots = &self.slots;
        let _ = self
            .index
            .insert_unique(hash, slot, |&k| slots.get(k).map(|e| e.hash).unwrap_or(0));
        slot
    }
}

impl<S> Drop for Workspace<S> {
    fn drop(&mut self) {
        let live = self.slots.len();
        self.index.clear();

        // Bucket by ordinal so the most recently created object goes first.
        let mut order: Vec<Option<ErasedBox>> = (0..live).map(|_| None).collect();
        for (_, entry) in self.slots.drain() {
            let pos = live - entry.ordinal - 1;
            debug_assert!(order[pos].is_none(), "duplicate workspace ordinal");
            order[pos] = Some(entry.object);
        }
        for object in order.into_iter().flatten() {
            object.destroy();
        }
        debug!(destroyed = live, "workspace torn down");
    }
}

impl<S> fmt::Debug for Workspace<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("len", &self.slots.len())
            .field("in_use", &self.in_use)
            .finish_non_exhaustive()
    }
}
