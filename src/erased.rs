//! ErasedBox: an owned, type-erased object that drops as its concrete type.

use core::any::{type_name, Any};
use core::fmt;

/// Heap-allocated value of some `'static` type, held behind `dyn Any`.
///
/// The vtable carries the concrete destructor, so dropping an `ErasedBox`
/// releases the value exactly as its original type. The type name is kept
/// for mismatch reports.
pub(crate) struct ErasedBox {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl ErasedBox {
    pub(crate) fn new<T: 'static>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the value as `T`, or return the stored type's name on mismatch.
    pub(crate) fn downcast_mut<T: 'static>(&mut self) -> Result<&mut T, &'static str> {
        let stored = self.type_name;
        self.value.downcast_mut::<T>().ok_or(stored)
    }

    pub(crate) fn downcast_ref<T: 'static>(&self) -> Result<&T, &'static str> {
        self.value.downcast_ref::<T>().ok_or(self.type_name)
    }

    /// Release the value now. Equivalent to dropping, spelled out at teardown.
    #[inline]
    pub(crate) fn destroy(self) {
        drop(self.value);
    }
}

impl fmt::Debug for ErasedBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedBox")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
