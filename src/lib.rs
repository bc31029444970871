//! scratch-workspace: a single-owner store of reusable scratch objects for
//! computations that are invoked repeatedly with varying parameters.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: let algorithm code ask for "the `Vec<f64>` called `grad` sized for
//!   this `n`" on every call, constructing it once and reusing it afterwards.
//! - Layers:
//!   - `key`: turns a name plus a tuple of arguments into a composite key.
//!     Arguments wrapped in `Keyed` contribute their exact bytes; every other
//!     argument is construction-only and never fragments the cache.
//!   - `erased`: `ErasedBox`, an owned `Box<dyn Any>` that drops as its
//!     concrete type and downcasts with a checked type tag.
//!   - `workspace`: the slot table (`hashbrown::HashTable` index over a
//!     `slotmap::SlotMap` of entries) plus ordered teardown.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` (entries are non-`Send` trait objects).
//! - One heap allocation and one insertion per miss; a hit allocates only the
//!   scratch key buffer.
//! - Entries are never removed or rebound while the workspace lives. Each gets
//!   a dense ordinal at creation; dropping the workspace destroys entries in
//!   descending ordinal order, mirroring nested-scope destruction.
//! - Returned references borrow the workspace, so they cannot outlive it.
//!
//! Type checking
//! - A key requested with a different type than it was created with yields
//!   `WorkspaceError::TypeMismatch`; the stored object is left untouched.
//!
//! Notes and non-goals
//! - No eviction, expiry, persistence, or removal short of dropping the
//!   workspace.
//! - The `in_use` flag is informational: callers use it to choose between the
//!   workspace and per-call construction.
//!
//! ```
//! use scratch_workspace::{Keyed, Workspace};
//!
//! fn smooth(ws: &mut Workspace, data: &[f64]) -> f64 {
//!     let n = data.len();
//!     let buf: &mut Vec<f64> = ws
//!         .get_with("smooth.buf", (Keyed(n), 0.0_f64), |(n, fill)| vec![fill; n])
//!         .unwrap();
//!     buf.copy_from_slice(data);
//!     buf.iter().sum::<f64>() / n as f64
//! }
//!
//! let mut ws = Workspace::new();
//! assert_eq!(smooth(&mut ws, &[1.0, 3.0]), 2.0);
//! assert_eq!(smooth(&mut ws, &[2.0, 4.0]), 3.0);
//! assert_eq!(ws.len(), 1);
//! ```

mod erased;
mod error;
pub mod key;
mod workspace;
#[cfg(test)]
mod workspace_proptest;

// Public surface
pub use error::{WorkspaceError, WorkspaceResult};
pub use key::{Args, Argument, FromArgs, KeyBytes, Keyed, Plain};
pub use workspace::Workspace;
