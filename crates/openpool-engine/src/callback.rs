//! The callback capability a participant hands to `acquire`.
//!
//! The manager invokes [`LockCallback::lock_acquired`] exactly once per
//! `acquire` call, synchronously, on the same thread. The callback
//! receives the manager back and may re-enter it: nested `acquire`,
//! `settle`, `take`, `pay_in` are all ordinary recursive calls.

use openpool_types::Result;

use crate::manager::LockManager;

/// Participant-side half of a lock session.
///
/// Implementations do their provisional balance work inside
/// `lock_acquired` and must reconcile every delta they created before
/// returning from the outermost session.
pub trait LockCallback {
    /// Called once the lock is held. The opaque `payload` is passed
    /// through from `acquire` untouched; the return value is handed back
    /// to `acquire`'s caller.
    fn lock_acquired(&mut self, manager: &mut LockManager, payload: &[u8]) -> Result<Vec<u8>>;
}

/// Closures are callbacks. Keeps simple participants and tests free of
/// one-off impl blocks.
impl<F> LockCallback for F
where
    F: FnMut(&mut LockManager, &[u8]) -> Result<Vec<u8>>,
{
    fn lock_acquired(&mut self, manager: &mut LockManager, payload: &[u8]) -> Result<Vec<u8>> {
        self(manager, payload)
    }
}
