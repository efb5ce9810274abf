//! Storage for the "last error" slot.
//!
//! With the `threads` feature (default) every OS thread owns one slot in
//! thread-local storage; the record is dropped with the thread. Without it
//! all threads share one mutex-guarded slot. In that mode errors raised on
//! different threads overwrite each other, so attribution is only reliable
//! if callers do not interleave failing calls across threads.
//!
//! While a reader (`with_slot_ref`) runs, the record it borrows stays in
//! place. Writes issued from inside the reader on the same thread are
//! staged and installed when the outermost reader returns; until then,
//! removals (`take`) only see staged writes, never the record under view.

use crate::ErrorRecord;

cfg_if::cfg_if! {
    if #[cfg(feature = "threads")] {
        use std::cell::RefCell;

        thread_local! {
            static SLOT: RefCell<Option<ErrorRecord>> = const { RefCell::new(None) };
            /// Writes made while a reader borrows `SLOT`.
            static STAGED: RefCell<Option<ErrorRecord>> = const { RefCell::new(None) };
        }

        /// Run `f` with mutable access to this thread's slot.
        ///
        /// Inside a reader `f` sees the staging slot instead. During thread
        /// teardown, after the slot has been destroyed, `f` sees a detached
        /// empty slot and whatever it stores is dropped.
        #[inline]
        pub(crate) fn with_slot<R>(f: impl FnOnce(&mut Option<ErrorRecord>) -> R) -> R {
            let mut f = Some(f);
            let res = SLOT.try_with(|slot| match slot.try_borrow_mut() {
                Ok(mut slot) => {
                    install_staged(&mut slot);
                    f.take().map(|f| f(&mut slot))
                }
                Err(_) => STAGED
                    .try_with(|staged| f.take().map(|f| f(&mut staged.borrow_mut())))
                    .ok()
                    .flatten(),
            });
            match res {
                Ok(Some(r)) => r,
                _ => match f {
                    Some(f) => f(&mut None),
                    None => unreachable!("slot closure consumed without a result"),
                },
            }
        }

        #[inline]
        pub(crate) fn with_slot_ref<R>(f: impl FnOnce(Option<&ErrorRecord>) -> R) -> R {
            let mut f = Some(f);
            let res = SLOT.try_with(|slot| {
                let r = match slot.try_borrow() {
                    Ok(record) => f.take().map(|f| f(record.as_ref())),
                    Err(_) => None,
                };
                // Outermost reader done: nothing else holds the slot.
                if let Ok(mut slot) = slot.try_borrow_mut() {
                    install_staged(&mut slot);
                }
                r
            });
            match res {
                Ok(Some(r)) => r,
                _ => match f {
                    Some(f) => f(None),
                    None => unreachable!("slot closure consumed without a result"),
                },
            }
        }

        fn install_staged(slot: &mut Option<ErrorRecord>) {
            if let Ok(Some(record)) = STAGED.try_with(|staged| staged.borrow_mut().take()) {
                *slot = Some(record);
            }
        }

        /// `true` when each thread has its own slot.
        pub const PER_THREAD: bool = true;
    } else {
        use std::cell::Cell;
        use std::sync::{Mutex, MutexGuard};

        static SLOT: Mutex<Option<ErrorRecord>> = Mutex::new(None);
        /// Writes made by the thread currently reading `SLOT`.
        static STAGED: Mutex<Option<ErrorRecord>> = Mutex::new(None);

        thread_local! {
            /// Set while this thread holds `SLOT` as a reader.
            static VIEW: Cell<Option<*const Option<ErrorRecord>>> = const { Cell::new(None) };
        }

        /// Clears `VIEW` when the outer reader returns or unwinds.
        struct Viewing;

        impl Drop for Viewing {
            fn drop(&mut self) {
                let _ = VIEW.try_with(|view| view.set(None));
            }
        }

        fn lock(slot: &'static Mutex<Option<ErrorRecord>>) -> MutexGuard<'static, Option<ErrorRecord>> {
            slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        fn current_view() -> Option<*const Option<ErrorRecord>> {
            VIEW.try_with(Cell::get).ok().flatten()
        }

        #[inline]
        pub(crate) fn with_slot<R>(f: impl FnOnce(&mut Option<ErrorRecord>) -> R) -> R {
            if current_view().is_some() {
                return f(&mut lock(&STAGED));
            }
            let mut slot = lock(&SLOT);
            if let Some(record) = lock(&STAGED).take() {
                *slot = Some(record);
            }
            f(&mut slot)
        }

        #[inline]
        pub(crate) fn with_slot_ref<R>(f: impl FnOnce(Option<&ErrorRecord>) -> R) -> R {
            if let Some(view) = current_view() {
                // SAFETY: `view` points into `SLOT`, whose guard is held by
                // the outer reader on this thread until `VIEW` is cleared.
                // Writers on this thread go to `STAGED`, others block.
                return f(unsafe { (*view).as_ref() });
            }
            let r = {
                let guard = lock(&SLOT);
                let _viewing = VIEW
                    .try_with(|view| view.set(Some(&*guard as *const Option<ErrorRecord>)))
                    .ok()
                    .map(|()| Viewing);
                f(guard.as_ref())
            };
            let staged = lock(&STAGED).take();
            if let Some(record) = staged {
                *lock(&SLOT) = Some(record);
            }
            r
        }

        /// `true` when each thread has its own slot.
        pub const PER_THREAD: bool = false;
    }
}

/// Serialises unit tests that touch the slot, so they also hold in the
/// shared-slot build.
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorClass;

    #[test]
    fn replace_returns_previous() {
        let _g = test_lock();
        with_slot(|s| *s = None);
        let prev = with_slot(|s| s.replace(ErrorRecord::new(ErrorClass::Tag, "first")));
        assert!(prev.is_none());
        let prev = with_slot(|s| s.replace(ErrorRecord::new(ErrorClass::Tree, "second")));
        assert_eq!(prev.map(|r| r.class()), Some(ErrorClass::Tag));
        with_slot_ref(|r| assert_eq!(r.map(ErrorRecord::message), Some("second")));
        with_slot(|s| *s = None);
    }

    #[cfg(feature = "threads")]
    #[test]
    fn slots_are_per_thread() {
        with_slot(|s| *s = Some(ErrorRecord::new(ErrorClass::Index, "main")));
        let seen = std::thread::spawn(|| with_slot_ref(|r| r.is_some()))
            .join()
            .unwrap();
        assert!(!seen);
        with_slot(|s| *s = None);
    }
}
