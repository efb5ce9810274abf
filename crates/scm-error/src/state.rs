//! Saving the last error across code that may overwrite it.
//!
//! Cleanup paths and user callbacks routinely record errors of their own.
//! When the original failure must survive them, capture it first and
//! restore it afterwards:
//!
//! ```
//! use scm_error::{store, Code, ErrorClass, ErrorState};
//!
//! store::set_str(ErrorClass::Odb, "pack is corrupt");
//! let saved = ErrorState::capture(Code::Error.raw());
//!
//! // Cleanup fails too, clobbering the slot.
//! store::set_str(ErrorClass::Os, "unlink failed");
//!
//! let rc = saved.restore();
//! assert_eq!(rc, -1);
//! assert_eq!(store::last().unwrap().message(), "pack is corrupt");
//! # store::clear();
//! ```

use crate::{store, ErrorRecord};

/// A raw return code plus the record that explains it, detached from the
/// thread's slot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorState {
    code: i32,
    record: Option<ErrorRecord>,
}

impl ErrorState {
    /// Detach the calling thread's last error into a saved state.
    ///
    /// A zero `code` captures nothing and leaves the slot alone.
    pub fn capture(code: i32) -> Self {
        if code == 0 {
            return Self::default();
        }
        Self {
            code,
            record: store::detach().ok(),
        }
    }

    /// Put the saved record back as the thread's last error, replacing
    /// whatever is there, and return the saved code.
    ///
    /// With no saved record the slot is cleared. The restored record is not
    /// counted again by the per-class metrics.
    pub fn restore(self) -> i32 {
        match self.record {
            Some(record) => store::put(record),
            None => store::clear(),
        }
        self.code
    }

    /// Drop the saved record without touching the slot.
    pub fn discard(self) -> i32 {
        self.code
    }

    #[inline]
    pub fn code(&self) -> i32 {
        self.code
    }

    #[inline]
    pub fn record(&self) -> Option<&ErrorRecord> {
        self.record.as_ref()
    }

    pub fn into_record(self) -> Option<ErrorRecord> {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::test_lock;
    use crate::ErrorClass;

    #[test]
    fn zero_code_captures_nothing() {
        let _g = test_lock();
        store::set_str(ErrorClass::Config, "stale");
        let state = ErrorState::capture(0);
        assert_eq!(state.code(), 0);
        assert!(state.record().is_none());
        assert!(store::last().is_some());
        store::clear();
    }

    #[test]
    fn capture_detaches() {
        let _g = test_lock();
        store::set_str(ErrorClass::Submodule, "submodule not initialized");
        let state = ErrorState::capture(-1);
        assert!(store::last().is_none());
        assert_eq!(state.record().map(ErrorRecord::class), Some(ErrorClass::Submodule));
    }

    #[test]
    fn restore_overwrites_later_error() {
        let _g = test_lock();
        store::set_str(ErrorClass::Merge, "conflict");
        let state = ErrorState::capture(-13);
        store::set_str(ErrorClass::Index, "cleanup failed");
        assert_eq!(state.restore(), -13);
        let rec = store::last().unwrap();
        assert_eq!(rec.class(), ErrorClass::Merge);
        assert_eq!(rec.message(), "conflict");
        store::clear();
    }

    #[test]
    fn restore_without_record_clears() {
        let _g = test_lock();
        store::clear();
        let state = ErrorState::capture(-3);
        store::set_str(ErrorClass::Tag, "noise");
        assert_eq!(state.restore(), -3);
        assert!(store::last().is_none());
    }

    #[test]
    fn restore_keeps_static_oom() {
        let _g = test_lock();
        store::set_oom();
        let state = ErrorState::capture(-1);
        state.restore();
        let rec = store::last().unwrap();
        assert!(rec.is_static());
        assert_eq!(rec.class(), ErrorClass::NoMemory);
        store::clear();
    }

    #[test]
    fn discard_leaves_slot() {
        let _g = test_lock();
        store::set_str(ErrorClass::Revert, "cannot revert merge");
        let state = ErrorState::capture(-1);
        store::set_str(ErrorClass::Filter, "newer");
        assert_eq!(state.discard(), -1);
        assert_eq!(store::last().unwrap().class(), ErrorClass::Filter);
        store::clear();
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn restore_counts_once() {
        use crate::metrics;

        let _g = test_lock();
        metrics::reset(ErrorClass::Revert);
        store::set_str(ErrorClass::Revert, "one failure");
        ErrorState::capture(-1).restore();
        assert_eq!(metrics::count(ErrorClass::Revert), 1);
        store::clear();
    }
}
