//! The per-thread "last error" store.
//!
//! A failing operation records *why* it failed with [`set_str`] /
//! [`set_fmt`] (or [`set_error!`](crate::set_error)) and returns a raw
//! code. Its caller later peeks with [`last`] / [`with_last`], discards
//! with [`clear`], or takes ownership with [`detach`].
//!
//! Nothing here can fail except [`detach`] on an empty slot. Recording
//! an error never aborts on allocation failure: message construction
//! uses fallible allocation and falls back to the static out-of-memory
//! record.

use std::fmt::{self, Write};

use tracing::trace;

use crate::platform::{Platform, SystemPlatform, UNKNOWN_OS_ERROR};
use crate::{slot, ErrorClass, ErrorRecord, StoreError};

// ── Recording ─────────────────────────────────────────────────────

/// Record `message` as the calling thread's last error.
///
/// With [`ErrorClass::Os`] the description of the pending OS error is
/// appended (`"<message>: <description>"`) and the OS error is cleared.
#[inline]
pub fn set_str(class: ErrorClass, message: &str) {
    set_fmt_with(&SystemPlatform, class, format_args!("{}", message));
}

/// Record a formatted message as the calling thread's last error.
///
/// See [`set_str`] for the [`ErrorClass::Os`] behaviour.
#[inline]
pub fn set_fmt(class: ErrorClass, args: fmt::Arguments<'_>) {
    set_fmt_with(&SystemPlatform, class, args);
}

/// [`set_str`] against an explicit platform.
pub fn set_str_with<P: Platform + ?Sized>(platform: &P, class: ErrorClass, message: &str) {
    set_fmt_with(platform, class, format_args!("{}", message));
}

/// [`set_fmt`] against an explicit platform.
pub fn set_fmt_with<P: Platform + ?Sized>(platform: &P, class: ErrorClass, args: fmt::Arguments<'_>) {
    // Read the OS error before formatting can clobber it; clear it even if
    // the message cannot be built.
    let os_suffix = if class == ErrorClass::Os {
        let desc = platform.last_os_error_description();
        platform.clear_last_os_error();
        Some(desc)
    } else {
        None
    };

    let mut buf = MessageBuf::default();
    let _ = buf.write_fmt(args);
    if let Some(desc) = &os_suffix {
        let _ = buf.write_str(": ");
        let _ = buf.write_str(desc.as_deref().unwrap_or(UNKNOWN_OS_ERROR));
    }

    if buf.exhausted {
        replace(ErrorRecord::out_of_memory());
        return;
    }

    let len = buf.text.len();
    replace(ErrorRecord::new(class, buf.text));
    trace!(class = %class, len, "error recorded");
}

/// Record the static out-of-memory error.
///
/// Allocation-free and infallible: use this when the failure being
/// reported is itself an allocation failure.
pub fn set_oom() {
    replace(ErrorRecord::out_of_memory());
}

/// Record a callback-originated error for a non-zero callback return,
/// unless the callback already recorded one itself.
///
/// Returns `code` unchanged so call sites can write
/// `return set_after_callback(rc, "checkout notify")`.
pub fn set_after_callback(code: i32, callback: &str) -> i32 {
    if code != 0 && !has_error() {
        set_fmt(
            ErrorClass::Callback,
            format_args!("{} callback returned {}", callback, code),
        );
    }
    code
}

/// Record `record` as a new failure: counted, then installed with [`put`].
pub(crate) fn replace(record: ErrorRecord) {
    #[cfg(feature = "metrics")]
    crate::metrics::bump(record.class());

    put(record);
}

/// Install `record` as the slot content without counting it, dropping the
/// previous one outside the slot borrow.
pub(crate) fn put(record: ErrorRecord) {
    let previous = slot::with_slot(|slot| slot.replace(record));
    drop(previous);
}

// ── Inspection ────────────────────────────────────────────────────

/// Borrow the calling thread's last error without copying it.
///
/// The record is only reachable inside `f` and stays valid for its whole
/// run. Errors recorded from inside `f` replace it once `f` returns;
/// [`clear`] and [`detach`] called from inside `f` only act on such
/// records.
///
/// ```
/// use scm_error::{store, ErrorClass};
///
/// store::set_str(ErrorClass::Odb, "object not found");
/// let len = store::with_last(|rec| rec.map_or(0, |r| r.message().len()));
/// assert_eq!(len, 16);
/// # store::clear();
/// ```
#[inline]
pub fn with_last<R>(f: impl FnOnce(Option<&ErrorRecord>) -> R) -> R {
    slot::with_slot_ref(f)
}

/// A copy of the calling thread's last error, or `None`.
pub fn last() -> Option<ErrorRecord> {
    with_last(|rec| rec.cloned())
}

/// The class of the calling thread's last error, or `None`.
#[inline]
pub fn last_class() -> Option<ErrorClass> {
    with_last(|rec| rec.map(ErrorRecord::class))
}

#[inline]
pub fn has_error() -> bool {
    with_last(|rec| rec.is_some())
}

// ── Removal ───────────────────────────────────────────────────────

/// Take ownership of the calling thread's last error, leaving the slot
/// empty. The message is moved, not copied.
pub fn detach() -> Result<ErrorRecord, StoreError> {
    let record = slot::with_slot(Option::take).ok_or(StoreError::NotFound)?;
    trace!(class = %record.class(), "error detached");
    Ok(record)
}

/// [`detach`] into a caller-provided record.
///
/// On an empty slot `out` is left untouched.
pub fn detach_into(out: &mut ErrorRecord) -> Result<(), StoreError> {
    *out = detach()?;
    Ok(())
}

/// Discard the calling thread's last error, if any.
pub fn clear() {
    if let Some(record) = slot::with_slot(Option::take) {
        trace!(class = %record.class(), "error cleared");
    }
}

// ── Fallible message buffer ───────────────────────────────────────

/// `fmt::Write` sink that reserves before every push and stops at the
/// first failed reservation instead of aborting.
#[derive(Default)]
pub(crate) struct MessageBuf {
    pub(crate) text: String,
    pub(crate) exhausted: bool,
}

impl Write for MessageBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.exhausted {
            return Err(fmt::Error);
        }
        if self.text.try_reserve(s.len()).is_err() {
            self.exhausted = true;
            return Err(fmt::Error);
        }
        self.text.push_str(s);
        Ok(())
    }
}
