//! Access to the platform's "last OS error" for the current thread.
//!
//! The store only consumes this: when an error is recorded with
//! [`ErrorClass::Os`](crate::ErrorClass::Os) it asks the platform for a
//! description of the pending OS error and then clears it, so the same
//! OS failure is not reported twice.

use std::borrow::Cow;

/// Suffix used when the platform has no description to offer.
pub const UNKNOWN_OS_ERROR: &str = "unknown error";

/// Source of the calling thread's last OS-level error.
pub trait Platform {
    /// Description of the pending OS error, or `None` if there is none.
    fn last_os_error_description(&self) -> Option<Cow<'static, str>>;

    /// Reset the pending OS error for the calling thread.
    fn clear_last_os_error(&self);
}

/// The host platform: `errno` on Unix, `GetLastError` elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPlatform;

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        use nix::errno::Errno;

        impl Platform for SystemPlatform {
            fn last_os_error_description(&self) -> Option<Cow<'static, str>> {
                match Errno::last() {
                    Errno::UnknownErrno => None,
                    errno => Some(Cow::Borrowed(errno.desc())),
                }
            }

            #[inline]
            fn clear_last_os_error(&self) {
                Errno::clear();
            }
        }
    } else {
        impl Platform for SystemPlatform {
            fn last_os_error_description(&self) -> Option<Cow<'static, str>> {
                let err = std::io::Error::last_os_error();
                match err.raw_os_error() {
                    None | Some(0) => None,
                    Some(code) => describe(err.kind(), code),
                }
            }

            // No portable way to reset the thread's last-error value here.
            fn clear_last_os_error(&self) {}
        }
    }
}

/// `"<kind> (os error <code>)"`, built from the static `ErrorKind` text
/// since `io::Error`'s own Display allocates inside std. `None` when the
/// buffer cannot be reserved.
#[cfg_attr(unix, allow(dead_code))]
pub(crate) fn describe(kind: std::io::ErrorKind, code: i32) -> Option<Cow<'static, str>> {
    use std::fmt::Write;

    let mut buf = crate::store::MessageBuf::default();
    let _ = write!(buf, "{} (os error {})", kind, code);
    (!buf.exhausted).then_some(Cow::Owned(buf.text))
}

impl<P: Platform + ?Sized> Platform for &P {
    fn last_os_error_description(&self) -> Option<Cow<'static, str>> {
        (**self).last_os_error_description()
    }

    fn clear_last_os_error(&self) {
        (**self).clear_last_os_error()
    }
}
