use std::borrow::Cow;
use std::io;

use crate::{Code, Error, ErrorClass, Result};

/// Maps `io::ErrorKind` to the generic return code callers branch on.
fn io_error_code(kind: io::ErrorKind) -> Code {
    match kind {
        io::ErrorKind::NotFound => Code::NotFound,
        io::ErrorKind::AlreadyExists => Code::Exists,
        _ => Code::Error,
    }
}

// ── From<io::Error> ───────────────────────────────────────────────

impl From<io::Error> for Error {
    /// Class `Os`, or `NoMemory` for `OutOfMemory`. The io error's text
    /// becomes the message and the io error the source.
    fn from(err: io::Error) -> Self {
        let code = io_error_code(err.kind());
        let class = match err.kind() {
            io::ErrorKind::OutOfMemory => ErrorClass::NoMemory,
            _ => ErrorClass::Os,
        };
        Error::new(code, class, err.to_string()).with_source(err)
    }
}

// ── ResultExt — context annotation on Results ─────────────────────

/// Extension trait for turning foreign errors into [`Error`] during
/// propagation.
///
/// ```
/// use scm_error::{Code, ErrorClass, ResultExt};
///
/// let res: Result<(), std::io::Error> =
///     Err(std::io::Error::new(std::io::ErrorKind::Other, "short read"));
/// let err = res.scm_context(ErrorClass::Odb, "reading loose object").unwrap_err();
/// assert_eq!(err.kind(), (Code::Error, ErrorClass::Odb));
/// ```
pub trait ResultExt<T> {
    /// Attach a class and message with the generic [`Code::Error`].
    fn scm_context(self, class: ErrorClass, msg: impl Into<Cow<'static, str>>) -> Result<T>;

    /// Attach an explicit code, class and message.
    fn scm_ctx(self, code: Code, class: ErrorClass, msg: impl Into<Cow<'static, str>>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn scm_context(self, class: ErrorClass, msg: impl Into<Cow<'static, str>>) -> Result<T> {
        self.scm_ctx(Code::Error, class, msg)
    }

    fn scm_ctx(self, code: Code, class: ErrorClass, msg: impl Into<Cow<'static, str>>) -> Result<T> {
        self.map_err(|e| Error::new(code, class, msg).with_source(e))
    }
}
