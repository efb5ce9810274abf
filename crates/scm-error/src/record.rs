use std::borrow::Cow;

use crate::ErrorClass;

/// Message stored by the out-of-memory path. Static, never freed.
pub(crate) const OOM_MESSAGE: &str = "Out of memory";

/// One recorded failure: a message plus the class that raised it.
///
/// The message is normally an owned `String`. The out-of-memory record
/// borrows a `'static` string instead, so building it never allocates.
/// Records are replaced whole; there is no partial update.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ErrorRecord {
    message: Cow<'static, str>,
    class: ErrorClass,
}

impl ErrorRecord {
    pub fn new(class: ErrorClass, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            class,
        }
    }

    /// The static out-of-memory record. Allocation-free.
    #[inline]
    pub const fn out_of_memory() -> Self {
        Self {
            message: Cow::Borrowed(OOM_MESSAGE),
            class: ErrorClass::NoMemory,
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn class(&self) -> ErrorClass {
        self.class
    }

    /// `true` if the message is borrowed static text rather than owned.
    #[inline]
    pub fn is_static(&self) -> bool {
        matches!(self.message, Cow::Borrowed(_))
    }

    pub fn into_message(self) -> Cow<'static, str> {
        self.message
    }

    pub fn into_parts(self) -> (ErrorClass, Cow<'static, str>) {
        (self.class, self.message)
    }
}

impl core::fmt::Debug for ErrorRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ErrorRecord")
            .field("class", &self.class)
            .field("message", &self.message())
            .finish()
    }
}

impl core::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}
