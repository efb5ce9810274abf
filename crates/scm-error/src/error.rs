use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use crate::{store, Code, ErrorClass, ErrorRecord};

/// Failure of the store itself.
///
/// The only operation that can fail is detaching from an empty slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no error recorded for this thread")]
    NotFound,
}

impl StoreError {
    /// The return code this failure maps to.
    #[inline]
    pub const fn code(self) -> Code {
        match self {
            StoreError::NotFound => Code::NotFound,
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// A return code with optional detail, as a single value.
///
/// This is the in-process alternative to the two-channel convention
/// (raw code returned, detail left in the thread's slot). [`Error::raise`]
/// and [`Error::from_last`] convert between the two.
///
/// Two internal representations, same external API:
///
/// - **Simple**: code and class only. No heap allocation.
/// - **Full**: boxed record (message + class) and an optional source.
pub struct Error {
    repr: Repr,
}

enum Repr {
    Simple {
        code: Code,
        class: ErrorClass,
    },
    Full(Box<Detail>),
}

struct Detail {
    code: Code,
    record: ErrorRecord,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

// ── Constructors ──────────────────────────────────────────────────

impl Error {
    /// Code and class without a message.
    #[inline]
    pub const fn simple(code: Code, class: ErrorClass) -> Self {
        Self {
            repr: Repr::Simple { code, class },
        }
    }

    /// A bare code, class `None`.
    #[inline]
    pub const fn from_code(code: Code) -> Self {
        Self::simple(code, ErrorClass::None)
    }

    /// Code plus a message attributed to `class`.
    ///
    /// Prefer the `scm_err!` macro when the message needs formatting.
    pub fn new(code: Code, class: ErrorClass, message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_record(code, ErrorRecord::new(class, message))
    }

    pub fn from_record(code: Code, record: ErrorRecord) -> Self {
        Self {
            repr: Repr::Full(Box::new(Detail {
                code,
                record,
                source: None,
            })),
        }
    }

    /// Attach an underlying cause. Promotes a Simple error to Full with an
    /// empty message.
    pub fn with_source<E>(self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let mut detail = match self.repr {
            Repr::Simple { code, class } => Box::new(Detail {
                code,
                record: ErrorRecord::new(class, ""),
                source: None,
            }),
            Repr::Full(detail) => detail,
        };
        detail.source = Some(Box::new(source));
        Self {
            repr: Repr::Full(detail),
        }
    }
}

// ── Accessors ─────────────────────────────────────────────────────

impl Error {
    #[inline]
    pub fn code(&self) -> Code {
        match &self.repr {
            Repr::Simple { code, .. } => *code,
            Repr::Full(detail) => detail.code,
        }
    }

    #[inline]
    pub fn class(&self) -> ErrorClass {
        match &self.repr {
            Repr::Simple { class, .. } => *class,
            Repr::Full(detail) => detail.record.class(),
        }
    }

    /// The pair `(code, class)` for matching.
    #[inline]
    pub fn kind(&self) -> (Code, ErrorClass) {
        (self.code(), self.class())
    }

    /// The message, if this error carries one.
    pub fn message(&self) -> Option<&str> {
        self.record().map(ErrorRecord::message)
    }

    pub fn record(&self) -> Option<&ErrorRecord> {
        match &self.repr {
            Repr::Simple { .. } => None,
            Repr::Full(detail) => Some(&detail.record),
        }
    }

    #[inline]
    pub fn is_simple(&self) -> bool {
        matches!(&self.repr, Repr::Simple { .. })
    }

    /// Split into the code and the record, if any. The source is dropped.
    pub fn into_parts(self) -> (Code, Option<ErrorRecord>) {
        match self.repr {
            Repr::Simple { code, .. } => (code, None),
            Repr::Full(detail) => (detail.code, Some(detail.record)),
        }
    }
}

// ── Two-channel compatibility ─────────────────────────────────────

impl Error {
    /// Hand this error to the two-channel convention: the record (if any)
    /// becomes the calling thread's last error, and the raw code is
    /// returned for the caller to propagate.
    ///
    /// A Simple error leaves the slot untouched.
    pub fn raise(self) -> i32 {
        let (code, record) = self.into_parts();
        if let Some(record) = record {
            store::replace(record);
        }
        code.raw()
    }

    /// Lift a raw failure code plus whatever the calling thread's slot
    /// holds into one value. The slot is detached, so the detail is
    /// consumed exactly once.
    ///
    /// Raw values outside the enumeration become [`Code::Error`].
    pub fn from_last(raw: i32) -> Self {
        let code = Code::from_raw(raw).unwrap_or(Code::Error);
        match store::detach() {
            Ok(record) => Self::from_record(code, record),
            Err(_) => Self::from_code(code),
        }
    }
}

/// Turn a raw return value into a `Result`.
///
/// Non-negative values (success and variant-success) pass through;
/// negative values are lifted with [`Error::from_last`].
pub fn check(raw: i32) -> Result<i32> {
    if raw >= 0 {
        Ok(raw)
    } else {
        Err(Error::from_last(raw))
    }
}

/// Collapse a `Result` back into a raw return value, raising any error.
pub fn into_raw(result: Result<()>) -> i32 {
    match result {
        Ok(()) => Code::Ok.raw(),
        Err(err) => err.raise(),
    }
}

// ── std::error::Error ─────────────────────────────────────────────

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.repr {
            Repr::Simple { .. } => None,
            Repr::Full(detail) => detail
                .source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn StdError + 'static)),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::simple(err.code(), ErrorClass::None).with_source(err)
    }
}

// ── Display ───────────────────────────────────────────────────────

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}]", self.class(), self.code())?;
        if let Some(msg) = self.message().filter(|m| !m.is_empty()) {
            write!(f, " {}", msg)?;
        }
        if let Repr::Full(detail) = &self.repr {
            if let Some(src) = &detail.source {
                write!(f, ": {}", src)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Simple { code, class } => f
                .debug_struct("Error::Simple")
                .field("code", code)
                .field("class", class)
                .finish(),
            Repr::Full(detail) => {
                let mut d = f.debug_struct("Error::Full");
                d.field("code", &detail.code);
                d.field("record", &detail.record);
                if let Some(src) = &detail.source {
                    d.field("source", &src.to_string());
                }
                d.finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::test_lock;

    #[test]
    fn simple_has_no_message() {
        let err = Error::simple(Code::Locked, ErrorClass::Reference);
        assert!(err.is_simple());
        assert_eq!(err.kind(), (Code::Locked, ErrorClass::Reference));
        assert!(err.message().is_none());
        assert!(err.source().is_none());
    }

    #[test]
    fn full_error() {
        let err = Error::new(Code::NotFound, ErrorClass::Odb, "object not found");
        assert!(!err.is_simple());
        assert_eq!(err.code(), Code::NotFound);
        assert_eq!(err.class(), ErrorClass::Odb);
        assert_eq!(err.message(), Some("object not found"));
    }

    #[test]
    fn display_format() {
        let err = Error::new(Code::Exists, ErrorClass::Reference, "refs/heads/main exists");
        assert_eq!(err.to_string(), "[reference/exists] refs/heads/main exists");
        assert_eq!(Error::from_code(Code::IterOver).to_string(), "[none/iter_over]");
    }

    #[test]
    fn with_source_promotes_simple() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = Error::simple(Code::Error, ErrorClass::Os).with_source(io);
        assert!(!err.is_simple());
        assert_eq!(err.class(), ErrorClass::Os);
        assert!(err.source().is_some());
        assert!(err.to_string().ends_with(": disk on fire"));
    }

    #[test]
    fn raise_records_detail() {
        let _g = test_lock();
        store::clear();
        let raw = Error::new(Code::Ambiguous, ErrorClass::Object, "short id abc is ambiguous").raise();
        assert_eq!(raw, -5);
        let rec = store::detach().unwrap();
        assert_eq!(rec.class(), ErrorClass::Object);
        assert_eq!(rec.message(), "short id abc is ambiguous");
    }

    #[test]
    fn raise_simple_leaves_slot() {
        let _g = test_lock();
        store::set_str(ErrorClass::Config, "earlier");
        assert_eq!(Error::from_code(Code::IterOver).raise(), -31);
        assert_eq!(store::last().map(|r| r.class()), Some(ErrorClass::Config));
        store::clear();
    }

    #[test]
    fn from_last_detaches() {
        let _g = test_lock();
        store::set_str(ErrorClass::Index, "index is locked");
        let err = Error::from_last(Code::Locked.raw());
        assert_eq!(err.kind(), (Code::Locked, ErrorClass::Index));
        assert_eq!(err.message(), Some("index is locked"));
        assert!(store::last().is_none());
    }

    #[test]
    fn from_last_empty_slot() {
        let _g = test_lock();
        store::clear();
        let err = Error::from_last(-1);
        assert!(err.is_simple());
        assert_eq!(err.code(), Code::Error);
    }

    #[test]
    fn from_last_unknown_code() {
        let _g = test_lock();
        store::clear();
        assert_eq!(Error::from_last(-99).code(), Code::Error);
    }

    #[test]
    fn check_and_into_raw() {
        let _g = test_lock();
        store::clear();
        assert_eq!(check(0).unwrap(), 0);
        assert_eq!(check(3).unwrap(), 3);

        store::set_str(ErrorClass::Merge, "conflict in README");
        let err = check(Code::MergeConflict.raw()).unwrap_err();
        assert_eq!(err.message(), Some("conflict in README"));

        assert_eq!(into_raw(Err(err)), -13);
        assert_eq!(store::last().unwrap().message(), "conflict in README");
        assert_eq!(into_raw(Ok(())), 0);
        store::clear();
    }

    #[test]
    fn store_error_maps_to_not_found() {
        let err: Error = StoreError::NotFound.into();
        assert_eq!(err.code(), Code::NotFound);
        assert!(err.source().is_some());
        assert_eq!(StoreError::NotFound.to_string(), "no error recorded for this thread");
    }

    #[test]
    fn send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
