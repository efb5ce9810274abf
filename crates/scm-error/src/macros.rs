/// Record a formatted error for the calling thread.
///
/// ```
/// use scm_error::{set_error, store, ErrorClass};
///
/// let name = "refs/heads/topic";
/// set_error!(ErrorClass::Reference, "reference '{}' not found", name);
/// assert_eq!(store::last().unwrap().message(), "reference 'refs/heads/topic' not found");
/// # store::clear();
/// ```
#[macro_export]
macro_rules! set_error {
    ($class:expr, $($arg:tt)+) => {
        $crate::store::set_fmt($class, ::core::format_args!($($arg)+))
    };
}

/// Construct a full [`Error`](crate::Error) with a formatted message.
///
/// ```ignore
/// return Err(scm_err!(Code::NotFound, ErrorClass::Odb, "object {} not found", oid));
/// ```
#[macro_export]
macro_rules! scm_err {
    ($code:expr, $class:expr, $($arg:tt)+) => {
        $crate::Error::new($code, $class, ::std::format!($($arg)+))
    };
}

/// Early-return an [`Error`](crate::Error) if a condition is false.
///
/// ```ignore
/// ensure!(!name.is_empty(), Code::InvalidSpec, ErrorClass::Reference, "empty reference name");
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $code:expr, $class:expr, $($arg:tt)+) => {
        if !$cond {
            return ::core::result::Result::Err($crate::scm_err!($code, $class, $($arg)+));
        }
    };
}

/// Match on an [`Error`](crate::Error)'s `(code, class)` pair.
///
/// ```ignore
/// match_error!(err, {
///     (Code::NotFound, ErrorClass::Odb) => { /* try the next backend */ },
///     (Code::NotFound, _)               => { /* any not-found */ },
///     (Code::Locked, _) | (Code::Modified, _) => { /* retry */ },
///     _                                 => { /* fallback */ },
/// })
/// ```
///
/// Arms are ordinary patterns, so the compiler checks exhaustiveness.
#[macro_export]
macro_rules! match_error {
    ($error:expr, {
        $( $pat:pat => $handler:expr ),*
        $(,)?
    }) => {{
        match $crate::Error::kind(&$error) {
            $( $pat => $handler, )*
        }
    }};
}
