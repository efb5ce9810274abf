//! # scm-error — last-error reporting for the source-control engine
//!
//! Fallible operations across the engine (object database, index,
//! references, transport, merge) return a compact raw [`Code`]. The
//! explanation travels separately: the failing code records a message and
//! an [`ErrorClass`] in the calling thread's slot, and the caller reads it
//! back from there.
//!
//! ## Design
//!
//! - **Store** ([`store`]): at most one [`ErrorRecord`] per thread. Set,
//!   peek, clear, or detach (move the record out and empty the slot).
//!   Recording never fails: if the message cannot be allocated, the
//!   static out-of-memory record is stored instead.
//! - **Classification**: [`Code`] and [`ErrorClass`] are closed,
//!   append-only enumerations. Their raw values are a contract.
//! - **Single result type**: [`Error`] / [`Result`] carry code, class and
//!   message as one value, with [`Error::raise`] / [`Error::from_last`]
//!   bridging to the two-channel convention.
//!
//! ## Quick Start
//!
//! ```rust
//! use scm_error::{set_error, store, Code, ErrorClass, Error};
//!
//! // Deep in the object database:
//! fn read_object(oid: &str) -> i32 {
//!     set_error!(ErrorClass::Odb, "object not found - no match for id ({})", oid);
//!     Code::NotFound.raw()
//! }
//!
//! // In the caller:
//! let rc = read_object("e69de29");
//! if rc < 0 {
//!     let err = Error::from_last(rc);
//!     assert_eq!(err.kind(), (Code::NotFound, ErrorClass::Odb));
//!     assert!(store::last().is_none()); // detached
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Flag      | Effect |
//! |-----------|--------|
//! | `threads` | (default) one slot per thread; without it, one shared slot |
//! | `metrics` | per-class `AtomicU64` counters, Prometheus dump |

mod class;
mod code;
mod record;
mod slot;
mod error;
#[macro_use]
mod macros;
mod convert;
mod state;

pub mod platform;
pub mod store;

#[cfg(feature = "metrics")]
pub mod metrics;

// ── Public API ────────────────────────────────────────────────────

pub use class::ErrorClass;
pub use code::Code;
pub use record::ErrorRecord;
pub use error::{check, into_raw, Error, Result, StoreError};
pub use convert::ResultExt;
pub use state::ErrorState;
pub use platform::{Platform, SystemPlatform};
pub use slot::PER_THREAD;

pub use store::{
    clear, detach, detach_into, has_error, last, last_class, set_after_callback, set_fmt,
    set_oom, set_str, with_last,
};
