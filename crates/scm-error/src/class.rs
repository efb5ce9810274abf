//! Error classes: the subsystem a recorded error came from.
//!
//! Callers outside this crate persist and compare the raw values, so the
//! table is append-only. New classes go at the end; an existing value is
//! never reassigned.
//!
//! | Value | Class        | Origin                          |
//! |-------|--------------|---------------------------------|
//! | `0`   | `None`       | no class / unset                |
//! | `1`   | `NoMemory`   | allocation failure              |
//! | `2`   | `Os`         | operating-system call           |
//! | `3`   | `Invalid`    | input validation                |
//! | `4–27`| ...          | engine subsystems (see variants)|

/// Origin tag of a recorded error.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ErrorClass {
    #[default]
    None = 0,
    NoMemory = 1,
    Os = 2,
    Invalid = 3,
    Reference = 4,
    Zlib = 5,
    Repository = 6,
    Config = 7,
    Regex = 8,
    Odb = 9,
    Index = 10,
    Object = 11,
    Net = 12,
    Tag = 13,
    Tree = 14,
    Indexer = 15,
    Ssl = 16,
    Submodule = 17,
    Thread = 18,
    Stash = 19,
    Checkout = 20,
    FetchHead = 21,
    Merge = 22,
    Ssh = 23,
    Filter = 24,
    Revert = 25,
    Callback = 26,
    CherryPick = 27,
}

impl ErrorClass {
    /// Number of defined classes. Raw values are dense in `0..COUNT`.
    pub const COUNT: usize = 28;

    /// Every class, indexed by raw value.
    pub const ALL: [ErrorClass; Self::COUNT] = [
        ErrorClass::None,
        ErrorClass::NoMemory,
        ErrorClass::Os,
        ErrorClass::Invalid,
        ErrorClass::Reference,
        ErrorClass::Zlib,
        ErrorClass::Repository,
        ErrorClass::Config,
        ErrorClass::Regex,
        ErrorClass::Odb,
        ErrorClass::Index,
        ErrorClass::Object,
        ErrorClass::Net,
        ErrorClass::Tag,
        ErrorClass::Tree,
        ErrorClass::Indexer,
        ErrorClass::Ssl,
        ErrorClass::Submodule,
        ErrorClass::Thread,
        ErrorClass::Stash,
        ErrorClass::Checkout,
        ErrorClass::FetchHead,
        ErrorClass::Merge,
        ErrorClass::Ssh,
        ErrorClass::Filter,
        ErrorClass::Revert,
        ErrorClass::Callback,
        ErrorClass::CherryPick,
    ];

    /// The stable integer value.
    #[inline]
    pub const fn raw(self) -> i32 {
        self as i32
    }

    /// Look up a class by its stable integer value.
    ///
    /// ```
    /// use scm_error::ErrorClass;
    /// assert_eq!(ErrorClass::from_raw(9), Some(ErrorClass::Odb));
    /// assert_eq!(ErrorClass::from_raw(-1), None);
    /// ```
    #[inline]
    pub const fn from_raw(raw: i32) -> Option<Self> {
        if raw >= 0 && (raw as usize) < Self::COUNT {
            Some(Self::ALL[raw as usize])
        } else {
            None
        }
    }

    /// Short lowercase name, used in `Display` and metric labels.
    pub const fn name(self) -> &'static str {
        match self {
            ErrorClass::None => "none",
            ErrorClass::NoMemory => "nomemory",
            ErrorClass::Os => "os",
            ErrorClass::Invalid => "invalid",
            ErrorClass::Reference => "reference",
            ErrorClass::Zlib => "zlib",
            ErrorClass::Repository => "repository",
            ErrorClass::Config => "config",
            ErrorClass::Regex => "regex",
            ErrorClass::Odb => "odb",
            ErrorClass::Index => "index",
            ErrorClass::Object => "object",
            ErrorClass::Net => "net",
            ErrorClass::Tag => "tag",
            ErrorClass::Tree => "tree",
            ErrorClass::Indexer => "indexer",
            ErrorClass::Ssl => "ssl",
            ErrorClass::Submodule => "submodule",
            ErrorClass::Thread => "thread",
            ErrorClass::Stash => "stash",
            ErrorClass::Checkout => "checkout",
            ErrorClass::FetchHead => "fetchhead",
            ErrorClass::Merge => "merge",
            ErrorClass::Ssh => "ssh",
            ErrorClass::Filter => "filter",
            ErrorClass::Revert => "revert",
            ErrorClass::Callback => "callback",
            ErrorClass::CherryPick => "cherrypick",
        }
    }
}

impl core::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ErrorClass> for i32 {
    #[inline]
    fn from(class: ErrorClass) -> i32 {
        class.raw()
    }
}
