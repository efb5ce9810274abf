//! Generic return codes.
//!
//! Every fallible operation in the engine returns one of these as a raw
//! `i32`. Values `>= 0` mean success; negative values are failures or
//! sentinels. The numbering is a contract: callers branch on the raw
//! values, so nothing here is ever renumbered.
//!
//! | Range        | Meaning                                           |
//! |--------------|---------------------------------------------------|
//! | `0`          | success                                           |
//! | `-1 .. -7`   | generic conditions (not found, exists, ...)       |
//! | `-8 .. -16`  | domain-specific refusals                          |
//! | `-30, -31`   | control-flow sentinels (passthrough, iter over)   |

/// A return code from the closed generic enumeration.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Code {
    /// No error.
    #[default]
    Ok = 0,
    /// Generic error.
    Error = -1,
    /// Requested object could not be found.
    NotFound = -3,
    /// Object exists preventing operation.
    Exists = -4,
    /// More than one object matches.
    Ambiguous = -5,
    /// Output buffer too short to hold data.
    Bufs = -6,
    /// Returned by a user callback to stop an iteration. Never produced
    /// by the engine itself.
    User = -7,
    /// Operation not allowed on bare repository.
    BareRepo = -8,
    /// HEAD refers to branch with no commits.
    UnbornBranch = -9,
    /// Merge in progress prevented operation.
    Unmerged = -10,
    /// Reference was not fast-forwardable.
    NonFastForward = -11,
    /// Name/ref spec was not in a valid format.
    InvalidSpec = -12,
    /// Merge conflicts prevented operation.
    MergeConflict = -13,
    /// Lock file prevented operation.
    Locked = -14,
    /// Reference value does not match expected.
    Modified = -15,
    /// Server certificate is invalid.
    Certificate = -16,
    /// Internal only: forward the inner layer's result unchanged.
    Passthrough = -30,
    /// End of iteration.
    IterOver = -31,
}

impl Code {
    /// Every defined code, in declaration order.
    pub const ALL: [Code; 18] = [
        Code::Ok,
        Code::Error,
        Code::NotFound,
        Code::Exists,
        Code::Ambiguous,
        Code::Bufs,
        Code::User,
        Code::BareRepo,
        Code::UnbornBranch,
        Code::Unmerged,
        Code::NonFastForward,
        Code::InvalidSpec,
        Code::MergeConflict,
        Code::Locked,
        Code::Modified,
        Code::Certificate,
        Code::Passthrough,
        Code::IterOver,
    ];

    #[inline]
    pub const fn raw(self) -> i32 {
        self as i32
    }

    /// Map a raw return value back to its code.
    ///
    /// Returns `None` for values outside the enumeration, including
    /// positive variant-success values.
    ///
    /// ```
    /// use scm_error::Code;
    /// assert_eq!(Code::from_raw(-3), Some(Code::NotFound));
    /// assert_eq!(Code::from_raw(-2), None);
    /// ```
    pub const fn from_raw(raw: i32) -> Option<Self> {
        let code = match raw {
            0 => Code::Ok,
            -1 => Code::Error,
            -3 => Code::NotFound,
            -4 => Code::Exists,
            -5 => Code::Ambiguous,
            -6 => Code::Bufs,
            -7 => Code::User,
            -8 => Code::BareRepo,
            -9 => Code::UnbornBranch,
            -10 => Code::Unmerged,
            -11 => Code::NonFastForward,
            -12 => Code::InvalidSpec,
            -13 => Code::MergeConflict,
            -14 => Code::Locked,
            -15 => Code::Modified,
            -16 => Code::Certificate,
            -30 => Code::Passthrough,
            -31 => Code::IterOver,
            _ => return None,
        };
        Some(code)
    }

    /// `true` for `Ok`. Negative codes are failures or sentinels.
    #[inline]
    pub const fn is_success(self) -> bool {
        self.raw() >= 0
    }

    pub const fn name(self) -> &'static str {
        match self {
            Code::Ok => "ok",
            Code::Error => "error",
            Code::NotFound => "not_found",
            Code::Exists => "exists",
            Code::Ambiguous => "ambiguous",
            Code::Bufs => "bufs",
            Code::User => "user",
            Code::BareRepo => "bare_repo",
            Code::UnbornBranch => "unborn_branch",
            Code::Unmerged => "unmerged",
            Code::NonFastForward => "non_fast_forward",
            Code::InvalidSpec => "invalid_spec",
            Code::MergeConflict => "merge_conflict",
            Code::Locked => "locked",
            Code::Modified => "modified",
            Code::Certificate => "certificate",
            Code::Passthrough => "passthrough",
            Code::IterOver => "iter_over",
        }
    }
}

impl core::fmt::Display for Code {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Code> for i32 {
    #[inline]
    fn from(code: Code) -> i32 {
        code.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_values() {
        assert_eq!(Code::Ok.raw(), 0);
        assert_eq!(Code::Error.raw(), -1);
        assert_eq!(Code::NotFound.raw(), -3);
        assert_eq!(Code::Exists.raw(), -4);
        assert_eq!(Code::Ambiguous.raw(), -5);
        assert_eq!(Code::Bufs.raw(), -6);
        assert_eq!(Code::User.raw(), -7);
        assert_eq!(Code::BareRepo.raw(), -8);
        assert_eq!(Code::Certificate.raw(), -16);
        assert_eq!(Code::Passthrough.raw(), -30);
        assert_eq!(Code::IterOver.raw(), -31);
    }

    #[test]
    fn from_raw_inverts_raw() {
        for code in Code::ALL {
            assert_eq!(Code::from_raw(code.raw()), Some(code));
        }
    }

    #[test]
    fn gaps_are_not_codes() {
        assert_eq!(Code::from_raw(-2), None);
        assert_eq!(Code::from_raw(-17), None);
        assert_eq!(Code::from_raw(-29), None);
        assert_eq!(Code::from_raw(1), None);
    }

    #[test]
    fn only_ok_is_success() {
        let successes: Vec<_> = Code::ALL.iter().filter(|c| c.is_success()).collect();
        assert_eq!(successes, vec![&Code::Ok]);
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(Code::NonFastForward.to_string(), "non_fast_forward");
        assert_eq!(i32::from(Code::Locked), -14);
    }
}
