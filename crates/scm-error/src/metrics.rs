//! Per-class error counters.
//!
//! Enabled with `feature = "metrics"`. Every record stored in a slot,
//! including the static out-of-memory record, bumps the counter of its
//! class. Cost: one `AtomicU64::fetch_add(1, Relaxed)`, no allocation.
//!
//! ```text
//! store::set_str(class, ..) / store::set_oom()
//!       │
//!       ▼  index = class.raw()
//! COUNTERS[index].fetch_add(1, Relaxed)
//!       │
//!       ▼  scrape
//! dump_prometheus()
//! ```

use core::sync::atomic::{AtomicU64, Ordering};

use crate::ErrorClass;

/// Global counter array. Index = `ErrorClass::raw()`.
static COUNTERS: [AtomicU64; ErrorClass::COUNT] = {
    const ZERO: AtomicU64 = AtomicU64::new(0);
    [ZERO; ErrorClass::COUNT]
};

/// Increment the counter for a class. Returns the previous count.
#[inline(always)]
pub fn bump(class: ErrorClass) -> u64 {
    COUNTERS[class.raw() as usize].fetch_add(1, Ordering::Relaxed)
}

/// Read the current count for a class.
#[inline]
pub fn count(class: ErrorClass) -> u64 {
    COUNTERS[class.raw() as usize].load(Ordering::Relaxed)
}

/// Reset the counter for a class. Returns the old value.
#[inline]
pub fn reset(class: ErrorClass) -> u64 {
    COUNTERS[class.raw() as usize].swap(0, Ordering::Relaxed)
}

pub fn reset_all() {
    for counter in COUNTERS.iter() {
        counter.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of one class counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassSnapshot {
    pub class: ErrorClass,
    pub count: u64,
}

/// All non-zero counters, in class order.
pub fn dump() -> Vec<ClassSnapshot> {
    ErrorClass::ALL
        .iter()
        .map(|&class| ClassSnapshot {
            class,
            count: count(class),
        })
        .filter(|snap| snap.count > 0)
        .collect()
}

/// All non-zero counters as aligned text, one class per line.
pub fn dump_string() -> String {
    let mut out = String::new();
    for snap in dump() {
        out.push_str(&format!(
            "[{:>3}] class={:<12} count={}\n",
            snap.class.raw(),
            snap.class.name(),
            snap.count
        ));
    }
    out
}

/// Counters in OpenMetrics/Prometheus exposition format.
pub fn dump_prometheus() -> String {
    let mut out = String::from(
        "# HELP scm_error_total Errors recorded per class\n\
         # TYPE scm_error_total counter\n",
    );
    for snap in dump() {
        out.push_str(&format!(
            "scm_error_total{{class=\"{}\",class_id=\"{}\"}} {}\n",
            snap.class.name(),
            snap.class.raw(),
            snap.count
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::test_lock;
    use crate::store;

    #[test]
    fn bump_and_count() {
        let before = count(ErrorClass::Thread);
        bump(ErrorClass::Thread);
        bump(ErrorClass::Thread);
        bump(ErrorClass::Thread);
        assert!(count(ErrorClass::Thread) >= before + 3);
    }

    #[test]
    fn store_bumps_class() {
        let _g = test_lock();
        let before = count(ErrorClass::Ssh);
        store::set_str(ErrorClass::Ssh, "host key mismatch");
        assert!(count(ErrorClass::Ssh) > before);

        let before = count(ErrorClass::NoMemory);
        store::set_oom();
        assert!(count(ErrorClass::NoMemory) > before);
        store::clear();
    }

    #[test]
    fn dump_non_zero() {
        bump(ErrorClass::CherryPick);
        let snapshots = dump();
        assert!(snapshots.iter().any(|s| s.class == ErrorClass::CherryPick && s.count > 0));
        assert!(dump_string().contains("class=cherrypick"));
    }

    #[test]
    fn prometheus_format() {
        bump(ErrorClass::FetchHead);
        let text = dump_prometheus();
        assert!(text.starts_with("# HELP scm_error_total"));
        assert!(text.contains("scm_error_total{class=\"fetchhead\",class_id=\"21\"}"));
    }

    #[test]
    fn reset_counter() {
        bump(ErrorClass::Stash);
        let old = reset(ErrorClass::Stash);
        assert!(old >= 1);
    }
}
