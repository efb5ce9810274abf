//! Stress run configuration from `SCM_STRESS_*` environment variables.
//!
//! ```ignore
//! let config = StressConfig::from_env(std::env::args().nth(1));
//! ```

use std::str::FromStr;

pub const THREADS_KEY: &str = "SCM_STRESS_THREADS";
pub const ITERS_KEY: &str = "SCM_STRESS_ITERS";
pub const VERBOSE_KEY: &str = "SCM_STRESS_VERBOSE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressConfig {
    pub threads: usize,
    pub iters: u64,
    pub verbose: bool,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 8,
            iters: 100_000,
            verbose: false,
        }
    }
}

impl StressConfig {
    /// Read the process environment. A parseable CLI argument overrides
    /// the thread count.
    pub fn from_env(arg: Option<String>) -> Self {
        Self::from_lookup(arg, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(arg: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let threads = arg
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| parse_or(lookup(THREADS_KEY), defaults.threads));
        Self {
            threads,
            iters: parse_or(lookup(ITERS_KEY), defaults.iters),
            verbose: flag_or(lookup(VERBOSE_KEY), defaults.verbose),
        }
    }
}

/// Parse `value` as `T`, or fall back to `default` when unset or invalid.
fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// "1", "true", "yes", "on" (any case) are true; anything else set is false.
fn flag_or(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<_, _> = vars.iter().copied().collect();
        move |key: &str| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(StressConfig::from_lookup(None, lookup(&[])), StressConfig::default());
    }

    #[test]
    fn reads_stress_keys() {
        let vars = [(THREADS_KEY, "3"), (ITERS_KEY, " 250 "), (VERBOSE_KEY, "On")];
        let config = StressConfig::from_lookup(None, lookup(&vars));
        assert_eq!(
            config,
            StressConfig {
                threads: 3,
                iters: 250,
                verbose: true
            }
        );
    }

    #[test]
    fn cli_argument_overrides_thread_key() {
        let vars = [(THREADS_KEY, "3")];
        assert_eq!(StressConfig::from_lookup(Some("16".into()), lookup(&vars)).threads, 16);
        // Unparseable argument falls through to the environment.
        assert_eq!(StressConfig::from_lookup(Some("many".into()), lookup(&vars)).threads, 3);
    }

    #[test]
    fn invalid_values_fall_back() {
        let vars = [(ITERS_KEY, "lots"), (VERBOSE_KEY, "0")];
        let config = StressConfig::from_lookup(None, lookup(&vars));
        assert_eq!(config.iters, 100_000);
        assert!(!config.verbose);
    }

    #[test]
    fn process_environment_is_read() {
        std::env::set_var(ITERS_KEY, "42");
        let config = StressConfig::from_env(None);
        std::env::remove_var(ITERS_KEY);
        assert_eq!(config.iters, 42);
    }
}
