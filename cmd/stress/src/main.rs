//! Stress test - many threads recording errors at once
//!
//! Every thread repeatedly records, peeks and detaches its own errors and
//! checks that it never observes another thread's record.
//!
//! Configuration:
//! - `SCM_STRESS_THREADS` (default 8), or the first CLI argument
//! - `SCM_STRESS_ITERS` (default 100000)
//! - `SCM_STRESS_VERBOSE=1` prints a line per thread
//! - `RUST_LOG` filters tracing output

mod env;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use scm_error::{store, Code, Error, ErrorClass, ErrorState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::env::StressConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_thread_names(true)
        .init();

    println!("=== scm-error Stress Test ===\n");

    let StressConfig {
        threads: num_threads,
        iters,
        verbose,
    } = StressConfig::from_env(std::env::args().nth(1));

    if !scm_error::PER_THREAD {
        warn!("built without per-thread slots; cross-thread mismatches are expected");
    }
    info!(num_threads, iters, "starting");

    let mismatches = Arc::new(AtomicU64::new(0));
    let start = Instant::now();

    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let mismatches = Arc::clone(&mismatches);
            thread::Builder::new()
                .name(format!("stress-{}", t))
                .spawn(move || run_worker(t, iters, &mismatches, verbose))
        })
        .collect();

    let mut spawned = 0;
    for handle in handles {
        match handle {
            Ok(h) => {
                if h.join().is_err() {
                    warn!("worker panicked");
                }
                spawned += 1;
            }
            Err(e) => warn!(error = %e, "failed to spawn worker"),
        }
    }

    let elapsed = start.elapsed();
    let total = spawned as u64 * iters;
    let bad = mismatches.load(Ordering::Relaxed);

    println!("\n=== Results ===");
    println!("Threads:     {}", spawned);
    println!("Operations:  {}", total);
    println!("Mismatches:  {}", bad);
    println!("Time:        {:?}", elapsed);
    println!(
        "Rate:        {:.0} set+detach/sec",
        total as f64 / elapsed.as_secs_f64()
    );

    if bad > 0 {
        std::process::exit(1);
    }
}

fn run_worker(t: usize, iters: u64, mismatches: &AtomicU64, verbose: bool) {
    let class = ErrorClass::ALL[1 + t % (ErrorClass::COUNT - 1)];
    let mut local_bad = 0u64;

    for i in 0..iters {
        match i % 4 {
            // set / peek / detach
            0 => {
                scm_error::set_error!(class, "thread {} iteration {}", t, i);
                if store::last_class() != Some(class) {
                    local_bad += 1;
                }
                match store::detach() {
                    Ok(rec) if rec.class() == class => {}
                    _ => local_bad += 1,
                }
            }
            // allocation-free path
            1 => {
                store::set_oom();
                if store::last_class() != Some(ErrorClass::NoMemory) {
                    local_bad += 1;
                }
                store::clear();
            }
            // single result type through the two-channel shim
            2 => {
                let rc = Error::new(Code::NotFound, class, "missing").raise();
                let err = Error::from_last(rc);
                if err.kind() != (Code::NotFound, class) {
                    local_bad += 1;
                }
            }
            // capture / clobber / restore
            _ => {
                store::set_str(class, "original");
                let saved = ErrorState::capture(Code::Error.raw());
                store::set_str(ErrorClass::Os, "cleanup");
                saved.restore();
                let ok = store::with_last(|r| r.is_some_and(|r| r.class() == class && r.message() == "original"));
                if !ok {
                    local_bad += 1;
                }
                store::clear();
            }
        }
    }

    mismatches.fetch_add(local_bad, Ordering::Relaxed);
    if verbose {
        println!("thread {:>3} ({:<10}) mismatches={}", t, class.name(), local_bad);
    }
}
