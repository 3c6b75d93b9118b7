// src/engine/pool.rs
//
// Global thread pool for async decodes.
//
// A single lazily-built pool is shared by every decoder instance; building a
// pool per request costs far more than the decode of a small icon.
//
// Thread count:
// - LAZY_SVG_THREADS, when set to a positive integer
// - otherwise std::thread::available_parallelism() (respects cgroup quota)
// - MIN_RAYON_THREADS when detection fails
//
// The pool is initialized on first use; later env changes have no effect.

use rayon::ThreadPool;
use std::sync::OnceLock;

/// Env var overriding the worker count
pub const THREADS_ENV_VAR: &str = "LAZY_SVG_THREADS";

/// Upper bound accepted from the env override
pub const MAX_THREADS: usize = 256;

const MIN_RAYON_THREADS: usize = 1;

static GLOBAL_THREAD_POOL: OnceLock<ThreadPool> = OnceLock::new();

pub fn get_pool() -> &'static ThreadPool {
    GLOBAL_THREAD_POOL.get_or_init(|| {
        let num_threads = configured_threads(std::env::var(THREADS_ENV_VAR).ok().as_deref());
        tracing::debug!(num_threads, "building svg decode pool");

        match rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("lazy-svg-{i}"))
            .build()
        {
            Ok(pool) => pool,
            Err(e) => {
                tracing::warn!(error = %e, num_threads, "falling back to a single-thread pool");
                rayon::ThreadPoolBuilder::new()
                    .num_threads(MIN_RAYON_THREADS)
                    .build()
                    .unwrap_or_else(|e| {
                        panic!(
                            "Failed to create fallback thread pool with {} threads: {}",
                            MIN_RAYON_THREADS, e
                        )
                    })
            }
        }
    })
}

fn configured_threads(raw: Option<&str>) -> usize {
    let from_env = raw
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map(|n| n.min(MAX_THREADS));

    from_env.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(MIN_RAYON_THREADS)
    })
}
