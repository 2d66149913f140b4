/*!
 * Pool Audit - Main Entry Point
 *
 * Drives a contended workload against a shared tracked pool, exercises the
 * per-thread pools through value rendering, then reports leaks and resets.
 */

use instrumented_pool::monitoring::AuditSpan;
use instrumented_pool::{
    init_tracing, render_display, with_thread_pool, LeakAuditor, PoolConfig, TrackedPool,
};
use miette::{miette, IntoDiagnostic};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

const DEFAULT_THREADS: usize = 8;
const DEFAULT_ALLOCATIONS: usize = 50;

fn main() -> miette::Result<()> {
    init_tracing();

    let config = PoolConfig::from_env();
    let threads = env_count("POOL_AUDIT_THREADS", DEFAULT_THREADS);
    let allocations = env_count("POOL_AUDIT_ALLOCATIONS", DEFAULT_ALLOCATIONS);

    info!(
        initial_capacity = config.initial_capacity,
        allocation_limit = ?config.allocation_limit,
        threads,
        allocations,
        "Pool audit starting"
    );

    let pool = Arc::new(TrackedPool::with_config(config));

    let span = AuditSpan::new("shared_workload");
    let kept = run_shared_workload(&pool, threads, allocations)?;
    span.finish(threads * allocations);

    let span = AuditSpan::new("thread_local_render");
    let rendered = run_thread_local_render(threads)?;
    span.finish(rendered);

    report_leaks(pool.as_ref());
    if pool.active_allocation_count() != kept {
        warn!(
            expected = kept,
            actual = pool.active_allocation_count(),
            "Live allocation count does not match workload"
        );
    }

    let stats = serde_json::to_string_pretty(&pool.stats()).into_diagnostic()?;
    println!("{}", stats);

    pool.reset();
    info!(
        active = pool.active_allocation_count(),
        leaks = pool.has_memory_leaks(),
        "Pool reset complete"
    );

    Ok(())
}

/// Each worker allocates `allocations` words and releases every other one.
/// Returns how many allocations were intentionally kept live.
fn run_shared_workload(
    pool: &Arc<TrackedPool>,
    threads: usize,
    allocations: usize,
) -> miette::Result<usize> {
    let handles: Vec<_> = (0..threads)
        .map(|worker| {
            let pool = Arc::clone(pool);
            thread::Builder::new()
                .name(format!("pool-worker-{}", worker))
                .spawn(move || -> miette::Result<usize> {
                    let mut kept = 0;
                    for i in 0..allocations {
                        let ptr = pool.allocate::<u64>(1)?;
                        let value = (worker * allocations + i) as u64;
                        // SAFETY: freshly carved, aligned for u64, exclusively ours
                        unsafe { ptr.as_ptr().write(value) };

                        if unsafe { ptr.as_ptr().read() } != value {
                            return Err(miette!("worker {} read back a corrupted value", worker));
                        }

                        if i % 2 == 0 {
                            pool.deallocate(ptr.as_ptr());
                        } else {
                            kept += 1;
                        }
                    }
                    Ok(kept)
                })
                .into_diagnostic()
        })
        .collect::<miette::Result<_>>()?;

    let mut kept = 0;
    for handle in handles {
        kept += handle
            .join()
            .map_err(|_| miette!("pool worker panicked"))??;
    }
    Ok(kept)
}

/// Render a value through each worker's thread-local pool.
/// Returns how many renders succeeded.
fn run_thread_local_render(threads: usize) -> miette::Result<usize> {
    let handles: Vec<_> = (0..threads)
        .map(|worker| {
            thread::spawn(move || -> miette::Result<usize> {
                with_thread_pool(|pool| {
                    let text = render_display(pool, &format_args!("worker {} done", worker))?;
                    if !text.release() {
                        warn!(worker, "Rendered text was no longer tracked");
                    }
                    Ok(1)
                })
            })
        })
        .collect();

    let mut rendered = 0;
    for handle in handles {
        rendered += handle
            .join()
            .map_err(|_| miette!("render worker panicked"))??;
    }
    Ok(rendered)
}

fn report_leaks(auditor: &impl LeakAuditor) {
    if !auditor.has_memory_leaks() {
        info!("No outstanding allocations");
        return;
    }

    let report = auditor.leak_report();
    let oldest = report.iter().map(|entry| entry.age).max().unwrap_or_default();
    let bytes: usize = report.iter().map(|entry| entry.size).sum();
    warn!(
        leaks = report.len(),
        bytes,
        oldest_ms = oldest.as_millis() as u64,
        "Outstanding allocations"
    );
}

fn env_count(key: &str, default: usize) -> usize {
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().parse::<usize>() {
        Ok(count) if count > 0 => count,
        Ok(_) => {
            warn!(key, default, "Count must be positive, using default");
            default
        }
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Invalid count in environment");
            default
        }
    }
}
