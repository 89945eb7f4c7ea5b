//! Print the cache policy table.

use std::io::Write;

use threadline_storefront::query::CacheClass;

/// Write one row per cache class.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = std::io::stdout().lock();
    writeln!(
        stdout,
        "{:<14} {:>10} {:>10} {:>6} {:>6}",
        "class", "stale", "gc", "focus", "retry"
    )?;
    for class in CacheClass::ALL {
        let policy = class.policy();
        writeln!(
            stdout,
            "{:<14} {:>9}s {:>9}s {:>6} {:>6}",
            class.as_str(),
            policy.stale_time.as_secs(),
            policy.gc_time.as_secs(),
            if policy.refetch_on_window_focus { "yes" } else { "no" },
            policy.retry
        )?;
    }
    Ok(())
}
