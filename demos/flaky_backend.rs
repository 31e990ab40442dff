//! Flaky backend demo.
//!
//! Wraps a randomly failing async lookup in a guard and drives it for a few
//! seconds. Run with `RUST_LOG=circuit_guard=debug` to see every call.
//!
//! ```text
//! cargo run --example flaky_backend
//! ```

use std::time::Duration;
use circuit_guard::observability::logging::{init_logging, DEFAULT_FILTER};
use circuit_guard::{GuardConfig, GuardError, GuardRegistry};

#[derive(Debug, thiserror::Error)]
#[error("backend unavailable (request {0})")]
struct BackendDown(u32);

/// Fails roughly `failure_rate` of the time after some jitter.
async fn lookup(request: u32, failure_rate: f64) -> Result<u32, BackendDown> {
    tokio::time::sleep(Duration::from_millis(fastrand::u64(5..40))).await;
    if fastrand::f64() < failure_rate {
        return Err(BackendDown(request));
    }
    Ok(request * 2)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(DEFAULT_FILTER)?;

    let registry = GuardRegistry::new();
    let config = GuardConfig {
        window_secs: 5,
        threshold: 4,
        request_timeout_secs: 1,
        cb_timeout_secs: 2,
    };

    // the backend degrades badly for a while, then recovers
    let guard = registry.register(
        "lookup",
        |(request, failure_rate): (u32, f64)| lookup(request, failure_rate),
        config,
    )?;

    for request in 0..60u32 {
        let failure_rate = if (10..30).contains(&request) { 0.9 } else { 0.1 };
        let execution = guard.execute((request, failure_rate))?;
        let status = execution.status_at_call_time();

        match execution.await {
            Ok(value) => println!("#{request:02} [{status}] ok {value}"),
            Err(GuardError::BreakerOpen { .. }) => println!("#{request:02} [{status}] rejected"),
            Err(e) => println!("#{request:02} [{status}] failed: {e}"),
        }

        if request % 10 == 9 {
            let snapshot = registry.snapshot("lookup")?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        tokio::time::sleep(Duration::from_millis(150)).await;
    }

    Ok(())
}
