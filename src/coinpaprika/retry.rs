use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tracing::warn;

/// Run `op` up to `retries + 1` times.
///
/// After failed attempt `n` (0-based) the helper sleeps `backoff * (n + 1)`
/// before trying again.  The error of the final attempt is returned.
pub async fn with_retry<T, F, Fut>(retries: u32, backoff: Duration, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= retries => return Err(e),
            Err(e) => {
                let wait = backoff * (attempt + 1);
                warn!(attempt, wait_ms = wait.as_millis() as u64, error = %e, "request failed, retrying");
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
        }
    }
}
