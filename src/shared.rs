//! Process-wide client initialized from the environment.

use tokio::sync::OnceCell;

use crate::{Result, TossPaymentsClient};

static SHARED: OnceCell<TossPaymentsClient> = OnceCell::const_new();

/// Returns the process-wide client, creating it on first use with
/// [`TossPaymentsClient::from_env`].
///
/// Concurrent first callers wait on a single initialization. A failed
/// initialization is not cached; the next call tries again.
pub async fn shared_client() -> Result<&'static TossPaymentsClient> {
    SHARED
        .get_or_try_init(|| async { TossPaymentsClient::from_env() })
        .await
}
