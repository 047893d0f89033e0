//! Cancellation scopes tying fetches to a view's lifetime.

use crate::FetchError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Cancels every fetch run inside it when cancelled or dropped.
///
/// ```rust,ignore
/// let scope = ViewScope::new();
/// let product = scope.run(api.products().get(&id)).await?;
/// ```
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A nested scope, cancelled along with this one.
    pub fn child(&self) -> ViewScope {
        ViewScope {
            token: self.token.child_token(),
        }
    }

    /// Token for fetches moved into spawned tasks.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run `fut`, resolving to [`FetchError::Cancelled`] if the scope ends first.
    pub async fn run<F, T, E>(&self, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<FetchError>,
    {
        cancellable(&self.token, fut).await
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Run `fut` until it finishes or `token` is cancelled.
pub async fn cancellable<F, T, E>(token: &CancellationToken, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<FetchError>,
{
    if token.is_cancelled() {
        return Err(FetchError::Cancelled.into());
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(FetchError::Cancelled.into()),
        result = fut => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn slow() -> Result<u32, FetchError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(1)
    }

    #[tokio::test]
    async fn test_completes_when_not_cancelled() {
        let scope = ViewScope::new();
        let value = scope.run(async { Ok::<_, FetchError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_cancel_resolves_in_flight() {
        let scope = ViewScope::new();
        let token = scope.token();
        let task = tokio::spawn(async move { cancellable(&token, slow()).await });

        tokio::task::yield_now().await;
        scope.cancel();

        assert_eq!(task.await.unwrap(), Err(FetchError::Cancelled));
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let scope = ViewScope::new();
        let token = scope.token();
        let child = scope.child();
        drop(scope);

        assert!(token.is_cancelled());
        assert!(child.is_cancelled());
        assert_eq!(cancellable(&token, slow()).await, Err(FetchError::Cancelled));
    }
}
