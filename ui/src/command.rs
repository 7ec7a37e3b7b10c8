//! Deferred work returned from `MediaApp::update`.

use futures::future::{join_all, BoxFuture, FutureExt};
use std::future::Future;

/// A batch of futures whose outputs are fed back into `update` by the host.
pub struct Command<T> {
    futures: Vec<BoxFuture<'static, T>>,
}

impl<T: Send + 'static> Command<T> {
    pub fn none() -> Self {
        Self { futures: Vec::new() }
    }

    pub fn perform<F, A>(future: F, map: impl FnOnce(A) -> T + Send + 'static) -> Self
    where
        F: Future<Output = A> + Send + 'static,
    {
        Self {
            futures: vec![future.map(map).boxed()],
        }
    }

    pub fn batch(commands: impl IntoIterator<Item = Command<T>>) -> Self {
        Self {
            futures: commands.into_iter().flat_map(|c| c.futures).collect(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.futures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.futures.is_empty()
    }

    pub fn into_futures(self) -> Vec<BoxFuture<'static, T>> {
        self.futures
    }

    /// Run every future to completion.
    pub async fn run_all(self) -> Vec<T> {
        join_all(self.futures).await
    }
}

impl<T> std::fmt::Debug for Command<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Command({} pending)", self.futures.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_batch_flattens() {
        let cmd = Command::batch(vec![
            Command::perform(async { 1 }, |v| v + 1),
            Command::none(),
            Command::perform(async { 10 }, |v| v * 2),
        ]);
        assert_eq!(cmd.len(), 2);
        assert_eq!(cmd.run_all().await, vec![2, 20]);
    }

    #[test]
    fn test_none_is_empty() {
        let cmd: Command<u8> = Command::none();
        assert!(cmd.is_none());
    }
}
