//! Optimistic local mutations.
//!
//! The board applies a change to its local state before the backend has
//! confirmed it. If the request fails, the state is restored to the
//! snapshot taken before the change. The restore is local only: whatever
//! the backend did before rejecting the request is not undone.

use std::future::Future;

/// Applies `change` to `state`, then awaits `request`.
///
/// On success the changed state is kept and the response returned. On
/// failure `state` is reset to its value before `change` and the error is
/// returned.
///
/// `request` is not polled until after `change` has run.
pub async fn apply_optimistic<S, T, E, Fut>(
    state: &mut S,
    change: impl FnOnce(&mut S),
    request: Fut,
) -> Result<T, E>
where
    S: Clone,
    Fut: Future<Output = Result<T, E>>,
{
    let snapshot = state.clone();
    change(state);
    match request.await {
        Ok(response) => Ok(response),
        Err(e) => {
            tracing::debug!("optimistic update rejected, restoring snapshot");
            *state = snapshot;
            Err(e)
        }
    }
}
