use crate::{
    error::Rejection,
    promise::{Outcome, PromiseImpl, Settler},
};
use futures::{
    channel::oneshot,
    future::{FutureExt, LocalBoxFuture},
};

/// Deferred results backed by [`futures::channel::oneshot`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OneshotPromise;

impl PromiseImpl for OneshotPromise {
    fn name(&self) -> &str {
        "oneshot"
    }

    fn channel(&self) -> (Settler, LocalBoxFuture<'static, Outcome>) {
        let (sender, receiver) = oneshot::channel::<Outcome>();
        let settler: Settler = Box::new(move |outcome| {
            // The receiver is gone only if the deferred result was dropped.
            let _ = sender.send(outcome);
        });
        let future = receiver
            .map(|received| received.unwrap_or(Err(Rejection::Cancelled)))
            .boxed_local();
        (settler, future)
    }
}
