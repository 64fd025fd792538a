use crate::{
    error::Rejection,
    promise::{Outcome, PromiseImpl, Settler},
};
use futures::future::{FutureExt, LocalBoxFuture};
use std::{cell::Cell, future::Future, pin::Pin, rc::Rc, task};

/// The built-in deferred result implementation: a single-threaded oneshot
/// channel holding the outcome and the waker of the awaiting task.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPromise;

impl PromiseImpl for LocalPromise {
    fn name(&self) -> &str {
        "local"
    }

    fn channel(&self) -> (Settler, LocalBoxFuture<'static, Outcome>) {
        let (notifier, listener) = channel();
        let settler: Settler =
            Box::new(move |outcome| notifier.settle(outcome));
        (settler, listener.boxed_local())
    }
}

fn channel() -> (Notifier, Listener) {
    let channel = Rc::new(Channel::init_connected());
    (Notifier { channel: channel.clone() }, Listener { channel })
}

struct Channel {
    connected: Cell<bool>,
    waker: Cell<Option<task::Waker>>,
    data: Cell<Option<Outcome>>,
}

impl Channel {
    fn init_connected() -> Self {
        Self {
            connected: Cell::new(true),
            waker: Cell::new(None),
            data: Cell::new(None),
        }
    }

    fn notify(&self) {
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

struct Notifier {
    channel: Rc<Channel>,
}

impl Notifier {
    fn settle(self, outcome: Outcome) {
        self.channel.data.set(Some(outcome));
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.channel.connected.set(false);
        self.channel.notify();
    }
}

struct Listener {
    channel: Rc<Channel>,
}

impl Future for Listener {
    type Output = Outcome;

    fn poll(
        self: Pin<&mut Self>,
        ctx: &mut task::Context<'_>,
    ) -> task::Poll<Self::Output> {
        match self.channel.data.take() {
            Some(outcome) => task::Poll::Ready(outcome),
            None if self.channel.connected.get() => {
                self.channel.waker.set(Some(ctx.waker().clone()));
                task::Poll::Pending
            },
            None => task::Poll::Ready(Err(Rejection::Cancelled)),
        }
    }
}
