// SPDX-License-Identifier: GPL-3.0-only

//! Asynchronous work returned by message handlers
//!
//! Handlers never await. They return a [`Task`]: a set of streams whose items
//! are messages fed back into `update()` on the session thread.

use futures::future::{AbortHandle, Abortable};
use futures::stream::{self, BoxStream};
use futures::{Future, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

#[must_use = "a Task does nothing unless spawned"]
pub struct Task<M> {
    streams: Vec<BoxStream<'static, M>>,
}

impl<M: Send + 'static> Task<M> {
    pub fn none() -> Self {
        Self {
            streams: Vec::new(),
        }
    }

    /// Deliver a message right away
    pub fn done(message: M) -> Self {
        Self::from_stream(stream::once(futures::future::ready(message)))
    }

    /// Run `future` and map its output into a message
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> M + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::from_stream(stream::once(async move { map(future.await) }))
    }

    /// Deliver `message` after `delay`
    pub fn delay(delay: Duration, message: M) -> Self {
        Self::perform(tokio::time::sleep(delay), move |()| message)
    }

    pub fn batch(tasks: impl IntoIterator<Item = Self>) -> Self {
        Self {
            streams: tasks.into_iter().flat_map(|task| task.streams).collect(),
        }
    }

    fn from_stream(stream: impl futures::Stream<Item = M> + Send + 'static) -> Self {
        Self {
            streams: vec![stream.boxed()],
        }
    }

    /// Make the task cancellable; messages are dropped once aborted
    pub fn abortable(self) -> (Self, AbortHandle) {
        let (handle, registration) = AbortHandle::new_pair();
        let merged = stream::select_all(self.streams);
        (
            Self::from_stream(Abortable::new(merged, registration)),
            handle,
        )
    }

    pub fn is_none(&self) -> bool {
        self.streams.is_empty()
    }

    /// Run on the current tokio runtime, forwarding messages into `sender`
    pub fn spawn(self, sender: &UnboundedSender<M>) {
        for mut stream in self.streams {
            let sender = sender.clone();
            tokio::spawn(async move {
                while let Some(message) = stream.next().await {
                    if sender.send(message).is_err() {
                        break;
                    }
                }
            });
        }
    }

    /// Drive every stream to completion and gather the messages
    pub async fn collect(self) -> Vec<M> {
        stream::select_all(self.streams).collect().await
    }
}

impl<M: Send + 'static> Default for Task<M> {
    fn default() -> Self {
        Self::none()
    }
}

impl<M> std::fmt::Debug for Task<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("streams", &self.streams.len())
            .finish()
    }
}
