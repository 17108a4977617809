//! Simple stateless pub-sub event handler
//!
//! This module provides a simple hook system that allow components of the system subscribe to shop events and react
//! to them. The event handler is stateless, i.e. the handlers have no access to the internal state of the system. All
//! that is received is the event itself.
//!
//! Events are queued on a bounded channel. When the queue is full, publishers wait. Each event is handled on its own
//! task. When the last producer is dropped, the handler waits for the in-flight tasks to finish and then exits.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{sync::mpsc, task::JoinSet};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// What an event handler got through before it shut down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerSummary {
    pub handled: usize,
    pub panicked: usize,
}

impl HandlerSummary {
    fn record<T>(&mut self, result: Result<T, tokio::task::JoinError>) {
        match result {
            Ok(_) => self.handled += 1,
            Err(e) => {
                error!("📬️ An event job did not complete. {e}");
                self.panicked += 1;
            },
        }
    }
}

pub struct EventHandler<E: Send + Sync + 'static> {
    listener: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        Self { listener: receiver, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    pub async fn start_handler(mut self) -> HandlerSummary {
        debug!("📬️ Starting event handler");
        // drop the internal sender so that when the last subscriber is dropped, we can automatically shut down the
        // handler
        drop(self.sender);
        let mut jobs = JoinSet::new();
        let mut summary = HandlerSummary::default();
        loop {
            tokio::select! {
                ev = self.listener.recv() => match ev {
                    Some(ev) => {
                        trace!("📬️ Handling event");
                        let handler = Arc::clone(&self.handler);
                        jobs.spawn(async move { (handler)(ev).await });
                    },
                    None => break,
                },
                Some(done) = jobs.join_next(), if !jobs.is_empty() => summary.record(done),
            }
        }
        if !jobs.is_empty() {
            debug!("📬️ Waiting for {} jobs to complete", jobs.len());
        }
        while let Some(done) = jobs.join_next().await {
            summary.record(done);
        }
        debug!("📬️ Event handler has shut down after handling {} events", summary.handled);
        summary
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Failed to send event: {e}");
        }
    }
}
