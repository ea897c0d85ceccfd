//! The dispatcher: turns a classified update into a handler invocation.
//!
//! [`Router`] owns everything routing needs — the frozen [`Registry`]
//! snapshot, the bot identity, a dispatch policy and the process-wide error
//! sink — and is handed each decoded [`Update`] by the transport. It
//! guarantees a handler always runs: classification misses fall back to the
//! [`ON_ANY`] handler and then to a built-in no-op.
//!
//! # Dispatch policies
//!
//! - [`DispatchPolicy::Synchronous`] — the handler runs inline;
//!   [`Router::route`] does not return until it completes and any error has
//!   reached the sink. Updates are processed one at a time, in delivery
//!   order, on the caller's task.
//! - [`DispatchPolicy::Concurrent`] (default) — one task is spawned per
//!   update and `route` returns as soon as it is scheduled. Handlers may
//!   complete in any order; the core imposes no sequencing. An optional
//!   `max_in_flight` bound caps concurrent handler executions with a
//!   semaphore acquired *inside* the spawned task, so the routing path never
//!   blocks and the fire-and-forget contract is preserved.
//!
//! Handler errors never propagate to the transport; once `route` is invoked
//! the update counts as accepted. Errors go to the error sink, which must be
//! safe for concurrent invocation.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug_span, error, trace};

use crate::context::Context;
use crate::error::HandlerError;
use crate::registry::{BoxedHandler, ON_ANY, Registry, into_handler};
use crate::types::BotIdentity;
use crate::update::Update;

/// How handler invocations are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPolicy {
    /// Invoke inline; `route` returns after the handler completes.
    Synchronous,
    /// Spawn one task per update; `route` returns after scheduling.
    Concurrent {
        /// Optional cap on concurrently running handlers. `None` = unbounded.
        max_in_flight: Option<usize>,
    },
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self::Concurrent { max_in_flight: None }
    }
}

/// The process-wide error sink, invoked with every handler error.
pub type ErrorSink = Arc<dyn Fn(&HandlerError, &Context) + Send + Sync>;

/// The update router.
///
/// Immutable after construction; share it behind an `Arc` between transport
/// tasks. The registry is read concurrently without synchronization.
pub struct Router {
    pub(crate) registry: Registry,
    pub(crate) me: BotIdentity,
    policy: DispatchPolicy,
    on_error: ErrorSink,
    limiter: Option<Arc<Semaphore>>,
    tasks: TaskTracker,
}

impl Router {
    /// Starts building a router for the given bot identity.
    pub fn builder(me: BotIdentity) -> RouterBuilder {
        RouterBuilder {
            registry: Registry::default(),
            me,
            policy: DispatchPolicy::default(),
            on_error: None,
        }
    }

    /// Routes one update: classify, substitute fallbacks, dispatch.
    ///
    /// Never fails; a routed update is an accepted update. Under the
    /// concurrent policy this returns as soon as the handler task is
    /// scheduled.
    pub async fn route(&self, mut update: Update) {
        let handler = self
            .select(&mut update)
            .or_else(|| self.registry.get(ON_ANY).cloned())
            .unwrap_or_else(fallback_handler);

        let span = debug_span!("dispatch", update_id = update.id, kind = update.kind.name());
        let ctx = Context::new(update, self.me.clone());

        match self.policy {
            DispatchPolicy::Synchronous => {
                run(handler, ctx, Arc::clone(&self.on_error))
                    .instrument(span)
                    .await;
            }
            DispatchPolicy::Concurrent { .. } => {
                let sink = Arc::clone(&self.on_error);
                let limiter = self.limiter.clone();
                self.tasks.spawn(
                    async move {
                        let _permit = match limiter {
                            Some(sem) => sem.acquire_owned().await.ok(),
                            None => None,
                        };
                        run(handler, ctx, sink).await;
                    }
                    .instrument(span),
                );
            }
        }
    }

    /// Number of handler tasks currently in flight.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Stops accepting new concurrent dispatches and waits for the in-flight
    /// ones to finish.
    pub async fn shutdown(&self) {
        self.tasks.close();
        self.tasks.wait().await;
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("me", &self.me.username)
            .field("handlers", &self.registry.len())
            .field("policy", &self.policy)
            .finish()
    }
}

async fn run(handler: BoxedHandler, ctx: Context, sink: ErrorSink) {
    if let Err(err) = handler(ctx.clone()).await {
        sink(&err, &ctx);
    }
}

/// The terminal fallback: accepts the update and does nothing.
fn fallback_handler() -> BoxedHandler {
    into_handler(|ctx: Context| async move {
        trace!(update_id = ctx.update().id, "no handler registered, update dropped");
        Ok(())
    })
}

// ============================================================================
// Builder
// ============================================================================

/// Builder assembling a [`Router`] from its frozen collaborators.
pub struct RouterBuilder {
    registry: Registry,
    me: BotIdentity,
    policy: DispatchPolicy,
    on_error: Option<ErrorSink>,
}

impl RouterBuilder {
    /// Sets the handler registry snapshot.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the dispatch policy.
    pub fn policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the process-wide error sink.
    ///
    /// The sink is called from whichever task the handler ran on; it must
    /// not block.
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&HandlerError, &Context) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Builds the router. The default error sink logs at error level.
    pub fn build(self) -> Router {
        let limiter = match self.policy {
            DispatchPolicy::Concurrent {
                max_in_flight: Some(n),
            } => Some(Arc::new(Semaphore::new(n))),
            _ => None,
        };
        Router {
            registry: self.registry,
            me: self.me,
            policy: self.policy,
            on_error: self.on_error.unwrap_or_else(default_sink),
            limiter,
            tasks: TaskTracker::new(),
        }
    }
}

fn default_sink() -> ErrorSink {
    Arc::new(|err, ctx| {
        error!(update_id = ctx.update().id, error = %err, "handler failed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::message::Message;
    use crate::registry::{ON_TEXT, RegistryBuilder};
    use crate::update::UpdateKind;

    fn me() -> BotIdentity {
        BotIdentity::new(99, "courier_bot")
    }

    fn text_update(id: i64, text: &str) -> Update {
        Update::new(id, UpdateKind::Message(Message::from_text(text)))
    }

    #[tokio::test]
    async fn synchronous_errors_reach_the_sink_before_route_returns() {
        let mut reg = RegistryBuilder::new();
        reg.handle(ON_TEXT, |_ctx| async {
            Err(HandlerError::Other("boom".into()))
        })
        .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let router = Router::builder(me())
            .registry(reg.build())
            .policy(DispatchPolicy::Synchronous)
            .on_error(move |err, ctx| {
                seen_clone
                    .lock()
                    .unwrap()
                    .push((ctx.update().id, err.to_string()));
            })
            .build();

        router.route(text_update(1, "hi")).await;
        assert_eq!(seen.lock().unwrap().as_slice(), &[(1, "boom".to_string())]);
    }

    #[tokio::test]
    async fn concurrent_errors_each_reach_the_sink_exactly_once() {
        let mut reg = RegistryBuilder::new();
        reg.handle(ON_TEXT, |_ctx| async {
            Err(HandlerError::Other("nope".into()))
        })
        .unwrap();

        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let router = Router::builder(me())
            .registry(reg.build())
            .on_error(move |_err, _ctx| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .build();

        for i in 0..32 {
            router.route(text_update(i, "hi")).await;
        }
        router.shutdown().await;
        assert_eq!(count.load(Ordering::SeqCst), 32);
    }

    #[tokio::test]
    async fn unmatched_updates_fall_back_to_on_any() {
        let hit = Arc::new(AtomicUsize::new(0));
        let hit_clone = Arc::clone(&hit);
        let mut reg = RegistryBuilder::new();
        reg.handle(ON_ANY, move |_ctx| {
            let hit = Arc::clone(&hit_clone);
            async move {
                hit.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .unwrap();

        let router = Router::builder(me())
            .registry(reg.build())
            .policy(DispatchPolicy::Synchronous)
            .build();

        router
            .route(Update::new(1, UpdateKind::Poll(Default::default())))
            .await;
        assert_eq!(hit.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_registry_still_accepts_every_update() {
        let router = Router::builder(me())
            .registry(RegistryBuilder::new().build())
            .policy(DispatchPolicy::Synchronous)
            .build();

        router.route(text_update(1, "hello")).await;
        router.route(Update::new(2, UpdateKind::None)).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn max_in_flight_bounds_concurrent_handlers() {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (current_c, peak_c) = (Arc::clone(&current), Arc::clone(&peak));

        let mut reg = RegistryBuilder::new();
        reg.handle(ON_TEXT, move |_ctx| {
            let current = Arc::clone(&current_c);
            let peak = Arc::clone(&peak_c);
            async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                current.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .unwrap();

        let router = Router::builder(me())
            .registry(reg.build())
            .policy(DispatchPolicy::Concurrent {
                max_in_flight: Some(2),
            })
            .build();

        for i in 0..8 {
            router.route(text_update(i, "hi")).await;
        }
        router.shutdown().await;
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn handler_context_is_also_given_to_the_sink() {
        let mut reg = RegistryBuilder::new();
        reg.handle("fail", |_ctx| async {
            Err(HandlerError::Api("offline".into()))
        })
        .unwrap();

        let seen_text = Arc::new(Mutex::new(String::new()));
        let seen_clone = Arc::clone(&seen_text);
        let router = Router::builder(me())
            .registry(reg.build())
            .policy(DispatchPolicy::Synchronous)
            .on_error(move |_err, ctx| {
                *seen_clone.lock().unwrap() = ctx.text().to_string();
            })
            .build();

        router.route(text_update(3, "/fail now")).await;
        assert_eq!(seen_text.lock().unwrap().as_str(), "/fail now");
    }
}
