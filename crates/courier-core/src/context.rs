//! The per-dispatch execution context.
//!
//! A [`Context`] wraps exactly one routed [`Update`] together with the bot
//! identity and hands it to the selected handler. It is created fresh for
//! every dispatch, owned by that handler invocation, and discarded when the
//! handler returns; nothing is shared between dispatches through it.
//!
//! Cloning is cheap (the update lives behind an `Arc`), which is what lets
//! the dispatcher hand the same context to both the handler and the error
//! sink without re-building it.

use std::sync::Arc;

use crate::message::Message;
use crate::types::{BotIdentity, Chat, User};
use crate::update::{Callback, Update};

#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    update: Update,
    me: BotIdentity,
}

impl Context {
    pub(crate) fn new(update: Update, me: BotIdentity) -> Self {
        Self {
            inner: Arc::new(ContextInner { update, me }),
        }
    }

    /// The update being processed.
    pub fn update(&self) -> &Update {
        &self.inner.update
    }

    /// The identity of the bot this update was routed for.
    pub fn me(&self) -> &BotIdentity {
        &self.inner.me
    }

    /// The message this update revolves around, if any.
    pub fn message(&self) -> Option<&Message> {
        self.inner.update.message()
    }

    /// The callback query, for callback updates.
    pub fn callback(&self) -> Option<&Callback> {
        self.inner.update.callback()
    }

    /// Message text; empty for non-text updates.
    pub fn text(&self) -> &str {
        self.message().map(|m| m.text.as_str()).unwrap_or("")
    }

    /// The parsed command name, when the update was routed as a command.
    pub fn command(&self) -> Option<&str> {
        self.message().and_then(|m| m.command.as_deref())
    }

    /// The free-text payload after the command; empty otherwise.
    pub fn payload(&self) -> &str {
        self.message().map(|m| m.payload.as_str()).unwrap_or("")
    }

    /// The unique id of a structured callback; empty otherwise.
    pub fn callback_unique(&self) -> &str {
        self.callback().map(|cb| cb.unique.as_str()).unwrap_or("")
    }

    /// Callback data. For structured callbacks this is the bare payload,
    /// with the envelope already stripped by the classifier.
    pub fn callback_data(&self) -> &str {
        self.callback().map(|cb| cb.data.as_str()).unwrap_or("")
    }

    /// The chat the update happened in, if it has one.
    pub fn chat(&self) -> Option<&Chat> {
        self.inner.update.chat()
    }

    /// The user the update originates from, if identifiable.
    pub fn sender(&self) -> Option<&User> {
        self.inner.update.sender()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("update_id", &self.inner.update.id)
            .field("kind", &self.inner.update.kind.name())
            .finish()
    }
}
