//! Handler registry: one keyed lookup table for every routing namespace.
//!
//! Four key namespaces share the table:
//!
//! - literal command names, registered without the `/` marker (`"start"`);
//! - verbatim message-text strings, matched exactly (`"hi bob"`);
//! - structured-callback endpoints, keyed by the callback sentinel byte plus
//!   a unique identifier (see [`crate::callback`]);
//! - symbolic category constants (`ON_TEXT`, `ON_PHOTO`, …), one per update
//!   or message subtype, prefixed with a reserved control byte so user text
//!   can never collide with them (inbound text is sanitized of that byte
//!   before any lookup).
//!
//! The registry is populated once at startup through [`RegistryBuilder`] and
//! frozen into an immutable [`Registry`] snapshot the router reads without
//! synchronization. A missing key is a normal outcome, never an error.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::context::Context;
use crate::error::{HandlerError, RegistryError};

/// Reserved control byte prefixing every category constant.
///
/// The same byte is stripped from the front of inbound message text by the
/// classifier, so a message can never spoof a category key through the
/// verbatim-text lookup.
pub const CATEGORY_SENTINEL: char = '\u{0007}';

// ============================================================================
// Category constants
// ============================================================================

/// Any plain text message without a matching exact-text endpoint.
pub const ON_TEXT: &str = "\u{7}text";
/// Any parsed command without its own endpoint.
pub const ON_COMMAND: &str = "\u{7}command";
/// An edited message.
pub const ON_EDITED: &str = "\u{7}edited";
/// A pinned-message service notice (messages and channel posts).
pub const ON_PINNED: &str = "\u{7}pinned";
/// A channel post.
pub const ON_CHANNEL_POST: &str = "\u{7}channel_post";
/// An edited channel post.
pub const ON_EDITED_CHANNEL_POST: &str = "\u{7}edited_channel_post";

/// Any media message whose specific kind has no endpoint.
pub const ON_MEDIA: &str = "\u{7}media";
pub const ON_PHOTO: &str = "\u{7}photo";
pub const ON_VOICE: &str = "\u{7}voice";
pub const ON_AUDIO: &str = "\u{7}audio";
pub const ON_ANIMATION: &str = "\u{7}animation";
pub const ON_DOCUMENT: &str = "\u{7}document";
pub const ON_STICKER: &str = "\u{7}sticker";
pub const ON_VIDEO: &str = "\u{7}video";
pub const ON_VIDEO_NOTE: &str = "\u{7}video_note";

pub const ON_CONTACT: &str = "\u{7}contact";
pub const ON_LOCATION: &str = "\u{7}location";
pub const ON_VENUE: &str = "\u{7}venue";
pub const ON_GAME: &str = "\u{7}game";
pub const ON_DICE: &str = "\u{7}dice";
pub const ON_INVOICE: &str = "\u{7}invoice";
pub const ON_PAYMENT: &str = "\u{7}payment";
pub const ON_REFUND: &str = "\u{7}refund";

pub const ON_TOPIC_CREATED: &str = "\u{7}topic_created";
pub const ON_TOPIC_REOPENED: &str = "\u{7}topic_reopened";
pub const ON_TOPIC_CLOSED: &str = "\u{7}topic_closed";
pub const ON_TOPIC_EDITED: &str = "\u{7}topic_edited";
pub const ON_GENERAL_TOPIC_HIDDEN: &str = "\u{7}general_topic_hidden";
pub const ON_GENERAL_TOPIC_UNHIDDEN: &str = "\u{7}general_topic_unhidden";
pub const ON_WRITE_ACCESS_ALLOWED: &str = "\u{7}write_access_allowed";

/// The bot itself was added to a group or the group was created around it.
pub const ON_ADDED_TO_GROUP: &str = "\u{7}added_to_group";
pub const ON_USER_JOINED: &str = "\u{7}user_joined";
pub const ON_USER_LEFT: &str = "\u{7}user_left";
pub const ON_USER_SHARED: &str = "\u{7}user_shared";
pub const ON_CHAT_SHARED: &str = "\u{7}chat_shared";
pub const ON_NEW_GROUP_TITLE: &str = "\u{7}new_group_title";
pub const ON_NEW_GROUP_PHOTO: &str = "\u{7}new_group_photo";
pub const ON_GROUP_PHOTO_DELETED: &str = "\u{7}group_photo_deleted";
pub const ON_GROUP_CREATED: &str = "\u{7}group_created";
pub const ON_SUPERGROUP_CREATED: &str = "\u{7}supergroup_created";
pub const ON_CHANNEL_CREATED: &str = "\u{7}channel_created";
/// The group migrated to a supergroup. The classifier fills in
/// `migrate_from` before dispatching this category.
pub const ON_MIGRATION: &str = "\u{7}migration";

pub const ON_VIDEO_CHAT_STARTED: &str = "\u{7}video_chat_started";
pub const ON_VIDEO_CHAT_ENDED: &str = "\u{7}video_chat_ended";
pub const ON_VIDEO_CHAT_PARTICIPANTS: &str = "\u{7}video_chat_participants";
pub const ON_VIDEO_CHAT_SCHEDULED: &str = "\u{7}video_chat_scheduled";
pub const ON_WEB_APP: &str = "\u{7}web_app";
pub const ON_PROXIMITY_ALERT: &str = "\u{7}proximity_alert";
pub const ON_AUTO_DELETE_TIMER: &str = "\u{7}auto_delete_timer";

/// Any callback query without a matching structured endpoint.
pub const ON_CALLBACK: &str = "\u{7}callback";
pub const ON_QUERY: &str = "\u{7}query";
pub const ON_INLINE_RESULT: &str = "\u{7}inline_result";
pub const ON_SHIPPING: &str = "\u{7}shipping";
pub const ON_CHECKOUT: &str = "\u{7}checkout";
pub const ON_POLL: &str = "\u{7}poll";
pub const ON_POLL_ANSWER: &str = "\u{7}poll_answer";
pub const ON_MY_CHAT_MEMBER: &str = "\u{7}my_chat_member";
pub const ON_CHAT_MEMBER: &str = "\u{7}chat_member";
pub const ON_CHAT_JOIN_REQUEST: &str = "\u{7}chat_join_request";
pub const ON_BOOST: &str = "\u{7}boost";
pub const ON_BOOST_REMOVED: &str = "\u{7}boost_removed";
pub const ON_BUSINESS_CONNECTION: &str = "\u{7}business_connection";
pub const ON_BUSINESS_MESSAGE: &str = "\u{7}business_message";
pub const ON_EDITED_BUSINESS_MESSAGE: &str = "\u{7}edited_business_message";
pub const ON_DELETED_BUSINESS_MESSAGES: &str = "\u{7}deleted_business_messages";

/// Catch-all: substituted by the router when classification yields nothing.
pub const ON_ANY: &str = "\u{7}any";

// ============================================================================
// Handler types
// ============================================================================

/// What a handler body produces: nothing, or an error for the sink.
pub type HandlerResult = Result<(), HandlerError>;

/// A type-erased, shareable handler.
pub type BoxedHandler = Arc<dyn Fn(Context) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Wraps an async function into a [`BoxedHandler`].
pub fn into_handler<F, Fut>(f: F) -> BoxedHandler
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

// ============================================================================
// Registry
// ============================================================================

/// Startup-time registry builder.
///
/// ```rust,ignore
/// let mut reg = RegistryBuilder::new();
/// reg.handle("start", |ctx: Context| async move {
///     println!("payload: {}", ctx.payload());
///     Ok(())
/// })?;
/// reg.handle(ON_TEXT, log_text)?;
/// let registry = reg.build();
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<String, BoxedHandler>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an async function under a routing key.
    ///
    /// Command endpoints may be given as `/name` or `name`; the leading
    /// marker run is stripped, so both register the same key.
    pub fn handle<F, Fut>(&mut self, key: &str, f: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.insert(key, into_handler(f))
    }

    /// Registers an already-boxed handler under a routing key.
    pub fn insert(
        &mut self,
        key: &str,
        handler: BoxedHandler,
    ) -> Result<&mut Self, RegistryError> {
        let key = normalize_key(key);
        if key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        match self.handlers.entry(key) {
            Entry::Occupied(e) => Err(RegistryError::DuplicateKey {
                key: e.key().clone(),
            }),
            Entry::Vacant(v) => {
                v.insert(handler);
                Ok(self)
            }
        }
    }

    /// Freezes the builder into an immutable registry snapshot.
    pub fn build(self) -> Registry {
        Registry {
            handlers: self.handlers,
        }
    }
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// An immutable routing-key → handler table.
///
/// Read-only after construction; safe to read concurrently without locks.
#[derive(Clone, Default)]
pub struct Registry {
    handlers: HashMap<String, BoxedHandler>,
}

impl Registry {
    /// Looks up a handler by exact key.
    pub fn get(&self, key: &str) -> Option<&BoxedHandler> {
        self.handlers.get(key)
    }

    /// Returns whether a handler is registered under the key.
    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Strips the command marker from keys registered as `/name`.
///
/// Category keys (sentinel-prefixed) and structured-callback keys are kept
/// verbatim, as is anything that does not look like a bare command.
fn normalize_key(key: &str) -> String {
    if key.starts_with(CATEGORY_SENTINEL) || key.starts_with(crate::callback::CALLBACK_SENTINEL) {
        return key.to_string();
    }
    let stripped = key.trim_start_matches('/');
    if stripped.len() != key.len() && !stripped.is_empty() && stripped.chars().all(is_word) {
        return stripped.to_string();
    }
    key.to_string()
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> BoxedHandler {
        into_handler(|_ctx| async { Ok(()) })
    }

    #[test]
    fn slash_and_bare_command_keys_collide() {
        let mut b = RegistryBuilder::new();
        b.insert("/start", noop()).unwrap();
        let err = b.insert("start", noop()).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateKey {
                key: "start".into()
            }
        );
    }

    #[test]
    fn category_and_callback_keys_are_kept_verbatim() {
        let mut b = RegistryBuilder::new();
        b.insert(ON_TEXT, noop()).unwrap();
        b.insert("\u{c}confirm", noop()).unwrap();
        let reg = b.build();
        assert!(reg.contains(ON_TEXT));
        assert!(reg.contains("\u{c}confirm"));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn verbatim_text_keys_are_not_normalized() {
        let mut b = RegistryBuilder::new();
        b.insert("/start the engine", noop()).unwrap();
        let reg = b.build();
        // Contains whitespace, so it is a text key, not a command.
        assert!(reg.contains("/start the engine"));
        assert!(!reg.contains("start the engine"));
    }

    #[test]
    fn empty_keys_are_rejected() {
        let mut b = RegistryBuilder::new();
        assert_eq!(b.insert("", noop()).unwrap_err(), RegistryError::EmptyKey);
        // All-marker keys are text keys, not commands; kept verbatim.
        b.insert("///", noop()).unwrap();
        assert!(b.build().contains("///"));
    }

    #[test]
    fn missing_key_is_none_not_an_error() {
        let reg = RegistryBuilder::new().build();
        assert!(reg.get("start").is_none());
        assert!(reg.is_empty());
    }
}
