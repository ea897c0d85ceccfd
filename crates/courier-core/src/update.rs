//! The incoming update model.
//!
//! On the wire an update is an object with an `update_id` and *at most one*
//! populated event sub-object. That union-by-field-presence shape is decoded
//! into a tagged [`UpdateKind`], so the classifier is a match over the tag
//! instead of a walk over two dozen `Option`s. When a malformed producer
//! populates more than one sub-object, decoding keeps the first one in the
//! classifier's precedence order and ignores the rest — the same outcome the
//! field-walk would produce.

use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::types::{Chat, User};

// ============================================================================
// Update payloads other than Message
// ============================================================================

/// An incoming callback query from an inline keyboard button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Callback {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "from", default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
    /// The message the originating button is attached to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Box<Message>>,
    #[serde(
        rename = "inline_message_id",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub message_id: String,
    /// Raw callback payload. For structured callbacks the classifier rewrites
    /// this to the bare payload, with the envelope stripped.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
    /// Unique endpoint identifier parsed out of a structured callback.
    /// Set only by the classifier, never received from the wire.
    #[serde(skip)]
    pub unique: String,
}

/// An incoming inline query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "from", default)]
    pub sender: User,
    #[serde(rename = "query", default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub offset: String,
}

/// An inline query result that was chosen by a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineResult {
    #[serde(rename = "result_id", default)]
    pub result_id: String,
    #[serde(rename = "from", default)]
    pub sender: User,
    #[serde(rename = "query", default)]
    pub query: String,
}

/// An incoming shipping query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingQuery {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "from", default)]
    pub sender: User,
    #[serde(default)]
    pub invoice_payload: String,
}

/// An incoming pre-checkout query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreCheckoutQuery {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "from", default)]
    pub sender: User,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub total_amount: i64,
    #[serde(default)]
    pub invoice_payload: String,
}

/// One answer option of a poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    #[serde(default)]
    pub voter_count: i32,
}

/// A poll state change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<PollOption>,
    #[serde(default)]
    pub is_closed: bool,
}

/// A user changed their answer in a non-anonymous poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollAnswer {
    #[serde(default)]
    pub poll_id: String,
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,
    #[serde(rename = "option_ids", default)]
    pub options: Vec<i32>,
}

/// A member's status in a chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMember {
    pub user: User,
    #[serde(rename = "status", default)]
    pub role: String,
}

/// A chat member's status was updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMemberUpdate {
    #[serde(default)]
    pub chat: Chat,
    #[serde(rename = "from", default)]
    pub sender: User,
    #[serde(default)]
    pub date: i64,
    #[serde(rename = "old_chat_member", default)]
    pub old: ChatMember,
    #[serde(rename = "new_chat_member", default)]
    pub new: ChatMember,
}

/// A user requested to join a chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatJoinRequest {
    #[serde(default)]
    pub chat: Chat,
    #[serde(rename = "from", default)]
    pub sender: User,
    #[serde(default)]
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// A chat boost was added or changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoostUpdated {
    #[serde(default)]
    pub chat: Chat,
    #[serde(rename = "boost_id", default)]
    pub boost_id: String,
}

/// A chat boost was removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoostRemoved {
    #[serde(default)]
    pub chat: Chat,
    #[serde(rename = "boost_id", default)]
    pub boost_id: String,
}

/// The bot was connected to or disconnected from a business account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessConnection {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "user", default)]
    pub sender: User,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub is_enabled: bool,
}

/// Messages were deleted from a connected business account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessMessagesDeleted {
    #[serde(rename = "business_connection_id", default)]
    pub connection_id: String,
    #[serde(default)]
    pub chat: Chat,
    #[serde(default)]
    pub message_ids: Vec<i64>,
}

// ============================================================================
// Update
// ============================================================================

/// One event delivered by the messaging platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireUpdate", into = "WireUpdate")]
pub struct Update {
    pub id: i64,
    pub kind: UpdateKind,
}

/// The event kind an [`Update`] carries, one variant per wire sub-object.
///
/// Variant order is the classifier's top-level precedence order.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateKind {
    Message(Message),
    EditedMessage(Message),
    ChannelPost(Message),
    EditedChannelPost(Message),
    Callback(Callback),
    InlineQuery(Query),
    InlineResult(InlineResult),
    ShippingQuery(ShippingQuery),
    PreCheckoutQuery(PreCheckoutQuery),
    Poll(Poll),
    PollAnswer(PollAnswer),
    MyChatMember(ChatMemberUpdate),
    ChatMember(ChatMemberUpdate),
    ChatJoinRequest(ChatJoinRequest),
    Boost(BoostUpdated),
    BoostRemoved(BoostRemoved),
    BusinessConnection(BusinessConnection),
    BusinessMessage(Message),
    EditedBusinessMessage(Message),
    DeletedBusinessMessages(BusinessMessagesDeleted),
    /// No sub-object was populated.
    None,
}

impl UpdateKind {
    /// A short name of the event kind, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::EditedMessage(_) => "edited_message",
            Self::ChannelPost(_) => "channel_post",
            Self::EditedChannelPost(_) => "edited_channel_post",
            Self::Callback(_) => "callback_query",
            Self::InlineQuery(_) => "inline_query",
            Self::InlineResult(_) => "chosen_inline_result",
            Self::ShippingQuery(_) => "shipping_query",
            Self::PreCheckoutQuery(_) => "pre_checkout_query",
            Self::Poll(_) => "poll",
            Self::PollAnswer(_) => "poll_answer",
            Self::MyChatMember(_) => "my_chat_member",
            Self::ChatMember(_) => "chat_member",
            Self::ChatJoinRequest(_) => "chat_join_request",
            Self::Boost(_) => "chat_boost",
            Self::BoostRemoved(_) => "removed_chat_boost",
            Self::BusinessConnection(_) => "business_connection",
            Self::BusinessMessage(_) => "business_message",
            Self::EditedBusinessMessage(_) => "edited_business_message",
            Self::DeletedBusinessMessages(_) => "deleted_business_messages",
            Self::None => "none",
        }
    }
}

impl Update {
    /// Creates an update carrying the given event kind.
    pub fn new(id: i64, kind: UpdateKind) -> Self {
        Self { id, kind }
    }

    /// The message this update revolves around, if any.
    ///
    /// Covers the four message-bearing variants, business messages, and the
    /// message a callback button is attached to.
    pub fn message(&self) -> Option<&Message> {
        match &self.kind {
            UpdateKind::Message(m)
            | UpdateKind::EditedMessage(m)
            | UpdateKind::ChannelPost(m)
            | UpdateKind::EditedChannelPost(m)
            | UpdateKind::BusinessMessage(m)
            | UpdateKind::EditedBusinessMessage(m) => Some(m),
            UpdateKind::Callback(cb) => cb.message.as_deref(),
            _ => None,
        }
    }

    /// The callback query, for callback updates.
    pub fn callback(&self) -> Option<&Callback> {
        match &self.kind {
            UpdateKind::Callback(cb) => Some(cb),
            _ => None,
        }
    }

    /// The chat the update happened in, if it has one.
    pub fn chat(&self) -> Option<&Chat> {
        match &self.kind {
            UpdateKind::MyChatMember(u) | UpdateKind::ChatMember(u) => Some(&u.chat),
            UpdateKind::ChatJoinRequest(r) => Some(&r.chat),
            UpdateKind::Boost(b) => Some(&b.chat),
            UpdateKind::BoostRemoved(b) => Some(&b.chat),
            UpdateKind::DeletedBusinessMessages(d) => Some(&d.chat),
            _ => self.message().map(|m| &m.chat),
        }
    }

    /// The user the update originates from, if identifiable.
    pub fn sender(&self) -> Option<&User> {
        match &self.kind {
            UpdateKind::Callback(cb) => cb.sender.as_ref(),
            UpdateKind::InlineQuery(q) => Some(&q.sender),
            UpdateKind::InlineResult(r) => Some(&r.sender),
            UpdateKind::ShippingQuery(q) => Some(&q.sender),
            UpdateKind::PreCheckoutQuery(q) => Some(&q.sender),
            UpdateKind::PollAnswer(a) => a.sender.as_ref(),
            UpdateKind::MyChatMember(u) | UpdateKind::ChatMember(u) => Some(&u.sender),
            UpdateKind::ChatJoinRequest(r) => Some(&r.sender),
            UpdateKind::BusinessConnection(c) => Some(&c.sender),
            _ => self.message().and_then(|m| m.sender.as_ref()),
        }
    }
}

// ============================================================================
// Wire shape
// ============================================================================

/// The raw union-by-presence shape updates arrive in.
///
/// Field order matters: conversion into [`Update`] takes the first populated
/// field, so this struct is the single place the top-level precedence is
/// written down.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireUpdate {
    #[serde(rename = "update_id", default)]
    id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edited_message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    channel_post: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edited_channel_post: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    callback_query: Option<Callback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_query: Option<Query>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chosen_inline_result: Option<InlineResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shipping_query: Option<ShippingQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pre_checkout_query: Option<PreCheckoutQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    poll: Option<Poll>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    poll_answer: Option<PollAnswer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    my_chat_member: Option<ChatMemberUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chat_member: Option<ChatMemberUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chat_join_request: Option<ChatJoinRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chat_boost: Option<BoostUpdated>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    removed_chat_boost: Option<BoostRemoved>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    business_connection: Option<BusinessConnection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    business_message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    edited_business_message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deleted_business_messages: Option<BusinessMessagesDeleted>,
}

impl From<WireUpdate> for Update {
    fn from(w: WireUpdate) -> Self {
        let kind = if let Some(m) = w.message {
            UpdateKind::Message(m)
        } else if let Some(m) = w.edited_message {
            UpdateKind::EditedMessage(m)
        } else if let Some(m) = w.channel_post {
            UpdateKind::ChannelPost(m)
        } else if let Some(m) = w.edited_channel_post {
            UpdateKind::EditedChannelPost(m)
        } else if let Some(cb) = w.callback_query {
            UpdateKind::Callback(cb)
        } else if let Some(q) = w.inline_query {
            UpdateKind::InlineQuery(q)
        } else if let Some(r) = w.chosen_inline_result {
            UpdateKind::InlineResult(r)
        } else if let Some(q) = w.shipping_query {
            UpdateKind::ShippingQuery(q)
        } else if let Some(q) = w.pre_checkout_query {
            UpdateKind::PreCheckoutQuery(q)
        } else if let Some(p) = w.poll {
            UpdateKind::Poll(p)
        } else if let Some(a) = w.poll_answer {
            UpdateKind::PollAnswer(a)
        } else if let Some(u) = w.my_chat_member {
            UpdateKind::MyChatMember(u)
        } else if let Some(u) = w.chat_member {
            UpdateKind::ChatMember(u)
        } else if let Some(r) = w.chat_join_request {
            UpdateKind::ChatJoinRequest(r)
        } else if let Some(b) = w.chat_boost {
            UpdateKind::Boost(b)
        } else if let Some(b) = w.removed_chat_boost {
            UpdateKind::BoostRemoved(b)
        } else if let Some(c) = w.business_connection {
            UpdateKind::BusinessConnection(c)
        } else if let Some(m) = w.business_message {
            UpdateKind::BusinessMessage(m)
        } else if let Some(m) = w.edited_business_message {
            UpdateKind::EditedBusinessMessage(m)
        } else if let Some(d) = w.deleted_business_messages {
            UpdateKind::DeletedBusinessMessages(d)
        } else {
            UpdateKind::None
        };
        Self { id: w.id, kind }
    }
}

impl From<Update> for WireUpdate {
    fn from(u: Update) -> Self {
        let mut w = WireUpdate {
            id: u.id,
            ..WireUpdate::default()
        };
        match u.kind {
            UpdateKind::Message(m) => w.message = Some(m),
            UpdateKind::EditedMessage(m) => w.edited_message = Some(m),
            UpdateKind::ChannelPost(m) => w.channel_post = Some(m),
            UpdateKind::EditedChannelPost(m) => w.edited_channel_post = Some(m),
            UpdateKind::Callback(cb) => w.callback_query = Some(cb),
            UpdateKind::InlineQuery(q) => w.inline_query = Some(q),
            UpdateKind::InlineResult(r) => w.chosen_inline_result = Some(r),
            UpdateKind::ShippingQuery(q) => w.shipping_query = Some(q),
            UpdateKind::PreCheckoutQuery(q) => w.pre_checkout_query = Some(q),
            UpdateKind::Poll(p) => w.poll = Some(p),
            UpdateKind::PollAnswer(a) => w.poll_answer = Some(a),
            UpdateKind::MyChatMember(u) => w.my_chat_member = Some(u),
            UpdateKind::ChatMember(u) => w.chat_member = Some(u),
            UpdateKind::ChatJoinRequest(r) => w.chat_join_request = Some(r),
            UpdateKind::Boost(b) => w.chat_boost = Some(b),
            UpdateKind::BoostRemoved(b) => w.removed_chat_boost = Some(b),
            UpdateKind::BusinessConnection(c) => w.business_connection = Some(c),
            UpdateKind::BusinessMessage(m) => w.business_message = Some(m),
            UpdateKind::EditedBusinessMessage(m) => w.edited_business_message = Some(m),
            UpdateKind::DeletedBusinessMessages(d) => w.deleted_business_messages = Some(d),
            UpdateKind::None => {}
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_the_populated_sub_object() {
        let u: Update = serde_json::from_str(
            r#"{"update_id":3,"poll":{"id":"p1","question":"?","options":[]}}"#,
        )
        .unwrap();
        assert_eq!(u.id, 3);
        assert!(matches!(u.kind, UpdateKind::Poll(_)));
    }

    #[test]
    fn empty_update_decodes_to_none() {
        let u: Update = serde_json::from_str(r#"{"update_id":4}"#).unwrap();
        assert!(matches!(u.kind, UpdateKind::None));
    }

    #[test]
    fn multiple_populated_fields_keep_the_first_in_precedence_order() {
        // A malformed producer sending both an edited message and a poll:
        // edited_message is checked earlier, so the poll is ignored.
        let u: Update = serde_json::from_str(
            r#"{
                "update_id": 5,
                "poll": {"id": "p", "question": "q", "options": []},
                "edited_message": {"message_id": 1, "chat": {"id": 2, "type": "private"}, "text": "x"}
            }"#,
        )
        .unwrap();
        assert!(matches!(u.kind, UpdateKind::EditedMessage(_)));
    }

    #[test]
    fn serializes_back_to_the_wire_shape() {
        let u = Update::new(9, UpdateKind::Message(Message::from_text("hi")));
        let json = serde_json::to_string(&u).unwrap();
        assert!(json.contains(r#""update_id":9"#));
        assert!(json.contains(r#""message""#));
        let back: Update = serde_json::from_str(&json).unwrap();
        assert_eq!(back, u);
    }

    #[test]
    fn callback_unique_is_not_wire_visible() {
        let mut cb = Callback {
            id: "1".into(),
            data: "42".into(),
            ..Callback::default()
        };
        cb.unique = "abc".into();
        let u = Update::new(1, UpdateKind::Callback(cb));
        let json = serde_json::to_string(&u).unwrap();
        assert!(!json.contains("abc"));
        let back: Update = serde_json::from_str(&json).unwrap();
        assert_eq!(back.callback().unwrap().unique, "");
    }
}
