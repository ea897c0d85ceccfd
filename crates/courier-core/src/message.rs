//! The message object — the richest payload an update can carry.
//!
//! A [`Message`] is a union-by-field-presence over roughly forty subtype
//! markers: exactly which optional fields are populated determines what kind
//! of message it is. The routing precedence over those markers lives in the
//! classifier ([`crate::dispatch::Router::select`]); this module is the data
//! shape plus the derived command fields the classifier fills in.

use serde::{Deserialize, Serialize};

use crate::types::{
    Animation, Audio, AutoDeleteTimer, Chat, ChatShared, Contact, Dice, Document, Game,
    GeneralTopicHidden, GeneralTopicUnhidden, Invoice, Location, Payment, Photo, ProximityAlert,
    RefundedPayment, Sticker, TopicClosed, TopicCreated, TopicEdited, TopicReopened, User,
    UsersShared, Venue, Video, VideoChatEnded, VideoChatParticipants, VideoChatScheduled,
    VideoChatStarted, VideoNote, Voice, WebAppData, WriteAccessAllowed,
};

/// A message in a chat, channel or business connection.
///
/// Wire names follow the Telegram Bot API. Scalar markers use their zero
/// value for "absent" (`text == ""`, `migrate_to == 0`), mirroring the
/// `omitempty` semantics of the source protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "message_id", default)]
    pub id: i64,
    #[serde(default)]
    pub date: i64,
    #[serde(default)]
    pub chat: Chat,
    #[serde(rename = "from", default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<User>,

    /// Plain text content. Empty means "not a text message".
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Command name parsed out of [`text`](Self::text), without the marker
    /// prefix. Set only by the classifier on successful command parsing.
    #[serde(skip)]
    pub command: Option<String>,
    /// Free-text remainder after the command token. Set together with
    /// [`command`](Self::command).
    #[serde(skip)]
    pub payload: String,

    /// A message was pinned in this chat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_message: Option<Box<Message>>,

    // ------------------------------------------------------------------
    // Media kinds, in classifier priority order
    // ------------------------------------------------------------------
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<Photo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<Voice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Audio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker: Option<Sticker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_note: Option<VideoNote>,

    // ------------------------------------------------------------------
    // Single-field markers
    // ------------------------------------------------------------------
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<Game>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice: Option<Dice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Invoice>,
    #[serde(
        rename = "successful_payment",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub payment: Option<Payment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refunded_payment: Option<RefundedPayment>,
    #[serde(
        rename = "forum_topic_created",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub topic_created: Option<TopicCreated>,
    #[serde(
        rename = "forum_topic_reopened",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub topic_reopened: Option<TopicReopened>,
    #[serde(
        rename = "forum_topic_closed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub topic_closed: Option<TopicClosed>,
    #[serde(
        rename = "forum_topic_edited",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub topic_edited: Option<TopicEdited>,
    #[serde(
        rename = "general_forum_topic_hidden",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub general_topic_hidden: Option<GeneralTopicHidden>,
    #[serde(
        rename = "general_forum_topic_unhidden",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub general_topic_unhidden: Option<GeneralTopicUnhidden>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_access_allowed: Option<WriteAccessAllowed>,

    // ------------------------------------------------------------------
    // Membership and group lifecycle
    // ------------------------------------------------------------------
    /// A single user joined the chat.
    #[serde(
        rename = "new_chat_member",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_joined: Option<User>,
    /// Several users joined the chat at once.
    #[serde(
        rename = "new_chat_members",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub users_joined: Vec<User>,
    /// A user left (or was removed from) the chat.
    #[serde(
        rename = "left_chat_member",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_left: Option<User>,
    #[serde(
        rename = "users_shared",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub user_shared: Option<UsersShared>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_shared: Option<ChatShared>,
    #[serde(
        rename = "new_chat_title",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub new_group_title: String,
    #[serde(
        rename = "new_chat_photo",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub new_group_photo: Option<Photo>,
    #[serde(
        rename = "delete_chat_photo",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub group_photo_deleted: bool,
    #[serde(
        rename = "group_chat_created",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub group_created: bool,
    #[serde(
        rename = "supergroup_chat_created",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub supergroup_created: bool,
    #[serde(
        rename = "channel_chat_created",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub channel_created: bool,
    /// The group migrated to a supergroup with this chat ID. `0` = absent.
    #[serde(rename = "migrate_to_chat_id", default)]
    pub migrate_to: i64,
    /// Populated by the classifier from `chat.id` when routing a migration.
    #[serde(rename = "migrate_from_chat_id", default)]
    pub migrate_from: i64,

    // ------------------------------------------------------------------
    // Service notices
    // ------------------------------------------------------------------
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_chat_started: Option<VideoChatStarted>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_chat_ended: Option<VideoChatEnded>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_chat_scheduled: Option<VideoChatScheduled>,
    #[serde(
        rename = "video_chat_participants_invited",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub video_chat_participants: Option<VideoChatParticipants>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_app_data: Option<WebAppData>,
    #[serde(
        rename = "proximity_alert_triggered",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub proximity_alert: Option<ProximityAlert>,
    #[serde(
        rename = "message_auto_delete_timer_changed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_delete_timer: Option<AutoDeleteTimer>,
}

impl Message {
    /// A message carrying only text, for tests and synthetic updates.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_markers_deserialize_to_defaults() {
        let m: Message = serde_json::from_str(
            r#"{"message_id":7,"date":0,"chat":{"id":1,"type":"private"},"text":"hi"}"#,
        )
        .unwrap();
        assert_eq!(m.id, 7);
        assert_eq!(m.text, "hi");
        assert!(m.photo.is_none());
        assert!(m.users_joined.is_empty());
        assert!(!m.group_created);
        assert_eq!(m.migrate_to, 0);
        assert!(m.command.is_none());
    }

    #[test]
    fn derived_fields_never_serialize() {
        let mut m = Message::from_text("/start go");
        m.command = Some("start".into());
        m.payload = "go".into();
        let json = serde_json::to_string(&m).unwrap();
        assert!(!json.contains("start"));
        assert!(!json.contains("payload"));
    }

    #[test]
    fn wire_names_match_the_bot_api() {
        let json = r#"{
            "message_id": 1,
            "chat": {"id": -5, "type": "group"},
            "new_chat_members": [{"id": 9, "first_name": "n"}],
            "migrate_to_chat_id": -100123
        }"#;
        let m: Message = serde_json::from_str(json).unwrap();
        assert_eq!(m.users_joined.len(), 1);
        assert_eq!(m.migrate_to, -100123);
    }
}
