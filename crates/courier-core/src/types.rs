//! Common Telegram object types shared across the update model.
//!
//! These are deliberately thin: the routing engine only inspects presence and
//! a handful of identity fields. Fields the classifier never reads are kept to
//! the minimum a handler is likely to need.

use serde::{Deserialize, Serialize};

/// The identity of the bot an engine instance routes for.
///
/// The classifier needs it twice: to match the `@botname` qualifier of a
/// command (case-insensitively) and to derive "the bot itself was added to a
/// group" from membership events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    /// Numeric Telegram user ID of the bot account.
    pub id: i64,
    /// Username without the leading `@`.
    pub username: String,
}

impl BotIdentity {
    /// Creates a bot identity, stripping a leading `@` from the username.
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        let username = username.into();
        let username = username
            .strip_prefix('@')
            .map(str::to_owned)
            .unwrap_or(username);
        Self { id, username }
    }
}

/// A Telegram user or bot account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// A chat a message belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    /// Chat type: "private", "group", "supergroup" or "channel".
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

// ============================================================================
// Media objects
// ============================================================================

/// A photo (largest size of the photo array on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub file_id: String,
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
}

/// A voice note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub file_id: String,
    #[serde(default)]
    pub duration: i32,
}

/// An audio file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Audio {
    pub file_id: String,
    #[serde(default)]
    pub duration: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A GIF or soundless video animation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub file_id: String,
}

/// A generic file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub file_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// A sticker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub file_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// A video file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub file_id: String,
    #[serde(default)]
    pub duration: i32,
}

/// A round video note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoNote {
    pub file_id: String,
    #[serde(default)]
    pub duration: i32,
}

// ============================================================================
// Single-field message markers
// ============================================================================

/// A shared contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub phone_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// A point on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A venue (location with a name and address).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub location: Location,
    pub title: String,
    #[serde(default)]
    pub address: String,
}

/// A game message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub title: String,
}

/// A dice roll (or any other animated random-value emoji).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dice {
    pub emoji: String,
    #[serde(default)]
    pub value: i32,
}

/// An invoice for a payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub total_amount: i64,
}

/// A completed payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub total_amount: i64,
    #[serde(default)]
    pub invoice_payload: String,
}

/// A refunded payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefundedPayment {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub total_amount: i64,
    #[serde(default)]
    pub invoice_payload: String,
}

/// A forum topic was created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicCreated {
    pub name: String,
    #[serde(default)]
    pub icon_color: i32,
}

/// A forum topic was edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicEdited {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A forum topic was closed. Holds no information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicClosed {}

/// A forum topic was reopened. Holds no information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicReopened {}

/// The general forum topic was hidden. Holds no information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralTopicHidden {}

/// The general forum topic was unhidden. Holds no information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralTopicUnhidden {}

/// A user granted the bot write access (e.g. via a web app).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteAccessAllowed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_app_name: Option<String>,
}

/// Users were shared with the bot via a request button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsersShared {
    #[serde(default)]
    pub request_id: i32,
    #[serde(default)]
    pub user_ids: Vec<i64>,
}

/// A chat was shared with the bot via a request button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatShared {
    #[serde(default)]
    pub request_id: i32,
    pub chat_id: i64,
}

/// A video chat was started. Holds no information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoChatStarted {}

/// A video chat was ended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoChatEnded {
    #[serde(default)]
    pub duration: i32,
}

/// A video chat was scheduled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoChatScheduled {
    pub start_date: i64,
}

/// Participants were invited to a video chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoChatParticipants {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Data sent back from a Telegram web app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebAppData {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub button_text: String,
}

/// A user triggered another user's proximity alert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProximityAlert {
    pub traveler: User,
    pub watcher: User,
    #[serde(default)]
    pub distance: i32,
}

/// The auto-delete timer of a chat was changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoDeleteTimer {
    #[serde(rename = "message_auto_delete_time", default)]
    pub unixtime: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_identity_strips_at_prefix() {
        let me = BotIdentity::new(42, "@courier_bot");
        assert_eq!(me.username, "courier_bot");
        assert_eq!(BotIdentity::new(42, "courier_bot"), me);
    }

    #[test]
    fn chat_type_round_trips_under_rename() {
        let chat = Chat {
            id: -100,
            kind: "supergroup".into(),
            title: Some("den".into()),
            username: None,
        };
        let json = serde_json::to_string(&chat).unwrap();
        assert!(json.contains(r#""type":"supergroup""#));
        let back: Chat = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chat);
    }
}
