//! The classifier: maps an update to the handler that should receive it.
//!
//! Classification is a single pass over the update, with a fixed precedence
//! chain per message. The first matching check wins and later checks are
//! never consulted, so a text message with an attached photo routes as text
//! and a pinned-message notice beats everything else in the message.
//!
//! The pass mutates the update in place: command name and payload are
//! written into the message, a structured callback routed to its endpoint
//! has the envelope stripped from `data`, and a migration notice gets
//! `migrate_from` filled in from the chat ID. Handlers observe the enriched
//! update, not the wire one.
//!
//! Returning `None` here is not "unhandled": the router substitutes the
//! [`ON_ANY`](crate::registry::ON_ANY) handler and then a no-op. A `None`
//! also carries one deliberate drop, commands addressed to another bot.

use tracing::debug;

use crate::callback;
use crate::command;
use crate::dispatch::Router;
use crate::message::Message;
use crate::registry::{
    BoxedHandler, CATEGORY_SENTINEL, ON_ADDED_TO_GROUP, ON_AUTO_DELETE_TIMER, ON_BOOST,
    ON_BOOST_REMOVED, ON_BUSINESS_CONNECTION, ON_BUSINESS_MESSAGE, ON_CALLBACK,
    ON_CHANNEL_CREATED, ON_CHANNEL_POST, ON_CHAT_JOIN_REQUEST, ON_CHAT_MEMBER, ON_CHAT_SHARED,
    ON_CHECKOUT, ON_COMMAND, ON_CONTACT, ON_DELETED_BUSINESS_MESSAGES, ON_DICE, ON_EDITED,
    ON_EDITED_BUSINESS_MESSAGE, ON_EDITED_CHANNEL_POST, ON_GAME, ON_GENERAL_TOPIC_HIDDEN,
    ON_GENERAL_TOPIC_UNHIDDEN, ON_GROUP_CREATED, ON_GROUP_PHOTO_DELETED, ON_INLINE_RESULT,
    ON_INVOICE, ON_LOCATION, ON_MEDIA, ON_MIGRATION, ON_MY_CHAT_MEMBER, ON_NEW_GROUP_PHOTO,
    ON_NEW_GROUP_TITLE, ON_PAYMENT, ON_PINNED, ON_POLL, ON_POLL_ANSWER, ON_PROXIMITY_ALERT,
    ON_QUERY, ON_REFUND, ON_SHIPPING, ON_SUPERGROUP_CREATED, ON_TEXT, ON_TOPIC_CLOSED,
    ON_TOPIC_CREATED, ON_TOPIC_EDITED, ON_TOPIC_REOPENED, ON_USER_JOINED, ON_USER_LEFT,
    ON_USER_SHARED, ON_VENUE, ON_VIDEO_CHAT_ENDED, ON_VIDEO_CHAT_PARTICIPANTS,
    ON_VIDEO_CHAT_SCHEDULED, ON_VIDEO_CHAT_STARTED, ON_WEB_APP, ON_WRITE_ACCESS_ALLOWED,
};
use crate::update::{Callback, Update, UpdateKind};

impl Router {
    /// Selects the handler for an update, enriching it along the way.
    ///
    /// `None` means no registered handler matched (or the update was a
    /// command for another bot); the caller decides what runs then.
    pub fn select(&self, update: &mut Update) -> Option<BoxedHandler> {
        match &mut update.kind {
            UpdateKind::Message(m) => self.select_message(m),
            UpdateKind::EditedMessage(_) => self.handler(ON_EDITED),
            UpdateKind::ChannelPost(m) => {
                if m.pinned_message.is_some() {
                    return self.handler(ON_PINNED);
                }
                self.handler(ON_CHANNEL_POST)
            }
            UpdateKind::EditedChannelPost(_) => self.handler(ON_EDITED_CHANNEL_POST),
            UpdateKind::Callback(cb) => self.select_callback(cb),
            UpdateKind::InlineQuery(_) => self.handler(ON_QUERY),
            UpdateKind::InlineResult(_) => self.handler(ON_INLINE_RESULT),
            UpdateKind::ShippingQuery(_) => self.handler(ON_SHIPPING),
            UpdateKind::PreCheckoutQuery(_) => self.handler(ON_CHECKOUT),
            UpdateKind::Poll(_) => self.handler(ON_POLL),
            UpdateKind::PollAnswer(_) => self.handler(ON_POLL_ANSWER),
            UpdateKind::MyChatMember(_) => self.handler(ON_MY_CHAT_MEMBER),
            UpdateKind::ChatMember(_) => self.handler(ON_CHAT_MEMBER),
            UpdateKind::ChatJoinRequest(_) => self.handler(ON_CHAT_JOIN_REQUEST),
            UpdateKind::Boost(_) => self.handler(ON_BOOST),
            UpdateKind::BoostRemoved(_) => self.handler(ON_BOOST_REMOVED),
            UpdateKind::BusinessConnection(_) => self.handler(ON_BUSINESS_CONNECTION),
            UpdateKind::BusinessMessage(_) => self.handler(ON_BUSINESS_MESSAGE),
            UpdateKind::EditedBusinessMessage(_) => self.handler(ON_EDITED_BUSINESS_MESSAGE),
            UpdateKind::DeletedBusinessMessages(_) => self.handler(ON_DELETED_BUSINESS_MESSAGES),
            UpdateKind::None => None,
        }
    }

    /// The per-message precedence chain.
    fn select_message(&self, m: &mut Message) -> Option<BoxedHandler> {
        if m.pinned_message.is_some() {
            return self.handler(ON_PINNED);
        }

        // Sanitize before the emptiness check, so text made of nothing but
        // category bytes classifies as empty.
        sanitize_text(m);

        if !m.text.is_empty() {
            if let Some(cmd) = command::parse(&m.text) {
                // A qualified command addressed to a different bot is not
                // ours; drop it without any fallback.
                if let Some(qualifier) = &cmd.qualifier {
                    if !qualifier.eq_ignore_ascii_case(&self.me.username) {
                        debug!(
                            command = %cmd.name,
                            addressee = %qualifier,
                            "command addressed to another bot, dropped"
                        );
                        return None;
                    }
                }

                m.payload = cmd.payload;
                m.command = Some(cmd.name.clone());

                if let Some(h) = self.handler(&cmd.name) {
                    return Some(h);
                }
                if let Some(h) = self.handler(ON_COMMAND) {
                    return Some(h);
                }
            }

            // Exact-text endpoint, then the generic text category. The
            // text branch is terminal: a miss here never falls through to
            // the media or marker chains.
            if let Some(h) = self.handler(&m.text) {
                return Some(h);
            }
            return self.handler(ON_TEXT);
        }

        // Media classification is terminal: once the message is known to be
        // media, a miss falls back to ON_MEDIA and nowhere else.
        if let Some(key) = media_category(m) {
            return self.handler(key).or_else(|| self.handler(ON_MEDIA));
        }

        if m.contact.is_some() {
            return self.handler(ON_CONTACT);
        }
        if m.location.is_some() {
            return self.handler(ON_LOCATION);
        }
        if m.venue.is_some() {
            return self.handler(ON_VENUE);
        }
        if m.game.is_some() {
            return self.handler(ON_GAME);
        }
        if m.dice.is_some() {
            return self.handler(ON_DICE);
        }
        if m.invoice.is_some() {
            return self.handler(ON_INVOICE);
        }
        if m.payment.is_some() {
            return self.handler(ON_PAYMENT);
        }
        if m.refunded_payment.is_some() {
            return self.handler(ON_REFUND);
        }
        if m.topic_created.is_some() {
            return self.handler(ON_TOPIC_CREATED);
        }
        if m.topic_reopened.is_some() {
            return self.handler(ON_TOPIC_REOPENED);
        }
        if m.topic_closed.is_some() {
            return self.handler(ON_TOPIC_CLOSED);
        }
        if m.topic_edited.is_some() {
            return self.handler(ON_TOPIC_EDITED);
        }
        if m.general_topic_hidden.is_some() {
            return self.handler(ON_GENERAL_TOPIC_HIDDEN);
        }
        if m.general_topic_unhidden.is_some() {
            return self.handler(ON_GENERAL_TOPIC_UNHIDDEN);
        }
        if m.write_access_allowed.is_some() {
            return self.handler(ON_WRITE_ACCESS_ALLOWED);
        }

        let was_added = m.user_joined.as_ref().is_some_and(|u| u.id == self.me.id)
            || m.users_joined.iter().any(|u| u.id == self.me.id);
        if m.group_created || m.supergroup_created || was_added {
            return self.handler(ON_ADDED_TO_GROUP);
        }
        if m.user_joined.is_some() || !m.users_joined.is_empty() {
            return self.handler(ON_USER_JOINED);
        }
        if m.user_left.is_some() {
            return self.handler(ON_USER_LEFT);
        }
        if m.user_shared.is_some() {
            return self.handler(ON_USER_SHARED);
        }
        if m.chat_shared.is_some() {
            return self.handler(ON_CHAT_SHARED);
        }
        if !m.new_group_title.is_empty() {
            return self.handler(ON_NEW_GROUP_TITLE);
        }
        if m.new_group_photo.is_some() {
            return self.handler(ON_NEW_GROUP_PHOTO);
        }
        if m.group_photo_deleted {
            return self.handler(ON_GROUP_PHOTO_DELETED);
        }
        // Unreachable in practice: group creation is consumed by the
        // added-to-group branch above. Kept in chain position anyway.
        if m.group_created {
            return self.handler(ON_GROUP_CREATED);
        }
        if m.supergroup_created {
            return self.handler(ON_SUPERGROUP_CREATED);
        }
        if m.channel_created {
            return self.handler(ON_CHANNEL_CREATED);
        }
        if m.migrate_to != 0 {
            m.migrate_from = m.chat.id;
            return self.handler(ON_MIGRATION);
        }
        if m.video_chat_started.is_some() {
            return self.handler(ON_VIDEO_CHAT_STARTED);
        }
        if m.video_chat_ended.is_some() {
            return self.handler(ON_VIDEO_CHAT_ENDED);
        }
        if m.video_chat_participants.is_some() {
            return self.handler(ON_VIDEO_CHAT_PARTICIPANTS);
        }
        if m.video_chat_scheduled.is_some() {
            return self.handler(ON_VIDEO_CHAT_SCHEDULED);
        }
        if m.web_app_data.is_some() {
            return self.handler(ON_WEB_APP);
        }
        if m.proximity_alert.is_some() {
            return self.handler(ON_PROXIMITY_ALERT);
        }
        if m.auto_delete_timer.is_some() {
            return self.handler(ON_AUTO_DELETE_TIMER);
        }

        None
    }

    /// Structured callbacks route to their endpoint; everything else (and a
    /// structured callback with no endpoint) falls back to [`ON_CALLBACK`].
    fn select_callback(&self, cb: &mut Callback) -> Option<BoxedHandler> {
        if let Some(parsed) = callback::parse(&cb.data) {
            if let Some(h) = self.handler(&callback::endpoint_key(&parsed.unique)) {
                // The envelope is stripped only on a successful endpoint
                // lookup; fallback handlers see the data as received.
                cb.unique = parsed.unique;
                cb.data = parsed.payload;
                return Some(h);
            }
        }
        self.handler(ON_CALLBACK)
    }

    fn handler(&self, key: &str) -> Option<BoxedHandler> {
        self.registry.get(key).cloned()
    }
}

/// Strips the reserved category byte from the front of inbound text, so user
/// content can never alias a category key in the verbatim-text lookup.
fn sanitize_text(m: &mut Message) {
    let n = m
        .text
        .chars()
        .take_while(|&c| c == CATEGORY_SENTINEL)
        .count();
    if n > 0 {
        // The sentinel is a one-byte character, so char count == byte count.
        m.text.drain(..n);
    }
}

/// The media kind of a message, first populated field in priority order.
fn media_category(m: &Message) -> Option<&'static str> {
    use crate::registry::{
        ON_ANIMATION, ON_AUDIO, ON_DOCUMENT, ON_PHOTO, ON_STICKER, ON_VIDEO, ON_VIDEO_NOTE,
        ON_VOICE,
    };
    if m.photo.is_some() {
        Some(ON_PHOTO)
    } else if m.voice.is_some() {
        Some(ON_VOICE)
    } else if m.audio.is_some() {
        Some(ON_AUDIO)
    } else if m.animation.is_some() {
        Some(ON_ANIMATION)
    } else if m.document.is_some() {
        Some(ON_DOCUMENT)
    } else if m.sticker.is_some() {
        Some(ON_STICKER)
    } else if m.video.is_some() {
        Some(ON_VIDEO)
    } else if m.video_note.is_some() {
        Some(ON_VIDEO_NOTE)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::registry::{ON_ANY, ON_PHOTO, RegistryBuilder};
    use crate::types::{BotIdentity, Chat, Contact, Photo, User};

    fn router_with(keys: &[&str]) -> Router {
        let mut b = RegistryBuilder::new();
        for key in keys {
            b.handle(key, |_ctx| async { Ok(()) }).unwrap();
        }
        Router::builder(BotIdentity::new(99, "courier_bot"))
            .registry(b.build())
            .build()
    }

    /// True when classification picks exactly the handler registered at `key`.
    fn selects(router: &Router, update: &mut Update, key: &str) -> bool {
        match router.select(update) {
            Some(h) => Arc::ptr_eq(&h, router.registry.get(key).unwrap()),
            None => false,
        }
    }

    fn msg_update(m: Message) -> Update {
        Update::new(1, UpdateKind::Message(m))
    }

    fn user(id: i64) -> User {
        User {
            id,
            ..User::default()
        }
    }

    #[test]
    fn commands_route_to_their_bare_name_endpoint() {
        let router = router_with(&["/start", ON_COMMAND, ON_TEXT]);
        let mut u = msg_update(Message::from_text("/start deep link"));
        assert!(selects(&router, &mut u, "start"));
        let m = u.message().unwrap();
        assert_eq!(m.command.as_deref(), Some("start"));
        assert_eq!(m.payload, "deep link");
        assert_eq!(m.text, "/start deep link");
    }

    #[test]
    fn unknown_commands_fall_back_to_the_command_category() {
        let router = router_with(&[ON_COMMAND, ON_TEXT]);
        let mut u = msg_update(Message::from_text("/ghost"));
        assert!(selects(&router, &mut u, ON_COMMAND));
        assert_eq!(u.message().unwrap().command.as_deref(), Some("ghost"));
    }

    #[test]
    fn unmatched_commands_still_reach_the_text_category() {
        let router = router_with(&[ON_TEXT]);
        let mut u = msg_update(Message::from_text("/ghost"));
        assert!(selects(&router, &mut u, ON_TEXT));
    }

    #[test]
    fn commands_for_another_bot_are_dropped_outright() {
        let router = router_with(&["start", ON_COMMAND, ON_TEXT, ON_ANY]);
        let mut u = msg_update(Message::from_text("/start@other_bot go"));
        assert!(router.select(&mut u).is_none());
        // The drop happens before the derived fields are written.
        let m = u.message().unwrap();
        assert!(m.command.is_none());
        assert_eq!(m.payload, "");
    }

    #[test]
    fn the_bot_qualifier_is_matched_case_insensitively() {
        let router = router_with(&["start"]);
        let mut u = msg_update(Message::from_text("/start@Courier_Bot"));
        assert!(selects(&router, &mut u, "start"));
    }

    #[test]
    fn exact_text_beats_the_text_category() {
        let router = router_with(&["hello there", ON_TEXT]);
        let mut exact = msg_update(Message::from_text("hello there"));
        assert!(selects(&router, &mut exact, "hello there"));
        let mut other = msg_update(Message::from_text("hello you"));
        assert!(selects(&router, &mut other, ON_TEXT));
    }

    #[test]
    fn text_beats_attached_media() {
        let router = router_with(&[ON_TEXT, ON_PHOTO]);
        let mut m = Message::from_text("caption-ish");
        m.photo = Some(Photo::default());
        let mut u = msg_update(m);
        assert!(selects(&router, &mut u, ON_TEXT));
    }

    #[test]
    fn media_misses_stop_at_the_media_category() {
        // A photo with only ON_CONTACT registered: the media branch is
        // terminal, so the contact marker is never reached.
        let router = router_with(&[ON_CONTACT]);
        let mut m = Message::default();
        m.photo = Some(Photo::default());
        m.contact = Some(Contact::default());
        let mut u = msg_update(m);
        assert!(router.select(&mut u).is_none());

        let router = router_with(&[ON_MEDIA, ON_CONTACT]);
        let mut u2 = msg_update({
            let mut m = Message::default();
            m.photo = Some(Photo::default());
            m
        });
        assert!(selects(&router, &mut u2, ON_MEDIA));
    }

    #[test]
    fn non_empty_text_never_reaches_the_marker_chain() {
        // Text plus a contact with only ON_CONTACT registered: the text
        // branch is terminal, so the contact marker is never consulted.
        let router = router_with(&[ON_CONTACT]);
        let mut m = Message::from_text("hello");
        m.contact = Some(Contact::default());
        let mut u = msg_update(m);
        assert!(router.select(&mut u).is_none());
    }

    #[test]
    fn text_of_only_category_bytes_classifies_as_empty() {
        let router = router_with(&[ON_TEXT, ON_PHOTO]);
        let mut m = Message::from_text("\u{7}\u{7}");
        m.photo = Some(Photo::default());
        let mut u = msg_update(m);
        assert!(selects(&router, &mut u, ON_PHOTO));
        assert_eq!(u.message().unwrap().text, "");
    }

    #[test]
    fn pinned_notices_beat_everything_else_in_the_message() {
        let router = router_with(&[ON_PINNED, ON_TEXT]);
        let mut m = Message::from_text("look at this");
        m.pinned_message = Some(Box::new(Message::from_text("pinned")));
        let mut u = msg_update(m);
        assert!(selects(&router, &mut u, ON_PINNED));
    }

    #[test]
    fn leading_category_bytes_are_stripped_before_lookup() {
        let router = router_with(&["text"]);
        let mut u = msg_update(Message::from_text("\u{7}\u{7}text"));
        // Routes through the verbatim-text lookup, not the category table.
        assert!(selects(&router, &mut u, "text"));
        assert_eq!(u.message().unwrap().text, "text");
    }

    #[test]
    fn category_keys_cannot_be_spoofed_through_text() {
        let router = router_with(&[ON_PHOTO]);
        // Raw text equal to the ON_PHOTO key sanitizes to "photo" and
        // matches nothing.
        let mut u = msg_update(Message::from_text(ON_PHOTO));
        assert!(router.select(&mut u).is_none());
    }

    #[test]
    fn structured_callbacks_route_to_their_endpoint_and_are_unwrapped() {
        let router = router_with(&["\u{c}confirm", ON_CALLBACK]);
        let cb = Callback {
            id: "q1".into(),
            data: "\u{c}confirm|order-42".into(),
            ..Callback::default()
        };
        let mut u = Update::new(1, UpdateKind::Callback(cb));
        assert!(selects(&router, &mut u, "\u{c}confirm"));
        let cb = u.callback().unwrap();
        assert_eq!(cb.unique, "confirm");
        assert_eq!(cb.data, "order-42");
    }

    #[test]
    fn structured_callbacks_without_an_endpoint_fall_back_untouched() {
        let router = router_with(&[ON_CALLBACK]);
        let cb = Callback {
            data: "\u{c}abc|42".into(),
            ..Callback::default()
        };
        let mut u = Update::new(1, UpdateKind::Callback(cb));
        assert!(selects(&router, &mut u, ON_CALLBACK));
        // The fallback handler sees the data exactly as received.
        let cb = u.callback().unwrap();
        assert_eq!(cb.unique, "");
        assert_eq!(cb.data, "\u{c}abc|42");
    }

    #[test]
    fn plain_callbacks_are_left_untouched() {
        let router = router_with(&[ON_CALLBACK]);
        let cb = Callback {
            data: "free text".into(),
            ..Callback::default()
        };
        let mut u = Update::new(1, UpdateKind::Callback(cb));
        assert!(selects(&router, &mut u, ON_CALLBACK));
        let cb = u.callback().unwrap();
        assert_eq!(cb.unique, "");
        assert_eq!(cb.data, "free text");
    }

    #[test]
    fn migrations_fill_in_the_source_chat_id() {
        let router = router_with(&[ON_MIGRATION]);
        let mut m = Message {
            chat: Chat {
                id: -500,
                ..Chat::default()
            },
            migrate_to: -100900,
            ..Message::default()
        };
        m.sender = Some(user(1));
        let mut u = msg_update(m);
        assert!(selects(&router, &mut u, ON_MIGRATION));
        assert_eq!(u.message().unwrap().migrate_from, -500);
    }

    #[test]
    fn the_bot_joining_routes_as_added_to_group() {
        let router = router_with(&[ON_ADDED_TO_GROUP, ON_USER_JOINED]);

        let mut m = Message::default();
        m.user_joined = Some(user(99));
        let mut u = msg_update(m);
        assert!(selects(&router, &mut u, ON_ADDED_TO_GROUP));

        let mut m = Message::default();
        m.users_joined = vec![user(5), user(99)];
        let mut u = msg_update(m);
        assert!(selects(&router, &mut u, ON_ADDED_TO_GROUP));

        let mut m = Message::default();
        m.group_created = true;
        let mut u = msg_update(m);
        assert!(selects(&router, &mut u, ON_ADDED_TO_GROUP));

        let mut m = Message::default();
        m.user_joined = Some(user(5));
        let mut u = msg_update(m);
        assert!(selects(&router, &mut u, ON_USER_JOINED));
    }

    #[test]
    fn channel_posts_do_not_enter_the_text_chain() {
        let router = router_with(&[ON_CHANNEL_POST, ON_TEXT, ON_PINNED]);
        let mut u = Update::new(1, UpdateKind::ChannelPost(Message::from_text("news")));
        assert!(selects(&router, &mut u, ON_CHANNEL_POST));

        let mut m = Message::default();
        m.pinned_message = Some(Box::new(Message::from_text("p")));
        let mut u = Update::new(2, UpdateKind::ChannelPost(m));
        assert!(selects(&router, &mut u, ON_PINNED));
    }

    #[test]
    fn non_message_kinds_map_straight_to_their_category() {
        let router = router_with(&[
            ON_EDITED,
            ON_EDITED_CHANNEL_POST,
            ON_POLL,
            ON_MY_CHAT_MEMBER,
            ON_DELETED_BUSINESS_MESSAGES,
        ]);
        let mut u = Update::new(1, UpdateKind::EditedMessage(Message::from_text("x")));
        assert!(selects(&router, &mut u, ON_EDITED));
        let mut u = Update::new(2, UpdateKind::EditedChannelPost(Message::default()));
        assert!(selects(&router, &mut u, ON_EDITED_CHANNEL_POST));
        let mut u = Update::new(3, UpdateKind::Poll(Default::default()));
        assert!(selects(&router, &mut u, ON_POLL));
        let mut u = Update::new(4, UpdateKind::MyChatMember(Default::default()));
        assert!(selects(&router, &mut u, ON_MY_CHAT_MEMBER));
        let mut u = Update::new(5, UpdateKind::DeletedBusinessMessages(Default::default()));
        assert!(selects(&router, &mut u, ON_DELETED_BUSINESS_MESSAGES));
    }

    #[test]
    fn empty_updates_select_nothing() {
        let router = router_with(&[ON_TEXT, ON_ANY]);
        let mut u = Update::new(1, UpdateKind::None);
        assert!(router.select(&mut u).is_none());
    }

    #[test]
    fn reclassifying_an_enriched_command_is_stable() {
        let router = router_with(&["start"]);
        let mut u = msg_update(Message::from_text("/start 10"));
        assert!(selects(&router, &mut u, "start"));
        assert!(selects(&router, &mut u, "start"));
        let m = u.message().unwrap();
        assert_eq!(m.command.as_deref(), Some("start"));
        assert_eq!(m.payload, "10");
    }
}
