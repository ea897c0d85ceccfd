//! The slash-command micro-grammar.
//!
//! Syntax, as typed by users:
//!
//! ```text
//! /<command>[@<botname>] <payload>
//! ```
//!
//! The marker is one or more leading non-word characters (`/` canonically;
//! clients on some platforms send variants), the command name is a run of
//! word characters, the optional qualifier after `@` restricts the command to
//! one bot identity, and everything after the first whitespace up to the end
//! of the line is the payload, verbatim.
//!
//! Parsing either fully matches or yields nothing; a non-match is not an
//! error, the text simply is not a command. Command names are matched
//! case-sensitively against the registry; the qualifier is compared
//! case-insensitively against the bot's own username, but both comparisons
//! happen in the classifier, not here.

use lazy_regex::regex_captures;

/// A successfully parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Command name without the marker prefix.
    pub name: String,
    /// Bot username after `@`, if present.
    pub qualifier: Option<String>,
    /// Verbatim remainder of the line; empty when absent.
    pub payload: String,
}

/// Parses a command out of message text.
///
/// The command token must be terminated by whitespace or end of input:
/// `/start!now` is not a command.
pub fn parse(text: &str) -> Option<ParsedCommand> {
    let (_, name, qualifier, _, payload) =
        regex_captures!(r"^[^\w\s]+(\w+)(?:@(\w+))?(\s|$)(.*)", text)?;
    Some(ParsedCommand {
        name: name.to_string(),
        qualifier: (!qualifier.is_empty()).then(|| qualifier.to_string()),
        payload: payload.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(name: &str, qualifier: Option<&str>, payload: &str) -> ParsedCommand {
        ParsedCommand {
            name: name.into(),
            qualifier: qualifier.map(Into::into),
            payload: payload.into(),
        }
    }

    #[test]
    fn bare_command() {
        assert_eq!(parse("/start"), Some(cmd("start", None, "")));
    }

    #[test]
    fn command_with_payload() {
        assert_eq!(parse("/start hello world"), Some(cmd("start", None, "hello world")));
    }

    #[test]
    fn command_with_qualifier_and_payload() {
        assert_eq!(
            parse("/start@OtherBot hello"),
            Some(cmd("start", Some("OtherBot"), "hello"))
        );
    }

    #[test]
    fn payload_is_kept_verbatim() {
        assert_eq!(
            parse("/echo  two  spaces "),
            Some(cmd("echo", None, " two  spaces "))
        );
    }

    #[test]
    fn payload_stops_at_end_of_line() {
        assert_eq!(parse("/start hello\nworld"), Some(cmd("start", None, "hello")));
    }

    #[test]
    fn alternate_and_repeated_markers() {
        assert_eq!(parse("!ban spammer"), Some(cmd("ban", None, "spammer")));
        assert_eq!(parse("//start"), Some(cmd("start", None, "")));
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse("start"), None);
        assert_eq!(parse("hello /start"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn unterminated_command_token_is_not_a_command() {
        assert_eq!(parse("/start!now"), None);
        assert_eq!(parse("/start@Other!Bot"), None);
    }

    #[test]
    fn underscores_and_digits_are_part_of_the_name() {
        assert_eq!(parse("/add_5 x"), Some(cmd("add_5", None, "x")));
    }
}
