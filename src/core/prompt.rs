//! # Prompt Construction
//!
//! Turns the conversation log into the `messages` array for each of the three
//! completion call sites, and parses the suggestion reply.
//!
//! Image bytes never leave the process. A user message that carried an image
//! is sent as text prefixed with [`IMAGE_MARKER`] so the model knows one was
//! attached.

use log::debug;

use crate::core::message::{Message, Role};
use crate::inference::PromptMessage;

/// Prefix marking a user turn that had an image attached.
pub const IMAGE_MARKER: &str = "[Image is present]";

/// Maximum number of quick replies kept from a suggestion response.
pub const MAX_SUGGESTIONS: usize = 3;

/// Builds the reply prompt: the whole log minus summary notes.
///
/// `system_prompt`, when configured, is sent first as a system message.
pub fn reply_prompt(messages: &[Message], system_prompt: Option<&str>) -> Vec<PromptMessage> {
    let system = system_prompt
        .filter(|prompt| !prompt.trim().is_empty())
        .map(PromptMessage::system);

    system
        .into_iter()
        .chain(messages.iter().filter_map(|msg| match msg.role() {
            Role::User => Some(PromptMessage::user(user_content(msg))),
            Role::Assistant => Some(PromptMessage::assistant(msg.text_or_empty())),
            Role::SummaryNote => None,
        }))
        .collect()
}

fn user_content(msg: &Message) -> String {
    match (msg.has_image(), msg.text()) {
        (true, Some(text)) => format!("{IMAGE_MARKER} {text}"),
        (true, None) => IMAGE_MARKER.to_string(),
        (false, text) => text.unwrap_or_default().to_string(),
    }
}

/// Builds the single-turn prompt asking for three quick replies to
/// `last_reply`.
pub fn suggestions_prompt(assistant_name: &str, last_reply: &str) -> Vec<PromptMessage> {
    vec![PromptMessage::user(format!(
        "Based on this message from a chatbot named {assistant_name}: \"{last_reply}\", \
         suggest three short, distinct, and relevant replies for the user. \
         IMPORTANT: Respond ONLY with a valid JSON array of strings and nothing else. \
         Example: [\"That's interesting!\", \"Tell me more.\", \"Can you explain that?\"]"
    ))]
}

/// Renders the log as a plain transcript, one line per message.
pub fn transcript(messages: &[Message], assistant_name: &str) -> String {
    messages
        .iter()
        .map(|msg| {
            let speaker = match msg.role() {
                Role::User => "User",
                Role::Assistant => assistant_name,
                Role::SummaryNote => "Summary",
            };
            let body = match (msg.has_image(), msg.text()) {
                (true, Some(text)) => format!("[Image] {text}"),
                (true, None) => "[Image]".to_string(),
                (false, text) => text.unwrap_or_default().to_string(),
            };
            format!("{speaker}: {body}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the single-turn prompt asking for a one-paragraph summary.
pub fn summary_prompt(messages: &[Message], assistant_name: &str) -> Vec<PromptMessage> {
    vec![PromptMessage::user(format!(
        "Please provide a concise, one-paragraph summary of the following conversation:\n\n{}",
        transcript(messages, assistant_name)
    ))]
}

/// Parses a suggestion reply. Anything other than a JSON array of strings
/// yields `None`; blank entries are dropped and at most
/// [`MAX_SUGGESTIONS`] are kept.
pub fn parse_suggestions(raw: &str) -> Option<Vec<String>> {
    let parsed: Vec<String> = match serde_json::from_str(raw.trim()) {
        Ok(list) => list,
        Err(e) => {
            debug!("Suggestion reply is not a JSON string array: {e}");
            return None;
        }
    };
    Some(
        parsed
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .take(MAX_SUGGESTIONS)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::ImageAttachment;
    use crate::inference::PromptRole;

    fn image() -> ImageAttachment {
        ImageAttachment {
            file_name: "cat.png".to_string(),
            mime_type: "image/png".to_string(),
            byte_len: 10,
            data_uri: "data:image/png;base64,AAAA".to_string(),
        }
    }

    fn log() -> Vec<Message> {
        vec![
            Message::assistant("Hi! I'm Aiko."),
            Message::user("Hello", None).unwrap(),
            Message::assistant("Hey there"),
            Message::summary_note("They said hello."),
        ]
    }

    #[test]
    fn reply_prompt_maps_roles_and_skips_summaries() {
        let prompt = reply_prompt(&log(), None);
        assert_eq!(prompt.len(), 3);
        assert_eq!(prompt[0], PromptMessage::assistant("Hi! I'm Aiko."));
        assert_eq!(prompt[1], PromptMessage::user("Hello"));
        assert_eq!(prompt[2], PromptMessage::assistant("Hey there"));
    }

    #[test]
    fn reply_prompt_prepends_system_prompt() {
        let prompt = reply_prompt(&log(), Some("Be kind."));
        assert_eq!(prompt[0].role, PromptRole::System);
        assert_eq!(prompt[0].content, "Be kind.");
        assert_eq!(prompt.len(), 4);

        let blank = reply_prompt(&log(), Some("   "));
        assert_eq!(blank.len(), 3);
    }

    #[test]
    fn reply_prompt_marks_image_messages() {
        let mut messages = log();
        messages.push(Message::user("What is this?", Some(image())).unwrap());
        let prompt = reply_prompt(&messages, None);
        let last = prompt.last().unwrap();
        assert_eq!(last.role, PromptRole::User);
        assert_eq!(last.content, "[Image is present] What is this?");
    }

    #[test]
    fn reply_prompt_keeps_marker_on_earlier_image_turns() {
        let messages = vec![
            Message::user("", Some(image())).unwrap(),
            Message::assistant("Nice cat."),
            Message::user("And now?", None).unwrap(),
        ];
        let prompt = reply_prompt(&messages, None);
        assert_eq!(prompt[0].content, IMAGE_MARKER);
        assert_eq!(prompt[2].content, "And now?");
    }

    #[test]
    fn reply_prompt_image_without_caption_is_marker_only() {
        let messages = vec![Message::user("", Some(image())).unwrap()];
        let prompt = reply_prompt(&messages, None);
        assert_eq!(prompt[0].content, IMAGE_MARKER);
    }

    #[test]
    fn suggestions_prompt_quotes_last_reply() {
        let prompt = suggestions_prompt("Aiko", "Want to hear a joke?");
        assert_eq!(prompt.len(), 1);
        assert_eq!(prompt[0].role, PromptRole::User);
        assert!(prompt[0].content.contains("chatbot named Aiko"));
        assert!(prompt[0].content.contains("\"Want to hear a joke?\""));
        assert!(prompt[0].content.contains("JSON array of strings"));
    }

    #[test]
    fn transcript_labels_each_speaker() {
        let mut messages = log();
        messages.push(Message::user("", Some(image())).unwrap());
        let text = transcript(&messages, "Aiko");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Aiko: Hi! I'm Aiko.",
                "User: Hello",
                "Aiko: Hey there",
                "Summary: They said hello.",
                "User: [Image]",
            ]
        );
    }

    #[test]
    fn summary_prompt_embeds_transcript() {
        let prompt = summary_prompt(&log(), "Aiko");
        assert!(prompt[0].content.starts_with("Please provide a concise, one-paragraph summary"));
        assert!(prompt[0].content.ends_with("Summary: They said hello."));
    }

    #[test]
    fn parse_suggestions_accepts_string_array() {
        let parsed = parse_suggestions(r#" ["Tell me more", "Cool!", "Why?"] "#);
        assert_eq!(
            parsed,
            Some(vec!["Tell me more".into(), "Cool!".into(), "Why?".into()])
        );
    }

    #[test]
    fn parse_suggestions_caps_and_drops_blanks() {
        let parsed = parse_suggestions(r#"["a", " ", "b", "c", "d"]"#).unwrap();
        assert_eq!(parsed, vec!["a", "b", "c"]);
    }

    #[test]
    fn parse_suggestions_rejects_non_arrays() {
        assert_eq!(parse_suggestions(r#"{"replies":["a"]}"#), None);
        assert_eq!(parse_suggestions("Sure! Here are three replies"), None);
        assert_eq!(parse_suggestions("[1, 2, 3]"), None);
        assert_eq!(parse_suggestions(""), None);
    }
}
