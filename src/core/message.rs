//! # Messages
//!
//! The unit of the conversation log. A `Message` is immutable once built, and
//! the constructors make an empty user message unrepresentable: a user turn
//! carries text, an image, or both.

/// Who a message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    /// A condensed recap produced by the summarize action. Shown to the user,
    /// never sent back to the model as history.
    SummaryNote,
}

/// An image the user attached, held in memory as a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime_type: String,
    /// Size of the decoded image in bytes.
    pub byte_len: usize,
    /// `data:<mime>;base64,<payload>`
    pub data_uri: String,
}

impl ImageAttachment {
    /// Short human-readable description, e.g. `cat.png (image/png, 12.3 KB)`.
    pub fn describe(&self) -> String {
        format!(
            "{} ({}, {})",
            self.file_name,
            self.mime_type,
            format_size(self.byte_len)
        )
    }
}

fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    role: Role,
    text: Option<String>,
    image: Option<ImageAttachment>,
}

impl Message {
    /// Builds a user message. Blank text is treated as absent; returns `None`
    /// when neither text nor image remains.
    pub fn user(text: &str, image: Option<ImageAttachment>) -> Option<Self> {
        let trimmed = text.trim();
        let text = (!trimmed.is_empty()).then(|| trimmed.to_string());
        if text.is_none() && image.is_none() {
            return None;
        }
        Some(Self {
            role: Role::User,
            text,
            image,
        })
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn summary_note(text: impl Into<String>) -> Self {
        Self {
            role: Role::SummaryNote,
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Text or the empty string.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn image(&self) -> Option<&ImageAttachment> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> ImageAttachment {
        ImageAttachment {
            file_name: name.to_string(),
            mime_type: "image/png".to_string(),
            byte_len: 2048,
            data_uri: "data:image/png;base64,AAAA".to_string(),
        }
    }

    #[test]
    fn user_message_requires_text_or_image() {
        assert!(Message::user("", None).is_none());
        assert!(Message::user("   \n\t", None).is_none());
        assert!(Message::user("hi", None).is_some());
        assert!(Message::user("", Some(png("a.png"))).is_some());
    }

    #[test]
    fn user_message_trims_text() {
        let msg = Message::user("  Hello  ", None).unwrap();
        assert_eq!(msg.text(), Some("Hello"));
        assert_eq!(msg.role(), Role::User);
    }

    #[test]
    fn image_only_message_has_no_text() {
        let msg = Message::user(" ", Some(png("cat.png"))).unwrap();
        assert_eq!(msg.text(), None);
        assert_eq!(msg.text_or_empty(), "");
        assert!(msg.has_image());
    }

    #[test]
    fn describe_formats_size() {
        assert_eq!(png("cat.png").describe(), "cat.png (image/png, 2.0 KB)");
        let mut tiny = png("dot.gif");
        tiny.byte_len = 43;
        tiny.mime_type = "image/gif".to_string();
        assert_eq!(tiny.describe(), "dot.gif (image/gif, 43 B)");
    }

    #[test]
    fn assistant_and_summary_roles() {
        assert_eq!(Message::assistant("hi").role(), Role::Assistant);
        assert_eq!(Message::summary_note("recap").role(), Role::SummaryNote);
        assert_eq!(Message::summary_note("recap").text(), Some("recap"));
    }
}
