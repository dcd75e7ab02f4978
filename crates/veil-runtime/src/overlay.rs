#![forbid(unsafe_code)]

//! Overlay data model owned by the application context.
//!
//! [`OverlayData`] is the immutable snapshot the overlay presents while it is
//! open: the message, its attachments already split into files, images and
//! everything else, the reactions summary, the action list and the order in
//! which content blocks are rendered.
//!
//! # Failure Modes
//!
//! - A missing message is representable (`message: None`) so the overlay can
//!   tolerate a frame where data has not arrived yet.
//! - An absent reaction list (`reactions: None`) is treated as empty.

use veil_core::geometry::Alignment;

/// Which full-screen modal layer is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayKind {
    /// No overlay.
    #[default]
    None,
    /// The message overlay.
    Message,
    /// Attachment gallery.
    Gallery,
    /// Alert sheet.
    Alert,
}

impl OverlayKind {
    /// Stable lowercase name, for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Message => "message",
            Self::Gallery => "gallery",
            Self::Alert => "alert",
        }
    }
}

// ---------------------------------------------------------------------------
// Message content
// ---------------------------------------------------------------------------

/// The kind of an attachment as sent by the chat backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    File,
    Audio,
    Video,
    Giphy,
    /// Any kind this crate does not know by name.
    Custom(String),
}

impl AttachmentKind {
    /// Whether the attachment is listed with the file attachments.
    #[must_use]
    pub fn is_file_like(&self) -> bool {
        matches!(self, Self::File | Self::Audio | Self::Video)
    }
}

/// An interactive button carried by an attachment (e.g. giphy "send").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentAction {
    pub name: String,
    pub text: String,
    pub value: String,
}

/// One message attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub title: Option<String>,
    pub url: Option<String>,
    /// Source URL when the attachment is a scraped link preview.
    pub og_scrape_url: Option<String>,
    pub actions: Vec<AttachmentAction>,
}

impl Attachment {
    /// Create an attachment of `kind` with no metadata.
    #[must_use]
    pub fn new(kind: AttachmentKind) -> Self {
        Self {
            kind,
            title: None,
            url: None,
            og_scrape_url: None,
            actions: Vec::new(),
        }
    }

    /// Set the title (builder pattern).
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark as a link preview scraped from `url` (builder pattern).
    #[must_use]
    pub fn with_og_scrape_url(mut self, url: impl Into<String>) -> Self {
        self.og_scrape_url = Some(url.into());
        self
    }

    /// Add an action button (builder pattern).
    #[must_use]
    pub fn with_action(mut self, action: AttachmentAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Whether this renders as a rich embed (link preview or giphy card).
    #[must_use]
    pub fn is_rich_embed(&self) -> bool {
        self.og_scrape_url.is_some() || self.kind == AttachmentKind::Giphy
    }

    /// Whether the attachment carries interactive actions.
    #[must_use]
    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }
}

/// Attachments partitioned by how the overlay lays them out.
///
/// Order within each bucket follows the message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttachmentSet {
    /// File, audio and video attachments.
    pub files: Vec<Attachment>,
    /// Plain images (not link previews), shown as a gallery.
    pub images: Vec<Attachment>,
    /// Everything else: link previews, giphy cards, custom kinds.
    pub other: Vec<Attachment>,
}

impl AttachmentSet {
    /// Split a message's attachments into files, images and other.
    #[must_use]
    pub fn split(attachments: &[Attachment]) -> Self {
        let mut set = Self::default();
        for attachment in attachments {
            if attachment.kind.is_file_like() {
                set.files.push(attachment.clone());
            } else if attachment.kind == AttachmentKind::Image && !attachment.is_rich_embed() {
                set.images.push(attachment.clone());
            } else {
                set.other.push(attachment.clone());
            }
        }
        set
    }

    /// Whether there are no attachments at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.images.is_empty() && self.other.is_empty()
    }
}

/// The message a reply quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedMessage {
    pub author: String,
    pub text: String,
}

/// A chat message as presented in the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub quoted: Option<QuotedMessage>,
    pub attachments: Vec<Attachment>,
    /// Number of thread replies.
    pub reply_count: u32,
}

impl Message {
    /// Create a plain text message.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Attach a quoted message (builder pattern).
    #[must_use]
    pub fn with_quoted(mut self, author: impl Into<String>, text: impl Into<String>) -> Self {
        self.quoted = Some(QuotedMessage {
            author: author.into(),
            text: text.into(),
        });
        self
    }

    /// Add an attachment (builder pattern).
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Set the thread reply count (builder pattern).
    #[must_use]
    pub fn with_reply_count(mut self, count: u32) -> Self {
        self.reply_count = count;
        self
    }
}

/// One reaction on a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    /// Reaction kind, e.g. `"love"`.
    pub kind: String,
    pub user: Option<String>,
}

impl Reaction {
    /// Create a reaction of `kind`.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            user: None,
        }
    }
}

/// Where a message sits within a run of messages from the same author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupPosition {
    Top,
    Middle,
    Bottom,
    /// The only message of its group.
    #[default]
    Single,
}

impl GroupPosition {
    /// Whether the message is last in its visual group.
    #[must_use]
    pub const fn is_last(self) -> bool {
        matches!(self, Self::Bottom | Self::Single)
    }
}

/// A contextual action listed under the message (reply, copy, delete...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAction {
    pub id: String,
    pub title: String,
    pub destructive: bool,
}

impl MessageAction {
    /// Create a non-destructive action.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            destructive: false,
        }
    }
}

/// One message content block, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    QuotedReply,
    Gallery,
    Files,
    Text,
    Attachments,
}

/// Content order used when the host supplies none.
pub const DEFAULT_CONTENT_ORDER: [ContentKind; 5] = [
    ContentKind::QuotedReply,
    ContentKind::Gallery,
    ContentKind::Files,
    ContentKind::Text,
    ContentKind::Attachments,
];

// ---------------------------------------------------------------------------
// OverlayData
// ---------------------------------------------------------------------------

/// Immutable snapshot presented while the message overlay is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayData {
    pub message: Option<Message>,
    pub attachments: AttachmentSet,
    /// Latest reactions, most recent last. `None` when the backend sent none.
    pub reactions: Option<Vec<Reaction>>,
    /// Title of the reactions summary, e.g. "Message Reactions".
    pub reaction_title: Option<String>,
    pub alignment: Alignment,
    pub group_position: GroupPosition,
    pub content_order: Vec<ContentKind>,
    pub actions: Vec<MessageAction>,
    /// Whether the message is shown inside a thread list.
    pub thread_list: bool,
}

impl Default for OverlayData {
    fn default() -> Self {
        Self {
            message: None,
            attachments: AttachmentSet::default(),
            reactions: None,
            reaction_title: None,
            alignment: Alignment::default(),
            group_position: GroupPosition::default(),
            content_order: DEFAULT_CONTENT_ORDER.to_vec(),
            actions: Vec::new(),
            thread_list: false,
        }
    }
}

impl OverlayData {
    /// Snapshot for `message`, splitting its attachments.
    #[must_use]
    pub fn for_message(message: Message) -> Self {
        Self {
            attachments: AttachmentSet::split(&message.attachments),
            message: Some(message),
            ..Self::default()
        }
    }

    /// Set the alignment (builder pattern).
    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the group position (builder pattern).
    #[must_use]
    pub fn with_group_position(mut self, position: GroupPosition) -> Self {
        self.group_position = position;
        self
    }

    /// Set the reactions and their summary title (builder pattern).
    #[must_use]
    pub fn with_reactions(mut self, title: impl Into<String>, reactions: Vec<Reaction>) -> Self {
        self.reaction_title = Some(title.into());
        self.reactions = Some(reactions);
        self
    }

    /// Set the action list (builder pattern).
    #[must_use]
    pub fn with_actions(mut self, actions: Vec<MessageAction>) -> Self {
        self.actions = actions;
        self
    }

    /// Set the content order (builder pattern).
    #[must_use]
    pub fn with_content_order(mut self, order: Vec<ContentKind>) -> Self {
        self.content_order = order;
        self
    }

    /// Mark as shown inside a thread list (builder pattern).
    #[must_use]
    pub fn in_thread_list(mut self, thread_list: bool) -> Self {
        self.thread_list = thread_list;
        self
    }

    /// Latest reactions; empty when absent.
    #[must_use]
    pub fn reactions(&self) -> &[Reaction] {
        self.reactions.as_deref().unwrap_or(&[])
    }

    /// Kinds of the latest reactions, in order.
    pub fn reaction_kinds(&self) -> impl Iterator<Item = &str> + '_ {
        self.reactions().iter().map(|r| r.kind.as_str())
    }

    /// Whether the reactions summary is displayed.
    #[must_use]
    pub fn shows_reaction_summary(&self) -> bool {
        self.reaction_title.is_some() && !self.reactions().is_empty()
    }

    /// Whether the bubble shows a thread-reply summary under it.
    #[must_use]
    pub fn shows_thread_summary(&self) -> bool {
        !self.thread_list && self.message.as_ref().is_some_and(|m| m.reply_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn att(kind: AttachmentKind) -> Attachment {
        Attachment::new(kind)
    }

    #[test]
    fn split_partitions_by_kind() {
        let attachments = vec![
            att(AttachmentKind::Image).with_title("a"),
            att(AttachmentKind::File),
            att(AttachmentKind::Image).with_og_scrape_url("https://example.com"),
            att(AttachmentKind::Video),
            att(AttachmentKind::Giphy),
            att(AttachmentKind::Audio),
            att(AttachmentKind::Image).with_title("b"),
            att(AttachmentKind::Custom("poll".into())),
        ];
        let set = AttachmentSet::split(&attachments);
        assert_eq!(set.files.len(), 3);
        assert_eq!(set.images.len(), 2);
        assert_eq!(set.other.len(), 3);
        assert_eq!(set.images[0].title.as_deref(), Some("a"));
        assert_eq!(set.images[1].title.as_deref(), Some("b"));
        assert!(set.other[0].is_rich_embed());
        assert_eq!(set.other[2].kind, AttachmentKind::Custom("poll".into()));
    }

    #[test]
    fn split_empty() {
        assert!(AttachmentSet::split(&[]).is_empty());
    }

    #[test]
    fn for_message_splits_attachments() {
        let message = Message::new("m1", "hi").with_attachment(att(AttachmentKind::File));
        let data = OverlayData::for_message(message);
        assert_eq!(data.attachments.files.len(), 1);
        assert_eq!(data.content_order, DEFAULT_CONTENT_ORDER.to_vec());
    }

    #[test]
    fn absent_reactions_are_empty() {
        let data = OverlayData::for_message(Message::new("m1", "hi"));
        assert!(data.reactions().is_empty());
        assert_eq!(data.reaction_kinds().count(), 0);
        assert!(!data.shows_reaction_summary());
    }

    #[test]
    fn reaction_summary_needs_title_and_reactions() {
        let data = OverlayData::for_message(Message::new("m1", "hi"))
            .with_reactions("Message Reactions", vec![Reaction::new("love")]);
        assert!(data.shows_reaction_summary());
        let kinds: Vec<_> = data.reaction_kinds().collect();
        assert_eq!(kinds, vec!["love"]);

        let empty = OverlayData::for_message(Message::new("m1", "hi"))
            .with_reactions("Message Reactions", Vec::new());
        assert!(!empty.shows_reaction_summary());
    }

    #[test]
    fn thread_summary_hidden_in_thread_list() {
        let message = Message::new("m1", "hi").with_reply_count(3);
        let data = OverlayData::for_message(message.clone());
        assert!(data.shows_thread_summary());
        let in_thread = OverlayData::for_message(message).in_thread_list(true);
        assert!(!in_thread.shows_thread_summary());
    }

    #[test]
    fn group_position_last() {
        assert!(GroupPosition::Bottom.is_last());
        assert!(GroupPosition::Single.is_last());
        assert!(!GroupPosition::Top.is_last());
        assert!(!GroupPosition::Middle.is_last());
    }
}
