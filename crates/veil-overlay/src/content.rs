#![forbid(unsafe_code)]

//! Content dispatch: turns [`OverlayData`] into an ordered list of content
//! blocks and hands each one to a pluggable [`ContentRenderer`].
//!
//! Rules, applied in `content_order`:
//!
//! - Blocks with an empty payload are skipped.
//! - `Text` is suppressed when the first non-file attachment carries
//!   actions (the attachment renders its own text and buttons).
//! - No message means no blocks.

use unicode_segmentation::UnicodeSegmentation;
use veil_runtime::overlay::{Attachment, ContentKind, OverlayData, QuotedMessage};

/// One renderable region of the message bubble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContentBlock<'a> {
    QuotedReply(&'a QuotedMessage),
    Gallery(&'a [Attachment]),
    Files(&'a [Attachment]),
    Text { text: &'a str, emoji_only: bool },
    Attachments(&'a [Attachment]),
}

impl ContentBlock<'_> {
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::QuotedReply(_) => ContentKind::QuotedReply,
            Self::Gallery(_) => ContentKind::Gallery,
            Self::Files(_) => ContentKind::Files,
            Self::Text { .. } => ContentKind::Text,
            Self::Attachments(_) => ContentKind::Attachments,
        }
    }
}

/// Host-supplied renderer, one method per content kind.
pub trait ContentRenderer {
    type Output;

    fn quoted_reply(&mut self, quoted: &QuotedMessage) -> Self::Output;
    fn gallery(&mut self, images: &[Attachment]) -> Self::Output;
    fn files(&mut self, files: &[Attachment]) -> Self::Output;
    fn text(&mut self, text: &str, emoji_only: bool) -> Self::Output;
    fn attachments(&mut self, attachments: &[Attachment]) -> Self::Output;
}

/// Whether the text block is hidden in favour of an actionable attachment.
#[must_use]
pub fn text_suppressed(data: &OverlayData) -> bool {
    data.attachments
        .other
        .first()
        .is_some_and(Attachment::has_actions)
}

/// Content blocks of `data`, in render order.
#[must_use]
pub fn blocks(data: &OverlayData) -> Vec<ContentBlock<'_>> {
    let Some(message) = data.message.as_ref() else {
        return Vec::new();
    };
    let set = &data.attachments;
    let mut out = Vec::with_capacity(data.content_order.len());
    for kind in &data.content_order {
        let block = match kind {
            ContentKind::QuotedReply => message.quoted.as_ref().map(ContentBlock::QuotedReply),
            ContentKind::Gallery => {
                (!set.images.is_empty()).then_some(ContentBlock::Gallery(&set.images))
            }
            ContentKind::Files => (!set.files.is_empty()).then_some(ContentBlock::Files(&set.files)),
            ContentKind::Text => (!message.text.trim().is_empty() && !text_suppressed(data)).then(
                || ContentBlock::Text {
                    text: &message.text,
                    emoji_only: is_emoji_only(&message.text),
                },
            ),
            ContentKind::Attachments => {
                (!set.other.is_empty()).then_some(ContentBlock::Attachments(&set.other))
            }
        };
        out.extend(block);
    }
    out
}

/// Render every block of `data` through `renderer`.
pub fn render_content<R: ContentRenderer>(data: &OverlayData, renderer: &mut R) -> Vec<R::Output> {
    blocks(data)
        .into_iter()
        .map(|block| match block {
            ContentBlock::QuotedReply(q) => renderer.quoted_reply(q),
            ContentBlock::Gallery(images) => renderer.gallery(images),
            ContentBlock::Files(files) => renderer.files(files),
            ContentBlock::Text { text, emoji_only } => renderer.text(text, emoji_only),
            ContentBlock::Attachments(other) => renderer.attachments(other),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Emoji-only detection
// ---------------------------------------------------------------------------

const KEYCAP: char = '\u{20E3}';

fn is_pictographic(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1F000..=0x1FAFF
            | 0x2600..=0x27BF
            | 0x2300..=0x23FF
            | 0x2B00..=0x2BFF
            | 0x2190..=0x21FF
            | 0x00A9
            | 0x00AE
            | 0x203C
            | 0x2049
            | 0x2122
            | 0x2139
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
    )
}

fn is_emoji_grapheme(g: &str) -> bool {
    g.chars().any(|c| is_pictographic(c) || c == KEYCAP)
}

/// Whether `text` consists only of emoji (ignoring whitespace).
///
/// Works on extended grapheme clusters, so ZWJ sequences, skin-tone
/// modifiers, flags and keycaps each count as one emoji.
#[must_use]
pub fn is_emoji_only(text: &str) -> bool {
    let mut seen = false;
    for g in text.graphemes(true) {
        if g.chars().all(char::is_whitespace) {
            continue;
        }
        if !is_emoji_grapheme(g) {
            return false;
        }
        seen = true;
    }
    seen
}
