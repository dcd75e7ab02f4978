#![forbid(unsafe_code)]

//! Re-render suppression.
//!
//! A new prop set needs a render unless `visible`, the alignment, the
//! reaction-summary title and the ordered reaction kinds all match the
//! previous one. Reactions compare by kind only; message text and the rest
//! of the data do not participate.

use std::sync::Arc;

use veil_core::geometry::Alignment;
use veil_runtime::overlay::OverlayData;

/// The props the overlay is rendered from.
#[derive(Debug, Clone, Default)]
pub struct OverlayProps {
    pub visible: bool,
    pub data: Option<Arc<OverlayData>>,
}

impl OverlayProps {
    #[must_use]
    pub fn new(visible: bool, data: Option<Arc<OverlayData>>) -> Self {
        Self { visible, data }
    }

    fn alignment(&self) -> Option<Alignment> {
        self.data.as_ref().map(|d| d.alignment)
    }

    fn reaction_title(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.reaction_title.as_deref())
    }

    fn reaction_kinds(&self) -> impl Iterator<Item = &str> + '_ {
        self.data.iter().flat_map(|d| d.reaction_kinds())
    }
}

/// Whether `next` can reuse the render of `prev`.
#[must_use]
pub fn should_skip_render(prev: &OverlayProps, next: &OverlayProps) -> bool {
    prev.visible == next.visible
        && prev.alignment() == next.alignment()
        && prev.reaction_title() == next.reaction_title()
        && prev.reaction_kinds().eq(next.reaction_kinds())
}

/// Remembers the last rendered props.
#[derive(Debug, Clone, Default)]
pub struct RenderGate {
    last: Option<OverlayProps>,
}

impl RenderGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `next`; returns whether a render is needed. The first offer
    /// always renders.
    pub fn offer(&mut self, next: OverlayProps) -> bool {
        let skip = self
            .last
            .as_ref()
            .is_some_and(|prev| should_skip_render(prev, &next));
        if !skip {
            self.last = Some(next);
        }
        !skip
    }

    /// Forget the last props so the next offer renders.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_runtime::overlay::{Message, Reaction};

    fn props(text: &str, kinds: &[&str]) -> OverlayProps {
        let data = OverlayData::for_message(Message::new("m", text))
            .with_reactions("Reactions", kinds.iter().map(|k| Reaction::new(*k)).collect());
        OverlayProps::new(true, Some(Arc::new(data)))
    }

    #[test]
    fn text_change_alone_is_skipped() {
        assert!(should_skip_render(&props("one", &["like"]), &props("two", &["like"])));
    }

    #[test]
    fn visible_change_renders() {
        let a = props("x", &["like"]);
        let mut b = a.clone();
        b.visible = false;
        assert!(!should_skip_render(&a, &b));
    }

    #[test]
    fn alignment_change_renders() {
        let a = props("x", &[]);
        let data = (*a.data.clone().unwrap()).clone().with_alignment(Alignment::Right);
        let b = OverlayProps::new(true, Some(Arc::new(data)));
        assert!(!should_skip_render(&a, &b));
    }

    #[test]
    fn title_change_renders() {
        let a = props("x", &["like"]);
        let mut data = (*a.data.clone().unwrap()).clone();
        data.reaction_title = Some("Who reacted".into());
        let b = OverlayProps::new(true, Some(Arc::new(data)));
        assert!(!should_skip_render(&a, &b));
    }

    #[test]
    fn reaction_kinds_compare_in_order() {
        assert!(!should_skip_render(&props("x", &["like", "love"]), &props("x", &["love", "like"])));
        assert!(!should_skip_render(&props("x", &["like"]), &props("x", &["like", "like"])));
    }

    #[test]
    fn reactions_compare_by_kind_only() {
        let a = props("x", &["like"]);
        let mut data = (*a.data.clone().unwrap()).clone();
        data.reactions = Some(vec![Reaction {
            kind: "like".into(),
            user: Some("grace".into()),
        }]);
        let b = OverlayProps::new(true, Some(Arc::new(data)));
        assert!(should_skip_render(&a, &b));
    }

    #[test]
    fn absent_and_empty_reactions_match() {
        let a = OverlayProps::new(true, Some(Arc::new(OverlayData::for_message(Message::new("m", "x")))));
        let mut data = (*a.data.clone().unwrap()).clone();
        data.reactions = Some(Vec::new());
        let b = OverlayProps::new(true, Some(Arc::new(data)));
        assert!(should_skip_render(&a, &b));
    }

    #[test]
    fn gate_renders_first_then_skips() {
        let mut gate = RenderGate::new();
        assert!(gate.offer(props("a", &["like"])));
        assert!(!gate.offer(props("b", &["like"])));
        assert!(gate.offer(props("b", &["wow"])));
        gate.invalidate();
        assert!(gate.offer(props("b", &["wow"])));
    }
}
