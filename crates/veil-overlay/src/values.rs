#![forbid(unsafe_code)]

//! Animated value store: the four scalar cells behind the overlay.
//!
//! | Cell | Rest | Meaning |
//! |------|------|---------|
//! | `show_screen` | 0 | 0 = fully hidden/shrunk, 1 = fully shown |
//! | `translate_y` | 0 | drag offset below the rest position |
//! | `scale` | 1 | bubble scale during drag |
//! | `opacity` | 1 | bubble opacity during drag/dismiss |
//!
//! Cells are created once with the controller and reset, never recreated,
//! across open/close cycles.
//!
//! # Invariants
//!
//! 1. `show_screen` is written only by the transition driver.
//! 2. [`ValueStore::reset_offsets`] cancels every writer of the offset cells.

use veil_core::cell::AnimatedCell;

/// Identifies one cell of the [`ValueStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellId {
    ShowScreen,
    TranslateY,
    Scale,
    Opacity,
}

impl CellId {
    /// All cells, in storage order.
    pub const ALL: [CellId; 4] = [
        CellId::ShowScreen,
        CellId::TranslateY,
        CellId::Scale,
        CellId::Opacity,
    ];

    /// Cells the drag gesture writes.
    pub const DRAG: [CellId; 3] = [CellId::TranslateY, CellId::Scale, CellId::Opacity];

    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::ShowScreen => 0,
            Self::TranslateY => 1,
            Self::Scale => 2,
            Self::Opacity => 3,
        }
    }

    /// Stable name, for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ShowScreen => "show_screen",
            Self::TranslateY => "translate_y",
            Self::Scale => "scale",
            Self::Opacity => "opacity",
        }
    }
}

/// Plain copy of every cell value for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueSnapshot {
    pub show_screen: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl Default for ValueSnapshot {
    fn default() -> Self {
        Self {
            show_screen: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

/// The overlay's animated scalar cells.
#[derive(Debug, Clone)]
pub struct ValueStore {
    cells: [AnimatedCell; 4],
}

impl Default for ValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueStore {
    /// Create the cells at their rest values (hidden).
    #[must_use]
    pub fn new() -> Self {
        let rest = ValueSnapshot::default();
        Self {
            cells: [
                AnimatedCell::new(CellId::ShowScreen.name(), rest.show_screen),
                AnimatedCell::new(CellId::TranslateY.name(), rest.translate_y),
                AnimatedCell::new(CellId::Scale.name(), rest.scale),
                AnimatedCell::new(CellId::Opacity.name(), rest.opacity),
            ],
        }
    }

    /// Borrow one cell.
    #[inline]
    #[must_use]
    pub fn cell(&self, id: CellId) -> &AnimatedCell {
        &self.cells[id.index()]
    }

    /// Mutably borrow one cell.
    #[inline]
    pub fn cell_mut(&mut self, id: CellId) -> &mut AnimatedCell {
        &mut self.cells[id.index()]
    }

    /// Current value of one cell.
    #[inline]
    #[must_use]
    pub fn get(&self, id: CellId) -> f64 {
        self.cell(id).value()
    }

    /// Copy all values.
    #[must_use]
    pub fn snapshot(&self) -> ValueSnapshot {
        ValueSnapshot {
            show_screen: self.get(CellId::ShowScreen),
            translate_y: self.get(CellId::TranslateY),
            scale: self.get(CellId::Scale),
            opacity: self.get(CellId::Opacity),
        }
    }

    /// Jump `translate_y`, `scale` and `opacity` back to rest, cancelling
    /// whatever owned them.
    pub fn reset_offsets(&mut self) {
        let rest = ValueSnapshot::default();
        self.cell_mut(CellId::TranslateY).reset_to(rest.translate_y);
        self.cell_mut(CellId::Scale).reset_to(rest.scale);
        self.cell_mut(CellId::Opacity).reset_to(rest.opacity);
    }

    /// Whether any cell is being animated.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.cells.iter().any(AnimatedCell::is_animating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::animation::{Timing, TimingConfig};
    use veil_core::cell::Writer;

    #[test]
    fn new_store_is_at_rest() {
        let store = ValueStore::new();
        assert_eq!(store.snapshot(), ValueSnapshot::default());
        assert!(!store.is_animating());
    }

    #[test]
    fn cell_ids_index_their_own_cell() {
        let store = ValueStore::new();
        for id in CellId::ALL {
            assert_eq!(store.cell(id).name(), id.name());
        }
    }

    #[test]
    fn reset_offsets_cancels_and_jumps() {
        let mut store = ValueStore::new();
        store
            .cell_mut(CellId::TranslateY)
            .start(Timing::new(300.0, 844.0, TimingConfig::default()));
        store.cell_mut(CellId::Opacity).begin_gesture();
        store.cell_mut(CellId::Opacity).set(0.8).unwrap();

        store.reset_offsets();
        let snap = store.snapshot();
        assert_eq!(snap.translate_y, 0.0);
        assert_eq!(snap.opacity, 1.0);
        assert_eq!(snap.scale, 1.0);
        for id in CellId::DRAG {
            assert_eq!(store.cell(id).writer(), Writer::Idle);
        }
    }

    #[test]
    fn reset_offsets_leaves_show_screen() {
        let mut store = ValueStore::new();
        store
            .cell_mut(CellId::ShowScreen)
            .start(Timing::new(0.0, 1.0, TimingConfig::default()));
        store.reset_offsets();
        assert!(store.cell(CellId::ShowScreen).is_animating());
    }
}
