//! Stroke store with linear snapshot history
//!
//! The store owns the authoritative stroke collection and its edit history:
//! - Input comes in via `begin_stroke`, `extend_stroke`, `finish_stroke`
//! - Eraser mode turns the same calls into eraser passes
//! - Every completed mutating operation records one history snapshot
//! - `undo` and `clear_all` move the history cursor
//!
//! The current collection is always the snapshot at the history cursor, so
//! the two can never drift apart. Snapshots share strokes through `Arc`; an
//! in-progress stroke is copied on its first write after a snapshot.

mod stroke;
mod undo;

use std::sync::Arc;

use glowdraw_config::DrawConfig;

use crate::types::{ColorParseError, Rgb, Stroke, ToolMode};

/// Smallest offset a single-point stroke gets on finish, so it never has a
/// zero-length segment
const MIN_TAP_NUDGE: f32 = 1e-4;

/// Authoritative stroke collection, history and tool state
#[derive(Debug, Clone)]
pub struct StrokeStore {
    /// History snapshots (index 0 is always the empty starting state)
    pub(crate) history: Vec<Vec<Arc<Stroke>>>,
    /// Index of the snapshot that is currently visible
    pub(crate) cursor: usize,
    /// Draw or erase
    pub(crate) mode: ToolMode,
    /// Color for new strokes
    pub(crate) color: Rgb,
    pub(crate) eraser_radius: f32,
    pub(crate) sampling_threshold: f32,
    pub(crate) tap_nudge: f32,
    /// True between pointer down and pointer up
    pub(crate) drawing: bool,
    /// True while the last stroke is being extended by the current drag
    pub(crate) stroke_open: bool,
    /// True once the current erase drag has recorded its snapshot
    pub(crate) erase_frame_open: bool,
    /// Bumped whenever the visible collection changes
    pub(crate) revision: u64,
}

impl Default for StrokeStore {
    fn default() -> Self {
        let config = DrawConfig::default();
        Self::with_settings(
            Rgb::WHITE,
            config.eraser_radius,
            config.sampling_threshold,
            config.tap_nudge,
        )
    }
}

impl StrokeStore {
    /// Create an empty store with explicit tunables.
    ///
    /// `tap_nudge` is kept at least [`MIN_TAP_NUDGE`] in magnitude.
    pub fn with_settings(
        color: Rgb,
        eraser_radius: f32,
        sampling_threshold: f32,
        tap_nudge: f32,
    ) -> Self {
        Self {
            history: vec![Vec::new()],
            cursor: 0,
            mode: ToolMode::Draw,
            color,
            eraser_radius,
            sampling_threshold,
            tap_nudge: if tap_nudge.abs() < MIN_TAP_NUDGE {
                MIN_TAP_NUDGE
            } else {
                tap_nudge
            },
            drawing: false,
            stroke_open: false,
            erase_frame_open: false,
            revision: 0,
        }
    }

    /// Create an empty store from the shared configuration
    pub fn from_config(config: &DrawConfig) -> Result<Self, ColorParseError> {
        let color = Rgb::from_hex(&config.initial_color)?;
        Ok(Self::with_settings(
            color,
            config.eraser_radius,
            config.sampling_threshold,
            config.tap_nudge,
        ))
    }

    /// The current stroke collection
    pub fn strokes(&self) -> &[Arc<Stroke>] {
        &self.history[self.cursor]
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes().is_empty()
    }

    /// Set the color used by strokes started from now on
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Switch tools. A stroke being drawn by the current drag is closed, so
    /// later moves in draw mode never extend it or an older stroke.
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.mode = mode;
        self.stroke_open = false;
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Flip between drawing and erasing
    pub fn toggle_eraser(&mut self) -> ToolMode {
        self.set_mode(match self.mode {
            ToolMode::Draw => ToolMode::Erase,
            ToolMode::Erase => ToolMode::Draw,
        });
        self.mode
    }

    pub fn is_erasing(&self) -> bool {
        self.mode == ToolMode::Erase
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn set_eraser_radius(&mut self, radius: f32) {
        self.eraser_radius = radius.max(0.0);
    }

    pub fn eraser_radius(&self) -> f32 {
        self.eraser_radius
    }

    /// Change counter for the visible collection, used to skip geometry rebuilds
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eraser;
    use crate::types::Point;

    fn p(x: f32, z: f32) -> Point {
        Point::new(x, 0.0, z)
    }

    #[test]
    fn test_store_creation() {
        let store = StrokeStore::default();
        assert!(store.is_empty());
        assert_eq!(store.history_len(), 1);
        assert_eq!(store.history_cursor(), 0);
        assert!(!store.can_undo());
        assert!(!store.is_drawing());
        assert_eq!(store.color(), Rgb::WHITE);
    }

    #[test]
    fn test_from_config_rejects_bad_color() {
        let config = DrawConfig {
            initial_color: "white".into(),
            ..DrawConfig::default()
        };
        assert!(StrokeStore::from_config(&config).is_err());
    }

    #[test]
    fn test_draw_single_segment() {
        let mut store = StrokeStore::default();
        store.begin_stroke(p(0.0, 0.0));
        assert!(store.is_drawing());
        store.extend_stroke(p(0.0, 1.0));
        store.finish_stroke();

        assert!(!store.is_drawing());
        assert_eq!(store.stroke_count(), 1);
        assert_eq!(store.strokes()[0].len(), 2);
        assert_eq!(store.history_len(), 2);
        assert!(store.can_undo());
    }

    #[test]
    fn test_erase_removes_one_stroke() {
        let mut store = StrokeStore::default();
        store.begin_stroke(p(0.0, 0.0));
        store.extend_stroke(p(1.0, 0.0));
        store.finish_stroke();
        store.begin_stroke(p(5.0, 5.0));
        store.extend_stroke(p(5.5, 5.0));
        store.finish_stroke();
        let before = store.stroke_count();

        store.toggle_eraser();
        store.set_eraser_radius(0.15);
        store.begin_stroke(p(5.0, 5.0));
        store.finish_stroke();

        assert_eq!(store.stroke_count(), before - 1);
        assert_eq!(store.strokes()[0].points()[0], p(0.0, 0.0));
        assert_eq!(store.history_len(), 4);
    }

    #[test]
    fn test_tap_is_normalized() {
        let mut store = StrokeStore::default();
        store.begin_stroke(p(1.0, 1.0));
        let history_len = store.history_len();
        store.finish_stroke();

        let stroke = &store.strokes()[0];
        assert_eq!(stroke.len(), 2);
        let (a, b) = (stroke.points()[0], stroke.points()[1]);
        assert_ne!(a, b);
        assert!((b.x - (a.x + 0.01)).abs() < 1e-6);
        assert_eq!(b.y, a.y);
        assert_eq!(b.z, a.z);
        // Normalization rewrites the current snapshot instead of pushing one
        assert_eq!(store.history_len(), history_len);
    }

    #[test]
    fn test_clear_all_resets_history() {
        let mut store = StrokeStore::default();
        for i in 0..3 {
            store.begin_stroke(p(i as f32, 0.0));
            store.extend_stroke(p(i as f32, 1.0));
            store.finish_stroke();
        }
        store.clear_all();

        assert!(store.is_empty());
        assert_eq!(store.history_cursor(), 0);
        assert_eq!(store.history_len(), 1);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_sampling_threshold() {
        let mut store = StrokeStore::default();
        store.begin_stroke(p(0.0, 0.0));
        store.extend_stroke(p(0.03, 0.0));
        store.extend_stroke(p(0.05, 0.0));
        store.extend_stroke(p(0.06, 0.0));
        // Vertical motion does not count toward the threshold
        store.extend_stroke(Point::new(0.07, 5.0, 0.0));
        store.finish_stroke();

        let points = store.strokes()[0].points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1], p(0.06, 0.0));
    }

    #[test]
    fn test_sampling_law_holds_for_dense_input() {
        let mut store = StrokeStore::default();
        store.begin_stroke(p(0.0, 0.0));
        for i in 1..500 {
            let t = i as f32 * 0.013;
            store.extend_stroke(p(t.cos() * t, t.sin()));
        }
        store.finish_stroke();

        let stroke = &store.strokes()[0];
        assert!(stroke.len() > 2);
        for (a, b) in stroke.segments() {
            assert!(a.planar_distance(&b) >= 0.05);
        }
    }

    #[test]
    fn test_extend_without_begin_is_ignored() {
        let mut store = StrokeStore::default();
        store.extend_stroke(p(1.0, 1.0));
        assert!(store.is_empty());

        store.begin_stroke(p(0.0, 0.0));
        store.extend_stroke(p(1.0, 0.0));
        store.finish_stroke();
        let revision = store.revision();
        store.extend_stroke(p(2.0, 0.0));
        assert_eq!(store.strokes()[0].len(), 2);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_finish_on_empty_is_noop() {
        let mut store = StrokeStore::default();
        store.finish_stroke();
        assert!(store.is_empty());
        assert_eq!(store.history_len(), 1);
    }

    #[test]
    fn test_erase_drag_is_one_history_frame() {
        let mut store = StrokeStore::default();
        for i in 0..4 {
            let x = i as f32 * 2.0;
            store.begin_stroke(p(x, 0.0));
            store.extend_stroke(p(x, 1.0));
            store.finish_stroke();
        }
        assert_eq!(store.history_len(), 5);

        store.toggle_eraser();
        store.begin_stroke(p(0.0, 0.0));
        store.extend_stroke(p(2.0, 0.0));
        store.extend_stroke(p(4.0, 0.0));
        store.finish_stroke();

        assert_eq!(store.stroke_count(), 1);
        assert_eq!(store.history_len(), 6);

        assert!(store.undo());
        assert_eq!(store.stroke_count(), 4);
    }

    #[test]
    fn test_erase_drag_starting_on_empty_space() {
        let mut store = StrokeStore::default();
        store.begin_stroke(p(3.0, 3.0));
        store.extend_stroke(p(3.0, 4.0));
        store.finish_stroke();

        store.toggle_eraser();
        store.begin_stroke(p(0.0, 0.0));
        assert_eq!(store.history_len(), 2);
        store.extend_stroke(p(3.0, 3.0));
        store.finish_stroke();

        assert!(store.is_empty());
        assert_eq!(store.history_len(), 3);
        assert!(store.undo());
        assert_eq!(store.stroke_count(), 1);
    }

    #[test]
    fn test_eraser_completeness() {
        let mut store = StrokeStore::default();
        for i in 0..10 {
            let z = i as f32 * 0.1;
            store.begin_stroke(p(0.0, z));
            store.extend_stroke(p(0.5, z));
            store.extend_stroke(p(1.0, z));
            store.finish_stroke();
        }
        store.toggle_eraser();
        store.set_eraser_radius(0.25);
        let center = p(0.5, 0.45);
        store.begin_stroke(center);
        store.finish_stroke();

        assert!(store.stroke_count() < 10);
        for stroke in store.strokes() {
            assert!(!eraser::touches(stroke, &center, 0.25));
        }
    }

    #[test]
    fn test_tool_switch_mid_drag_leaves_finished_strokes_alone() {
        let mut store = StrokeStore::default();
        store.begin_stroke(p(0.0, 0.0));
        store.extend_stroke(p(1.0, 0.0));
        store.finish_stroke();
        let finished = store.strokes()[0].points().to_vec();

        store.begin_stroke(p(5.0, 5.0));
        store.toggle_eraser();
        store.extend_stroke(p(5.0, 5.0));
        assert_eq!(store.stroke_count(), 1);
        store.toggle_eraser();
        store.extend_stroke(p(3.0, 3.0));
        store.finish_stroke();

        assert_eq!(store.stroke_count(), 1);
        assert_eq!(store.strokes()[0].points(), finished.as_slice());
    }

    #[test]
    fn test_tool_switch_closes_active_stroke() {
        let mut store = StrokeStore::default();
        store.begin_stroke(p(0.0, 0.0));
        store.extend_stroke(p(1.0, 0.0));
        store.toggle_eraser();
        store.toggle_eraser();
        store.extend_stroke(p(2.0, 0.0));
        store.finish_stroke();

        assert_eq!(store.strokes()[0].len(), 2);
        assert!(!store.is_drawing());
    }

    #[test]
    fn test_zero_tap_nudge_is_clamped() {
        let mut store = StrokeStore::with_settings(Rgb::WHITE, 0.15, 0.05, 0.0);
        store.begin_stroke(p(1.0, 1.0));
        store.finish_stroke();

        let points = store.strokes()[0].points();
        assert_eq!(points.len(), 2);
        assert!(points[0].planar_distance(&points[1]) > 0.0);
    }

    #[test]
    fn test_color_is_fixed_per_stroke() {
        let mut store = StrokeStore::default();
        let red = Rgb::from_hex("#ff0000").unwrap();
        store.set_color(red);
        store.begin_stroke(p(0.0, 0.0));
        store.set_color(Rgb::WHITE);
        store.extend_stroke(p(1.0, 0.0));
        store.finish_stroke();
        assert_eq!(store.strokes()[0].color(), red);
    }

    #[test]
    fn test_history_snapshots_are_not_mutated_by_later_edits() {
        let mut store = StrokeStore::default();
        store.begin_stroke(p(0.0, 0.0));
        store.extend_stroke(p(1.0, 0.0));
        store.finish_stroke();
        store.begin_stroke(p(0.0, 2.0));
        store.extend_stroke(p(1.0, 2.0));
        store.extend_stroke(p(2.0, 2.0));
        store.finish_stroke();

        assert!(store.undo());
        assert_eq!(store.stroke_count(), 1);
        assert_eq!(store.strokes()[0].len(), 2);
    }
}
