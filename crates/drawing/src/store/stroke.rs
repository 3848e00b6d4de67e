//! Stroke input handling for the stroke store

use std::sync::Arc;

use tracing::debug;

use crate::eraser;
use crate::types::{Point, Stroke, ToolMode};

use super::StrokeStore;

impl StrokeStore {
    /// Begin a stroke at `point`.
    ///
    /// In draw mode this starts a new single-point stroke with the current
    /// color and records a snapshot. In erase mode it runs an eraser pass
    /// instead, recording a snapshot only if something was removed.
    pub fn begin_stroke(&mut self, point: Point) {
        self.drawing = true;
        self.erase_frame_open = false;
        self.stroke_open = false;

        match self.mode {
            ToolMode::Erase => {
                self.erase_pass(point);
            }
            ToolMode::Draw => {
                let mut next = self.strokes().to_vec();
                next.push(Arc::new(Stroke::new(point, self.color)));
                self.push_snapshot(next);
                self.stroke_open = true;
                debug!(
                    "Began stroke {} at ({:.2}, {:.2}, {:.2})",
                    self.stroke_count(),
                    point.x,
                    point.y,
                    point.z
                );
            }
        }
    }

    /// Continue the current drag at `point`.
    ///
    /// Draw mode appends the point to the active stroke only if it is farther
    /// than the sampling threshold from the previous point. Erase mode runs
    /// an eraser pass that shares the drag's single history frame. A drag
    /// that began on empty space has no frame yet, so its first removal here
    /// records one.
    pub fn extend_stroke(&mut self, point: Point) {
        if !self.drawing || self.is_empty() {
            return;
        }

        match self.mode {
            ToolMode::Erase => {
                self.erase_pass(point);
            }
            ToolMode::Draw => {
                if !self.stroke_open {
                    return;
                }
                let threshold = self.sampling_threshold;
                let Some(active) = self.history[self.cursor].last_mut() else {
                    return;
                };
                let far_enough = active
                    .last_point()
                    .is_some_and(|last| last.planar_distance(&point) > threshold);
                if far_enough {
                    Arc::make_mut(active).push(point);
                    self.revision += 1;
                }
            }
        }
    }

    /// End the current drag.
    ///
    /// A stroke that still has a single point gets a second point nudged
    /// along x so it renders as a small mark. This rewrites the snapshot at
    /// the cursor rather than recording a new one.
    pub fn finish_stroke(&mut self) {
        if self.is_empty() {
            self.end_drag();
            return;
        }

        if self.stroke_open {
            let nudge = self.tap_nudge;
            if let Some(active) = self.history[self.cursor].last_mut() {
                if active.len() == 1 {
                    let first = active.points()[0];
                    Arc::make_mut(active).push(Point::new(first.x + nudge, first.y, first.z));
                    self.revision += 1;
                    debug!("Normalized single-point stroke {}", self.stroke_count());
                }
            }
            debug!(
                "Finished stroke {} ({} points)",
                self.stroke_count(),
                self.strokes().last().map(|s| s.len()).unwrap_or(0)
            );
        }

        self.end_drag();
    }

    /// Run one eraser pass and record it in the drag's history frame.
    ///
    /// The first pass that removes anything pushes a snapshot; later passes
    /// in the same drag rewrite it.
    pub(crate) fn erase_pass(&mut self, point: Point) -> bool {
        let Some(kept) = eraser::erase_at(self.strokes(), &point, self.eraser_radius) else {
            return false;
        };

        let removed = self.stroke_count() - kept.len();
        self.stroke_open = false;
        if self.erase_frame_open {
            self.replace_snapshot(kept);
        } else {
            self.push_snapshot(kept);
            self.erase_frame_open = true;
        }

        debug!(
            "Erased {} stroke(s) at ({:.2}, {:.2}), {} remaining",
            removed,
            point.x,
            point.z,
            self.stroke_count()
        );
        true
    }

    pub(crate) fn end_drag(&mut self) {
        self.drawing = false;
        self.stroke_open = false;
        self.erase_frame_open = false;
    }
}
