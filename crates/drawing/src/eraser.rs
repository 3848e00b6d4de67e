//! Whole-stroke proximity eraser
//!
//! Touching any point of a stroke removes the entire stroke. Distances are
//! planar: the up axis only carries a rendering offset.

use std::sync::Arc;

use crate::types::{Point, Stroke};

/// Check whether any point of `stroke` lies strictly within `radius` of `center`
pub fn touches(stroke: &Stroke, center: &Point, radius: f32) -> bool {
    stroke
        .points()
        .iter()
        .any(|p| p.planar_distance(center) < radius)
}

/// Run one eraser pass over `strokes`.
///
/// Returns the surviving strokes in their original order, or `None` if
/// nothing was touched.
pub fn erase_at(strokes: &[Arc<Stroke>], center: &Point, radius: f32) -> Option<Vec<Arc<Stroke>>> {
    let kept: Vec<Arc<Stroke>> = strokes
        .iter()
        .filter(|stroke| !touches(stroke, center, radius))
        .cloned()
        .collect();

    (kept.len() != strokes.len()).then_some(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    fn line(points: &[(f32, f32)]) -> Arc<Stroke> {
        let points = points.iter().map(|&(x, z)| Point::new(x, 0.0, z)).collect();
        Arc::new(Stroke::from_points(points, Rgb::WHITE))
    }

    #[test]
    fn test_any_point_contact_removes_whole_stroke() {
        let strokes = vec![line(&[(0.0, 0.0), (1.0, 0.0), (5.0, 5.0)]), line(&[(9.0, 9.0), (9.5, 9.0)])];

        let kept = erase_at(&strokes, &Point::new(5.05, 0.0, 5.0), 0.15).unwrap();
        assert_eq!(kept.len(), 1);
        assert!(Arc::ptr_eq(&kept[0], &strokes[1]));
    }

    #[test]
    fn test_miss_returns_none() {
        let strokes = vec![line(&[(0.0, 0.0), (1.0, 0.0)])];
        assert!(erase_at(&strokes, &Point::new(3.0, 0.0, 3.0), 0.15).is_none());
        assert!(erase_at(&[], &Point::new(0.0, 0.0, 0.0), 0.15).is_none());
    }

    #[test]
    fn test_up_axis_is_ignored() {
        let stroke = line(&[(1.0, 1.0)]);
        assert!(touches(&stroke, &Point::new(1.0, 50.0, 1.0), 0.15));
    }

    #[test]
    fn test_boundary_is_exclusive() {
        let stroke = line(&[(0.0, 0.0)]);
        assert!(!touches(&stroke, &Point::new(0.5, 0.0, 0.0), 0.5));
        assert!(touches(&stroke, &Point::new(0.49, 0.0, 0.0), 0.5));
    }

    #[test]
    fn test_no_survivor_within_radius() {
        let strokes: Vec<_> = (0..20)
            .map(|i| {
                let x = i as f32 * 0.1;
                line(&[(x, 0.0), (x, 0.5), (x, 1.0)])
            })
            .collect();
        let center = Point::new(1.0, 0.0, 0.5);
        let kept = erase_at(&strokes, &center, 0.35).unwrap();
        assert!(kept.iter().all(|s| !touches(s, &center, 0.35)));
        assert!(kept.len() < strokes.len());
    }
}
