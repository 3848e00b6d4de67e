//! Scripted input replay
//!
//! Stands in for a live pointer: each step is routed through the session
//! exactly as host input callbacks would be, with a frame rendered after
//! every pointer event.

use std::f32::consts::TAU;

use drawing::{Camera, DrawingSession, PALETTE, SceneMount, Viewport};
use glam::{Vec2, Vec3};
use tracing::{debug, info};

/// One host input event, positioned on the ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Down { x: f32, z: f32 },
    Move { x: f32, z: f32 },
    Up,
    Leave,
    ToggleEraser,
    ToggleCamera,
    SelectSwatch(usize),
    Undo,
}

/// Pixel position of a ground-plane point
pub fn world_to_pixel(camera: &Camera, viewport: Viewport, x: f32, z: f32) -> Option<Vec2> {
    let ndc = camera.project(Vec3::new(x, 0.0, z))?;
    Some(viewport.to_pixel(ndc.truncate()))
}

fn drag(events: &mut Vec<InputEvent>, path: impl IntoIterator<Item = (f32, f32)>) {
    let mut path = path.into_iter();
    if let Some((x, z)) = path.next() {
        events.push(InputEvent::Down { x, z });
    }
    events.extend(path.map(|(x, z)| InputEvent::Move { x, z }));
    events.push(InputEvent::Up);
}

/// Spiral, wave, tap, a rejected stroke, an erase and an undo
pub fn script() -> Vec<InputEvent> {
    let mut events = Vec::new();

    events.push(InputEvent::SelectSwatch(6));
    drag(
        &mut events,
        (0..240).map(|i| {
            let t = i as f32 / 240.0;
            let angle = t * 3.0 * TAU;
            let radius = 0.3 + t * 2.7;
            (radius * angle.cos() - 1.5, radius * angle.sin())
        }),
    );

    events.push(InputEvent::SelectSwatch(9));
    drag(
        &mut events,
        (0..120).map(|i| {
            let x = -1.0 + i as f32 * 0.05;
            (x, 2.8 + (x * 2.0).sin() * 0.4)
        }),
    );

    events.push(InputEvent::SelectSwatch(3));
    drag(&mut events, [(4.5, -2.5)]);

    // Camera mode swallows this stroke
    events.push(InputEvent::ToggleCamera);
    drag(&mut events, (0..20).map(|i| (3.0, -1.0 + i as f32 * 0.1)));
    events.push(InputEvent::ToggleCamera);

    events.push(InputEvent::SelectSwatch(0));
    events.push(InputEvent::Down { x: 3.5, z: 1.0 });
    events.extend((0..30).map(|i| InputEvent::Move {
        x: 3.5 + i as f32 * 0.04,
        z: 1.0 - i as f32 * 0.08,
    }));
    events.push(InputEvent::Leave);

    events.push(InputEvent::ToggleEraser);
    drag(&mut events, (0..10).map(|i| (4.3 + i as f32 * 0.05, -2.5)));
    events.push(InputEvent::ToggleEraser);

    events.push(InputEvent::SelectSwatch(1));
    drag(&mut events, (0..10).map(|i| (-4.5, -3.0 + i as f32 * 0.2)));
    events.push(InputEvent::Undo);

    events
}

/// Feed `events` to the session, rendering a frame after each one
pub fn replay(
    session: &mut DrawingSession,
    scene: &mut dyn SceneMount,
    viewport: Viewport,
    events: &[InputEvent],
) {
    for event in events {
        let camera = *session.camera();
        match *event {
            InputEvent::Down { x, z } => {
                if let Some(pixel) = world_to_pixel(&camera, viewport, x, z) {
                    session.pointer_down(pixel);
                }
            }
            InputEvent::Move { x, z } => {
                if let Some(pixel) = world_to_pixel(&camera, viewport, x, z) {
                    session.pointer_move(pixel);
                }
            }
            InputEvent::Up => {
                session.pointer_up();
            }
            InputEvent::Leave => {
                session.pointer_leave();
            }
            InputEvent::ToggleEraser => {
                session.toggle_eraser();
            }
            InputEvent::ToggleCamera => {
                session.toggle_camera();
            }
            InputEvent::SelectSwatch(index) => {
                if let Some(color) = PALETTE.get(index) {
                    session.set_color(*color);
                }
            }
            InputEvent::Undo => {
                session.undo();
            }
        }
        session.frame(scene);
    }

    debug!("Replayed {} input event(s)", events.len());
    info!(
        "Drawing has {} stroke(s), {} particle(s) alive",
        session.store().stroke_count(),
        session.particles().alive()
    );
}
