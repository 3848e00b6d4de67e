//! Glow particles emitted while drawing
//!
//! Particles live in a fixed-capacity ring (oldest evicted first). Every
//! frame they are advanced, aged and culled, and the render buffer is
//! rebuilt from scratch so its length always equals the live count.

use std::collections::VecDeque;

use glam::Vec3;
use glowdraw_config::ParticleConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::Rgb;

/// How a particle is colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleTint {
    /// White, brightening with speed
    Ambient,
    /// The active stroke color with a speed-dependent boost
    StrokeColored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Starts at 1.0, removed once it reaches zero
    pub life: f32,
    pub tint: ParticleTint,
}

impl Particle {
    /// Render color for this particle.
    ///
    /// Stroke-colored channels may exceed 1.0; the renderer blends additively.
    pub fn color(&self, stroke_color: Rgb) -> [f32; 3] {
        let speed = self.velocity.length();
        match self.tint {
            ParticleTint::Ambient => {
                let intensity = (speed * 5.0).min(1.0) * self.life;
                [intensity; 3]
            }
            ParticleTint::StrokeColored => {
                let boost = (speed * 3.0).min(1.0);
                stroke_color.scale(self.life * (1.0 + boost) * 2.0).to_array()
            }
        }
    }
}

/// Flat, compacted position and color buffers for the live particles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl ParticleBuffer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
    }

    fn push(&mut self, position: Vec3, color: [f32; 3]) {
        self.positions.push(position.to_array());
        self.colors.push(color);
    }

    /// Number of particles in the buffer
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Positions as a flat `x, y, z, x, y, z, ...` slice
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as a flat `r, g, b, r, g, b, ...` slice
    pub fn flat_colors(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }
}

/// Per-frame particle simulation
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    config: ParticleConfig,
    particles: VecDeque<Particle>,
    buffer: ParticleBuffer,
    rng: StdRng,
}

impl ParticleSystem {
    /// Create a simulator seeded from the OS
    pub fn new(config: ParticleConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a simulator with a fixed seed (deterministic spawns)
    pub fn with_seed(config: ParticleConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ParticleConfig, rng: StdRng) -> Self {
        Self {
            particles: VecDeque::with_capacity(config.capacity),
            buffer: ParticleBuffer::with_capacity(config.capacity),
            config,
            rng,
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Number of live particles
    pub fn alive(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Buffer produced by the last [`tick`](Self::tick)
    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    /// Drop every particle
    pub fn clear(&mut self) {
        self.particles.clear();
        self.buffer.clear();
    }

    /// Spawn one batch of particles around `at`
    pub fn spawn(&mut self, at: Vec3) {
        let cfg = &self.config;
        for _ in 0..cfg.spawn_per_frame {
            let speed = cfg.speed_min + self.rng.random::<f32>() * cfg.speed_range;
            let tint = if self.rng.random::<f32>() < cfg.colored_fraction {
                ParticleTint::StrokeColored
            } else {
                ParticleTint::Ambient
            };
            let position = Vec3::new(
                at.x + (self.rng.random::<f32>() - 0.5) * cfg.spawn_jitter,
                cfg.spawn_height_min + self.rng.random::<f32>() * cfg.spawn_height_range,
                at.z + (self.rng.random::<f32>() - 0.5) * cfg.spawn_jitter,
            );
            let lateral = speed * cfg.lateral_spread;
            let velocity = Vec3::new(
                (self.rng.random::<f32>() - 0.5) * lateral,
                speed,
                (self.rng.random::<f32>() - 0.5) * lateral,
            );

            self.particles.push_back(Particle {
                position,
                velocity,
                life: 1.0,
                tint,
            });
            while self.particles.len() > cfg.capacity {
                self.particles.pop_front();
            }
        }
    }

    /// Advance one frame.
    ///
    /// Spawns a batch at `emitter` if given, then integrates, ages and culls
    /// every particle and rebuilds the render buffer.
    pub fn tick(&mut self, emitter: Option<Vec3>, stroke_color: Rgb) -> &ParticleBuffer {
        if let Some(at) = emitter {
            self.spawn(at);
        }

        let decay = self.config.life_decay;
        for particle in self.particles.iter_mut() {
            particle.position += particle.velocity;
            particle.life -= decay;
        }
        self.particles.retain(|p| p.life > 0.0);

        self.buffer.clear();
        for particle in &self.particles {
            self.buffer
                .push(particle.position, particle.color(stroke_color));
        }

        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(capacity: usize) -> ParticleSystem {
        let config = ParticleConfig {
            capacity,
            ..ParticleConfig::default()
        };
        ParticleSystem::with_seed(config, 7)
    }

    #[test]
    fn test_spawn_batch() {
        let mut particles = system(5000);
        let buffer = particles.tick(Some(Vec3::new(1.0, 0.01, 2.0)), Rgb::WHITE);
        assert_eq!(buffer.len(), 25);
        assert_eq!(particles.alive(), 25);

        for p in particles.particles() {
            assert!((p.position.x - 1.0).abs() <= 0.05 + p.velocity.x.abs() + 1e-6);
            assert!(p.velocity.y >= 0.08 && p.velocity.y <= 0.2);
            assert!(p.position.y > 0.05);
        }
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut particles = system(60);
        for _ in 0..10 {
            let buffer = particles.tick(Some(Vec3::ZERO), Rgb::WHITE);
            assert!(buffer.len() <= 60);
        }
        assert_eq!(particles.alive(), 60);
        // Survivors all come from the last frames, so none has aged much
        let min_life = particles.particles().map(|p| p.life).fold(1.0, f32::min);
        assert!(min_life > 1.0 - 0.012 * 4.0);
    }

    #[test]
    fn test_buffer_matches_alive_count() {
        let mut particles = system(5000);
        for frame in 0..200 {
            let emitter = (frame < 50).then_some(Vec3::ZERO);
            let alive = {
                let buffer = particles.tick(emitter, Rgb::RED);
                assert_eq!(buffer.positions().len(), buffer.colors().len());
                assert_eq!(buffer.flat_positions().len(), buffer.len() * 3);
                buffer.len()
            };
            assert_eq!(alive, particles.alive());
            assert!(particles.particles().all(|p| p.life > 0.0));
        }
        assert_eq!(particles.alive(), 0);
        assert!(particles.buffer().is_empty());
    }

    #[test]
    fn test_particles_expire() {
        let mut particles = system(5000);
        particles.tick(Some(Vec3::ZERO), Rgb::WHITE);
        for _ in 0..78 {
            particles.tick(None, Rgb::WHITE);
        }
        assert_eq!(particles.alive(), 25);
        for _ in 0..10 {
            particles.tick(None, Rgb::WHITE);
        }
        assert_eq!(particles.alive(), 0);
    }

    #[test]
    fn test_colored_fraction() {
        let mut particles = system(5000);
        for _ in 0..40 {
            particles.spawn(Vec3::ZERO);
        }
        let colored = particles
            .particles()
            .filter(|p| p.tint == ParticleTint::StrokeColored)
            .count();
        let fraction = colored as f32 / particles.alive() as f32;
        assert!(fraction > 0.3 && fraction < 0.5, "fraction {fraction}");
    }

    #[test]
    fn test_particle_colors() {
        let ambient = Particle {
            position: Vec3::ZERO,
            velocity: Vec3::new(0.0, 0.1, 0.0),
            life: 0.5,
            tint: ParticleTint::Ambient,
        };
        let [r, g, b] = ambient.color(Rgb::RED);
        assert!((r - 0.25).abs() < 1e-6);
        assert_eq!(r, g);
        assert_eq!(g, b);

        let colored = Particle {
            tint: ParticleTint::StrokeColored,
            life: 1.0,
            velocity: Vec3::new(0.0, 0.5, 0.0),
            ..ambient
        };
        let [r, g, b] = colored.color(Rgb::RED);
        // Full boost: 1.0 * (1 + 1) * 2
        assert!((r - 4.0).abs() < 1e-5);
        assert_eq!(g, 0.0);
        assert_eq!(b, 0.0);
    }

    #[test]
    fn test_clear() {
        let mut particles = system(5000);
        particles.tick(Some(Vec3::ZERO), Rgb::WHITE);
        particles.clear();
        assert_eq!(particles.alive(), 0);
        assert!(particles.buffer().is_empty());
    }
}
