//! Passive entities: bullets, power-ups, particles and background stars
//!
//! These own nothing but their motion. Removal is decided by the tick loop.

use glam::Vec2;
use rand::Rng;

use super::collision::{Aabb, Bounded};
use crate::tuning::*;

/// RGBA colors shared by the simulation and renderer
pub mod palette {
    pub const EXPLOSION_SMALL: [f32; 4] = [1.0, 0.667, 0.0, 1.0];
    pub const EXPLOSION_MEDIUM: [f32; 4] = [1.0, 0.667, 0.0, 1.0];
    pub const EXPLOSION_LARGE: [f32; 4] = [1.0, 0.4, 0.4, 1.0];
    pub const HEALTH: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
    pub const RAPID_FIRE: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const MULTI_SHOT: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const SHIELD: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
}

/// A projectile. Player and enemy bullets share the type and differ in size.
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub damage: i32,
    /// Consumed by a collision; removed at the next filter step
    pub hit: bool,
}

impl Bullet {
    /// Bullet fired by the player
    pub fn player(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            damage: BULLET_DAMAGE,
            hit: false,
        }
    }

    /// Bullet fired by an enemy or boss
    pub fn enemy(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            size: Vec2::new(ENEMY_BULLET_WIDTH, ENEMY_BULLET_HEIGHT),
            damage: 1,
            hit: false,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
    }
}

impl Bounded for Bullet {
    fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    Health,
    RapidFire,
    MultiShot,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Health,
        PowerUpKind::RapidFire,
        PowerUpKind::MultiShot,
        PowerUpKind::Shield,
    ];

    /// Uniformly random kind
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn color(&self) -> [f32; 4] {
        match self {
            PowerUpKind::Health => palette::HEALTH,
            PowerUpKind::RapidFire => palette::RAPID_FIRE,
            PowerUpKind::MultiShot => palette::MULTI_SHOT,
            PowerUpKind::Shield => palette::SHIELD,
        }
    }
}

/// A falling collectible
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub speed: f32,
    /// Wobble phase (radians)
    pub wobble: f32,
    pub collected: bool,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            kind,
            speed: POWER_UP_FALL_SPEED,
            wobble: 0.0,
            collected: false,
        }
    }

    pub fn update(&mut self) {
        self.wobble += POWER_UP_WOBBLE_STEP;
        self.pos.y += self.speed;
        self.pos.x += self.wobble.sin() * POWER_UP_WOBBLE_AMPLITUDE;
    }
}

impl Bounded for PowerUp {
    fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, POWER_UP_SIZE, POWER_UP_SIZE)
    }
}

/// A cosmetic particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: [f32; 4],
    /// Remaining life in ticks
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
}

impl Particle {
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        pos: Vec2,
        vel: Vec2,
        color: [f32; 4],
        life: u32,
    ) -> Self {
        Self {
            pos,
            vel,
            color,
            life,
            max_life: life,
            size: rng.random::<f32>() * 3.0 + 1.0,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel *= PARTICLE_DAMPING;
        self.life = self.life.saturating_sub(1);
    }

    /// Remaining life as 0-1 (used for alpha)
    pub fn life_fraction(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Explosion sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionSize {
    Small,
    Medium,
    Large,
}

impl ExplosionSize {
    pub fn particle_count(&self) -> usize {
        match self {
            ExplosionSize::Small => 5,
            ExplosionSize::Medium => 10,
            ExplosionSize::Large => 20,
        }
    }

    fn life(&self) -> u32 {
        match self {
            ExplosionSize::Large => 30,
            _ => 20,
        }
    }

    fn color(&self) -> [f32; 4] {
        match self {
            ExplosionSize::Small => palette::EXPLOSION_SMALL,
            ExplosionSize::Medium => palette::EXPLOSION_MEDIUM,
            ExplosionSize::Large => palette::EXPLOSION_LARGE,
        }
    }
}

/// Push a ring of particles spreading out from `center`.
/// Each particle's speed is `base + random * spread`.
pub fn spawn_ring<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    center: Vec2,
    count: usize,
    (base, spread): (f32, f32),
    color: [f32; 4],
    life: u32,
) {
    for i in 0..count {
        let angle = std::f32::consts::TAU * i as f32 / count as f32;
        let speed = rng.random::<f32>() * spread + base;
        let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
        particles.push(Particle::new(rng, center, vel, color, life));
    }
}

/// Explosion burst
pub fn spawn_explosion<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    center: Vec2,
    size: ExplosionSize,
) {
    spawn_ring(
        particles,
        rng,
        center,
        size.particle_count(),
        (2.0, 5.0),
        size.color(),
        size.life(),
    );
}

/// Colored burst when a power-up is collected
pub fn spawn_power_up_burst<R: Rng + ?Sized>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    center: Vec2,
    kind: PowerUpKind,
) {
    spawn_ring(
        particles,
        rng,
        center,
        POWER_UP_BURST_PARTICLES,
        (1.0, 3.0),
        kind.color(),
        POWER_UP_BURST_LIFE,
    );
}

/// Background star (cosmetic, scrolls in every phase)
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub brightness: f32,
}

impl Star {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(rng.random::<f32>() * width, rng.random::<f32>() * height),
            size: rng.random::<f32>() * 2.0,
            speed: rng.random::<f32>() * 2.0 + 0.5,
            brightness: rng.random::<f32>(),
        }
    }

    /// Scroll down, wrapping to the top at a fresh x
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f32, height: f32) {
        self.pos.y += self.speed;
        if self.pos.y > height {
            self.pos.y = -10.0;
            self.pos.x = rng.random::<f32>() * width;
        }
    }
}
