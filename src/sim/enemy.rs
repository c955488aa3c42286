//! Enemies and the boss attack state machine
//!
//! A boss is an ordinary enemy tagged `EnemyKind::Boss` that carries a
//! `BossState` payload. Boss-only behaviour is reached by matching on that
//! payload, never through a separate type.

use glam::Vec2;
use rand::Rng;

use super::collision::{Aabb, Bounded, aim};
use super::entities::Bullet;
use super::state::ScheduledShot;
use crate::tuning::{self, *};

/// Enemy kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Basic,
    Fast,
    Shooter,
    Boss,
}

/// Movement patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePattern {
    Straight,
    Zigzag,
}

/// Boss attack patterns, cycled round-robin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPattern {
    /// Radial ring of bullets
    Circle,
    /// Staggered shots aimed at the player
    Direct,
    /// Fixed five-bullet fan
    Burst,
}

impl AttackPattern {
    pub fn next(self) -> Self {
        match self {
            AttackPattern::Circle => AttackPattern::Direct,
            AttackPattern::Direct => AttackPattern::Burst,
            AttackPattern::Burst => AttackPattern::Circle,
        }
    }
}

/// Boss-only state
#[derive(Debug, Clone, PartialEq)]
pub struct BossState {
    /// 1..=3, only ever increases
    pub phase: u8,
    pub pattern: AttackPattern,
    pub attack_timer: u32,
    pub move_timer: u32,
    /// +1 right, -1 left
    pub move_dir: f32,
}

impl Default for BossState {
    fn default() -> Self {
        Self {
            phase: 1,
            pattern: AttackPattern::Circle,
            attack_timer: 0,
            move_timer: 0,
            move_dir: 1.0,
        }
    }
}

/// Everything an enemy needs to know about the world to take its turn
pub struct EnemyContext<'a> {
    pub field_width: f32,
    pub now_tick: u64,
    /// Player top-left corner
    pub target: Vec2,
    pub enemy_bullets: &'a mut Vec<Bullet>,
    pub scheduled: &'a mut Vec<ScheduledShot>,
}

/// An enemy ship
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    pub score: u64,
    pub pattern: MovePattern,
    pub zigzag_phase: f32,
    pub shoot_timer: u32,
    /// Overlapping the player on the previous contact check
    pub in_contact: bool,
    pub boss: Option<BossState>,
}

impl Enemy {
    pub fn new<R: Rng + ?Sized>(id: u32, kind: EnemyKind, pos: Vec2, rng: &mut R) -> Self {
        let stats = tuning::enemy_stats(kind);
        let pattern = if rng.random::<f64>() > 0.5 {
            MovePattern::Straight
        } else {
            MovePattern::Zigzag
        };
        Self {
            id,
            kind,
            pos,
            size: Vec2::new(stats.width, stats.height),
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            score: stats.score,
            pattern,
            zigzag_phase: 0.0,
            shoot_timer: 0,
            in_contact: false,
            boss: (kind == EnemyKind::Boss).then(BossState::default),
        }
    }

    pub fn boss<R: Rng + ?Sized>(id: u32, pos: Vec2, rng: &mut R) -> Self {
        Self::new(id, EnemyKind::Boss, pos, rng)
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Where this enemy's bullets leave from
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health.max(0) as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    /// Apply damage. Returns true only for the blow that kills.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.health > 0;
        self.health -= amount;
        was_alive && self.health <= 0
    }

    /// Advance one tick
    pub fn update(&mut self, ctx: &mut EnemyContext<'_>) {
        if self.pattern == MovePattern::Zigzag {
            self.zigzag_phase += ZIGZAG_STEP;
            self.pos.x += self.zigzag_phase.sin() * ZIGZAG_AMPLITUDE;
        }
        self.pos.y += self.speed;

        match self.kind {
            EnemyKind::Shooter => {
                self.shoot_timer += 1;
                if self.shoot_timer >= SHOOTER_FIRE_DELAY {
                    self.fire_at(ctx.target, ctx.enemy_bullets);
                    self.shoot_timer = 0;
                }
            }
            EnemyKind::Boss => self.update_boss(ctx),
            EnemyKind::Basic | EnemyKind::Fast => {}
        }
    }

    fn fire_at(&self, target: Vec2, enemy_bullets: &mut Vec<Bullet>) {
        // Coincident positions have no direction to fire in
        if let Some(dir) = aim(self.pos, target) {
            enemy_bullets.push(Bullet::enemy(self.muzzle(), dir * SHOOTER_BULLET_SPEED));
        }
    }

    fn update_boss(&mut self, ctx: &mut EnemyContext<'_>) {
        let health_frac = self.health as f32 / self.max_health as f32;
        let Some(boss) = self.boss.as_mut() else {
            return;
        };

        boss.move_timer += 1;
        boss.attack_timer += 1;

        if boss.move_timer > BOSS_MOVE_INTERVAL {
            self.pos.x += boss.move_dir * BOSS_LATERAL_STEP;
            if self.pos.x <= BOSS_EDGE_MARGIN
                || self.pos.x >= ctx.field_width - self.size.x - BOSS_EDGE_MARGIN
            {
                boss.move_dir = -boss.move_dir;
            }
            boss.move_timer = 0;
        }

        if boss.phase == 1 && health_frac < BOSS_PHASE2_THRESHOLD {
            boss.phase = 2;
            self.speed = tuning::boss_phase(2).speed;
            log::debug!("Boss {} entered phase 2", self.id);
        }
        if boss.phase == 2 && health_frac < BOSS_PHASE3_THRESHOLD {
            boss.phase = 3;
            self.speed = tuning::boss_phase(3).speed;
            log::debug!("Boss {} entered phase 3", self.id);
        }

        let phase = tuning::boss_phase(boss.phase);
        if boss.attack_timer >= phase.attack_delay {
            let pattern = boss.pattern;
            let phase_index = boss.phase;
            boss.attack_timer = 0;
            boss.pattern = pattern.next();
            self.perform_attack(pattern, phase_index, ctx);
        }
    }

    fn perform_attack(&self, pattern: AttackPattern, phase: u8, ctx: &mut EnemyContext<'_>) {
        let muzzle = self.muzzle();
        match pattern {
            AttackPattern::Circle => {
                let count = tuning::boss_phase(phase).circle_bullets;
                for i in 0..count {
                    let angle = std::f32::consts::TAU * i as f32 / count as f32;
                    let vel = Vec2::new(angle.cos(), angle.sin()) * CIRCLE_SHOT_SPEED;
                    ctx.enemy_bullets.push(Bullet::enemy(muzzle, vel));
                }
            }
            AttackPattern::Direct => {
                let Some(dir) = aim(self.pos, ctx.target) else {
                    return;
                };
                let vel = dir * DIRECT_SHOT_SPEED;
                let stagger = crate::ms_to_ticks(DIRECT_SHOT_STAGGER_MS);
                for i in 0..phase as u64 {
                    ctx.scheduled.push(ScheduledShot {
                        due_tick: ctx.now_tick + i * stagger,
                        boss_id: self.id,
                        vel,
                    });
                }
            }
            AttackPattern::Burst => {
                let half = BURST_SHOT_COUNT / 2;
                for i in -half..=half {
                    let vel = Vec2::new(i as f32 * BURST_SHOT_SPREAD, BURST_SHOT_SPEED);
                    ctx.enemy_bullets.push(Bullet::enemy(muzzle, vel));
                }
            }
        }
    }
}

impl Bounded for Enemy {
    fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}
