//! The player's ship

use glam::Vec2;

use super::collision::{Aabb, Bounded};
use super::entities::{Bullet, PowerUpKind};
use crate::tuning::*;

/// What happened when the player was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Shield ate the hit and is now gone
    Absorbed,
    /// Health was reduced
    Damaged,
}

/// The player ship
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub invulnerable: bool,
    pub invulnerable_ticks: u32,
    pub shoot_cooldown: u32,
    pub shoot_delay: u32,
    pub rapid_fire_ticks: u32,
    pub multi_shot_ticks: u32,
    pub shield_ticks: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size: Vec2::splat(PLAYER_SIZE),
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            invulnerable: false,
            invulnerable_ticks: 0,
            shoot_cooldown: 0,
            shoot_delay: SHOOT_DELAY,
            rapid_fire_ticks: 0,
            multi_shot_ticks: 0,
            shield_ticks: 0,
        }
    }

    /// Player at its spawn point for a field of the given size
    pub fn spawn(field_width: f32, field_height: f32) -> Self {
        Self::new(Vec2::new(
            field_width / 2.0,
            field_height - PLAYER_SPAWN_OFFSET,
        ))
    }

    /// Move, clamp to the field and count down all timers
    pub fn update(&mut self, field_width: f32, field_height: f32) {
        self.pos += self.vel;

        let max_x = (field_width - self.size.x - PLAYER_EDGE_MARGIN).max(PLAYER_EDGE_MARGIN);
        let max_y = (field_height - self.size.y - PLAYER_EDGE_MARGIN).max(PLAYER_EDGE_MARGIN);
        self.pos.x = self.pos.x.clamp(PLAYER_EDGE_MARGIN, max_x);
        self.pos.y = self.pos.y.clamp(PLAYER_EDGE_MARGIN, max_y);

        if self.invulnerable_ticks > 0 {
            self.invulnerable_ticks -= 1;
            if self.invulnerable_ticks == 0 {
                self.invulnerable = false;
            }
        }

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);

        self.rapid_fire_ticks = self.rapid_fire_ticks.saturating_sub(1);
        if self.rapid_fire_ticks == 0 {
            self.shoot_delay = SHOOT_DELAY;
        }

        self.multi_shot_ticks = self.multi_shot_ticks.saturating_sub(1);
        self.shield_ticks = self.shield_ticks.saturating_sub(1);
    }

    /// Fire if off cooldown. Returns true if bullets were added.
    pub fn shoot(&mut self, bullets: &mut Vec<Bullet>) -> bool {
        if self.shoot_cooldown > 0 {
            return false;
        }
        self.shoot_cooldown = self.shoot_delay;

        let muzzle = Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y);
        if self.multi_shot_ticks > 0 {
            for i in -1..=1 {
                let vel = Vec2::new(i as f32 * MULTI_SHOT_SPREAD, -BULLET_SPEED);
                bullets.push(Bullet::player(muzzle, vel));
            }
        } else {
            bullets.push(Bullet::player(muzzle, Vec2::new(0.0, -BULLET_SPEED)));
        }
        true
    }

    /// Apply damage. A live shield absorbs the whole hit and is consumed.
    ///
    /// The invulnerability window is advisory: callers are expected to skip
    /// damage while `invulnerable` is set.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.shield_ticks > 0 {
            self.shield_ticks = 0;
            return DamageOutcome::Absorbed;
        }
        self.health -= amount;
        self.invulnerable = true;
        self.invulnerable_ticks = INVULNERABLE_TICKS;
        DamageOutcome::Damaged
    }

    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Health => self.health = (self.health + 1).min(self.max_health),
            PowerUpKind::RapidFire => {
                self.rapid_fire_ticks = RAPID_FIRE_TICKS;
                self.shoot_delay = RAPID_SHOOT_DELAY;
            }
            PowerUpKind::MultiShot => self.multi_shot_ticks = MULTI_SHOT_TICKS,
            PowerUpKind::Shield => self.shield_ticks = SHIELD_TICKS,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Health as 0-1 for the HUD
    pub fn health_fraction(&self) -> f32 {
        (self.health.max(0) as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::spawn(800.0, 600.0)
    }

    #[test]
    fn test_spawn_position() {
        let p = player();
        assert_eq!(p.pos, Vec2::new(400.0, 520.0));
        assert_eq!(p.health, 3);
    }

    #[test]
    fn test_shoot_single_and_cooldown() {
        let mut p = player();
        let mut bullets = Vec::new();

        assert!(p.shoot(&mut bullets));
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].pos, Vec2::new(420.0, 520.0));
        assert_eq!(bullets[0].vel, Vec2::new(0.0, -10.0));
        assert_eq!(p.shoot_cooldown, 10);

        // On cooldown: no-op
        assert!(!p.shoot(&mut bullets));
        assert_eq!(bullets.len(), 1);

        for _ in 0..10 {
            p.update(800.0, 600.0);
        }
        assert!(p.shoot(&mut bullets));
        assert_eq!(bullets.len(), 2);
    }

    #[test]
    fn test_multi_shot_spread() {
        let mut p = player();
        p.apply_power_up(PowerUpKind::MultiShot);
        let mut bullets = Vec::new();
        p.shoot(&mut bullets);
        let vxs: Vec<f32> = bullets.iter().map(|b| b.vel.x).collect();
        assert_eq!(vxs, vec![-2.0, 0.0, 2.0]);
        assert!(bullets.iter().all(|b| b.vel.y == -10.0));
    }

    #[test]
    fn test_rapid_fire_cooldown() {
        let mut p = player();
        p.apply_power_up(PowerUpKind::RapidFire);
        let mut bullets = Vec::new();
        p.shoot(&mut bullets);
        assert_eq!(p.shoot_cooldown, 5);

        p.update(800.0, 600.0);
        assert_eq!(p.shoot_delay, 5);
    }

    #[test]
    fn test_rapid_fire_expires_to_normal_delay() {
        let mut p = player();
        p.apply_power_up(PowerUpKind::RapidFire);
        for _ in 0..RAPID_FIRE_TICKS {
            p.update(800.0, 600.0);
        }
        assert_eq!(p.rapid_fire_ticks, 0);
        assert_eq!(p.shoot_delay, SHOOT_DELAY);

        let mut bullets = Vec::new();
        assert!(p.shoot(&mut bullets));
        assert_eq!(p.shoot_cooldown, SHOOT_DELAY);
    }

    #[test]
    fn test_damage_sets_invulnerability() {
        let mut p = player();
        assert_eq!(p.take_damage(1), DamageOutcome::Damaged);
        assert_eq!(p.health, 2);
        assert!(p.invulnerable);
        assert_eq!(p.invulnerable_ticks, 60);

        for _ in 0..59 {
            p.update(800.0, 600.0);
        }
        assert!(p.invulnerable);
        p.update(800.0, 600.0);
        assert!(!p.invulnerable);
    }

    #[test]
    fn test_shield_absorbs_exactly_one_hit() {
        let mut p = player();
        p.apply_power_up(PowerUpKind::Shield);
        assert_eq!(p.shield_ticks, 200);

        assert_eq!(p.take_damage(2), DamageOutcome::Absorbed);
        assert_eq!(p.health, 3);
        assert_eq!(p.shield_ticks, 0);
        assert!(!p.invulnerable);

        assert_eq!(p.take_damage(1), DamageOutcome::Damaged);
        assert_eq!(p.health, 2);
    }

    #[test]
    fn test_health_power_up_caps() {
        let mut p = player();
        p.apply_power_up(PowerUpKind::Health);
        assert_eq!(p.health, 3);
        p.take_damage(2);
        p.apply_power_up(PowerUpKind::Health);
        assert_eq!(p.health, 2);
    }

    #[test]
    fn test_buffs_overwrite_not_stack() {
        let mut p = player();
        p.apply_power_up(PowerUpKind::RapidFire);
        for _ in 0..100 {
            p.update(800.0, 600.0);
        }
        assert_eq!(p.rapid_fire_ticks, 200);
        p.apply_power_up(PowerUpKind::RapidFire);
        assert_eq!(p.rapid_fire_ticks, 300);
    }

    #[test]
    fn test_clamped_to_field() {
        let mut p = player();
        p.vel = Vec2::new(-10_000.0, 10_000.0);
        p.update(800.0, 600.0);
        assert_eq!(p.pos.x, 20.0);
        assert_eq!(p.pos.y, 540.0);

        p.vel = Vec2::new(10_000.0, -10_000.0);
        p.update(800.0, 600.0);
        assert_eq!(p.pos.x, 740.0);
        assert_eq!(p.pos.y, 20.0);
    }

    #[test]
    fn test_health_fraction_never_negative() {
        let mut p = player();
        p.take_damage(5);
        assert!(p.is_dead());
        assert_eq!(p.health_fraction(), 0.0);
    }
}
