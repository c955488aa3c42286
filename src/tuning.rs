//! Game balance numbers
//!
//! Every gameplay constant lives here so the simulation code only expresses
//! rules. Units are pixels and ticks unless noted.

use crate::sim::enemy::EnemyKind;

/// Static stats for one enemy kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub speed: f32,
    pub score: u64,
}

/// Stats table keyed by kind
pub fn enemy_stats(kind: EnemyKind) -> EnemyStats {
    match kind {
        EnemyKind::Basic => EnemyStats {
            width: 30.0,
            height: 30.0,
            health: 2,
            speed: 2.0,
            score: 10,
        },
        EnemyKind::Fast => EnemyStats {
            width: 25.0,
            height: 25.0,
            health: 1,
            speed: 4.0,
            score: 20,
        },
        EnemyKind::Shooter => EnemyStats {
            width: 30.0,
            height: 30.0,
            health: 3,
            speed: 1.5,
            score: 30,
        },
        EnemyKind::Boss => EnemyStats {
            width: 80.0,
            height: 60.0,
            health: 50,
            speed: 1.0,
            score: 500,
        },
    }
}

// === Player ===

pub const PLAYER_SIZE: f32 = 40.0;
pub const PLAYER_MAX_HEALTH: i32 = 3;
/// Keyboard movement speed per axis
pub const PLAYER_SPEED: f32 = 5.0;
/// Touch drag distance -> velocity factor
pub const TOUCH_SENSITIVITY: f32 = 0.1;
/// Margin the player is kept away from every field edge
pub const PLAYER_EDGE_MARGIN: f32 = 20.0;
/// Player spawns this far above the bottom edge
pub const PLAYER_SPAWN_OFFSET: f32 = 80.0;
pub const SHOOT_DELAY: u32 = 10;
pub const RAPID_SHOOT_DELAY: u32 = 5;
pub const INVULNERABLE_TICKS: u32 = 60;
pub const RAPID_FIRE_TICKS: u32 = 300;
pub const MULTI_SHOT_TICKS: u32 = 300;
pub const SHIELD_TICKS: u32 = 200;

// === Bullets ===

pub const BULLET_WIDTH: f32 = 8.0;
pub const BULLET_HEIGHT: f32 = 16.0;
pub const BULLET_SPEED: f32 = 10.0;
pub const BULLET_DAMAGE: i32 = 1;
/// Horizontal speed step between multi-shot bullets
pub const MULTI_SHOT_SPREAD: f32 = 2.0;
pub const ENEMY_BULLET_WIDTH: f32 = 6.0;
pub const ENEMY_BULLET_HEIGHT: f32 = 12.0;

// === Enemies ===

pub const SHOOTER_FIRE_DELAY: u32 = 120;
pub const SHOOTER_BULLET_SPEED: f32 = 5.0;
pub const ZIGZAG_STEP: f32 = 0.1;
pub const ZIGZAG_AMPLITUDE: f32 = 2.0;
/// Enemies spawn this far above the top edge
pub const ENEMY_SPAWN_Y: f32 = -30.0;
/// Horizontal spawn band is [margin, width - 2 * margin + margin]
pub const ENEMY_SPAWN_MARGIN: f32 = 20.0;
pub const POWER_UP_DROP_CHANCE: f64 = 0.1;

// === Boss ===

pub const BOSS_SPAWN_Y: f32 = -60.0;
/// Every Nth wave brings a boss
pub const BOSS_WAVE_INTERVAL: u32 = 3;
/// Lateral step taken every `BOSS_MOVE_INTERVAL + 1` ticks
pub const BOSS_LATERAL_STEP: f32 = 2.0;
pub const BOSS_MOVE_INTERVAL: u32 = 3;
/// Lateral bounce margin from the field edges
pub const BOSS_EDGE_MARGIN: f32 = 50.0;
pub const BOSS_PHASE2_THRESHOLD: f32 = 0.6;
pub const BOSS_PHASE3_THRESHOLD: f32 = 0.3;
pub const CIRCLE_SHOT_SPEED: f32 = 3.0;
pub const DIRECT_SHOT_SPEED: f32 = 6.0;
/// Delay between the staggered direct shots
pub const DIRECT_SHOT_STAGGER_MS: u32 = 100;
pub const BURST_SHOT_COUNT: i32 = 5;
pub const BURST_SHOT_SPREAD: f32 = 2.0;
pub const BURST_SHOT_SPEED: f32 = 4.0;

/// Per-phase boss behaviour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossPhaseTuning {
    pub speed: f32,
    pub attack_delay: u32,
    pub circle_bullets: u32,
}

/// Phase table (phase is 1-based)
pub fn boss_phase(phase: u8) -> BossPhaseTuning {
    match phase {
        2 => BossPhaseTuning {
            speed: 1.5,
            attack_delay: 60,
            circle_bullets: 8,
        },
        3 => BossPhaseTuning {
            speed: 2.0,
            attack_delay: 40,
            circle_bullets: 12,
        },
        _ => BossPhaseTuning {
            speed: 1.0,
            attack_delay: 80,
            circle_bullets: 8,
        },
    }
}

// === Waves / spawning ===

pub const BASE_SPAWN_DELAY: u32 = 120;
pub const SPAWN_DELAY_STEP: u32 = 5;
pub const MIN_SPAWN_DELAY: u32 = 30;

/// Spawn delay in effect once `wave` has started
pub fn spawn_delay_for_wave(wave: u32) -> u32 {
    BASE_SPAWN_DELAY
        .saturating_sub(wave.saturating_mul(SPAWN_DELAY_STEP))
        .max(MIN_SPAWN_DELAY)
}

// === Scoring ===

pub const HIT_SCORE: u64 = 10;
pub const MAX_COMBO: u32 = 10;
pub const COMBO_WINDOW_TICKS: u32 = 60;

// === Power-ups ===

pub const POWER_UP_SIZE: f32 = 30.0;
pub const POWER_UP_FALL_SPEED: f32 = 2.0;
pub const POWER_UP_WOBBLE_STEP: f32 = 0.1;
pub const POWER_UP_WOBBLE_AMPLITUDE: f32 = 0.5;

// === Field cleanup margins ===

pub const ENEMY_EXIT_MARGIN: f32 = 50.0;
pub const BULLET_EXIT_MARGIN: f32 = 10.0;
pub const POWER_UP_EXIT_MARGIN: f32 = 30.0;

// === Particles ===

pub const PARTICLE_DAMPING: f32 = 0.98;
pub const POWER_UP_BURST_PARTICLES: usize = 10;
pub const POWER_UP_BURST_LIFE: u32 = 15;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_delay_progression() {
        assert_eq!(spawn_delay_for_wave(2), 110);
        assert_eq!(spawn_delay_for_wave(10), 70);
        assert_eq!(spawn_delay_for_wave(18), 30);
        assert_eq!(spawn_delay_for_wave(100), MIN_SPAWN_DELAY);
    }

    #[test]
    fn test_boss_phase_table() {
        assert_eq!(boss_phase(1).attack_delay, 80);
        assert_eq!(boss_phase(2).attack_delay, 60);
        assert_eq!(boss_phase(3).attack_delay, 40);
        assert_eq!(boss_phase(1).circle_bullets, 8);
        assert_eq!(boss_phase(2).circle_bullets, 8);
        assert_eq!(boss_phase(3).circle_bullets, 12);
    }

    #[test]
    fn test_boss_is_toughest() {
        let boss = enemy_stats(EnemyKind::Boss);
        for kind in [EnemyKind::Basic, EnemyKind::Fast, EnemyKind::Shooter] {
            assert!(enemy_stats(kind).health < boss.health);
        }
    }
}
