//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each entity list)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod entities;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Bounded, aim, collide};
pub use enemy::{AttackPattern, BossState, Enemy, EnemyKind, MovePattern};
pub use entities::{Bullet, ExplosionSize, Particle, PowerUp, PowerUpKind, Star};
pub use player::{DamageOutcome, Player};
pub use state::{GameEvent, GamePhase, GameState, Hud, ScheduledShot, SimConfig};
pub use tick::{TickInput, pick_enemy_kind, tick};
