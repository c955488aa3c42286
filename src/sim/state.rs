//! Game state and core simulation types
//!
//! `GameState` is the explicit simulation context: the app owns exactly one
//! and passes it to `tick` every frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::entities::{Bullet, Particle, PowerUp, PowerUpKind, Star};
use super::player::Player;
use crate::consts::*;
use crate::tuning;

/// Current phase of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no session running
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// Simulation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub width: f32,
    pub height: f32,
    /// Enemy-body contact damages only on the first overlapping tick
    /// instead of every tick the boxes overlap
    #[serde(default)]
    pub damage_once_per_contact: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            damage_once_per_contact: false,
        }
    }
}

/// Something that happened during a tick, for audio/HUD/persistence
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player fired
    Shot,
    /// Player bullet hit an enemy
    Hit,
    /// An enemy was destroyed
    EnemyDestroyed { boss: bool, pos: Vec2 },
    /// Large explosion (body collision)
    Explosion,
    /// Player was hit
    PlayerDamaged { absorbed: bool },
    PowerUpCollected(PowerUpKind),
    WaveStarted { wave: u32, boss: bool },
    GameOver { score: u64, wave: u32 },
}

/// A boss shot waiting for its tick
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledShot {
    pub due_tick: u64,
    /// Boss that owns the shot; dropped if it is gone
    pub boss_id: u32,
    pub vel: Vec2,
}

/// Values shown in the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub health: i32,
    pub max_health: i32,
    pub health_fraction: f32,
    pub score: u64,
    pub high_score: u64,
    pub wave: u32,
    pub combo: u32,
    /// (phase, health fraction) of the live boss, if any
    pub boss: Option<(u8, f32)>,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: SimConfig,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    /// Current wave (1-based)
    pub wave: u32,
    /// Score multiplier, always 1..=10
    pub combo: u32,
    /// Ticks left before the combo resets
    pub combo_timer: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub spawn_timer: u32,
    pub spawn_delay: u32,
    /// Enemies were alive at the end of the last filter step
    pub enemies_present: bool,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    pub scheduled: Vec<ScheduledShot>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create the app state on the menu screen
    pub fn new(seed: u64, config: SimConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..STAR_COUNT)
            .map(|_| Star::random(&mut rng, config.width, config.height))
            .collect();
        let player = Player::spawn(config.width, config.height);

        Self {
            config,
            rng,
            phase: GamePhase::Menu,
            score: 0,
            high_score: 0,
            wave: 1,
            combo: 1,
            combo_timer: 0,
            time_ticks: 0,
            spawn_timer: 0,
            spawn_delay: tuning::BASE_SPAWN_DELAY,
            enemies_present: false,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            stars,
            scheduled: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Set the best score loaded from storage
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    /// Start a fresh session. Everything but the RNG, stars and high score is rebuilt.
    pub fn start_game(&mut self) {
        self.score = 0;
        self.wave = 1;
        self.combo = 1;
        self.combo_timer = 0;
        self.time_ticks = 0;
        self.spawn_timer = 0;
        self.spawn_delay = tuning::BASE_SPAWN_DELAY;
        self.enemies_present = false;
        self.player = Player::spawn(self.config.width, self.config.height);
        self.enemies.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.scheduled.clear();
        self.events.clear();
        self.next_id = 1;
        self.phase = GamePhase::Playing;
        log::info!("Session started");
    }

    /// Pause while playing, resume while paused
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Back to the title screen; the session is abandoned
    pub fn show_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.scheduled.clear();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The live boss, if one is on the field
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }

    pub fn hud(&self) -> Hud {
        Hud {
            health: self.player.health.max(0),
            max_health: self.player.max_health,
            health_fraction: self.player.health_fraction(),
            score: self.score,
            high_score: self.high_score.max(self.score),
            wave: self.wave,
            combo: self.combo,
            boss: self.boss().and_then(|e| {
                e.boss
                    .as_ref()
                    .map(|b| (b.phase, e.health_fraction()))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_on_menu() {
        let state = GameState::new(1, SimConfig::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.stars.len(), STAR_COUNT);
        assert_eq!(state.combo, 1);
        assert_eq!(state.wave, 1);
    }

    #[test]
    fn test_start_game_resets_session() {
        let mut state = GameState::new(1, SimConfig::default()).with_high_score(900);
        state.score = 450;
        state.wave = 7;
        state.combo = 6;
        state.spawn_delay = 40;
        state.player.health = 0;
        state.scheduled.push(ScheduledShot {
            due_tick: 10,
            boss_id: 3,
            vel: Vec2::ZERO,
        });

        state.start_game();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!((state.score, state.wave, state.combo), (0, 1, 1));
        assert_eq!(state.spawn_delay, 120);
        assert_eq!(state.player.health, 3);
        assert!(state.scheduled.is_empty());
        assert_eq!(state.high_score, 900);
    }

    #[test]
    fn test_pause_toggle_only_from_play() {
        let mut state = GameState::new(1, SimConfig::default());
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Menu);

        state.start_game();
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_hud_snapshot() {
        let mut state = GameState::new(1, SimConfig::default()).with_high_score(100);
        state.start_game();
        state.score = 250;
        state.combo = 4;
        state.player.health = 2;

        let hud = state.hud();
        assert_eq!(hud.score, 250);
        assert_eq!(hud.high_score, 250);
        assert_eq!(hud.combo, 4);
        assert!((hud.health_fraction - 2.0 / 3.0).abs() < 1e-6);
        assert!(hud.boss.is_none());
    }

    #[test]
    fn test_hud_reports_boss() {
        let mut state = GameState::new(1, SimConfig::default());
        state.start_game();
        let id = state.next_entity_id();
        let boss = Enemy::boss(id, Vec2::new(360.0, -60.0), &mut state.rng);
        state.enemies.push(boss);
        assert_eq!(state.hud().boss, Some((1, 1.0)));
    }
}
