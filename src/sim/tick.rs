//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one frame. All motion and
//! timers are measured in ticks.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::collide;
use super::enemy::{Enemy, EnemyContext, EnemyKind};

use super::entities::{
    Bullet, ExplosionSize, Particle, PowerUp, PowerUpKind, spawn_explosion, spawn_power_up_burst,
};
use super::player::DamageOutcome;
use super::state::{GameEvent, GamePhase, GameState};
use crate::tuning::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Keyboard direction, each axis in -1..=1
    pub axis: Vec2,
    /// Touch drag vector (current point minus start point); overrides `axis`
    pub drag: Option<Vec2>,
    /// Fire held (space) or fire button tapped
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        state.toggle_pause();
    }

    // Background scrolls on every screen
    let (width, height) = (state.config.width, state.config.height);
    for star in &mut state.stars {
        star.update(&mut state.rng, width, height);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    update_player(state, input);
    update_enemies(state);
    fire_scheduled_shots(state);
    update_projectiles(state);
    remove_finished(state);
    advance_wave(state);
    resolve_collisions(state);
    spawn_enemies(state);
    decay_combo(state);
    check_game_over(state);

    state.enemies_present = !state.enemies.is_empty();
}

fn update_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;
    player.vel = match input.drag {
        Some(drag) => drag * TOUCH_SENSITIVITY,
        None => input.axis * PLAYER_SPEED,
    };
    player.update(state.config.width, state.config.height);

    if input.fire && player.shoot(&mut state.bullets) {
        state.events.push(GameEvent::Shot);
    }
}

fn update_enemies(state: &mut GameState) {
    let mut ctx = EnemyContext {
        field_width: state.config.width,
        now_tick: state.time_ticks,
        target: state.player.pos,
        enemy_bullets: &mut state.enemy_bullets,
        scheduled: &mut state.scheduled,
    };
    for enemy in &mut state.enemies {
        enemy.update(&mut ctx);
    }
}

/// Release boss shots whose tick has come. Shots from a boss that is gone are dropped.
fn fire_scheduled_shots(state: &mut GameState) {
    let now = state.time_ticks;
    let enemies = &state.enemies;
    let enemy_bullets = &mut state.enemy_bullets;

    state.scheduled.retain(|shot| {
        let Some(boss) = enemies.iter().find(|e| e.id == shot.boss_id && !e.is_dead()) else {
            return false;
        };
        if shot.due_tick <= now {
            enemy_bullets.push(Bullet::enemy(boss.muzzle(), shot.vel));
            false
        } else {
            true
        }
    });
}

fn update_projectiles(state: &mut GameState) {
    for bullet in &mut state.bullets {
        bullet.update();
    }
    for bullet in &mut state.enemy_bullets {
        bullet.update();
    }
    for power_up in &mut state.power_ups {
        power_up.update();
    }
    for particle in &mut state.particles {
        particle.update();
    }
}

fn remove_finished(state: &mut GameState) {
    let (width, height) = (state.config.width, state.config.height);

    state
        .enemies
        .retain(|e| !e.is_dead() && e.pos.y < height + ENEMY_EXIT_MARGIN);
    state
        .bullets
        .retain(|b| !b.hit && b.pos.y > -BULLET_EXIT_MARGIN);
    state.enemy_bullets.retain(|b| {
        !b.hit
            && b.pos.x > -BULLET_EXIT_MARGIN
            && b.pos.x < width + BULLET_EXIT_MARGIN
            && b.pos.y > -BULLET_EXIT_MARGIN
            && b.pos.y < height + BULLET_EXIT_MARGIN
    });
    state
        .power_ups
        .retain(|p| !p.collected && p.pos.y < height + POWER_UP_EXIT_MARGIN);
    state.particles.retain(|p| p.life > 0);

    let enemies = &state.enemies;
    state
        .scheduled
        .retain(|shot| enemies.iter().any(|e| e.id == shot.boss_id));
}

/// Start the next wave when the field has just been cleared
fn advance_wave(state: &mut GameState) {
    if !state.enemies_present || !state.enemies.is_empty() {
        return;
    }

    state.wave += 1;
    state.spawn_delay = spawn_delay_for_wave(state.wave);

    let boss = state.wave % BOSS_WAVE_INTERVAL == 0;
    if boss {
        let id = state.next_entity_id();
        let pos = Vec2::new(state.config.width / 2.0, BOSS_SPAWN_Y);
        let enemy = Enemy::boss(id, pos, &mut state.rng);
        state.enemies.push(enemy);
        log::info!("Wave {} - boss incoming", state.wave);
    } else {
        log::info!("Wave {}", state.wave);
    }
    state.events.push(GameEvent::WaveStarted {
        wave: state.wave,
        boss,
    });
}

fn resolve_collisions(state: &mut GameState) {
    // (enemy index, combo at the moment of the kill)
    let mut kills: Vec<(usize, u32)> = Vec::new();

    player_bullets_vs_enemies(state, &mut kills);

    // Every player-side check is skipped during the invulnerability window
    let invulnerable = state.player.invulnerable;
    if !invulnerable {
        enemy_bullets_vs_player(state);
    }
    enemies_vs_player(state, invulnerable, &mut kills);
    if !invulnerable {
        power_ups_vs_player(state);
    }

    for (index, combo) in kills {
        award_kill(state, index, combo);
    }
}

fn player_bullets_vs_enemies(state: &mut GameState, kills: &mut Vec<(usize, u32)>) {
    for bullet in &mut state.bullets {
        for (index, enemy) in state.enemies.iter_mut().enumerate() {
            if bullet.hit || !collide(&*bullet, &*enemy) {
                continue;
            }
            bullet.hit = true;
            if enemy.take_damage(bullet.damage) {
                kills.push((index, state.combo));
            }

            state.score += HIT_SCORE * state.combo as u64;
            state.combo = (state.combo + 1).min(MAX_COMBO);
            state.combo_timer = COMBO_WINDOW_TICKS;

            spawn_explosion(&mut state.particles, &mut state.rng, bullet.pos, ExplosionSize::Small);
            state.events.push(GameEvent::Hit);
        }
    }
}

fn enemy_bullets_vs_player(state: &mut GameState) {
    for bullet in &mut state.enemy_bullets {
        if bullet.hit || !collide(&*bullet, &state.player) {
            continue;
        }
        bullet.hit = true;
        let outcome = state.player.take_damage(bullet.damage);
        spawn_explosion(&mut state.particles, &mut state.rng, bullet.pos, ExplosionSize::Small);
        on_player_damaged(
            &mut state.particles,
            &mut state.rng,
            &mut state.events,
            state.player.center(),
            outcome,
        );
    }
}

fn enemies_vs_player(state: &mut GameState, invulnerable: bool, kills: &mut Vec<(usize, u32)>) {
    let once_per_contact = state.config.damage_once_per_contact;

    for (index, enemy) in state.enemies.iter_mut().enumerate() {
        let overlapping = collide(&*enemy, &state.player);
        let first_contact = overlapping && !enemy.in_contact;
        enemy.in_contact = overlapping;

        if !overlapping || invulnerable || (once_per_contact && !first_contact) {
            continue;
        }

        let outcome = state.player.take_damage(2);
        if enemy.take_damage(5) {
            kills.push((index, state.combo));
        }

        spawn_explosion(&mut state.particles, &mut state.rng, enemy.pos, ExplosionSize::Large);
        state.events.push(GameEvent::Explosion);
        on_player_damaged(
            &mut state.particles,
            &mut state.rng,
            &mut state.events,
            state.player.center(),
            outcome,
        );
    }
}

fn power_ups_vs_player(state: &mut GameState) {
    for power_up in &mut state.power_ups {
        if power_up.collected || !collide(&*power_up, &state.player) {
            continue;
        }
        power_up.collected = true;
        state.player.apply_power_up(power_up.kind);
        spawn_power_up_burst(&mut state.particles, &mut state.rng, power_up.pos, power_up.kind);
        state.events.push(GameEvent::PowerUpCollected(power_up.kind));
    }
}

fn on_player_damaged(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    events: &mut Vec<GameEvent>,
    player_center: Vec2,
    outcome: DamageOutcome,
) {
    let absorbed = outcome == DamageOutcome::Absorbed;
    if !absorbed {
        spawn_explosion(particles, rng, player_center, ExplosionSize::Small);
    }
    events.push(GameEvent::PlayerDamaged { absorbed });
}

/// Kill bonus, explosion and a chance of a power-up drop
fn award_kill(state: &mut GameState, index: usize, combo: u32) {
    let Some(enemy) = state.enemies.get(index) else {
        return;
    };
    let center = enemy.center();
    let boss = enemy.is_boss();

    state.score += enemy.score * combo as u64;
    spawn_explosion(&mut state.particles, &mut state.rng, center, ExplosionSize::Medium);
    state.events.push(GameEvent::EnemyDestroyed { boss, pos: center });

    if state.rng.random_bool(POWER_UP_DROP_CHANCE) {
        let kind = PowerUpKind::random(&mut state.rng);
        state.power_ups.push(PowerUp::new(center, kind));
    }
}

/// Weighted enemy kind for a wave, `roll` in [0, 1)
pub fn pick_enemy_kind(wave: u32, roll: f64) -> EnemyKind {
    if wave < 3 {
        EnemyKind::Basic
    } else if wave < 5 {
        if roll < 0.7 {
            EnemyKind::Basic
        } else {
            EnemyKind::Fast
        }
    } else if roll < 0.5 {
        EnemyKind::Basic
    } else if roll < 0.8 {
        EnemyKind::Fast
    } else {
        EnemyKind::Shooter
    }
}

fn spawn_enemies(state: &mut GameState) {
    state.spawn_timer += 1;
    if state.spawn_timer < state.spawn_delay {
        return;
    }
    state.spawn_timer = 0;

    let roll: f64 = state.rng.random();
    let kind = pick_enemy_kind(state.wave, roll);
    let span = (state.config.width - 2.0 * ENEMY_SPAWN_MARGIN).max(0.0);
    let x = state.rng.random::<f32>() * span + ENEMY_SPAWN_MARGIN;

    let id = state.next_entity_id();
    let enemy = Enemy::new(id, kind, Vec2::new(x, ENEMY_SPAWN_Y), &mut state.rng);
    state.enemies.push(enemy);
}

fn decay_combo(state: &mut GameState) {
    if state.combo_timer > 0 {
        state.combo_timer -= 1;
    } else {
        state.combo = 1;
    }
}

fn check_game_over(state: &mut GameState) {
    if !state.player.is_dead() {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.high_score = state.high_score.max(state.score);
    state.scheduled.clear();
    state.events.push(GameEvent::GameOver {
        score: state.score,
        wave: state.wave,
    });
    log::info!("Game over - score {} on wave {}", state.score, state.wave);
}
