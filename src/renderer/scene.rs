//! Scene building: game state to triangle list
//!
//! Layers are painted back to front: stars, particles, power-ups, bullets,
//! enemies (with health bars), player. Coordinates stay in field space; the
//! pipeline maps them to NDC.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::settings::Settings;
use crate::sim::{Enemy, EnemyKind, GamePhase, GameState, Player, PowerUp};
use crate::tuning::POWER_UP_SIZE;

const CIRCLE_SEGMENTS: u32 = 16;
/// Boss bar spans this share of the field width
const BOSS_BAR_WIDTH_FRACTION: f32 = 0.6;
const BOSS_BAR_Y: f32 = 30.0;
const BOSS_BAR_HEIGHT: f32 = 10.0;
const ENEMY_BAR_OFFSET: f32 = 10.0;
const ENEMY_BAR_HEIGHT: f32 = 3.0;
const SHIELD_RADIUS: f32 = 30.0;
const SHIELD_WIDTH: f32 = 3.0;

/// Build every vertex for one frame
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(4096);

    if settings.starfield {
        for star in &state.stars {
            let color = with_alpha(colors::STAR, star.brightness);
            vertices.extend(shapes::rect(star.pos, Vec2::splat(star.size), color));
        }
    }

    if state.phase == GamePhase::Menu {
        return vertices;
    }

    if settings.particles {
        for p in &state.particles {
            let color = with_alpha(p.color, p.life_fraction());
            vertices.extend(shapes::rect(p.pos, Vec2::splat(p.size), color));
        }
    }

    for power_up in &state.power_ups {
        vertices.extend(power_up_shape(power_up));
    }

    // Sprites are centred on the bullet origin; the hit box is not
    for b in &state.bullets {
        let pos = b.pos - b.size * 0.5 + Vec2::new(b.size.x * 0.25, 0.0);
        vertices.extend(shapes::rect(
            pos,
            Vec2::new(b.size.x * 0.5, b.size.y),
            colors::PLAYER_BULLET,
        ));
    }
    for b in &state.enemy_bullets {
        let pos = b.pos - b.size * 0.5 + Vec2::new(b.size.x * 0.25, 0.0);
        vertices.extend(shapes::rect(
            pos,
            Vec2::new(b.size.x * 0.5, b.size.y),
            colors::ENEMY_BULLET,
        ));
    }

    for enemy in &state.enemies {
        vertices.extend(enemy_shape(enemy));
        if let Some(bar) = enemy_health_bar(enemy) {
            vertices.extend(bar);
        }
        if enemy.is_boss() {
            vertices.extend(boss_bar(enemy, state.config.width));
        }
    }

    if !state.player.is_dead() {
        vertices.extend(player_shape(&state.player));
    }

    vertices
}

/// Player opacity: blinks at half alpha every 5 ticks while invulnerable
pub fn player_alpha(player: &Player) -> f32 {
    if player.invulnerable && (player.invulnerable_ticks / 5) % 2 == 0 {
        0.5
    } else {
        1.0
    }
}

fn player_shape(player: &Player) -> Vec<Vertex> {
    let alpha = player_alpha(player);
    let local = Vec2::splat(40.0);
    let to_field = |pts: &[Vec2]| shapes::scale_points(pts, local, player.pos, player.size);

    let hull = to_field(&[
        Vec2::new(20.0, 5.0),
        Vec2::new(30.0, 30.0),
        Vec2::new(20.0, 25.0),
        Vec2::new(10.0, 30.0),
    ]);
    let detail = to_field(&[
        Vec2::new(20.0, 10.0),
        Vec2::new(25.0, 25.0),
        Vec2::new(20.0, 20.0),
        Vec2::new(15.0, 25.0),
    ]);
    let scale = player.size / local;

    let mut vertices = Vec::with_capacity(64);
    // The outline is concave at the tail, so split it into two triangles
    vertices.extend(shapes::polygon(&[hull[0], hull[1], hull[2]], with_alpha(colors::PLAYER, alpha)));
    vertices.extend(shapes::polygon(&[hull[0], hull[2], hull[3]], with_alpha(colors::PLAYER, alpha)));
    vertices.extend(shapes::polygon(
        &[detail[0], detail[1], detail[2]],
        with_alpha(colors::PLAYER_DETAIL, alpha),
    ));
    vertices.extend(shapes::polygon(
        &[detail[0], detail[2], detail[3]],
        with_alpha(colors::PLAYER_DETAIL, alpha),
    ));
    for x in [12.0, 23.0] {
        vertices.extend(shapes::rect(
            player.pos + Vec2::new(x, 30.0) * scale,
            Vec2::new(5.0, 8.0) * scale,
            with_alpha(colors::ENGINE, alpha),
        ));
    }

    if player.shield_ticks > 0 {
        vertices.extend(shapes::ring(
            player.center(),
            SHIELD_RADIUS - SHIELD_WIDTH / 2.0,
            SHIELD_RADIUS + SHIELD_WIDTH / 2.0,
            with_alpha(colors::SHIELD_RING, alpha),
            24,
        ));
    }
    vertices
}

fn enemy_shape(enemy: &Enemy) -> Vec<Vertex> {
    let (primary, secondary) = match enemy.kind {
        EnemyKind::Basic => colors::BASIC,
        EnemyKind::Fast => colors::FAST,
        EnemyKind::Shooter => colors::SHOOTER,
        EnemyKind::Boss => return boss_shape(enemy),
    };

    let scale = enemy.size / 30.0;
    let center = enemy.center();
    let mut vertices = shapes::circle(center, 12.0 * scale.x, primary, CIRCLE_SEGMENTS);
    vertices.extend(shapes::circle(center, 8.0 * scale.x, secondary, CIRCLE_SEGMENTS));
    for x in [10.0, 17.0] {
        vertices.extend(shapes::rect(
            enemy.pos + Vec2::new(x, 12.0) * scale,
            Vec2::splat(3.0) * scale,
            colors::EYE,
        ));
    }
    vertices
}

fn boss_shape(enemy: &Enemy) -> Vec<Vertex> {
    let local = Vec2::new(80.0, 60.0);
    let scale = enemy.size / local;
    let body = shapes::scale_points(
        &[
            Vec2::new(40.0, 10.0),
            Vec2::new(60.0, 25.0),
            Vec2::new(55.0, 45.0),
            Vec2::new(25.0, 45.0),
            Vec2::new(20.0, 25.0),
        ],
        local,
        enemy.pos,
        enemy.size,
    );

    let mut vertices = shapes::polygon(&body, colors::BOSS);
    vertices.extend(shapes::rect(
        enemy.pos + Vec2::new(30.0, 25.0) * scale,
        Vec2::new(20.0, 10.0) * scale,
        colors::BOSS_DETAIL,
    ));
    for x in [15.0, 57.0] {
        vertices.extend(shapes::rect(
            enemy.pos + Vec2::new(x, 35.0) * scale,
            Vec2::new(8.0, 15.0) * scale,
            colors::ENGINE,
        ));
    }
    vertices
}

/// Small bar above a damaged multi-hit enemy
fn enemy_health_bar(enemy: &Enemy) -> Option<Vec<Vertex>> {
    if enemy.max_health <= 1 || enemy.health >= enemy.max_health {
        return None;
    }
    Some(shapes::bar(
        Vec2::new(enemy.pos.x, enemy.pos.y - ENEMY_BAR_OFFSET),
        Vec2::new(enemy.size.x, ENEMY_BAR_HEIGHT),
        enemy.health_fraction(),
        colors::BAR_EMPTY,
        colors::BAR_FULL,
    ))
}

/// Wide boss bar at the top of the field
fn boss_bar(boss: &Enemy, field_width: f32) -> Vec<Vertex> {
    let width = field_width * BOSS_BAR_WIDTH_FRACTION;
    let pos = Vec2::new((field_width - width) / 2.0, BOSS_BAR_Y);

    let mut vertices = shapes::rect(
        pos - Vec2::splat(2.0),
        Vec2::new(width + 4.0, BOSS_BAR_HEIGHT + 4.0),
        colors::BAR_BACK,
    );
    vertices.extend(shapes::bar(
        pos,
        Vec2::new(width, BOSS_BAR_HEIGHT),
        boss.health_fraction(),
        colors::BAR_EMPTY,
        colors::BAR_FULL,
    ));
    vertices
}

fn power_up_shape(power_up: &PowerUp) -> Vec<Vertex> {
    let color = power_up.kind.color();
    let pulse = 1.0 + power_up.wobble.sin() * 0.1;
    let size = POWER_UP_SIZE * pulse;
    let center = power_up.pos + Vec2::splat(POWER_UP_SIZE / 2.0);
    let pos = center - Vec2::splat(size / 2.0);

    let mut vertices = shapes::rect(pos, Vec2::splat(size), with_alpha(color, 0.3));
    let inset = size / 6.0;
    vertices.extend(shapes::rect_outline(
        pos + Vec2::splat(inset),
        Vec2::splat(size - 2.0 * inset),
        2.0,
        color,
    ));
    vertices.extend(shapes::circle(center, size / 8.0, colors::EYE, 8));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Bullet, PowerUpKind, SimConfig};

    fn playing() -> GameState {
        let mut state = GameState::new(5, SimConfig::default());
        state.start_game();
        state
    }

    #[test]
    fn test_menu_draws_only_stars() {
        let state = GameState::new(5, SimConfig::default());
        let vertices = build_scene(&state, &Settings::default());
        assert_eq!(vertices.len(), state.stars.len() * 6);

        let no_stars = Settings {
            starfield: false,
            ..Default::default()
        };
        assert!(build_scene(&state, &no_stars).is_empty());
    }

    #[test]
    fn test_particles_toggle() {
        let mut state = playing();
        crate::sim::entities::spawn_explosion(
            &mut state.particles,
            &mut state.rng,
            Vec2::new(100.0, 100.0),
            crate::sim::ExplosionSize::Large,
        );
        let on = build_scene(&state, &Settings::default()).len();
        let off = build_scene(
            &state,
            &Settings {
                particles: false,
                ..Default::default()
            },
        )
        .len();
        assert_eq!(on - off, 20 * 6);
    }

    #[test]
    fn test_player_blink() {
        let mut player = Player::spawn(800.0, 600.0);
        assert_eq!(player_alpha(&player), 1.0);
        player.take_damage(1);
        assert_eq!(player_alpha(&player), 0.5);
        player.invulnerable_ticks = 55;
        assert_eq!(player_alpha(&player), 1.0);
    }

    #[test]
    fn test_shield_ring_drawn() {
        let mut player = Player::spawn(800.0, 600.0);
        let plain = player_shape(&player).len();
        player.apply_power_up(PowerUpKind::Shield);
        assert_eq!(player_shape(&player).len(), plain + 24 * 6);
    }

    #[test]
    fn test_health_bar_only_when_damaged() {
        let mut state = playing();
        let id = state.next_entity_id();
        let mut enemy = Enemy::new(id, EnemyKind::Shooter, Vec2::new(50.0, 50.0), &mut state.rng);
        assert!(enemy_health_bar(&enemy).is_none());
        enemy.take_damage(1);
        assert!(enemy_health_bar(&enemy).is_some());

        let fast = Enemy::new(id, EnemyKind::Fast, Vec2::ZERO, &mut state.rng);
        assert!(enemy_health_bar(&fast).is_none());
    }

    #[test]
    fn test_boss_bar_spans_centre() {
        let mut state = playing();
        let boss = Enemy::boss(1, Vec2::new(360.0, 0.0), &mut state.rng);
        let bar = boss_bar(&boss, 800.0);
        let xs: Vec<f32> = bar.iter().map(|v| v.position[0]).collect();
        let min = xs.iter().cloned().fold(f32::MAX, f32::min);
        let max = xs.iter().cloned().fold(f32::MIN, f32::max);
        assert!((min - 158.0).abs() < 1e-3, "left edge {min}");
        assert!((max - 642.0).abs() < 1e-3, "right edge {max}");
    }

    #[test]
    fn test_playing_scene_layers_player_last() {
        let mut state = playing();
        state.bullets.push(Bullet::player(Vec2::new(100.0, 100.0), Vec2::ZERO));
        let settings = Settings {
            starfield: false,
            ..Default::default()
        };
        let vertices = build_scene(&state, &settings);
        let player = player_shape(&state.player);
        assert_eq!(vertices.len(), 6 + player.len());
        assert_eq!(vertices[6].color, player[0].color);
    }
}
