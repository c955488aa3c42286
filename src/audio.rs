//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Effect selection is platform independent; playback exists only on wasm.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Large explosion (ship collision)
    Explosion,
    /// Power-up collected
    PowerUp,
    /// Player bullet hit an enemy
    Hit,
    /// Run ended
    GameOver,
}

/// Waveform of a generated sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Sine,
    Sawtooth,
    /// White noise buffer
    Noise,
}

/// Parameters of a single generated sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz; unused for noise
    pub frequency: f32,
    /// Seconds
    pub duration: f64,
    pub waveform: Waveform,
}

/// Starting gain of every effect before volume scaling
pub const PEAK_GAIN: f32 = 0.3;
/// Gain the envelope decays to (exponential ramps cannot reach zero)
pub const FLOOR_GAIN: f32 = 0.01;

impl SoundEffect {
    /// Sound to play for a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot => Some(SoundEffect::Shoot),
            GameEvent::Hit => Some(SoundEffect::Hit),
            GameEvent::Explosion => Some(SoundEffect::Explosion),
            GameEvent::PowerUpCollected(_) => Some(SoundEffect::PowerUp),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::EnemyDestroyed { .. }
            | GameEvent::PlayerDamaged { .. }
            | GameEvent::WaveStarted { .. } => None,
        }
    }

    pub fn tone(&self) -> Tone {
        let (frequency, duration, waveform) = match self {
            SoundEffect::Shoot => (800.0, 0.1, Waveform::Square),
            SoundEffect::Explosion => (0.0, 0.3, Waveform::Noise),
            SoundEffect::PowerUp => (1200.0, 0.2, Waveform::Sine),
            SoundEffect::Hit => (200.0, 0.1, Waveform::Sawtooth),
            SoundEffect::GameOver => (150.0, 0.5, Waveform::Sawtooth),
        };
        Tone {
            frequency,
            duration,
            waveform,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use rand::Rng;
    use web_sys::{AudioContext, GainNode, OscillatorType};

    use super::{FLOOR_GAIN, PEAK_GAIN, SoundEffect, Tone, Waveform};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Effect gain from settings; 0 when muted
        gain: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                gain: settings.effect_gain(),
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.gain = settings.effect_gain();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.gain;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let tone = effect.tone();
            let played = match tone.waveform {
                Waveform::Noise => play_noise(ctx, &tone, vol),
                Waveform::Square => play_osc(ctx, &tone, OscillatorType::Square, vol),
                Waveform::Sine => play_osc(ctx, &tone, OscillatorType::Sine, vol),
                Waveform::Sawtooth => play_osc(ctx, &tone, OscillatorType::Sawtooth, vol),
            };
            if played.is_none() {
                log::debug!("Could not play {:?}", effect);
            }
        }
    }

    /// Gain node with the shared decay envelope, wired to the output
    fn envelope(ctx: &AudioContext, duration: f64, vol: f32) -> Option<GainNode> {
        let gain = ctx.create_gain().ok()?;
        let t = ctx.current_time();
        gain.gain().set_value_at_time(PEAK_GAIN * vol, t).ok()?;
        gain.gain()
            .exponential_ramp_to_value_at_time(FLOOR_GAIN, t + duration)
            .ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        Some(gain)
    }

    fn play_osc(ctx: &AudioContext, tone: &Tone, osc_type: OscillatorType, vol: f32) -> Option<()> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = envelope(ctx, tone.duration, vol)?;
        osc.set_type(osc_type);
        osc.frequency().set_value(tone.frequency);
        osc.connect_with_audio_node(&gain).ok()?;

        let t = ctx.current_time();
        osc.start_with_when(t).ok()?;
        osc.stop_with_when(t + tone.duration).ok()
    }

    fn play_noise(ctx: &AudioContext, tone: &Tone, vol: f32) -> Option<()> {
        let rate = ctx.sample_rate();
        let len = (rate as f64 * tone.duration) as u32;
        let buffer = ctx.create_buffer(1, len, rate).ok()?;

        let mut rng = rand::rng();
        let mut samples: Vec<f32> = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
        buffer.copy_to_channel(&mut samples, 0).ok()?;

        let source = ctx.create_buffer_source().ok()?;
        source.set_buffer(Some(&buffer));
        let gain = envelope(ctx, tone.duration, vol)?;
        source.connect_with_audio_node(&gain).ok()?;
        source.start_with_when(ctx.current_time()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUpKind;
    use glam::Vec2;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Shot),
            Some(SoundEffect::Shoot)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PowerUpCollected(PowerUpKind::Shield)),
            Some(SoundEffect::PowerUp)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::GameOver { score: 1, wave: 1 }),
            Some(SoundEffect::GameOver)
        );
        // Medium explosions are silent, only ship collisions boom
        assert_eq!(
            SoundEffect::for_event(&GameEvent::EnemyDestroyed {
                boss: false,
                pos: Vec2::ZERO
            }),
            None
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Explosion),
            Some(SoundEffect::Explosion)
        );
    }

    #[test]
    fn test_tones() {
        let shoot = SoundEffect::Shoot.tone();
        assert_eq!(shoot.frequency, 800.0);
        assert_eq!(shoot.waveform, Waveform::Square);
        assert_eq!(SoundEffect::Explosion.tone().waveform, Waveform::Noise);
        assert_eq!(SoundEffect::GameOver.tone().duration, 0.5);
    }
}
