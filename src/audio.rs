//! Synthesised sound effects
//!
//! Every effect is a single oscillator sweep described by a [`Tone`]; no
//! sample files are needed. The web build plays them through Web Audio
//! oscillators, the native build renders them as `rodio` sources.

use crate::sim::kingdom::{KingdomEvent, SpellKind};
use crate::sim::shooter::ShooterEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    // Demon Kingdom
    Sword,
    Fireball,
    Whirlwind,
    Ghost,
    PickupGem,
    Victory,

    // Square Shooter
    Shoot,
    BubblePop,
    PowerUp,
    ShipExplode,
    LevelClear,

    GameOver,
}

impl SoundEffect {
    pub fn for_shooter(event: &ShooterEvent) -> Option<SoundEffect> {
        match event {
            ShooterEvent::Shot => Some(SoundEffect::Shoot),
            ShooterEvent::BubblePopped(_) => Some(SoundEffect::BubblePop),
            ShooterEvent::PowerupCollected(_) => Some(SoundEffect::PowerUp),
            ShooterEvent::ShipDestroyed => Some(SoundEffect::ShipExplode),
            ShooterEvent::LevelCleared(_) => Some(SoundEffect::LevelClear),
            ShooterEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            ShooterEvent::GameStarted
            | ShooterEvent::ShipRespawned
            | ShooterEvent::RunAbandoned { .. }
            | ShooterEvent::LevelStarted(_) => None,
        }
    }

    pub fn for_kingdom(event: &KingdomEvent) -> Option<SoundEffect> {
        match event {
            KingdomEvent::SwordHit => Some(SoundEffect::Sword),
            KingdomEvent::GemCollected => Some(SoundEffect::PickupGem),
            KingdomEvent::SpellCast(SpellKind::Fireball) => Some(SoundEffect::Fireball),
            KingdomEvent::SpellCast(SpellKind::Whirlwind) => Some(SoundEffect::Whirlwind),
            KingdomEvent::SpellCast(SpellKind::Ghost) => Some(SoundEffect::Ghost),
            KingdomEvent::Victory => Some(SoundEffect::Victory),
            KingdomEvent::Defeat => Some(SoundEffect::GameOver),
            KingdomEvent::MonsterSlain(_)
            | KingdomEvent::GemDropped
            | KingdomEvent::LevelStarted(_)
            | KingdomEvent::FinalWaveStarted => None,
        }
    }

    pub fn tone(self) -> Tone {
        use Waveform::*;
        let (start_hz, end_hz, secs, waveform, gain) = match self {
            SoundEffect::Sword => (900.0, 300.0, 0.08, Sawtooth, 0.35),
            SoundEffect::Fireball => (220.0, 60.0, 0.5, Sawtooth, 0.5),
            SoundEffect::Whirlwind => (300.0, 900.0, 0.6, Triangle, 0.4),
            SoundEffect::Ghost => (620.0, 200.0, 0.7, Sine, 0.45),
            SoundEffect::PickupGem => (880.0, 1760.0, 0.12, Square, 0.2),
            SoundEffect::Victory => (523.0, 1568.0, 0.8, Triangle, 0.5),
            SoundEffect::Shoot => (1200.0, 600.0, 0.06, Square, 0.15),
            SoundEffect::BubblePop => (500.0, 120.0, 0.1, Sine, 0.5),
            SoundEffect::PowerUp => (440.0, 1320.0, 0.25, Triangle, 0.4),
            SoundEffect::ShipExplode => (160.0, 40.0, 0.6, Sawtooth, 0.6),
            SoundEffect::LevelClear => (523.0, 1046.0, 0.4, Triangle, 0.4),
            SoundEffect::GameOver => (330.0, 110.0, 0.9, Square, 0.35),
        };
        Tone {
            start_hz,
            end_hz,
            secs,
            waveform,
            gain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Amplitude at `phase` cycles (only the fractional part matters)
    pub fn sample(self, phase: f32) -> f32 {
        let p = phase.rem_euclid(1.0);
        match self {
            Waveform::Sine => (p * std::f32::consts::TAU).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
            Waveform::Sawtooth => 2.0 * p - 1.0,
        }
    }
}

/// Exponential frequency sweep with an exponential fade-out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub start_hz: f32,
    pub end_hz: f32,
    pub secs: f32,
    pub waveform: Waveform,
    pub gain: f32,
}

/// Level the fade-out ends at (exponential ramps can't reach zero)
const FADE_FLOOR: f32 = 0.01;

impl Tone {
    pub fn frequency_at(&self, t: f32) -> f32 {
        let k = (t / self.secs).clamp(0.0, 1.0);
        self.start_hz * (self.end_hz / self.start_hz).powf(k)
    }

    pub fn envelope_at(&self, t: f32) -> f32 {
        let k = (t / self.secs).clamp(0.0, 1.0);
        self.gain * FADE_FLOOR.powf(k)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{AudioManager, ToneSource};

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::Duration;

    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

    use super::{SoundEffect, Tone};

    const SAMPLE_RATE: u32 = 44_100;

    /// A [`Tone`] rendered sample by sample
    pub struct ToneSource {
        tone: Tone,
        index: u32,
        total: u32,
        phase: f32,
    }

    impl ToneSource {
        pub fn new(tone: Tone) -> Self {
            Self {
                tone,
                index: 0,
                total: (tone.secs * SAMPLE_RATE as f32) as u32,
                phase: 0.0,
            }
        }
    }

    impl Iterator for ToneSource {
        type Item = f32;

        fn next(&mut self) -> Option<f32> {
            if self.index >= self.total {
                return None;
            }
            let t = self.index as f32 / SAMPLE_RATE as f32;
            self.index += 1;
            self.phase = (self.phase + self.tone.frequency_at(t) / SAMPLE_RATE as f32).fract();
            Some(self.tone.waveform.sample(self.phase) * self.tone.envelope_at(t))
        }
    }

    impl Source for ToneSource {
        fn current_frame_len(&self) -> Option<usize> {
            Some((self.total - self.index) as usize)
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            SAMPLE_RATE
        }

        fn total_duration(&self) -> Option<Duration> {
            Some(Duration::from_secs_f32(self.tone.secs))
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        /// Must stay alive for as long as sounds play
        _stream: Option<OutputStream>,
        handle: Option<OutputStreamHandle>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Self {
                    _stream: Some(stream),
                    handle: Some(handle),
                    volume: 0.8,
                },
                Err(e) => {
                    log::warn!("No audio output ({}) - audio disabled", e);
                    Self {
                        _stream: None,
                        handle: None,
                        volume: 0.0,
                    }
                }
            }
        }

        /// Nothing to do natively; the stream starts running at once
        pub fn resume(&self) {}

        /// Effective gain (master * sfx, 0 when muted)
        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(handle) = &self.handle else { return };

            match Sink::try_new(handle) {
                Ok(sink) => {
                    sink.set_volume(self.volume);
                    sink.append(ToneSource::new(effect.tone()));
                    sink.detach();
                }
                Err(e) => log::debug!("Dropped {:?}: {}", effect, e),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, OscillatorType};

    use super::{FADE_FLOOR, SoundEffect, Waveform};

    fn oscillator_type(waveform: Waveform) -> OscillatorType {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Triangle => OscillatorType::Triangle,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

        /// Resume audio context (required after a user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Effective gain (master * sfx, 0 when muted)
        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            self.play_tone(ctx, effect);
        }

        fn play_tone(&self, ctx: &AudioContext, effect: SoundEffect) -> Option<()> {
            let tone = effect.tone();
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(oscillator_type(tone.waveform));
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let t = ctx.current_time();
            let end = t + f64::from(tone.secs);
            let peak = tone.gain * self.volume;

            osc.frequency().set_value_at_time(tone.start_hz, t).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(tone.end_hz, end)
                .ok()?;
            gain.gain().set_value_at_time(peak, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(peak * FADE_FLOOR, end)
                .ok()?;

            osc.start().ok()?;
            osc.stop_with_when(end + 0.02).ok()?;
            Some(())
        }
    }
}
