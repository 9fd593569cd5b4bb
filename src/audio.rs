//! Audio system using Web Audio API
//!
//! Procedurally generated beeps - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::{EffectsSink, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Arrow released
    Shoot,
    /// Arrow hit a coin
    Hit,
    /// Arrow hit a coin's core
    Critical,
    /// Arrow hit a hazard
    Explosion,
    /// Round clock ran out
    TimeUp,
}

impl SoundEffect {
    /// Sound for a gameplay event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shoot { .. } => Some(SoundEffect::Shoot),
            GameEvent::Hit { critical: true, .. } => Some(SoundEffect::Critical),
            GameEvent::Hit { .. } => Some(SoundEffect::Hit),
            GameEvent::Explosion { .. } => Some(SoundEffect::Explosion),
            GameEvent::TimeUp => Some(SoundEffect::TimeUp),
            _ => None,
        }
    }
}

/// A pitch sweep with a short gain envelope
struct Beep {
    osc_type: OscillatorType,
    f0: f32,
    f1: f32,
    dur: f64,
    gain: f32,
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
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, volume: 0.8 }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set effects volume (0.0 - 1.0); 0 mutes
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let beep = match effect {
            SoundEffect::Shoot => Beep { osc_type: OscillatorType::Square, f0: 520.0, f1: 260.0, dur: 0.07, gain: 0.05 },
            SoundEffect::Hit => Beep { osc_type: OscillatorType::Triangle, f0: 980.0, f1: 520.0, dur: 0.09, gain: 0.06 },
            SoundEffect::Critical => Beep { osc_type: OscillatorType::Sawtooth, f0: 1400.0, f1: 700.0, dur: 0.11, gain: 0.06 },
            SoundEffect::Explosion => Beep { osc_type: OscillatorType::Sawtooth, f0: 180.0, f1: 40.0, dur: 0.35, gain: 0.09 },
            SoundEffect::TimeUp => Beep { osc_type: OscillatorType::Sine, f0: 660.0, f1: 330.0, dur: 0.3, gain: 0.06 },
        };
        self.play_beep(ctx, &beep);
    }

    /// Create an oscillator with gain envelope
    fn create_osc(&self, ctx: &AudioContext, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_beep(&self, ctx: &AudioContext, beep: &Beep) {
        let Some((osc, gain)) = self.create_osc(ctx, beep.osc_type) else {
            return;
        };
        let t = ctx.current_time();
        let peak = (beep.gain * self.volume).max(0.0002);

        osc.frequency().set_value_at_time(beep.f0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(beep.f1.max(40.0), t + beep.dur)
            .ok();

        gain.gain().set_value_at_time(0.0001, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(peak, t + 0.01).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.0001, t + beep.dur)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + beep.dur + 0.02).ok();
    }
}

impl EffectsSink for AudioManager {
    fn emit(&mut self, event: GameEvent) {
        if let Some(effect) = SoundEffect::for_event(&event) {
            self.play(effect);
        }
    }
}
