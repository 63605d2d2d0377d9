use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Confetti,
    Hearts,
    Balloons,
    Fireworks,
    Celebration,
}

impl EffectKind {
    #[cfg(test)]
    pub const ALL: [EffectKind; 5] = [
        EffectKind::Confetti,
        EffectKind::Hearts,
        EffectKind::Balloons,
        EffectKind::Fireworks,
        EffectKind::Celebration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Confetti => "confetti",
            EffectKind::Hearts => "hearts",
            EffectKind::Balloons => "balloons",
            EffectKind::Fireworks => "fireworks",
            EffectKind::Celebration => "celebration",
        }
    }

    pub fn particle_count(self) -> usize {
        match self {
            EffectKind::Fireworks => 100,
            EffectKind::Celebration => 150,
            _ => 50,
        }
    }

    pub fn glyph(self, index: usize) -> &'static str {
        const CONFETTI: [&str; 6] = ["🟥", "🟦", "🟨", "🟩", "🟪", "🟧"];
        const HEARTS: [&str; 5] = ["❤️", "💕", "💖", "💗", "💓"];
        match self {
            EffectKind::Confetti => CONFETTI[index % CONFETTI.len()],
            EffectKind::Hearts => HEARTS[index % HEARTS.len()],
            EffectKind::Balloons => "🎈",
            EffectKind::Fireworks => "✨",
            EffectKind::Celebration => match index % 3 {
                0 => "🎉",
                1 => "🎊",
                _ => "✨",
            },
        }
    }

    /// The effect played after a reaction is picked.
    pub fn for_reaction(reaction: &str) -> Self {
        match reaction {
            "❤️" | "😍" => EffectKind::Hearts,
            "🥳" => EffectKind::Balloons,
            "🔥" | "💯" => EffectKind::Fireworks,
            "🎉" => EffectKind::Confetti,
            _ => EffectKind::Celebration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    /// Top to bottom, drifting sideways.
    Fall,
    /// Bottom to top, drifting sideways.
    Rise,
    /// Outwards from the centre of the area.
    Burst { angle: f32, radius: f32 },
    /// From a point near the top towards an offset.
    Scatter { top: f32, dx: f32, dy: f32 },
}

/// Placement is in fractions of the area (`x`) and terminal cells (drift,
/// radius, offsets). Times are in seconds from the effect start.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Particle {
    x: f32,
    delay: f32,
    duration: f32,
    drift: f32,
    motion: Motion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub x: u16,
    pub y: u16,
    pub glyph: &'static str,
}

#[derive(Debug, Clone)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    started: Instant,
    duration: Duration,
    particles: Vec<Particle>,
}

impl ActiveEffect {
    pub fn new(kind: EffectKind, duration: Duration, started: Instant, rng: &mut impl Rng) -> Self {
        let particles = (0..kind.particle_count())
            .map(|index| particle(kind, index, rng))
            .collect();
        Self {
            kind,
            started,
            duration,
            particles,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    /// Visible glyphs at `now` inside a `width` x `height` area. Glyphs are
    /// two cells wide and are kept fully inside the area.
    pub fn sprites(&self, now: Instant, width: u16, height: u16) -> Vec<Sprite> {
        if width < 2 || height == 0 || self.is_expired(now) {
            return Vec::new();
        }
        let t = now.saturating_duration_since(self.started).as_secs_f32();
        let (w, h) = (f32::from(width), f32::from(height));

        self.particles
            .iter()
            .enumerate()
            .filter_map(|(index, p)| {
                let progress = (t - p.delay) / p.duration;
                if !(0.0..=1.0).contains(&progress) {
                    return None;
                }
                let (col, row) = match p.motion {
                    Motion::Fall => (p.x * w + p.drift * progress, progress * (h - 1.0)),
                    Motion::Rise => (p.x * w + p.drift * progress, (1.0 - progress) * (h - 1.0)),
                    Motion::Burst { angle, radius } => (
                        w / 2.0 + angle.cos() * radius * 2.0 * progress,
                        h / 2.0 + angle.sin() * radius * progress,
                    ),
                    Motion::Scatter { top, dx, dy } => {
                        (p.x * w + dx * progress, top * h + dy * progress)
                    }
                };
                if col < 0.0 || row < 0.0 || col > w - 2.0 || row > h - 1.0 {
                    return None;
                }
                Some(Sprite {
                    x: col as u16,
                    y: row as u16,
                    glyph: self.kind.glyph(index),
                })
            })
            .collect()
    }
}

fn particle(kind: EffectKind, index: usize, rng: &mut impl Rng) -> Particle {
    let x = rng.gen::<f32>();
    let delay = rng.gen::<f32>() * 0.5;
    let duration = 2.0 + rng.gen::<f32>() * 2.0;

    match kind {
        EffectKind::Confetti => Particle {
            x,
            delay,
            duration,
            drift: sideways(rng, 20.0),
            motion: Motion::Fall,
        },
        EffectKind::Hearts => Particle {
            x,
            delay,
            duration: duration + 1.0,
            drift: sideways(rng, 10.0),
            motion: Motion::Rise,
        },
        EffectKind::Balloons => Particle {
            x,
            delay,
            duration: duration + 2.0,
            drift: sideways(rng, 15.0),
            motion: Motion::Rise,
        },
        EffectKind::Fireworks => Particle {
            x,
            delay,
            duration: duration - 0.5,
            drift: 0.0,
            motion: Motion::Burst {
                angle: index as f32 / 100.0 * TAU,
                radius: 5.0 + rng.gen::<f32>() * 15.0,
            },
        },
        EffectKind::Celebration if index % 3 == 0 => Particle {
            x,
            delay,
            duration,
            drift: 0.0,
            motion: Motion::Scatter {
                top: rng.gen::<f32>() * 0.3,
                dx: sideways(rng, 30.0),
                dy: rng.gen::<f32>() * 20.0 + 10.0,
            },
        },
        EffectKind::Celebration => Particle {
            x,
            delay: delay + 0.3,
            duration,
            drift: sideways(rng, 20.0),
            motion: Motion::Fall,
        },
    }
}

fn sideways(rng: &mut impl Rng, span: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * span
}

/// At most one effect plays at a time; starting another replaces it.
#[derive(Debug, Default)]
pub struct Effects {
    active: Option<ActiveEffect>,
}

impl Effects {
    pub fn trigger(&mut self, kind: EffectKind, duration: Duration, now: Instant) {
        debug!(effect = kind.name(), ?duration, "effect started");
        self.active = Some(ActiveEffect::new(
            kind,
            duration,
            now,
            &mut rand::thread_rng(),
        ));
    }

    pub fn active(&self) -> Option<&ActiveEffect> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Clears an expired effect and reports its completion exactly once.
    pub fn poll(&mut self, now: Instant) -> Option<EffectKind> {
        if !self.active.as_ref()?.is_expired(now) {
            return None;
        }
        let done = self.active.take()?;
        debug!(effect = done.kind.name(), "effect finished");
        Some(done.kind)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn particle_counts_follow_effect() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Instant::now();
        for kind in EffectKind::ALL {
            let effect = ActiveEffect::new(kind, Duration::from_secs(4), now, &mut rng);
            assert_eq!(effect.particles.len(), kind.particle_count());
        }
        assert_eq!(EffectKind::Celebration.particle_count(), 150);
        assert_eq!(EffectKind::Fireworks.particle_count(), 100);
        assert_eq!(EffectKind::Hearts.particle_count(), 50);
    }

    #[test]
    fn celebration_cycles_glyphs() {
        let kind = EffectKind::Celebration;
        assert_eq!(
            (kind.glyph(0), kind.glyph(1), kind.glyph(2), kind.glyph(3)),
            ("🎉", "🎊", "✨", "🎉")
        );
    }

    #[test]
    fn sprites_stay_inside_the_area() {
        let mut rng = StdRng::seed_from_u64(42);
        let start = Instant::now();
        for kind in EffectKind::ALL {
            let effect = ActiveEffect::new(kind, Duration::from_secs(4), start, &mut rng);
            for step in 0..40 {
                let now = start + Duration::from_millis(step * 100);
                for sprite in effect.sprites(now, 80, 24) {
                    assert!(sprite.x <= 78, "{kind:?} x={}", sprite.x);
                    assert!(sprite.y <= 23, "{kind:?} y={}", sprite.y);
                }
            }
        }
    }

    #[test]
    fn something_is_visible_mid_effect() {
        let mut rng = StdRng::seed_from_u64(1);
        let start = Instant::now();
        let effect = ActiveEffect::new(
            EffectKind::Confetti,
            Duration::from_secs(4),
            start,
            &mut rng,
        );
        assert!(!effect.sprites(start + Duration::from_secs(1), 80, 24).is_empty());
        assert!(effect.sprites(start + Duration::from_secs(4), 80, 24).is_empty());
    }

    #[test]
    fn completion_is_signalled_once() {
        let mut effects = Effects::default();
        let start = Instant::now();
        effects.trigger(EffectKind::Hearts, Duration::from_millis(4000), start);

        assert_eq!(effects.poll(start + Duration::from_millis(3999)), None);
        assert!(effects.is_active());
        assert_eq!(
            effects.poll(start + Duration::from_millis(4000)),
            Some(EffectKind::Hearts)
        );
        assert!(!effects.is_active());
        assert_eq!(effects.poll(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn new_effect_replaces_running_one() {
        let mut effects = Effects::default();
        let start = Instant::now();
        effects.trigger(EffectKind::Hearts, Duration::from_secs(4), start);
        effects.trigger(EffectKind::Fireworks, Duration::from_secs(4), start + Duration::from_secs(3));

        assert_eq!(effects.poll(start + Duration::from_secs(5)), None);
        assert_eq!(effects.active().map(|e| e.kind), Some(EffectKind::Fireworks));
    }

    #[test]
    fn reactions_map_to_effects() {
        assert_eq!(EffectKind::for_reaction("❤️"), EffectKind::Hearts);
        assert_eq!(EffectKind::for_reaction("🥳"), EffectKind::Balloons);
        assert_eq!(EffectKind::for_reaction("👍"), EffectKind::Celebration);
    }
}
