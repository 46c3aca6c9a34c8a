// src/animation.rs
use rand::Rng;
use rand::seq::SliceRandom;

pub const FOOD_EMOJIS: [&str; 7] = ["🍕", "🍔", "🍟", "🍩", "🥤", "🍓", "🥕"];
pub const SPAWN_PROBABILITY: f64 = 0.1;
const SPAWN_OFFSET: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    /// Font size in pixels.
    pub size: f64,
    /// Pixels moved up per frame.
    pub speed: f64,
    pub emoji: &'static str,
}

impl Particle {
    pub fn is_off_screen(&self) -> bool {
        self.y < -self.size
    }
}

pub trait Canvas {
    fn clear(&mut self, width: f64, height: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font_size: f64);
}

/// Emoji drifting up from below the bottom edge.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            particles: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn spawn<R: Rng>(&mut self, rng: &mut R) {
        let x = if self.width > 0.0 { rng.gen_range(0.0..self.width) } else { 0.0 };
        let emoji = FOOD_EMOJIS.choose(rng).copied().unwrap_or(FOOD_EMOJIS[0]);
        self.particles.push(Particle {
            x,
            y: self.height + SPAWN_OFFSET,
            size: rng.gen_range(20.0..40.0),
            speed: rng.gen_range(1.0..3.0),
            emoji,
        });
    }

    /// One frame: maybe spawn, move everything up, drop what left the top.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        if rng.gen_bool(SPAWN_PROBABILITY) {
            self.spawn(rng);
        }
        for p in &mut self.particles {
            p.y -= p.speed;
        }
        self.particles.retain(|p| !p.is_off_screen());
    }

    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.clear(self.width, self.height);
        for p in &self.particles {
            canvas.fill_text(p.emoji, p.x, p.y, p.size);
        }
    }
}
