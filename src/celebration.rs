//! One-shot celebration shown once the countdown reaches zero.

use crate::config::{
    PARTICLE_COUNT, PARTICLE_DELAY_S, PARTICLE_DURATION_S, PARTICLE_LEFT_PCT, PARTICLE_SIZE_PX,
    PARTICLE_TOP_PCT,
};
use rand::Rng;

/// Visual parameters of a single decorative particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub size_px: f64,
    pub left_pct: f64,
    pub top_pct: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl Particle {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Particle {
            size_px: rng.random_range(PARTICLE_SIZE_PX.0..PARTICLE_SIZE_PX.1),
            left_pct: rng.random_range(PARTICLE_LEFT_PCT.0..PARTICLE_LEFT_PCT.1),
            top_pct: rng.random_range(PARTICLE_TOP_PCT.0..PARTICLE_TOP_PCT.1),
            duration_s: rng.random_range(PARTICLE_DURATION_S.0..PARTICLE_DURATION_S.1),
            delay_s: rng.random_range(PARTICLE_DELAY_S.0..PARTICLE_DELAY_S.1),
        }
    }
}

/// Celebration state: particles are generated lazily, exactly once.
#[derive(Debug, Default)]
pub struct Celebration {
    particles: Option<Vec<Particle>>,
    revealed: bool,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal the celebration. Returns the freshly generated particles on the
    /// first call and `None` on every later call.
    pub fn trigger<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&[Particle]> {
        if self.revealed {
            return None;
        }
        self.revealed = true;
        let particles = self.particles.get_or_insert_with(|| {
            (0..PARTICLE_COUNT)
                .map(|_| Particle::sample(&mut *rng))
                .collect()
        });
        Some(particles.as_slice())
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn particles(&self) -> Option<&[Particle]> {
        self.particles.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn particles_stay_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let p = Particle::sample(&mut rng);
            assert!((PARTICLE_SIZE_PX.0..PARTICLE_SIZE_PX.1).contains(&p.size_px));
            assert!((PARTICLE_LEFT_PCT.0..PARTICLE_LEFT_PCT.1).contains(&p.left_pct));
            assert!((PARTICLE_TOP_PCT.0..PARTICLE_TOP_PCT.1).contains(&p.top_pct));
            assert!((PARTICLE_DURATION_S.0..PARTICLE_DURATION_S.1).contains(&p.duration_s));
            assert!((PARTICLE_DELAY_S.0..PARTICLE_DELAY_S.1).contains(&p.delay_s));
        }
    }

    #[test]
    fn first_trigger_generates_fixed_particle_set() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut celebration = Celebration::new();
        assert!(!celebration.is_revealed());
        assert!(celebration.particles().is_none());

        let generated = celebration.trigger(&mut rng).unwrap().to_vec();
        assert_eq!(generated.len(), PARTICLE_COUNT);
        assert!(celebration.is_revealed());
        assert_eq!(celebration.particles().unwrap(), generated.as_slice());
    }

    #[test]
    fn repeated_triggers_never_regenerate() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut celebration = Celebration::new();
        let first = celebration.trigger(&mut rng).unwrap().to_vec();

        for _ in 0..3 {
            assert!(celebration.trigger(&mut rng).is_none());
        }
        assert_eq!(celebration.particles().unwrap(), first.as_slice());
    }
}
