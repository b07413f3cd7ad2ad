use rand::Rng;

pub const GEM_COLOR_COUNT: usize = 8;

/// Minimum distance between scattered gems, in field units.
const MIN_SPACING: f32 = 0.14;
const PLACEMENT_TRIES: usize = 50;
const MAX_SPEED_X: f32 = 0.16;
const MAX_SPEED_Y: f32 = 0.12;

#[derive(Clone, Debug, PartialEq)]
pub struct Gem {
    /// Position in the unit square; renderers scale it to their area.
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: usize,
    pub marked: bool,
}

/// The gems shown by one trial.
#[derive(Clone, Debug, Default)]
pub struct GemField {
    gems: Vec<Gem>,
}

impl GemField {
    /// Still gems spread out so they do not overlap when drawn.
    pub fn scattered<R: Rng>(count: usize, rng: &mut R) -> Self {
        let mut gems: Vec<Gem> = Vec::with_capacity(count);
        for _ in 0..count {
            let mut spot = random_spot(rng);
            for _ in 0..PLACEMENT_TRIES {
                let crowded = gems
                    .iter()
                    .any(|g| (g.x - spot.0).hypot(g.y - spot.1) < MIN_SPACING);
                if !crowded {
                    break;
                }
                spot = random_spot(rng);
            }
            gems.push(Gem {
                x: spot.0,
                y: spot.1,
                vx: 0.0,
                vy: 0.0,
                color: rng.gen_range(0..GEM_COLOR_COUNT),
                marked: false,
            });
        }
        Self { gems }
    }

    /// Gems that wander and bounce off the edges, too busy to count one by one.
    pub fn drifting<R: Rng>(count: usize, rng: &mut R) -> Self {
        let mut field = Self::scattered(count, rng);
        for gem in &mut field.gems {
            gem.vx = rng.gen_range(-MAX_SPEED_X..=MAX_SPEED_X);
            gem.vy = rng.gen_range(-MAX_SPEED_Y..=MAX_SPEED_Y);
        }
        field
    }

    pub fn update(&mut self, dt: f32) {
        for gem in &mut self.gems {
            gem.x += gem.vx * dt;
            gem.y += gem.vy * dt;
            if !(0.0..=1.0).contains(&gem.x) {
                gem.vx = -gem.vx;
                gem.x = gem.x.clamp(0.0, 1.0);
            }
            if !(0.0..=1.0).contains(&gem.y) {
                gem.vy = -gem.vy;
                gem.y = gem.y.clamp(0.0, 1.0);
            }
        }
    }

    /// Flip the counting mark on a gem. Returns false for an unknown index.
    pub fn toggle_mark(&mut self, index: usize) -> bool {
        match self.gems.get_mut(index) {
            Some(gem) => {
                gem.marked = !gem.marked;
                true
            }
            None => false,
        }
    }

    pub fn marked_count(&self) -> usize {
        self.gems.iter().filter(|g| g.marked).count()
    }

    pub fn gems(&self) -> &[Gem] {
        &self.gems
    }

    pub fn len(&self) -> usize {
        self.gems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }
}

fn random_spot<R: Rng>(rng: &mut R) -> (f32, f32) {
    (rng.gen_range(0.0..=1.0), rng.gen_range(0.0..=1.0))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn test_scattered_field_has_requested_count() {
        let mut rng = SmallRng::seed_from_u64(3);
        let field = GemField::scattered(6, &mut rng);
        assert_eq!(field.len(), 6);
        assert!(field.gems().iter().all(|g| g.vx == 0.0 && g.vy == 0.0));
        assert!(field.gems().iter().all(|g| g.color < GEM_COLOR_COUNT));
    }

    #[test]
    fn test_drifting_gems_stay_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut field = GemField::drifting(25, &mut rng);
        for _ in 0..500 {
            field.update(0.1);
        }
        assert!(field
            .gems()
            .iter()
            .all(|g| (0.0..=1.0).contains(&g.x) && (0.0..=1.0).contains(&g.y)));
    }

    #[test]
    fn test_toggle_mark() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut field = GemField::scattered(3, &mut rng);
        assert!(field.toggle_mark(1));
        assert!(field.toggle_mark(2));
        assert_eq!(field.marked_count(), 2);
        assert!(field.toggle_mark(1));
        assert_eq!(field.marked_count(), 1);
        assert!(!field.toggle_mark(9));
    }
}
