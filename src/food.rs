use rand::Rng;

use crate::{Coords, TermInt};

/// The central half of the board on each axis, where food is dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FoodRegion {
    min: Coords,
    max: Coords,
}

impl FoodRegion {
    pub fn new(width: TermInt, height: TermInt) -> Self {
        let (min_x, max_x) = central_span(width);
        let (min_y, max_y) = central_span(height);
        FoodRegion { min: (min_x, min_y), max: (max_x, max_y) }
    }

    #[cfg(test)]
    pub fn min(&self) -> Coords {
        self.min
    }

    #[cfg(test)]
    pub fn max(&self) -> Coords {
        self.max
    }

    #[cfg(test)]
    pub fn contains(&self, pos: Coords) -> bool {
        (self.min.0..=self.max.0).contains(&pos.0) && (self.min.1..=self.max.1).contains(&pos.1)
    }

    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Coords {
        let x = rng.gen_range(self.min.0..=self.max.0);
        let y = rng.gen_range(self.min.1..=self.max.1);
        (x, y)
    }
}

// [round(len / 4), round(3 * len / 4)], kept on the board
fn central_span(len: TermInt) -> (TermInt, TermInt) {
    let len = len as f64;
    let last = (len - 1.0).max(0.0);
    let lo = (len / 4.0).round().min(last);
    let hi = (len * 3.0 / 4.0).round().min(last).max(lo);
    (lo as TermInt, hi as TermInt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn region_is_the_central_half() {
        let region = FoodRegion::new(80, 24);
        assert_eq!(region.min(), (20, 6));
        assert_eq!(region.max(), (60, 18));
    }

    #[test]
    fn region_stays_on_tiny_boards() {
        let region = FoodRegion::new(1, 2);
        assert_eq!(region.min(), (0, 1));
        assert_eq!(region.max(), (0, 1));
    }

    #[test]
    fn spawn_lands_inside_region() {
        let mut rng = StdRng::seed_from_u64(7);

        for (w, h) in [(10, 10), (80, 24), (3, 3), (1, 1), (211, 57)] {
            let region = FoodRegion::new(w, h);
            for _ in 0..2_000 {
                let food = region.spawn(&mut rng);
                assert!(region.contains(food), "{:?} outside {:?}", food, region);
                assert!(food.0 < w && food.1 < h);
            }
        }
    }

    #[test]
    fn spawn_reaches_region_corners() {
        let mut rng = StdRng::seed_from_u64(42);
        let region = FoodRegion::new(8, 8);
        let draws: Vec<Coords> = (0..5_000).map(|_| region.spawn(&mut rng)).collect();

        assert!(draws.contains(&region.min()));
        assert!(draws.contains(&region.max()));
    }
}
