use rand::Rng;

use crate::config::PlayArea;
use crate::snake::{Position, Snake};

/// Random re-rolls tried before falling back to a scan of the free cells.
pub const MAX_REROLLS: usize = 64;

/// Food item currently on the map.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    /// Creates food at `position`.
    #[must_use]
    pub fn at(position: Position) -> Self {
        Self { position }
    }

    /// Creates food on a random grid cell.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R, area: PlayArea) -> Self {
        Self::at(random_position(rng, area))
    }

    /// Moves the food to a random grid cell. The cell may be under the snake.
    pub fn relocate<R: Rng + ?Sized>(&mut self, rng: &mut R, area: PlayArea) {
        self.position = random_position(rng, area);
    }

    /// Moves the food to a random grid cell not occupied by `snake`.
    ///
    /// Returns `false`, leaving the food where it was, when the snake covers
    /// every cell.
    pub fn relocate_clear_of<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        area: PlayArea,
        snake: &Snake,
    ) -> bool {
        for _ in 0..MAX_REROLLS {
            let candidate = random_position(rng, area);
            if !snake.occupies(candidate) {
                self.position = candidate;
                return true;
            }
        }

        tracing::warn!(
            rerolls = MAX_REROLLS,
            length = snake.len(),
            "food re-rolls exhausted, scanning free cells"
        );

        let candidates: Vec<Position> = area.cells().filter(|cell| !snake.occupies(*cell)).collect();
        if candidates.is_empty() {
            return false;
        }

        self.position = candidates[rng.gen_range(0..candidates.len())];
        true
    }
}

/// Picks each axis as `round(uniform(0, bound) / alpha) * alpha`, where
/// `bound` is the map dimension minus one cell.
#[must_use]
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, area: PlayArea) -> Position {
    Position {
        x: random_coordinate(rng, area.width - area.alpha, area.alpha),
        y: random_coordinate(rng, area.height - area.alpha, area.alpha),
    }
}

fn random_coordinate<R: Rng + ?Sized>(rng: &mut R, bound: i32, alpha: i32) -> i32 {
    let raw = rng.gen_range(0.0..=f64::from(bound));
    (raw / f64::from(alpha)).round() as i32 * alpha
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{Food, random_position};
    use crate::config::PlayArea;
    use crate::snake::{Position, Snake};

    fn area(width: i32, height: i32) -> PlayArea {
        PlayArea {
            width,
            height,
            alpha: 10,
        }
    }

    #[test]
    fn random_positions_are_grid_aligned_and_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let area = area(240, 120);

        for _ in 0..500 {
            let position = random_position(&mut rng, area);
            assert_eq!(position.x % 10, 0);
            assert_eq!(position.y % 10, 0);
            assert!(area.contains(position), "{position:?} escaped the map");
        }
    }

    #[test]
    fn relocation_clear_of_snake_avoids_every_segment() {
        let mut rng = StdRng::seed_from_u64(11);
        let area = area(40, 30);
        let snake = Snake::from_segments(vec![
            Position { x: 0, y: 0 },
            Position { x: 10, y: 0 },
            Position { x: 20, y: 0 },
            Position { x: 30, y: 0 },
            Position { x: 30, y: 10 },
            Position { x: 20, y: 10 },
        ]);
        let mut food = Food::at(Position { x: 0, y: 0 });

        for _ in 0..100 {
            assert!(food.relocate_clear_of(&mut rng, area, &snake));
            assert!(!snake.occupies(food.position));
        }
    }

    #[test]
    fn relocation_finds_the_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let area = area(20, 20);
        let snake = Snake::from_segments(vec![
            Position { x: 0, y: 0 },
            Position { x: 10, y: 0 },
            Position { x: 10, y: 10 },
        ]);
        let mut food = Food::at(Position { x: 0, y: 0 });

        assert!(food.relocate_clear_of(&mut rng, area, &snake));
        assert_eq!(food.position, Position { x: 0, y: 10 });
    }

    #[test]
    fn relocation_reports_a_full_map() {
        let mut rng = StdRng::seed_from_u64(5);
        let area = area(20, 10);
        let snake = Snake::from_segments(vec![Position { x: 0, y: 0 }, Position { x: 10, y: 0 }]);
        let mut food = Food::at(Position { x: 10, y: 0 });

        assert!(!food.relocate_clear_of(&mut rng, area, &snake));
        assert_eq!(food.position, Position { x: 10, y: 0 });
    }
}
