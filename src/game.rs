use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{FoodPlacement, GameConfig, PlayArea, SELF_COLLISION_SKIP};
use crate::food::Food;
use crate::snake::{Snake, Velocity};

/// Run-state of one game session. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Idle,
    Running,
    Stopped,
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StopReason {
    SelfCollision,
    WallCollision,
    Requested,
}

/// Result of one simulation step.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TickReport {
    pub ate_food: bool,
    pub running: bool,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    pub score: u32,
    pub tick_count: u64,
    pub status: GameStatus,
    pub stop_reason: Option<StopReason>,
    area: PlayArea,
    reward: u32,
    placement: FoodPlacement,
    rng: StdRng,
}

impl GameState {
    /// Creates an idle state seeded from the configuration, or from entropy
    /// when it carries no seed.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, mut rng: StdRng) -> Self {
        let snake = Snake::formed(config.area, config.parts);
        let mut food = Food::random(&mut rng, config.area);
        if snake.occupies(food.position) {
            let _ = food.relocate_clear_of(&mut rng, config.area, &snake);
        }

        Self {
            snake,
            food,
            score: 0,
            tick_count: 0,
            status: GameStatus::Idle,
            stop_reason: None,
            area: config.area,
            reward: config.reward,
            placement: config.food_placement,
            rng,
        }
    }

    /// Returns the map extent and cell size.
    #[must_use]
    pub fn area(&self) -> PlayArea {
        self.area
    }

    /// Returns true while the session is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// Advances the snake by `velocity` and validates the new state.
    pub fn tick(&mut self, velocity: Velocity) -> TickReport {
        self.tick_count += 1;
        self.snake = self.snake.advanced(velocity);
        self.settle()
    }

    /// Decides growth, food relocation and termination for the current head.
    ///
    /// Returns whether play continues.
    pub fn validate(&mut self) -> bool {
        self.settle().running
    }

    /// Marks the session stopped. Only the first reason is kept.
    pub fn stop(&mut self, reason: StopReason) {
        if self.status == GameStatus::Stopped {
            return;
        }
        self.status = GameStatus::Stopped;
        self.stop_reason = Some(reason);
    }

    fn settle(&mut self) -> TickReport {
        let head = self.snake.head();

        let ate_food = head == self.food.position;
        if ate_food {
            self.score += self.reward;
            self.food.relocate(&mut self.rng, self.area);
        } else {
            self.snake.drop_tail();
        }

        if self.snake.occupies(self.food.position) {
            match self.placement {
                FoodPlacement::SinglePass => self.food.relocate(&mut self.rng, self.area),
                FoodPlacement::UntilClear => {
                    let _ = self
                        .food
                        .relocate_clear_of(&mut self.rng, self.area, &self.snake);
                }
            }
        }

        if self.snake.head_overlaps_body(SELF_COLLISION_SKIP) {
            self.stop(StopReason::SelfCollision);
        }

        if !self.area.contains(head) {
            self.stop(StopReason::WallCollision);
        }

        TickReport {
            ate_food,
            running: self.status != GameStatus::Stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GameState, GameStatus, StopReason};
    use crate::config::{FoodPlacement, GameConfig, PlayArea};
    use crate::food::{Food, random_position};
    use crate::snake::{Position, Snake, Velocity};

    const RIGHT: Velocity = Velocity { ox: 10, oy: 0 };
    const LEFT: Velocity = Velocity { ox: -10, oy: 0 };
    const UP: Velocity = Velocity { ox: 0, oy: -10 };

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new_with_seed(&GameConfig::default(), seed);
        state.status = GameStatus::Running;
        state
    }

    fn segments(positions: &[(i32, i32)]) -> Snake {
        Snake::from_segments(positions.iter().map(|&(x, y)| Position { x, y }).collect())
    }

    #[test]
    fn new_state_is_idle_with_food_off_the_snake() {
        for seed in 0..50 {
            let state = GameState::new_with_seed(&GameConfig::default(), seed);
            assert_eq!(state.status, GameStatus::Idle);
            assert_eq!(state.snake.len(), 5);
            assert!(!state.snake.occupies(state.food.position));
        }
    }

    #[test]
    fn plain_move_keeps_length() {
        let mut state = running_state(1);
        state.food = Food::at(Position { x: 0, y: 0 });

        let report = state.tick(RIGHT);

        assert!(report.running);
        assert!(!report.ate_food);
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn eating_grows_by_one_and_awards_reward() {
        let mut state = running_state(2);
        state.food = Food::at(Position { x: 120, y: 120 });

        let report = state.tick(RIGHT);

        assert!(report.ate_food);
        assert_eq!(state.snake.len(), 6);
        assert_eq!(state.score, 100);
        assert!(!state.snake.occupies(state.food.position));
    }

    #[test]
    fn head_on_last_column_is_legal() {
        let mut state = running_state(3);
        state.snake = segments(&[(220, 0), (210, 0), (200, 0)]);
        state.food = Food::at(Position { x: 0, y: 200 });

        assert!(state.tick(RIGHT).running);
        assert_eq!(state.snake.head(), Position { x: 230, y: 0 });

        assert!(!state.tick(RIGHT).running);
        assert_eq!(state.stop_reason, Some(StopReason::WallCollision));
    }

    #[test]
    fn head_one_pixel_past_the_edge_stops_the_game() {
        let mut state = running_state(4);
        state.snake = segments(&[(231, 50), (230, 50)]);

        assert!(!state.validate());
        assert_eq!(state.status, GameStatus::Stopped);
    }

    #[test]
    fn leaving_the_top_edge_stops_the_game() {
        let mut state = running_state(5);
        state.snake = segments(&[(50, 0), (50, 10), (50, 20)]);
        state.food = Food::at(Position { x: 200, y: 200 });

        assert!(!state.tick(UP).running);
        assert_eq!(state.stop_reason, Some(StopReason::WallCollision));
    }

    #[test]
    fn head_repeating_segment_four_or_later_collides() {
        let mut state = running_state(6);
        // Turning left closes the loop onto the segment at index 6.
        state.snake = segments(&[
            (60, 50),
            (60, 60),
            (50, 60),
            (40, 60),
            (40, 50),
            (50, 50),
            (50, 40),
        ]);
        state.food = Food::at(Position { x: 200, y: 200 });

        let report = state.tick(LEFT);

        assert!(!report.running);
        assert_eq!(state.stop_reason, Some(StopReason::SelfCollision));
    }

    #[test]
    fn head_repeating_an_early_segment_is_ignored() {
        let mut state = running_state(7);
        state.snake = segments(&[
            (50, 50),
            (60, 50),
            (50, 50),
            (40, 50),
            (30, 50),
            (20, 50),
        ]);
        state.food = Food::at(Position { x: 200, y: 200 });

        assert!(state.validate());
        assert_eq!(state.status, GameStatus::Running);
    }

    #[test]
    fn food_under_the_body_is_moved_off_it() {
        let mut state = running_state(8);
        state.food = Food::at(Position { x: 90, y: 120 });

        state.tick(RIGHT);

        assert_eq!(state.snake.len(), 5);
        assert!(!state.snake.occupies(state.food.position));
    }

    #[test]
    fn single_pass_placement_relocates_exactly_once() {
        let config = GameConfig {
            food_placement: FoodPlacement::SinglePass,
            ..GameConfig::default()
        };
        let mut state = GameState::new_with_seed(&config, 9);
        state.status = GameStatus::Running;
        state.food = Food::at(Position { x: 90, y: 120 });
        let mut replay = state.rng.clone();
        let expected = random_position(&mut replay, state.area());

        state.tick(RIGHT);

        assert_eq!(state.food.position, expected);
    }

    #[test]
    fn single_pass_placement_can_leave_food_under_the_body() {
        // Every reachable cell of a 2x2 map is covered after the move.
        let config = GameConfig {
            area: PlayArea {
                width: 20,
                height: 20,
                alpha: 10,
            },
            food_placement: FoodPlacement::SinglePass,
            ..GameConfig::default()
        };
        let mut state = GameState::new_with_seed(&config, 4);
        state.status = GameStatus::Running;
        state.snake = segments(&[(0, 0), (0, 10), (10, 10), (20, 10)]);
        state.food = Food::at(Position { x: 0, y: 10 });

        let report = state.tick(RIGHT);

        assert!(report.running);
        assert!(!report.ate_food);
        assert_eq!(state.snake.head(), Position { x: 10, y: 0 });
        assert!(state.snake.occupies(state.food.position));
    }

    #[test]
    fn first_stop_reason_wins() {
        let mut state = running_state(10);

        state.stop(StopReason::WallCollision);
        state.stop(StopReason::Requested);

        assert_eq!(state.stop_reason, Some(StopReason::WallCollision));
    }
}
