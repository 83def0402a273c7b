use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use serde::Deserialize;

use crate::snake::Velocity;

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the one-cell displacement for this direction.
    #[must_use]
    pub fn velocity(self, alpha: i32) -> Velocity {
        match self {
            Self::Up => Velocity { ox: 0, oy: -alpha },
            Self::Down => Velocity { ox: 0, oy: alpha },
            Self::Left => Velocity { ox: -alpha, oy: 0 },
            Self::Right => Velocity { ox: alpha, oy: 0 },
        }
    }
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    /// A left click at a terminal cell; the caller hit-tests it against the
    /// on-screen buttons.
    Click { column: u16, row: u16 },
    Confirm,
    Quit,
    Resize,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Four-way direction pad with a reversal lockout and optional throttling.
///
/// Reversal is judged against `travelled`, the direction the last tick
/// actually moved in, so a pair of turns between two ticks cannot fold the
/// snake back onto its neck.
#[derive(Debug, Clone)]
pub struct Joystick {
    direction: Direction,
    travelled: Direction,
    alpha: i32,
    cooldown: Option<Duration>,
    locked_until: Option<Instant>,
    turned: bool,
}

impl Joystick {
    /// Creates a joystick facing `direction` with steps of `alpha`.
    #[must_use]
    pub fn new(direction: Direction, alpha: i32) -> Self {
        Self {
            direction,
            travelled: direction,
            alpha,
            cooldown: None,
            locked_until: None,
            turned: false,
        }
    }

    /// Accepts at most one command per tick and ignores further commands for
    /// `cooldown` after each accepted one.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    /// Returns the cooldown for a tick interval: slightly shorter than the tick.
    #[must_use]
    pub fn cooldown_for_tick(tick_delay: Duration) -> Duration {
        tick_delay - tick_delay / 10
    }

    /// Applies a direction command. Returns whether it was accepted.
    pub fn steer(&mut self, direction: Direction, now: Instant) -> bool {
        if !direction_change_is_valid(self.travelled, direction) {
            return false;
        }
        if self.cooldown.is_some() && self.turned {
            return false;
        }
        if self.locked_until.is_some_and(|until| now < until) {
            return false;
        }

        self.direction = direction;
        self.locked_until = self.cooldown.map(|cooldown| now + cooldown);
        self.turned = true;
        true
    }

    pub fn left(&mut self, now: Instant) -> bool {
        self.steer(Direction::Left, now)
    }

    pub fn right(&mut self, now: Instant) -> bool {
        self.steer(Direction::Right, now)
    }

    pub fn up(&mut self, now: Instant) -> bool {
        self.steer(Direction::Up, now)
    }

    pub fn down(&mut self, now: Instant) -> bool {
        self.steer(Direction::Down, now)
    }

    /// Returns the direction the next tick will take.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns a snapshot of the current velocity.
    #[must_use]
    pub fn velocity(&self) -> Velocity {
        self.direction.velocity(self.alpha)
    }

    /// Hands the pending direction to a tick and records it as travelled.
    pub fn commit(&mut self) -> Velocity {
        self.travelled = self.direction;
        self.turned = false;
        self.velocity()
    }
}

/// Reads terminal events and maps them onto [`GameInput`].
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for one event and maps it.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        Ok(match event::read()? {
            Event::Key(key) => map_key(key),
            Event::Mouse(mouse) => map_mouse(mouse),
            Event::Resize(..) => Some(GameInput::Resize),
            _ => None,
        })
    }
}

fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k') => Some(GameInput::Direction(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j') => {
            Some(GameInput::Direction(Direction::Down))
        }
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h') => {
            Some(GameInput::Direction(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l') => {
            Some(GameInput::Direction(Direction::Right))
        }
        KeyCode::Enter | KeyCode::Char(' ') => Some(GameInput::Confirm),
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => Some(GameInput::Quit),
        _ => None,
    }
}

fn map_mouse(mouse: MouseEvent) -> Option<GameInput> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(GameInput::Click {
            column: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crossterm::event::{
        KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };

    use super::{Direction, GameInput, Joystick, direction_change_is_valid, map_key, map_mouse};
    use crate::snake::Velocity;

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn reversal_is_the_only_invalid_change() {
        assert!(!direction_change_is_valid(Direction::Up, Direction::Down));
        assert!(!direction_change_is_valid(Direction::Left, Direction::Right));
        assert!(direction_change_is_valid(Direction::Up, Direction::Left));
        assert!(direction_change_is_valid(Direction::Up, Direction::Up));
    }

    #[test]
    fn joystick_rejects_reversal_and_keeps_velocity() {
        let now = Instant::now();
        let mut joystick = Joystick::new(Direction::Right, 10);

        assert!(!joystick.left(now));

        assert_eq!(joystick.direction(), Direction::Right);
        assert_eq!(joystick.velocity(), Velocity { ox: 10, oy: 0 });
    }

    #[test]
    fn joystick_accepts_perpendicular_turns() {
        let now = Instant::now();
        let mut joystick = Joystick::new(Direction::Right, 10);

        assert!(joystick.up(now));
        assert_eq!(joystick.commit(), Velocity { ox: 0, oy: -10 });

        assert!(joystick.left(now));
        assert_eq!(joystick.commit(), Velocity { ox: -10, oy: 0 });

        assert!(joystick.down(now));
        assert_eq!(joystick.commit(), Velocity { ox: 0, oy: 10 });
    }

    #[test]
    fn reversal_is_judged_against_the_travelled_direction() {
        let now = Instant::now();
        let mut joystick = Joystick::new(Direction::Right, 10);

        assert!(joystick.up(now));
        assert!(!joystick.left(now));
        assert_eq!(joystick.direction(), Direction::Up);

        // Still travelling right, so down is a legal replacement for up.
        assert!(joystick.down(now));
        assert_eq!(joystick.commit(), Velocity { ox: 0, oy: 10 });

        assert!(!joystick.up(now));
        assert!(joystick.left(now));
    }

    #[test]
    fn throttled_joystick_ignores_commands_during_cooldown() {
        let start = Instant::now();
        let cooldown = Joystick::cooldown_for_tick(Duration::from_millis(100));
        let mut joystick = Joystick::new(Direction::Right, 10).with_cooldown(cooldown);

        assert_eq!(cooldown, Duration::from_millis(90));
        assert!(joystick.up(start));
        let _ = joystick.commit();
        assert!(!joystick.left(start + Duration::from_millis(50)));
        assert_eq!(joystick.direction(), Direction::Up);

        assert!(joystick.left(start + Duration::from_millis(90)));
        assert_eq!(joystick.direction(), Direction::Left);
    }

    #[test]
    fn rejected_command_does_not_start_a_cooldown() {
        let start = Instant::now();
        let mut joystick =
            Joystick::new(Direction::Right, 10).with_cooldown(Duration::from_millis(90));

        assert!(!joystick.left(start));
        assert!(joystick.up(start));
    }

    #[test]
    fn throttled_joystick_takes_one_turn_per_tick() {
        let start = Instant::now();
        let mut joystick =
            Joystick::new(Direction::Right, 10).with_cooldown(Duration::from_millis(10));

        assert!(joystick.up(start));
        assert!(!joystick.down(start + Duration::from_millis(50)));
        assert_eq!(joystick.commit(), Velocity { ox: 0, oy: -10 });

        assert!(joystick.left(start + Duration::from_millis(60)));
    }

    #[test]
    fn keys_map_to_inputs() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(
            map_key(press(KeyCode::Char('w'))),
            Some(GameInput::Direction(Direction::Up))
        );
        assert_eq!(
            map_key(press(KeyCode::Left)),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(map_key(press(KeyCode::Enter)), Some(GameInput::Confirm));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(GameInput::Quit)
        );

        let mut release = press(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        assert_eq!(map_key(release), None);
    }

    #[test]
    fn left_clicks_become_click_inputs() {
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };

        assert_eq!(map_mouse(click), Some(GameInput::Click { column: 7, row: 3 }));
    }
}
