use std::fmt;
use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::game::{GameState, GameStatus, StopReason};
use crate::input::{Direction, Joystick};

/// Notice surfaced when a game ends and no stop callback is installed.
pub const GAME_OVER_NOTICE: &str = "Game over!";

/// Summary handed to the stop callback.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct StopReport {
    pub score: u32,
    pub length: usize,
    pub ticks: u64,
    pub reason: StopReason,
}

/// Invoked once when the game stops.
pub type StopCallback = Box<dyn FnMut(&StopReport)>;

/// Owns one game session: the state, the joystick, and the tick and render
/// deadlines.
///
/// The host loop calls [`Controller::advance`] and [`Controller::frame_due`]
/// with the current instant; nothing here sleeps or spawns.
pub struct Controller {
    state: GameState,
    joystick: Joystick,
    tick_delay: Duration,
    frame_interval: Duration,
    next_tick: Option<Instant>,
    next_frame: Option<Instant>,
    on_stop: Option<StopCallback>,
    notice: Option<&'static str>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("joystick", &self.joystick)
            .field("next_tick", &self.next_tick)
            .field("next_frame", &self.next_frame)
            .field("has_stop_callback", &self.on_stop.is_some())
            .field("notice", &self.notice)
            .finish()
    }
}

impl Controller {
    /// Builds an idle controller for `config`.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self::with_state(config, GameState::new(config))
    }

    /// Builds an idle controller around a prepared state.
    #[must_use]
    pub fn with_state(config: &GameConfig, state: GameState) -> Self {
        let mut joystick = Joystick::new(config.direction, config.area.alpha);
        if config.throttle {
            joystick = joystick.with_cooldown(Joystick::cooldown_for_tick(config.tick_delay));
        }

        Self {
            state,
            joystick,
            tick_delay: config.tick_delay,
            frame_interval: config.frame_interval,
            next_tick: None,
            next_frame: None,
            on_stop: None,
            notice: None,
        }
    }

    /// Installs the callback fired when the game stops, replacing the notice.
    #[must_use]
    pub fn on_stop(mut self, callback: impl FnMut(&StopReport) + 'static) -> Self {
        self.on_stop = Some(Box::new(callback));
        self
    }

    /// Starts ticking and rendering. Only an idle controller can start.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.state.status != GameStatus::Idle {
            return false;
        }

        self.state.status = GameStatus::Running;
        self.next_tick = Some(now + self.tick_delay);
        self.next_frame = Some(now);
        tracing::info!(
            length = self.state.snake.len(),
            tick_ms = self.tick_delay.as_millis() as u64,
            "game started"
        );
        true
    }

    /// Stops the game from outside the tick loop.
    pub fn stop(&mut self) {
        if self.state.status == GameStatus::Stopped {
            return;
        }
        self.state.stop(StopReason::Requested);
        self.finish();
    }

    /// Forwards a direction command to the joystick while the game is not over.
    pub fn steer(&mut self, direction: Direction, now: Instant) -> bool {
        if self.state.status == GameStatus::Stopped {
            return false;
        }
        self.joystick.steer(direction, now)
    }

    /// Runs the tick that is due at `now`, if any. Returns whether one ran.
    ///
    /// The following tick is scheduled one delay after this one.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_tick else {
            return false;
        };
        if now < due {
            return false;
        }

        let score_before = self.state.score;
        let report = self.state.tick(self.joystick.commit());
        if report.ate_food {
            tracing::debug!(
                score = self.state.score,
                gained = self.state.score - score_before,
                length = self.state.snake.len(),
                "food eaten"
            );
        }

        if report.running {
            self.next_tick = Some(now + self.tick_delay);
        } else {
            self.finish();
        }
        true
    }

    /// Reports whether the render cycle wants a redraw at `now`.
    ///
    /// The render timer tears itself down the first time it sees the game stopped.
    pub fn frame_due(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_frame else {
            return false;
        };
        if !self.state.is_running() {
            self.next_frame = None;
            return false;
        }
        if now < due {
            return false;
        }

        self.next_frame = Some(now + self.frame_interval);
        true
    }

    /// Returns the earliest pending deadline, if any timer is armed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.next_tick, self.next_frame) {
            (Some(tick), Some(frame)) => Some(tick.min(frame)),
            (tick, frame) => tick.or(frame),
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    #[must_use]
    pub fn joystick(&self) -> &Joystick {
        &self.joystick
    }

    /// Returns the termination notice, set only when no callback is installed.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    fn finish(&mut self) {
        self.next_tick = None;

        let report = StopReport {
            score: self.state.score,
            length: self.state.snake.len(),
            ticks: self.state.tick_count,
            reason: self.state.stop_reason.unwrap_or(StopReason::Requested),
        };
        tracing::info!(
            score = report.score,
            length = report.length,
            ticks = report.ticks,
            reason = ?report.reason,
            "game stopped"
        );

        match self.on_stop.take() {
            Some(mut callback) => callback(&report),
            None => self.notice = Some(GAME_OVER_NOTICE),
        }
    }
}
