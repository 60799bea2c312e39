use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::Rng;

use crate::{Coords, TermInt};
use crate::food::FoodRegion;
use crate::input::{Command, DirectionQueue};
use crate::render::Renderer;
use crate::snake::{step, Snake, Direction::{*, self}};
use crate::term::{self, TermManager};

pub const DEFAULT_TICKS_PER_SECOND: u16 = 9;
pub const MIN_TICKS_PER_SECOND: u16 = 1;
pub const MAX_TICKS_PER_SECOND: u16 = 60;

const INITIAL_SNAKE_LENGTH: u16 = 3;
const POLL_SLICE: Duration = Duration::from_millis(50);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    pub turned: Option<Direction>,
    pub ate: bool,
}

/// Everything the game needs to advance one tick, with no terminal attached.
#[derive(Clone, Debug)]
pub struct GameState {
    width: TermInt,
    height: TermInt,
    snake: Snake,
    direction: Direction,
    food: Coords,
    food_region: FoodRegion,
    queue: DirectionQueue,
    ticks_per_second: u16,
}

impl GameState {
    /// Three segments along the left edge at mid height, heading right.
    /// `width` and `height` must be non-zero.
    pub fn new<R: Rng + ?Sized>(
        width: TermInt,
        height: TermInt,
        ticks_per_second: u16,
        rng: &mut R,
    ) -> Self {
        // boards narrower than the snake wrap its body around
        let head = ((INITIAL_SNAKE_LENGTH - 1).min(width.saturating_sub(1)), height / 2);
        let snake = Snake::new(head, INITIAL_SNAKE_LENGTH, Right, width, height);
        let food = FoodRegion::new(width, height).spawn(rng);
        Self::with_parts(snake, Right, food, width, height, ticks_per_second)
    }

    pub fn with_parts(
        snake: Snake,
        direction: Direction,
        food: Coords,
        width: TermInt,
        height: TermInt,
        ticks_per_second: u16,
    ) -> Self {
        GameState {
            width,
            height,
            snake,
            direction,
            food,
            food_region: FoodRegion::new(width, height),
            queue: DirectionQueue::new(),
            ticks_per_second: clamp_tps(ticks_per_second),
        }
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> Coords {
        self.food
    }

    #[cfg(test)]
    pub fn food_region(&self) -> FoodRegion {
        self.food_region
    }

    pub fn queue(&self) -> &DirectionQueue {
        &self.queue
    }

    pub fn ticks_per_second(&self) -> u16 {
        self.ticks_per_second
    }

    /// Delay before the next tick: `round(1000 / tps)` milliseconds.
    pub fn tick_delay(&self) -> Duration {
        let ms = (1000.0 / self.ticks_per_second as f64).round();
        Duration::from_millis(ms as u64)
    }

    pub fn queue_turn(&mut self, dir: Direction) {
        self.queue.push(dir);
    }

    pub fn handle_command(&mut self, cmd: Command) -> Control {
        match cmd {
            Command::Turn(dir) => self.queue_turn(dir),
            Command::SpeedUp => self.set_tps(self.ticks_per_second.saturating_add(1)),
            Command::SlowDown => self.set_tps(self.ticks_per_second.saturating_sub(1)),
            Command::Quit => return Control::Quit,
        }

        Control::Continue
    }

    /// Commits at most one queued turn, then moves the snake one cell,
    /// growing it when the new head lands on the food.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickOutcome {
        let turned = self.queue.next_turn(self.direction);
        if let Some(dir) = turned {
            self.direction = dir;
        }

        let new_head = step(self.snake.head(), self.direction, self.width, self.height);
        let ate = new_head == self.food;

        self.snake.advance(new_head, ate);

        if ate {
            self.food = self.food_region.spawn(rng);
        }

        TickOutcome { turned, ate }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn set_tps(&mut self, tps: u16) {
        let tps = clamp_tps(tps);
        if tps != self.ticks_per_second {
            log::info!("speed {} -> {} ticks per second", self.ticks_per_second, tps);
            self.ticks_per_second = tps;
        }
    }
}

fn clamp_tps(tps: u16) -> u16 {
    tps.clamp(MIN_TICKS_PER_SECOND, MAX_TICKS_PER_SECOND)
}

pub struct SnakeGame {
    term: TermManager,
    renderer: Renderer,
    state: GameState,
}

impl SnakeGame {
    pub fn new(term: TermManager, renderer: Renderer, ticks_per_second: u16) -> Self {
        let (width, height) = term.get_terminal_size();
        let state = GameState::new(width, height, ticks_per_second, &mut rand::thread_rng());
        SnakeGame { term, renderer, state }
    }

    /// Runs until the player quits or the process is asked to terminate.
    pub fn play(&mut self) -> Result<()> {
        let (width, height) = self.state.size();
        log::info!(
            "playing on {}x{} at {} ticks per second",
            width,
            height,
            self.state.ticks_per_second()
        );

        let mut rng = rand::thread_rng();

        loop {
            let deadline = Instant::now() + self.state.tick_delay();

            loop {
                if term::termination_requested() {
                    log::info!("termination signal received");
                    return Ok(());
                }

                let now = Instant::now();
                if now >= deadline {
                    break;
                }

                for key_ev in self.term.read_key_events((deadline - now).min(POLL_SLICE))? {
                    let cmd = match Command::from_key(&key_ev) {
                        Some(cmd) => cmd,
                        None => continue,
                    };

                    if self.state.handle_command(cmd) == Control::Quit {
                        log::info!("quit requested");
                        return Ok(());
                    }
                }
            }

            let outcome = self.state.tick(&mut rng);
            if let Some(dir) = outcome.turned {
                log::debug!("now heading {}", dir);
            }
            if outcome.ate {
                log::info!(
                    "ate, length {}, next food at {:?}",
                    self.state.snake().len(),
                    self.state.food()
                );
            }

            self.renderer
                .draw(&self.state, &mut self.term)
                .context("failed to write frame")?;
        }
    }
}
