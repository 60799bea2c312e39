use std::io;

use crossterm::{cursor, queue, style, terminal};
use crossterm::style::{Color, ContentStyle, Stylize};
use crossterm::terminal::ClearType;

use crate::game::GameState;
use crate::Coords;

const BOARD_TILE: &str = "\u{00B7} ";
const BODY_CHAR: char = '\u{2588}';
const FOOD_CHAR: char = '@';

/// Anything a finished frame can be written to.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &[u8]) -> io::Result<()>;
}

pub struct Theme {
    pub board: ContentStyle,
    pub body: ContentStyle,
    pub head: ContentStyle,
    pub food: ContentStyle,
    pub info: ContentStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            board: ContentStyle::new().grey().dim(),
            body: ContentStyle::new().white(),
            head: ContentStyle::new().black().on_white(),
            food: ContentStyle::new().with(Color::Red).bold(),
            info: ContentStyle::new().black().on_yellow(),
        }
    }
}

pub struct Renderer {
    theme: Theme,
    debug: bool,
    frame: Vec<u8>,
}

impl Renderer {
    pub fn new(theme: Theme, debug: bool) -> Self {
        Renderer { theme, debug, frame: vec![] }
    }

    /// Serializes `state` into one frame and hands it to `sink` in a single write.
    pub fn draw<S>(&mut self, state: &GameState, sink: &mut S) -> io::Result<()>
    where
        S: FrameSink + ?Sized,
    {
        self.frame.clear();
        self.build(state)?;
        sink.write_frame(&self.frame)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn build(&mut self, state: &GameState) -> io::Result<()> {
        let (width, height) = state.size();
        let out = &mut self.frame;

        queue!(out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        let tiles = (width as usize / 2) * height as usize;
        queue!(out, style::PrintStyledContent(self.theme.board.apply(BOARD_TILE.repeat(tiles))))?;

        for pos in state.snake().tail_segments() {
            print_at(out, *pos, self.theme.body.apply(BODY_CHAR))?;
        }

        print_at(out, state.food(), self.theme.food.apply(FOOD_CHAR))?;

        let facing = state.queue().last().unwrap_or_else(|| state.direction());
        print_at(out, state.snake().head(), self.theme.head.apply(facing.head_char()))?;

        if self.debug {
            self.debug_lines(state)?;
        }

        queue!(self.frame, cursor::MoveTo(0, 0))
    }

    fn debug_lines(&mut self, state: &GameState) -> io::Result<()> {
        let head = state.snake().head();
        let food = state.food();
        let queued: Vec<String> = state.queue().iter().map(|d| d.to_string()).collect();

        let lines = [
            format!("Head at ({},{})", head.0, head.1),
            format!("Food at ({},{})", food.0, food.1),
            format!("Current Direction: {}", state.direction()),
            format!("Queued Directions: {}", queued.join(",")),
            format!("Game speed: {} ticks per second", state.ticks_per_second()),
        ];

        for (row, line) in lines.iter().enumerate() {
            print_at(&mut self.frame, (0, row as u16), self.theme.info.apply(line.as_str()))?;
        }

        Ok(())
    }
}

fn print_at<W, D>(out: &mut W, pos: Coords, content: style::StyledContent<D>) -> io::Result<()>
where
    W: io::Write,
    D: std::fmt::Display,
{
    queue!(out, cursor::MoveTo(pos.0, pos.1), style::PrintStyledContent(content))
}
