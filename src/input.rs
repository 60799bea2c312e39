use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    SpeedUp,
    SlowDown,
    Quit,
}

impl Command {
    /// Maps a key press to a game command. Releases, repeats and unbound keys give `None`.
    pub fn from_key(ev: &KeyEvent) -> Option<Command> {
        if ev.kind != KeyEventKind::Press {
            return None;
        }

        if is_ctrl_c(ev) {
            return Some(Command::Quit);
        }

        let cmd = match ev.code {
            KeyCode::Char('w' | 'W' | 'k') | KeyCode::Up => Command::Turn(Up),
            KeyCode::Char('s' | 'S' | 'j') | KeyCode::Down => Command::Turn(Down),
            KeyCode::Char('d' | 'D' | 'l') | KeyCode::Right => Command::Turn(Right),
            KeyCode::Char('a' | 'A' | 'h') | KeyCode::Left => Command::Turn(Left),
            KeyCode::Char(']') | KeyCode::Char('x') => Command::SpeedUp,
            KeyCode::Char('[') | KeyCode::Char('z') => Command::SlowDown,
            KeyCode::Char('q') => Command::Quit,
            _ => return None,
        };

        Some(cmd)
    }
}

// Raw mode turns off ISIG, so Ctrl+C shows up here instead of as SIGINT
fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

/// Direction presses waiting for the next tick.
///
/// After a tick commits a turn, whatever is left over is stale: it gets
/// dropped by the next press or the next tick, whichever comes first.
#[derive(Clone, Debug, Default)]
pub struct DirectionQueue {
    pending: VecDeque<Direction>,
    overwrite: bool,
}

impl DirectionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dir: Direction) {
        self.discard_stale();
        self.pending.push_back(dir);
    }

    /// Pops until a direction that isn't opposite to `current` shows up.
    /// That one is returned and the rest of the queue is marked stale.
    pub fn next_turn(&mut self, current: Direction) -> Option<Direction> {
        self.discard_stale();

        while let Some(dir) = self.pending.pop_front() {
            if dir.is_opposite(current) {
                log::trace!("ignoring reverse turn {} while heading {}", dir, current);
                continue;
            }
            self.overwrite = true;
            return Some(dir);
        }

        None
    }

    pub fn last(&self) -> Option<Direction> {
        self.pending.back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.pending.iter().copied()
    }

    #[cfg(test)]
    pub fn is_stale(&self) -> bool {
        self.overwrite
    }

    ///////////////////////////////////////////////////////////////////////////

    fn discard_stale(&mut self) {
        if self.overwrite {
            self.overwrite = false;
            self.pending.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn queued(q: &DirectionQueue) -> Vec<Direction> {
        q.iter().collect()
    }

    // ── Key mapping ─────────────────────────────────────────────────

    #[test]
    fn direction_keys() {
        let table = [
            ("wWk", KeyCode::Up, Up),
            ("sSj", KeyCode::Down, Down),
            ("dDl", KeyCode::Right, Right),
            ("aAh", KeyCode::Left, Left),
        ];

        for (chars, arrow, dir) in table {
            for c in chars.chars() {
                let cmd = Command::from_key(&press(KeyCode::Char(c)));
                assert_eq!(cmd, Some(Command::Turn(dir)), "key {}", c);
            }
            assert_eq!(Command::from_key(&press(arrow)), Some(Command::Turn(dir)));
        }
    }

    #[test]
    fn speed_and_quit_keys() {
        assert_eq!(Command::from_key(&press(KeyCode::Char(']'))), Some(Command::SpeedUp));
        assert_eq!(Command::from_key(&press(KeyCode::Char('x'))), Some(Command::SpeedUp));
        assert_eq!(Command::from_key(&press(KeyCode::Char('['))), Some(Command::SlowDown));
        assert_eq!(Command::from_key(&press(KeyCode::Char('z'))), Some(Command::SlowDown));
        assert_eq!(Command::from_key(&press(KeyCode::Char('q'))), Some(Command::Quit));
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Command::from_key(&ev), Some(Command::Quit));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let unbound = [
            KeyCode::Char('c'),
            KeyCode::Char('Q'),
            KeyCode::Char(' '),
            KeyCode::Esc,
            KeyCode::Enter,
        ];
        for code in unbound {
            assert_eq!(Command::from_key(&press(code)), None);
        }
    }

    #[test]
    fn releases_are_ignored() {
        let ev =
            KeyEvent::new_with_kind(KeyCode::Char('w'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(Command::from_key(&ev), None);
    }

    // ── DirectionQueue ──────────────────────────────────────────────

    #[test]
    fn first_non_opposite_wins() {
        let mut q = DirectionQueue::new();
        q.push(Left);
        q.push(Up);
        q.push(Down);

        assert_eq!(q.next_turn(Right), Some(Up));
        assert_eq!(queued(&q), vec![Down]);
        assert!(q.is_stale());
    }

    #[test]
    fn only_opposites_commit_nothing() {
        let mut q = DirectionQueue::new();
        q.push(Left);
        q.push(Left);

        assert_eq!(q.next_turn(Right), None);
        assert!(q.is_empty());
        assert!(!q.is_stale());
    }

    #[test]
    fn stale_remainder_dropped_on_next_tick() {
        let mut q = DirectionQueue::new();
        q.push(Up);
        q.push(Left);

        assert_eq!(q.next_turn(Right), Some(Up));
        assert_eq!(q.next_turn(Up), None);
        assert!(q.is_empty());
    }

    #[test]
    fn stale_remainder_dropped_on_next_press() {
        let mut q = DirectionQueue::new();
        q.push(Up);
        q.push(Left);
        q.next_turn(Right);

        q.push(Down);
        assert_eq!(queued(&q), vec![Down]);
        assert!(!q.is_stale());
    }

    #[test]
    fn last_is_most_recent_press() {
        let mut q = DirectionQueue::new();
        assert_eq!(q.last(), None);
        q.push(Up);
        q.push(Left);
        assert_eq!(q.last(), Some(Left));
        assert_eq!(queued(&q).len(), 2);
    }
}
