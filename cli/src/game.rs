use pathplay_core::{Clock, LevelSession, SequenceGenerator};
use std::sync::mpsc::{Receiver, RecvTimeoutError};

use crate::input::Command;
use crate::render;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Exit {
    Menu,
    Quit,
}

/// Waits for the next input line, but no longer than the next reveal deadline.
fn next_line<C: Clock, G: SequenceGenerator>(
    session: &LevelSession<C, G>,
    lines: &Receiver<String>,
) -> Result<Option<String>, Exit> {
    match session.next_deadline() {
        Some(deadline) => {
            let wait = deadline.saturating_duration_since(session.clock().now());
            match lines.recv_timeout(wait) {
                Ok(line) => Ok(Some(line)),
                Err(RecvTimeoutError::Timeout) => Ok(None),
                Err(RecvTimeoutError::Disconnected) => Err(Exit::Quit),
            }
        }
        None => lines.recv().map(Some).map_err(|_| Exit::Quit),
    }
}

/// Runs one session until the player goes back to the menu or quits.
///
/// Frames are printed by the session subscriber, this loop only feeds time and input.
pub fn play<C: Clock, G: SequenceGenerator>(
    session: &mut LevelSession<C, G>,
    lines: &Receiver<String>,
) -> Exit {
    let grid_size = session.config().grid_size();
    loop {
        let line = match next_line(session, lines) {
            Ok(line) => line,
            Err(exit) => return exit,
        };
        session.advance();
        let Some(line) = line else {
            continue;
        };

        let command = match Command::parse(&line, grid_size) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        log::trace!("command {:?}", command);

        match command {
            Command::Click(cell) => {
                if !session.handle_click(cell).has_update() {
                    println!("{}", render::status(session.step()));
                }
            }
            Command::Retry => session.retry(),
            Command::Next => {
                if !session.next_level() {
                    println!("Win this level first.");
                }
            }
            Command::Menu => {
                session.abandon();
                return Exit::Menu;
            }
            Command::Quit => {
                session.abandon();
                return Exit::Quit;
            }
            Command::Help => println!("{}", render::help()),
        }
    }
}
