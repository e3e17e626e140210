use core::fmt;

use crate::entities::GameStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Restart,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Restart => write!(f, "restart"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// No usable render surface: the terminal is smaller than the play field needs.
    FieldTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },
    InvalidTransition { from: GameStatus, command: Command },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldTooSmall {
                cols,
                rows,
                min_cols,
                min_rows,
            } => write!(
                f,
                "terminal is {cols}x{rows}, the play field needs at least {min_cols}x{min_rows}"
            ),
            Self::InvalidTransition { from, command } => {
                write!(f, "cannot {command} while the game is {from:?}")
            }
        }
    }
}

impl std::error::Error for GameError {}
