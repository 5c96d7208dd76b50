use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Tile notation or JSON input that could not be parsed
    Parse { input: String, message: String },
    /// A command the current game state does not allow; state is left untouched
    IllegalAction { message: String },
    /// Rejected game configuration
    InvalidConfig { message: String },
}

impl GameError {
    pub fn parse(input: &str, message: impl Into<String>) -> Self {
        GameError::Parse {
            input: input.to_string(),
            message: message.into(),
        }
    }

    pub fn illegal(message: impl Into<String>) -> Self {
        GameError::IllegalAction {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        GameError::InvalidConfig {
            message: message.into(),
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Parse { input, message } => {
                write!(f, "Parse error on '{}': {}", input, message)
            }
            GameError::IllegalAction { message } => {
                write!(f, "Illegal action: {}", message)
            }
            GameError::InvalidConfig { message } => {
                write!(f, "Invalid config: {}", message)
            }
        }
    }
}

impl std::error::Error for GameError {}

pub type GameResult<T> = Result<T, GameError>;
