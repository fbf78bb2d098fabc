use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum CompilerError {
    FileNotFound(String),
    IO(std::io::Error),
    PhaseFailure(String),
}

impl Error for CompilerError {}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CompilerError::IO(err) => writeln!(f, "IOError: {}", err),
            CompilerError::FileNotFound(err) => writeln!(f, "FileNotFoundError: {}", err),
            CompilerError::PhaseFailure(err) => writeln!(f, "PhaseFailure: {}", err),
        }
    }
}
