//! Quantum Chat library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod export;
pub mod inference;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Which generation service the session talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    #[default]
    Ollama,
    #[value(alias = "lmstudio")]
    LmStudio,
}
