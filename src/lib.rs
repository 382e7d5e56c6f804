//! icepad library exports for testing

pub mod core;
pub mod interpreter;
pub mod language;
pub mod tui;

#[cfg(test)]
pub mod test_support;
