//! Interactive CLI chat experience.
//!
//! This module implements the full chat loop: streaming agent responses
//! with markdown rendering, glyph charts, thinking spinners, welcome
//! banner, and slash commands. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod chart;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
