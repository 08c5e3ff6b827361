//! Use-case services over the persistence repositories.
//!
//! # Responsibility
//! - Orchestrate repository calls into game-facing save/load operations.

pub mod game_state;
