//! Lock-and-key coin hunt played through chat commands.
//!
//! Each round a fresh maze is carved, a coin is dropped on the last cell the
//! carve visited, and every viewer steers a character towards it with
//! `!character ...` messages. Jumping on the coin scores it and starts the
//! next round once the collection animation has played.

pub mod command;
pub mod config;
pub mod maze;
pub mod simulation;

pub use command::Command;
pub use config::HuntConfig;
pub use maze::{KeyId, Maze, MazeCell};
pub use simulation::{BORDER, Coin, Simulation};
