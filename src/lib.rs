pub mod collab;
pub mod complete;
pub mod config;
pub mod console;
pub mod error;
pub mod nano;
pub mod path;
pub mod scheduler;
pub mod seed;
pub mod shell;
pub mod system;
pub mod terminal;
pub mod transcript;
pub mod vfs;
pub mod wipe;

pub use system::System;
pub use terminal::Terminal;
