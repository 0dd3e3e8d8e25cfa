// Library exports for the snake arena
// The binaries and integration tests drive the engine through these modules

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod flood_fill;
pub mod food;
pub mod grid;
pub mod oscillation;
pub mod pathfinding;
pub mod replay;
pub mod runner;
pub mod session;
pub mod shadow;
pub mod snake;
pub mod types;
