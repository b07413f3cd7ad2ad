// Core of the game: levels, trial tracking, reports and their storage.
// The terminal front end in main.rs drives these through the session tracker.

pub mod config;
pub mod game;
pub mod logging;
pub mod session;
pub mod store;
