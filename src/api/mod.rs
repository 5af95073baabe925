//! API endpoint handlers module

pub mod artists;
pub mod health;
pub mod songs;
