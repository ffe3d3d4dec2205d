//! Keymaster - resolve queries to knowledge doors and their prerequisites.

pub mod config;
pub mod door;
pub mod index;
pub mod matching;
pub mod resolver;
pub mod store;
