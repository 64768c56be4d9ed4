pub mod config;
pub mod logging;

pub mod checksum;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod reference;
pub mod runner;
pub mod sink;
pub mod verify;
