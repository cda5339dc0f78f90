//! Domain logic for the webhook relay.
//!
//! Nothing in this crate performs I/O: it resolves accounts to destination
//! URLs, models the message object a Discord webhook echoes back, and turns
//! that message into the summary that gets logged.

pub mod accounts;
pub mod discord;
pub mod error;
pub mod retention;
pub mod types;
