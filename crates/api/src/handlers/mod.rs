pub mod logs;
pub mod webhook;
