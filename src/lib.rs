pub mod config;
pub mod encoder;
pub mod error;
pub mod input;
pub mod messages;
pub mod runtime;
pub mod serial;

#[cfg(test)]
pub(crate) mod testing;
