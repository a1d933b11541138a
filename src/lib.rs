pub mod cache;
pub mod config;
pub mod render;
pub mod rotator;
pub mod scheduler;
pub mod sources;

#[cfg(test)]
mod testutil;
