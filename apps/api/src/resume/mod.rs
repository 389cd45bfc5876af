pub mod generation;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod prompts;
pub mod repository;
pub mod service;
pub mod slug;
pub mod statistics;
