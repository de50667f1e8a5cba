pub mod api;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod external;
pub mod map;
pub mod requester;
pub mod resolver;
pub mod server;
pub mod store;
pub mod view;

#[cfg(test)]
mod testing;
