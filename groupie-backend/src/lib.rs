pub mod config;
pub mod logging;
pub mod module;
pub mod server;

#[cfg(test)]
mod test_utils;
