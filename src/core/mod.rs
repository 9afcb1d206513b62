pub mod app;
pub mod cli;
pub mod config;
pub mod history;
pub mod normalize;
pub mod paths;
pub mod service;
pub mod state;
pub mod templates;
pub mod tools;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;
