pub mod app;
pub mod cli;
pub mod config;
pub mod fetcher;
pub mod filter;
pub mod output;
pub mod runner;

#[cfg(test)]
mod tests;
