// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod actions;
pub mod config;
pub mod menu;
pub mod prompt;
pub mod results_grid;

#[cfg(test)]
mod test_utils;
