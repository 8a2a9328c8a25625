// Configuration module
//
// This module contains all configuration-related functionality split into focused submodules:
// - types: The immutable proxy configuration and its defaults
// - loader: Loading the optional JSON file and overlaying command line arguments

pub mod loader;
pub mod types;

pub use types::Config;
