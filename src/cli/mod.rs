// CLI module
//
// This module contains command-line interface functionality:
// - arguments: Command-line argument parsing

pub mod arguments;

pub use arguments::WProxyArguments;
