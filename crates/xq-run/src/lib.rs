//! Command-line interface for xq, an XPath query tool for XML and HTML.
//!
//! ```rust,no_run
//! use clap::Parser;
//! use xq_run::Cli;
//!
//! Cli::parse().run().expect("xq failed");
//! ```
mod cli;

pub use cli::Cli;
