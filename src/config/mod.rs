//! Configuration module
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! that describes the target site, the client identity and traversal limits.
//!
//! # Example
//!
//! ```no_run
//! use shopfront_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Scraping {}", config.site.root_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, ProductErrorPolicy, ScraperConfig, SiteConfig, UserAgentConfig,
    MAX_DEFAULT_DELAY_SECS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
