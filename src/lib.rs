//! Quote Bot - Main Library
//!
//! Thin presentation layer over the `quoter` workspace library: binary
//! plumbing (config path resolution) plus re-exports so the binaries
//! only depend on this crate.

// Re-export the workspace library for convenience
pub use quoter;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;

    pub use cli::{load_config_from_env, parse_args, ConfigType};
}
