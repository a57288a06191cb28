// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # outagesync Store
//!
//! Credential loading for outagesync.
//!
//! ## Usage
//!
//! ```ignore
//! use outagesync_store::Credentials;
//!
//! // Explicit path, or discovery when `None`
//! let creds = Credentials::load(None)?;
//! println!("API at {}", creds.api_url);
//! ```

pub mod credentials;
pub mod error;

pub use credentials::{
    candidate_paths, locate, user_credentials_path, Credentials, DEFAULT_CREDENTIALS_PATH,
};
pub use error::ConfigError;
