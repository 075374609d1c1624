//! Host-facing provider capability (behavior) and Yahoo configuration (data).
//!
//! `capability` defines [`Provider`], the object-safe trait a host framework drives for every
//! identity provider it registers. `config` holds the immutable credentials and endpoints,
//! and `yahoo` binds both to Yahoo's authorization, token, and profile endpoints.

pub mod capability;
pub mod config;
pub mod yahoo;

pub use capability::*;
pub use config::*;
pub use yahoo::*;
