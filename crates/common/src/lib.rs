//! Shared types and helpers used by the server crate and binary.

pub mod types;

pub mod utils {
    pub mod logging;
}
