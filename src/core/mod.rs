//! Core building blocks shared by the engine adapter and the registrar

pub mod error;
pub mod negotiate;

pub use error::{BridgeError, BridgeResult, ConfigError, ErrorResponse, HttpQueryError};
pub use negotiate::prefers_html;
