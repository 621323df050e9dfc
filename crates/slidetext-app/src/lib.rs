//! SlideText application shell
//!
//! Wires the overlay editor to a carousel: a DOM shell in the browser and
//! a session replay tool on native targets.

mod config;

pub use config::AppConfig;

#[cfg(not(target_arch = "wasm32"))]
pub mod replay;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
