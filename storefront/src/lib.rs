// storefront/src/lib.rs

//! Backend for a Telegram Mini App storefront, plus the client-side pieces
//! the Mini App is built from: the HTTP service layer, cart/wishlist/auth
//! state holders, the recently-viewed tracker and the Telegram host bridge.

pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod state;
pub mod telemetry;
pub mod theme;
pub mod web;

pub use errors::{AppError, Result};
