//! API Module
//!
//! HTTP gateway exposing the market-data core to a presentation layer.
//!
//! # Endpoints
//! - `GET /coins` - List cryptocurrencies
//! - `GET /coins/:id` - Coin details
//! - `DELETE /cache` - Drop cached market data
//! - `GET /favorites`, `POST /favorites/:id/toggle`, `DELETE /favorites`
//! - `GET /settings`, `PUT /settings`, `DELETE /settings`
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
