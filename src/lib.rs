//! # Client Echo
//!
//! A single Axum endpoint that authenticates the caller with HTTP Basic
//! auth, validates a date range in the query string and a JSON body, and
//! echoes the validated values back.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (Request ID → Trace → CORS → Catch Panic)       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Guards (Basic Auth → Query → Payload)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handler: POST /client/{client_id}                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use client_echo::{AppState, Config, build_router};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let listener = tokio::net::TcpListener::bind(config.server_addr()).await?;
//!     let app = build_router(AppState::new(config));
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Example Request
//!
//! ```bash
//! curl -u user:password -X POST \
//!   "http://localhost:5000/client/acme?start_date=01-01-2024&end_date=31-01-2024" \
//!   -H 'Content-Type: application/json' \
//!   -d '{"date": "15-01-2024", "amount": 42.5}'
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult};
pub use routes::{apply_middleware, build_router};
pub use state::AppState;
