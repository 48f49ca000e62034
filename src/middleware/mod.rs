//! HTTP middleware: the guard chain and request correlation.
//!
//! - **Guard chain**: [`BasicAuth`] → [`QueryGuard`] → [`PayloadGuard`], each
//!   wrapped in a [`GuardLayer`]; the first failing guard answers the request
//! - **Request ID**: Generation and propagation of `X-Request-Id`
//!
//! # Architecture
//!
//! ```text
//! Request → Request ID → Auth → Query → Payload → Handler → Response
//!               ↓          ↓      ↓        ↓
//!        X-Request-Id    401    422    422 / 413
//! ```
//!
//! # Security Considerations
//!
//! - Credential comparison uses constant-time equality
//! - Credentials never appear in logs or `Debug` output
//! - The body is only read after authentication and query checks passed

pub mod auth;
pub mod guard;
pub mod payload;
pub mod query;
pub mod request_id;

pub use auth::{BasicAuth, BasicCredentials, CredentialVerifier, StaticCredentials};
pub use guard::{GuardLayer, RequestGuard};
pub use payload::PayloadGuard;
pub use query::QueryGuard;
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
