mod api;

pub use api::{ClientPayload, DateRange, EchoResponse};
