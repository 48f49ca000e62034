mod client;

pub use client::echo_client;
