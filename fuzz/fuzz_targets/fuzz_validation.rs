//! Fuzz testing for validation functions.
//!
//! Checks that the validators never panic on arbitrary input:
//!
//! - `is_valid_date` / `parse_date` on any UTF-8 string
//! - `validate_payload` on any byte sequence, with and without a content type
//! - `validate_query_params` on pairs split out of the input
//!
//! # Running the Fuzz Tests
//!
//! ```bash
//! cargo +nightly install cargo-fuzz
//! cargo +nightly fuzz run fuzz_validation -- -max_total_time=60
//! ```

#![no_main]

use client_echo::validation::{
    is_valid_date, parse_date, validate_payload, validate_query_params,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // A date that parses must also be reported valid
        assert_eq!(parse_date(s).is_some(), is_valid_date(s));

        let pairs: Vec<(String, String)> = s
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let _ = validate_query_params(&pairs);

        let _ = validate_payload(Some(s), data);
    }

    let _ = validate_payload(None, data);
    let _ = validate_payload(Some("application/json"), data);
});
