use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Date range taken from the `start_date`/`end_date` query parameters.
///
/// Inserted into request extensions by the query guard once both values
/// are present and well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range, verbatim `DD-MM-YYYY`
    pub start_date: String,
    /// Last day of the range, verbatim `DD-MM-YYYY`
    pub end_date: String,
}

/// Validated JSON body of a client request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientPayload {
    /// Transaction date, verbatim `DD-MM-YYYY`
    pub date: String,
    /// Transaction amount; integer or float representation is preserved
    pub amount: Number,
}

/// Response returned when every guard passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoResponse {
    pub client_id: String,
    pub received_date: String,
    pub amount: Number,
    pub query_start_date: String,
    pub query_end_date: String,
}

impl EchoResponse {
    /// Assemble the echo from the path segment and the validated inputs.
    pub fn new(client_id: String, range: DateRange, payload: ClientPayload) -> Self {
        Self {
            client_id,
            received_date: payload.date,
            amount: payload.amount,
            query_start_date: range.start_date,
            query_end_date: range.end_date,
        }
    }
}
