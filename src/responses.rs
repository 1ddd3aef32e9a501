//! Response envelopes returned by the user directory API.

use serde::Deserialize;

/// Single-record envelope: `{"data": {...}}`.
#[derive(Deserialize, Debug)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// One page of a listing call.
#[derive(Deserialize, Debug)]
pub struct PagedResponse<T> {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub total_pages: u32,
    pub data: Vec<T>,
}
