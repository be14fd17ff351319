//! # REST Gateway
//!
//! Translates `/send_request` calls into operations on a [`ModelStore`],
//! gated by per-model permission records.
//!
//! [`ModelStore`]: crate::store::ModelStore

pub mod errors;
pub mod filter;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use errors::{RestError, RestResult};
pub use filter::{build_domain, check_conditions};
pub use handler::GatewayHandler;
pub use request::{parse_record_id, BodyPayload, GatewayRequest, RequestBody};
pub use response::{encode_record, encode_records, encode_value, ErrorEnvelope, SuccessEnvelope};
pub use server::{GatewayServer, SEND_REQUEST_PATH};
