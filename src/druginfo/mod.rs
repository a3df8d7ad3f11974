pub mod client;
pub mod endpoints;
pub mod params;
pub mod response;

pub use client::{DrugInfoClient, PreparedRequest};
pub use endpoints::{endpoint_by_operation, endpoints, Endpoint, HttpMethod, ParamKind};
