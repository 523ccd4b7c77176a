//! Authorization endpoint responses.
//!
//! - [`authorize`] - The response values handed to the transport layer
//! - [`generator`] - The code flow / implicit flow orchestrator

pub mod authorize;
pub mod generator;

pub use authorize::{
    AuthorizeResponse, CodeFlowResponse, ImplicitFlowResponse, IssuedAccessToken,
};
pub use generator::AuthorizeResponseGenerator;
