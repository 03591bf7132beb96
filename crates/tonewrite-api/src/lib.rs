//! Tonewrite HTTP API
//!
//! Exposes the tone conversion pipeline over HTTP. The library target lets
//! integration tests build the router without binding a socket.

pub mod api_doc;
pub mod constants;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
