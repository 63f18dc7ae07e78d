//! # autostop-api
//!
//! HTTP boundary for the Cirrus auto-shutdown service: routes, handlers,
//! DTOs, the API-key extractor, and error-to-status mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;
