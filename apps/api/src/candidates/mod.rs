//! Candidate resource: identifier shape, create-request validation, the controller
//! service and its HTTP handlers.

pub mod handlers;
pub mod id;
pub mod service;
pub mod validation;
