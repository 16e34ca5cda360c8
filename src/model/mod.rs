//! Core data model types for inbound messages and generated posts.

pub mod address;
pub mod envelope;
pub mod post;
