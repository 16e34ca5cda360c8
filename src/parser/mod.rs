//! Inbound parsing: MIME envelopes and HTML bodies.

pub mod envelope;
pub mod html;
