//! `moblog` — publish e-mails as Jekyll blog posts.
//!
//! This crate provides the mail-to-post pipeline: parsing the inbound
//! message, normalizing its images, composing the post, and handing the
//! result to a repository publisher and a confirmation notifier.

pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod parser;
pub mod pipeline;
pub mod publish;
