//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep CLI and embedding layers decoupled from storage details.

pub mod tracker_service;
