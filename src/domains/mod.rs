//! Domains module: the MCP-facing surface of the server.
//!
//! Each subdomain adapts the confined file operations in `core::files` to
//! one kind of MCP capability.

pub mod prompts;
pub mod resources;
pub mod tools;
