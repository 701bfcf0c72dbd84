//! Model Context Protocol server for obsidian-cli vaults.
//!
//! Speaks line-delimited JSON-RPC 2.0 on stdio and exposes the vault
//! operations of `obsidian-core` as tools.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::{McpServer, start_server};
