// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `connection.init` handler (spec.md §4.E).

use fmdm_core::ClientType;

use crate::protocol::Response;

/// Parse and validate a declared client type. Unknown types are rejected
/// rather than coerced to `unknown`, per spec.md §4.E "Reject unknown
/// clientType".
pub fn parse(client_type: &str) -> Result<ClientType, Response> {
    ClientType::parse(client_type).ok_or_else(|| Response::error(format!("unknown clientType: {client_type}"), Some("unknown_client_type")))
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;

