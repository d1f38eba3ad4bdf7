// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client session entity tracked by the WebSocket fan-out server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declared type of a connected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Tui,
    Cli,
    Web,
    Unknown,
}

impl ClientType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tui" => Some(Self::Tui),
            "cli" => Some(Self::Cli),
            "web" => Some(Self::Web),
            _ => None,
        }
    }
}

/// One WebSocket connection, stable for the lifetime of the TCP session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSession {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ClientType,
    pub connected_at: DateTime<Utc>,
    pub initialized: bool,
}

impl ClientSession {
    pub fn new(id: Uuid, connected_at: DateTime<Utc>) -> Self {
        Self { id, kind: ClientType::Unknown, connected_at, initialized: false }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

