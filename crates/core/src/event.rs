// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tagged daemon-lifecycle events, replacing an EventEmitter-style service
//! (spec.md §9 Design Notes) with a plain enum consumers `select!` on via a
//! `tokio::sync::broadcast` channel.

/// Lifecycle event emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum DaemonEvent {
    Started,
    Stopped,
    Restarted,
    Error(String),
    StatusChanged(String),
    ConfigReloaded,
}
