// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The client protocol's wire types (spec.md §4.E, §6): request/response
//! DTOs plus line-delimited JSON framing. Dispatch lives in `handlers`.

mod request;
mod response;
mod wire;

pub use request::{FolderAddPayload, FolderRemovePayload, FolderValidatePayload, Request};
pub use response::{ModelDownloadData, ModelsListData, Response, ValidationItem};
pub use wire::{decode, encode, WireError};
