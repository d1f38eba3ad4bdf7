// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn tag_strips_known_prefix_only() {
    let backend = OllamaBackend::new();
    assert_eq!(backend.tag("ollama:nomic-embed-text"), "nomic-embed-text");
    assert_eq!(backend.tag("nomic-embed-text"), "nomic-embed-text");
}
