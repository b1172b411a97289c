// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn inbound_message_default_has_no_attachments_or_callback() {
    let msg = InboundMessage::default();
    assert!(msg.text.is_none());
    assert!(msg.attachments.is_empty());
    assert!(msg.button_callback.is_none());
}

#[test]
fn media_kind_variants_are_distinct() {
    assert_ne!(MediaKind::Photo as u8, MediaKind::Video as u8);
}
