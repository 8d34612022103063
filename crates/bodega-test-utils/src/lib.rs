// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock collaborators and a full-stack test harness for the Bodega
//! storefront bot.

pub mod harness;
pub mod mock_chat;
pub mod mocks;

pub use harness::{TestHarness, TestHarnessBuilder, ADMIN_PHONE};
pub use mock_chat::{MockChat, SentMessage};
pub use mocks::{MockLookup, MockPayments, RecordingObserver};
