//! Test module for cmdmenu-core
//!
//! This module contains tests for:
//! - Menu building from host descriptors and custom entries
//! - Debounced, cancellable collection sub-search
//! - The palette engine: key dispatch, page transitions and actions

mod subsearch_tests;
