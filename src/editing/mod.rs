// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Selection-driven editing of a morph block

pub mod intent;
pub mod selection;
pub mod session;

pub use intent::{ActionMode, Intent, UnpairedSubPath};
pub use selection::{Selection, SelectionKind, SelectionRegistry};
pub use session::MorphSession;
