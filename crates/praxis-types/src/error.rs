// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT

//! Application error identifiers shared across crate boundaries (spec §6,
//! §7). Each owning crate (`praxis-tasks`, …) wraps these in its own
//! `thiserror` enum; this type exists so the *names* stay consistent at
//! every seam that needs to recognize them (e.g. the executor mapping a
//! cancellation failure onto a node-status error).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AppError {
    #[error("task not found")]
    TaskNotFound,
    #[error("task not cancelable")]
    TaskNotCancelable,
}
