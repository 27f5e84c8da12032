// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Artifact storage

pub mod artifacts;

pub use artifacts::{ArtifactStore, StoreError};
