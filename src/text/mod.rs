// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Transcript text processing

pub mod normalize;

pub use normalize::normalize_lines;
