// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Receive-data API endpoint module
//!
//! Provides POST /receive-data for processing prescription images.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::receive_data_handler;
pub use request::ReceiveDataRequest;
pub use response::ReceiveDataResponse;
