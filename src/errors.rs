// ABOUTME: Re-export of the unified error system from eva-core
// ABOUTME: Keeps `crate::errors::AppError` as the single import path inside the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use eva_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails};
