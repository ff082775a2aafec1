// ABOUTME: Application constants re-exported from eva-core
// ABOUTME: Environment names, defaults and coach chat messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use eva_core::constants::*;
