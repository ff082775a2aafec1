// ABOUTME: Security utilities for the HTTP surface
// ABOUTME: Cookie handling and signed session identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cookie header building and parsing
pub mod cookies;
/// HMAC-signed session cookies
pub mod session_cookie;

pub use session_cookie::SessionCookies;
