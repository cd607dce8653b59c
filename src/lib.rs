// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Address Auth - wallet address login service
//!
//! Proves that a client controls a wallet address by having it sign a
//! one-time server challenge, then issues JWT session tokens for that
//! address.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Signature verification, token issuance and the login protocol
//! - `challenge` - One-time challenge registry and expiry sweeper
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod challenge;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
