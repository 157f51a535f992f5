// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! Error taxonomy for metadata requests
//!
//! Every variant is a terminal per-request outcome, classified at the point
//! of detection. None of these are internal faults: all of them map to a
//! not-found-class response at the transport.

use std::net::IpAddr;

use thiserror::Error;

/// Errors produced while resolving a metadata request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The resolver has no machine record for the caller's address
    #[error("no machine record for source address {0}")]
    MachineNotFound(IpAddr),

    /// The requested public-key index exceeds the machine's key count
    #[error("public key index {index} out of range for machine with {count} key(s)")]
    KeyIndexOutOfRange { index: usize, count: usize },

    /// The key at the requested index has no material in the named format
    #[error("public key {index} has no {format:?} material")]
    UnknownKeyFormat { index: usize, format: String },

    /// No route matches the request path
    #[error("no route matches {0:?}")]
    UnmatchedPath(String),
}
