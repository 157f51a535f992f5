// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! Instance-metadata mimic service
//!
//! Serves a cloud provider's instance-metadata HTTP surface to machines
//! that are not running inside that provider. The caller's source address
//! is looked up in a directory of machine records loaded from disk, and
//! metadata about the matching machine is served as plain text under the
//! provider's versioned path hierarchy.
//!
//! The routing and resolution logic lives in `imds-core`; this crate wires
//! it to the outside world:
//!
//! - [`config`] - Environment-variable configuration
//! - [`resolver`] - File-backed machine directory
//! - [`http`] - The axum transport bridge

pub mod config;
pub mod http;
pub mod resolver;
