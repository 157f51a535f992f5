// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! Instance-metadata mimic core
//!
//! Request routing and metadata resolution for an emulated cloud-provider
//! instance-metadata service. A caller's source address is mapped to a
//! machine identity through a [`machine::MachineResolver`], and the request
//! path is matched against a fixed route table mirroring the provider's
//! versioned path hierarchy. Every response is a plain-text body.
//!
//! This crate performs no I/O of its own beyond the resolver call: the HTTP
//! transport, configuration, and the resolver's backing store live in the
//! server crate.
//!
//! # Modules
//!
//! - [`machine`] - Machine identity records and the resolver seam
//! - [`routes`] - The static route table encoding the path grammar
//! - [`dispatch`] - Request dispatch against the table
//! - [`keys`] - The three-level public-keys protocol
//! - [`error`] - Error taxonomy for per-request outcomes

pub mod dispatch;
pub mod error;
pub mod keys;
pub mod machine;
pub mod routes;

pub use dispatch::{API_CATEGORIES, API_VERSIONS, Dispatcher};
pub use error::Error;
pub use machine::{KeyFormats, KeyTable, Machine, MachineResolver};
pub use routes::RouteTable;
