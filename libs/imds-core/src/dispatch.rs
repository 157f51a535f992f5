// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! Request dispatch
//!
//! The dispatcher owns the route table and the resolver seam, both injected
//! at construction. Per request it resolves the caller's machine, matches
//! the path against the table in registration order, and runs the bound
//! action. Leaf actions are one-line projections of machine fields; the
//! structural actions answer from the table itself.

use std::net::IpAddr;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::Error;
use crate::keys::KeyRequest;
use crate::machine::{Machine, MachineResolver};
use crate::routes::{Action, PARAM_PLACEMENT_SUB, Params, RouteTable};

/// Supported API version strings, served at `/`. The version path segment
/// itself is never validated against this list; it exists for clients that
/// discover the API by walking it.
pub const API_VERSIONS: &[&str] = &[
    "1.0",
    "2007-01-19",
    "2007-03-01",
    "2007-08-29",
    "2007-10-10",
    "2007-12-15",
    "2008-02-01",
    "2008-09-01",
    "2009-04-04",
    "2011-01-01",
    "2011-05-01",
    "2012-01-12",
    "latest",
];

/// API categories available under a version, served at `/<version>/`.
pub const API_CATEGORIES: &[&str] = &["meta-data", "user-data"];

/// Per-request state: the resolved machine and the path captures. Created
/// at dispatch entry, dropped when the response body has been produced.
struct RequestContext {
    machine: Machine,
    params: Params,
}

/// Matches request paths against the route table and runs the bound
/// handler.
///
/// Stateless across requests; the table and resolver are immutable after
/// construction, so one dispatcher is shared behind an `Arc` by arbitrarily
/// many concurrent requests.
pub struct Dispatcher {
    table: RouteTable,
    resolver: Arc<dyn MachineResolver>,
}

impl Dispatcher {
    pub fn new(table: RouteTable, resolver: Arc<dyn MachineResolver>) -> Self {
        Self { table, resolver }
    }

    /// Resolve one request to its full plain-text body.
    ///
    /// The machine is resolved before route matching, so an unknown caller
    /// gets [`Error::MachineNotFound`] on every path, including the
    /// presence probes.
    pub async fn dispatch(&self, source: IpAddr, path: &str) -> Result<Bytes, Error> {
        let machine = self
            .resolver
            .resolve(source)
            .await
            .ok_or(Error::MachineNotFound(source))?;

        let (action, params) = self
            .table
            .lookup(path)
            .ok_or_else(|| Error::UnmatchedPath(path.to_string()))?;

        tracing::debug!(%source, path, ?action, "dispatching metadata request");

        let ctx = RequestContext { machine, params };
        self.run(action, &ctx)
    }

    fn run(&self, action: Action, ctx: &RequestContext) -> Result<Bytes, Error> {
        let machine = &ctx.machine;
        let body = match action {
            Action::ApiVersions => Bytes::from(API_VERSIONS.join("\n")),
            Action::Probe => Bytes::new(),
            Action::CategoryList => Bytes::from(API_CATEGORIES.join("\n")),
            Action::MetadataList => {
                let leaves: Vec<&str> = self.table.metadata_leaves().collect();
                Bytes::from(leaves.join("\n"))
            }
            Action::InstanceId => Bytes::from(machine.instance_id.clone()),
            Action::InstanceType => Bytes::from(machine.instance_type.clone()),
            Action::Hostname => Bytes::from(machine.hostname.clone()),
            Action::LocalHostname => Bytes::from(machine.local_hostname.clone()),
            Action::LocalIpv4 => Bytes::from(machine.local_ipv4.clone()),
            Action::PublicIpv4 => Bytes::from(machine.public_ipv4.clone()),
            Action::Placement => match ctx.params.get(PARAM_PLACEMENT_SUB) {
                // The captured sub-segment is the availability-zone leaf.
                Some(_) => Bytes::from(machine.availability_zone.clone()),
                // Bare placement listing: hint at the only sub-key.
                None => Bytes::from_static(b"availability-zone"),
            },
            Action::PublicKeys => KeyRequest::from_params(&ctx.params).resolve(&machine.keys)?,
            Action::UserData => machine.user_data.clone(),
        };
        Ok(body)
    }
}
