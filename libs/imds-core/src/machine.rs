// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! Machine identity records and the resolver seam

use std::net::IpAddr;

use async_trait::async_trait;
use bytes::Bytes;
use indexmap::IndexMap;

/// Key material for one public key, indexed by format name
/// (e.g. `openssh-key`, `fingerprint`), in the order the formats were
/// declared.
pub type KeyFormats = IndexMap<String, Bytes>;

/// A machine's public keys, indexed by key name. Insertion order defines
/// the zero-based numeric index used by the public-keys protocol.
pub type KeyTable = IndexMap<String, KeyFormats>;

/// Identity record for one emulated instance.
///
/// Records are owned by the resolver; handlers only ever read them. A field
/// with no backing data is the empty string (or empty bytes), never an
/// option, so every leaf projection stays total.
#[derive(Debug, Clone, Default)]
pub struct Machine {
    pub instance_id: String,
    pub hostname: String,
    pub local_hostname: String,
    pub instance_type: String,
    pub local_ipv4: String,
    pub public_ipv4: String,
    pub availability_zone: String,
    /// Opaque blob, returned verbatim at `user-data/`
    pub user_data: Bytes,
    pub keys: KeyTable,
}

/// Maps a caller's source address to a machine identity.
///
/// `None` is the first-class NotFound outcome, not an error: callers the
/// directory does not know about are expected. Implementations must be
/// deterministic for a fixed address within one request and safe for
/// concurrent calls; records may legitimately change between unrelated
/// requests.
#[async_trait]
pub trait MachineResolver: Send + Sync {
    async fn resolve(&self, source: IpAddr) -> Option<Machine>;
}
