// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! File-backed machine directory
//!
//! Machine records are loaded from JSON files at startup, one machine per
//! file, and looked up by the caller's exact source address. The record
//! format keeps user data and key material as strings for JSON ergonomics;
//! records are converted into `imds_core::Machine` values at load time.

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use imds_core::{KeyTable, Machine, MachineResolver};
use indexmap::IndexMap;
use serde::Deserialize;

/// On-disk machine record. Key order in the `keys` mapping is preserved
/// from the document and defines the indices served by the public-keys
/// protocol.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineRecord {
    /// Source address whose requests resolve to this machine
    pub source_ip: IpAddr,
    pub instance_id: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub local_hostname: String,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub local_ipv4: String,
    #[serde(default)]
    pub public_ipv4: String,
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default)]
    pub user_data: String,
    #[serde(default)]
    pub keys: IndexMap<String, IndexMap<String, String>>,
}

impl From<MachineRecord> for Machine {
    fn from(record: MachineRecord) -> Self {
        let keys: KeyTable = record
            .keys
            .into_iter()
            .map(|(name, formats)| {
                let formats = formats
                    .into_iter()
                    .map(|(format, material)| (format, Bytes::from(material)))
                    .collect();
                (name, formats)
            })
            .collect();

        Machine {
            instance_id: record.instance_id,
            hostname: record.hostname,
            local_hostname: record.local_hostname,
            instance_type: record.instance_type,
            local_ipv4: record.local_ipv4,
            public_ipv4: record.public_ipv4,
            availability_zone: record.availability_zone,
            user_data: Bytes::from(record.user_data),
            keys,
        }
    }
}

/// Resolver backed by a directory of machine record files
#[derive(Debug, Default)]
pub struct FileResolver {
    machines: HashMap<IpAddr, Machine>,
}

impl FileResolver {
    /// Load every `*.json` machine record from `dir`.
    ///
    /// Malformed files are skipped with a warning so one bad record cannot
    /// keep the whole directory from serving.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut machines = HashMap::new();

        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read machines directory: {}", dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match serde_json::from_str::<MachineRecord>(&json) {
                Ok(record) => {
                    tracing::info!(
                        source_ip = %record.source_ip,
                        instance_id = %record.instance_id,
                        "Loaded machine record from {}",
                        path.display()
                    );
                    machines.insert(record.source_ip, Machine::from(record));
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping {}: not a valid machine record ({})",
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(Self { machines })
    }

    /// Number of loaded machine records
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }
}

#[async_trait]
impl MachineResolver for FileResolver {
    async fn resolve(&self, source: IpAddr) -> Option<Machine> {
        self.machines.get(&source).cloned()
    }
}
