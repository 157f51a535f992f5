// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! Service configuration

use std::path::PathBuf;

/// Default bind address for the HTTP listener
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default directory holding machine record files
const DEFAULT_MACHINES_DIR: &str = "/var/tmp/imds/machines";

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_address: String,
    /// Directory of machine record files, one JSON file per machine
    pub machines_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            machines_dir: PathBuf::from(DEFAULT_MACHINES_DIR),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());

        let machines_dir = std::env::var("MACHINES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MACHINES_DIR));

        Self {
            bind_address,
            machines_dir,
        }
    }
}
