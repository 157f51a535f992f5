// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! The three-level public-keys protocol
//!
//! Clients walk the `public-keys/` sub-tree without prior knowledge of key
//! names or formats: list the keys, list one key's formats, fetch the raw
//! material. The request shape is parsed once at the boundary into a tagged
//! variant; key lookup is by zero-based position in the machine's ordered
//! key table.

use bytes::Bytes;

use crate::error::Error;
use crate::machine::{KeyFormats, KeyTable};
use crate::routes::{PARAM_KEY_FORMAT, PARAM_KEY_INDEX, Params};

/// One public-keys request, keyed by which of the index and format path
/// segments are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRequest {
    /// `public-keys/` - list every key as `<index>=<name>`
    List,
    /// `public-keys/<index>/` - list the format names for one key
    Describe(usize),
    /// `public-keys/<index>/<format>` - return the raw key material
    Fetch(usize, String),
}

impl KeyRequest {
    /// Parse the request shape from the path captures.
    ///
    /// The grammar only captures digit runs for the index, so a parse
    /// failure means the number is too large for `usize`. Such an index is
    /// necessarily out of range, which `usize::MAX` reports as.
    pub fn from_params(params: &Params) -> Self {
        let index = params
            .get(PARAM_KEY_INDEX)
            .map(|raw| raw.parse::<usize>().unwrap_or(usize::MAX));

        match (index, params.get(PARAM_KEY_FORMAT)) {
            (None, _) => Self::List,
            (Some(index), None) => Self::Describe(index),
            (Some(index), Some(format)) => Self::Fetch(index, format.to_string()),
        }
    }

    /// Resolve the request against a machine's key table.
    pub fn resolve(&self, keys: &KeyTable) -> Result<Bytes, Error> {
        match self {
            Self::List => {
                let lines: Vec<String> = keys
                    .keys()
                    .enumerate()
                    .map(|(index, name)| format!("{}={}", index, name))
                    .collect();
                Ok(Bytes::from(lines.join("\n")))
            }
            Self::Describe(index) => {
                let formats = key_at(keys, *index)?;
                let names: Vec<&str> = formats.keys().map(String::as_str).collect();
                Ok(Bytes::from(names.join("\n")))
            }
            Self::Fetch(index, format) => {
                let formats = key_at(keys, *index)?;
                formats
                    .get(format)
                    .cloned()
                    .ok_or_else(|| Error::UnknownKeyFormat {
                        index: *index,
                        format: format.clone(),
                    })
            }
        }
    }
}

/// Key lookup by ordinal position; out of range is a client error, never a
/// fault.
fn key_at(keys: &KeyTable, index: usize) -> Result<&KeyFormats, Error> {
    keys.get_index(index)
        .map(|(_, formats)| formats)
        .ok_or(Error::KeyIndexOutOfRange {
            index,
            count: keys.len(),
        })
}

// Allow expect/unwrap in tests - they provide clear panic messages on failure
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn sample_keys() -> KeyTable {
        let mut rsa_formats = IndexMap::new();
        rsa_formats.insert("openssh-key".to_string(), Bytes::from_static(b"AAAA..."));
        rsa_formats.insert("fingerprint".to_string(), Bytes::from_static(b"12:34"));

        let mut ed_formats = IndexMap::new();
        ed_formats.insert(
            "openssh-key".to_string(),
            Bytes::from_static(b"AAAAC3Nz..."),
        );

        let mut keys = IndexMap::new();
        keys.insert("id_rsa".to_string(), rsa_formats);
        keys.insert("id_ed25519".to_string(), ed_formats);
        keys
    }

    #[test]
    fn list_pairs_index_with_name_in_insertion_order() {
        let body = KeyRequest::List.resolve(&sample_keys()).unwrap();
        assert_eq!(body, Bytes::from_static(b"0=id_rsa\n1=id_ed25519"));
    }

    #[test]
    fn list_is_empty_for_a_machine_without_keys() {
        let body = KeyRequest::List.resolve(&KeyTable::new()).unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn describe_lists_format_names_in_insertion_order() {
        let body = KeyRequest::Describe(0).resolve(&sample_keys()).unwrap();
        assert_eq!(body, Bytes::from_static(b"openssh-key\nfingerprint"));
    }

    #[test]
    fn fetch_returns_material_verbatim() {
        let body = KeyRequest::Fetch(0, "openssh-key".to_string())
            .resolve(&sample_keys())
            .unwrap();
        assert_eq!(body, Bytes::from_static(b"AAAA..."));
    }

    #[test]
    fn out_of_range_index_is_a_client_error() {
        let err = KeyRequest::Describe(5).resolve(&sample_keys()).unwrap_err();
        assert_eq!(err, Error::KeyIndexOutOfRange { index: 5, count: 2 });

        let err = KeyRequest::Fetch(5, "openssh-key".to_string())
            .resolve(&sample_keys())
            .unwrap_err();
        assert_eq!(err, Error::KeyIndexOutOfRange { index: 5, count: 2 });
    }

    #[test]
    fn unknown_format_is_a_client_error() {
        let err = KeyRequest::Fetch(1, "fingerprint".to_string())
            .resolve(&sample_keys())
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnknownKeyFormat {
                index: 1,
                format: "fingerprint".to_string()
            }
        );
    }

    #[test]
    fn oversized_index_parses_to_out_of_range() {
        let table = crate::routes::RouteTable::standard();
        let (_, params) = table
            .lookup("/latest/meta-data/public-keys/99999999999999999999999999/")
            .expect("digit run should still match the route");
        let request = KeyRequest::from_params(&params);
        assert_eq!(request, KeyRequest::Describe(usize::MAX));
        let err = request.resolve(&sample_keys()).unwrap_err();
        assert!(matches!(err, Error::KeyIndexOutOfRange { .. }));
    }
}
