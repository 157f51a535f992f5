// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2026 Edgecast Cloud LLC.

//! HTTP transport bridge
//!
//! A single axum fallback handler feeds every request into the dispatcher;
//! the core route table is the only router, which keeps trailing-slash and
//! precedence semantics where they are defined. The handler needs the peer
//! address, so the router must be served with
//! `into_make_service_with_connect_info::<SocketAddr>`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{ConnectInfo, State};
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use imds_core::Dispatcher;

/// Build the service router around a shared dispatcher.
pub fn build_router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new().fallback(handle).with_state(dispatcher)
}

async fn handle(
    State(dispatcher): State<Arc<Dispatcher>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
) -> Response {
    // The metadata surface is read-only.
    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    match dispatcher.dispatch(peer.ip(), uri.path()).await {
        Ok(body) => ([(header::CONTENT_TYPE, "text/plain")], body).into_response(),
        Err(error) => {
            tracing::info!(
                peer = %peer.ip(),
                path = uri.path(),
                reason = %error,
                "metadata request not satisfied"
            );
            (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "text/plain")],
                error.to_string(),
            )
                .into_response()
        }
    }
}
