// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::error::DockerError;
use http_body_util::{BodyExt, Empty, LengthLimitError, Limited};
use hyper::body::Bytes;
use hyper::header::HOST;
use hyper::{Method, Request, StatusCode, Version};
use hyper_util::rt::TokioIo;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::UnixStream;

/// One-shot HTTP/1.0 client for the container runtime's Unix socket.
///
/// Every call opens a fresh connection. Failures never reach the caller as
/// errors: [`DockerClient::get_json`] returns `None` and logs, and the caller
/// skips the entity for this cycle.
#[derive(Debug, Clone)]
pub struct DockerClient {
    socket_path: PathBuf,
    timeout: Duration,
    max_response_bytes: usize,
}

impl DockerClient {
    pub fn new(socket_path: impl Into<PathBuf>, timeout: Duration, max_response_bytes: usize) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout,
            max_response_bytes,
        }
    }

    /// GET `path` and decode the JSON body, or `None` on any failure.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        match self.try_get_json(path).await {
            Ok(value) => Some(value),
            Err(DockerError::Status(status)) => {
                warn!("GET {path}: {status}");
                None
            }
            Err(e) => {
                warn!("GET {path}: {:#}", anyhow::Error::new(e));
                None
            }
        }
    }

    pub async fn try_get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, DockerError> {
        let body = self.get(path).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// GET `path` and return the full body of a 200 response.
    pub async fn get(&self, path: &str) -> Result<Bytes, DockerError> {
        tokio::time::timeout(self.timeout, self.exchange(path))
            .await
            .map_err(|_| DockerError::Timeout(self.timeout))?
    }

    async fn exchange(&self, path: &str) -> Result<Bytes, DockerError> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|source| DockerError::Connect {
                path: self.socket_path.clone(),
                source,
            })?;

        let (mut sender, conn) =
            hyper::client::conn::http1::handshake::<_, Empty<Bytes>>(TokioIo::new(stream)).await?;
        let conn = tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!("connection closed with error: {e}");
            }
        });

        let req = Request::builder()
            .method(Method::GET)
            .uri(path)
            .version(Version::HTTP_10)
            .header(HOST, "localhost")
            .body(Empty::<Bytes>::new())?;

        let result = async {
            let resp = sender.send_request(req).await?;
            let status = resp.status();
            if status != StatusCode::OK {
                return Err(DockerError::Status(status));
            }
            let limit = self.max_response_bytes;
            let collected = Limited::new(resp.into_body(), limit)
                .collect()
                .await
                .map_err(|e| {
                    if e.downcast_ref::<LengthLimitError>().is_some() {
                        DockerError::TooLarge(limit)
                    } else {
                        DockerError::Body(e.to_string())
                    }
                })?;
            Ok::<_, DockerError>(collected.to_bytes())
        }
        .await;

        conn.abort();
        result
    }
}
