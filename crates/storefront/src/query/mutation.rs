//! Writes that invalidate cached reads.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, instrument};

use super::client::QueryClient;
use crate::api::ApiError;
use crate::normalize::{Normalized, normalize_or_raw};
use crate::resource::Resource;

/// A failed write.
///
/// `message` is what the server said (its `error` field, else `message`), or
/// a generic "Failed to ..." line when it said nothing usable.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct MutationError {
    pub message: String,
    #[source]
    pub source: Option<ApiError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationKind {
    Add,
    Update,
    Delete,
}

impl MutationKind {
    const fn verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Write operations for one resource.
///
/// A successful write invalidates every cached entry for the resource so the
/// next load refetches. Writes are never retried.
#[derive(Debug, Clone)]
pub struct Mutation {
    client: QueryClient,
    resource: Resource,
}

impl Mutation {
    #[must_use]
    pub const fn new(client: QueryClient, resource: Resource) -> Self {
        Self { client, resource }
    }

    #[must_use]
    pub const fn resource(&self) -> Resource {
        self.resource
    }

    /// POST `body` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError`] if the request fails or the server rejects it.
    #[instrument(skip(self, body), fields(resource = %self.resource, path = %path))]
    pub async fn add<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Normalized, MutationError> {
        let result = self.client.api().post::<Value, B>(path, body).await;
        self.finish(MutationKind::Add, result).await
    }

    /// PATCH `body` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError`] if the request fails or the server rejects it.
    #[instrument(skip(self, body), fields(resource = %self.resource, path = %path))]
    pub async fn update<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Normalized, MutationError> {
        let result = self.client.api().patch::<Value, B>(path, body).await;
        self.finish(MutationKind::Update, result).await
    }

    /// DELETE `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError`] if the request fails or the server rejects it.
    #[instrument(skip(self), fields(resource = %self.resource, path = %path))]
    pub async fn delete(&self, path: &str) -> Result<Normalized, MutationError> {
        let result = self.client.api().delete::<Value>(path).await;
        self.finish(MutationKind::Delete, result).await
    }

    async fn finish(
        &self,
        kind: MutationKind,
        result: Result<Value, ApiError>,
    ) -> Result<Normalized, MutationError> {
        match result {
            Ok(raw) => {
                self.client.invalidate(self.resource).await;
                info!(action = kind.verb(), "Mutation succeeded");
                // DELETE commonly answers with an empty body.
                if raw.is_null() {
                    return Ok(Normalized::Raw(Value::Null));
                }
                Ok(normalize_or_raw(self.resource, &raw))
            }
            Err(e) => {
                let message = e.server_message().map_or_else(
                    || format!("Failed to {} {}", kind.verb(), self.resource.singular()),
                    str::to_owned,
                );
                error!(action = kind.verb(), error = %e, "Mutation failed");
                Err(MutationError {
                    message,
                    source: Some(e),
                })
            }
        }
    }
}
