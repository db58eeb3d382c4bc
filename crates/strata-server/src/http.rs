//! HTTP/JSON transport for the broker façade.
//!
//! Five routes, all synchronous request/response with no long-polling and no
//! streaming:
//!
//! - `GET  /health`
//! - `GET  /metadata`
//! - `POST /topics/events?topic=<t>`
//! - `GET  /messages?topic=<t>&partition=<p>&offset=<o>&maxBytes=<n>`
//! - `POST /consumer-groups/offsets/commit?group=<g>`
//!
//! The transport owns all serialization concerns: publish payloads arrive as
//! arbitrary JSON and are serialized to bytes before they reach the core;
//! fetched payloads go back out base64-encoded. Typed broker failures map to
//! status codes here (bad input 400, unknown topic/partition 404,
//! storage/internal 500) with a JSON `{error, message}` body.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::broker::Broker;
use crate::error::BrokerError;

pub type SharedBroker = Arc<Broker>;

pub fn create_router(broker: SharedBroker) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metadata", get(metadata))
        .route("/topics/events", post(publish))
        .route("/messages", get(fetch))
        .route("/consumer-groups/offsets/commit", post(commit))
        .with_state(broker)
}

/// Bind and serve until the process is stopped.
pub async fn serve(router: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "broker listening");
    axum::serve(listener, router).await
}

// ---- wire models -----------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PublishQuery {
    pub topic: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub key: String,
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublishResponse {
    pub partition: u32,
    pub offset: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchQuery {
    pub topic: String,
    pub partition: u32,
    pub offset: u64,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

fn default_max_bytes() -> usize {
    1 << 20
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub offset: u64,
    pub timestamp: i64,
    pub key: String,
    /// Stored payload bytes, base64-encoded.
    pub payload: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FetchResponse {
    pub topic: String,
    pub partition: u32,
    pub messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
pub struct CommitQuery {
    pub group: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommitRequest {
    pub topic: String,
    pub partition: u32,
    pub offset: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommitResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicInfo {
    pub name: String,
    pub partitions: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub topics: Vec<TopicInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

// ---- error mapping ---------------------------------------------------------

pub struct ApiError(BrokerError);

impl From<BrokerError> for ApiError {
    fn from(e: BrokerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            BrokerError::TopicNotFound(_) | BrokerError::PartitionNotFound { .. } => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            BrokerError::TopicAlreadyExists(_) => (StatusCode::CONFLICT, "already_exists"),
            BrokerError::Storage(_) | BrokerError::Metadata(_) => {
                error!(error = %self.0, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        let body = Json(ErrorResponse {
            error: kind.to_string(),
            message: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

// ---- handlers --------------------------------------------------------------

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

async fn metadata(State(broker): State<SharedBroker>) -> Json<MetadataResponse> {
    let topics = broker
        .list_topics()
        .await
        .into_iter()
        .map(|meta| TopicInfo {
            name: meta.name,
            partitions: meta.num_partitions,
        })
        .collect();
    Json(MetadataResponse { topics })
}

async fn publish(
    State(broker): State<SharedBroker>,
    Query(query): Query<PublishQuery>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, ApiError> {
    let payload = serde_json::to_vec(&req.payload)
        .map_err(|e| BrokerError::Metadata(e.into()))?;

    let (partition, offset) = broker
        .publish(&query.topic, &req.key, Bytes::from(payload))
        .await?;

    Ok(Json(PublishResponse { partition, offset }))
}

async fn fetch(
    State(broker): State<SharedBroker>,
    Query(query): Query<FetchQuery>,
) -> Result<Json<FetchResponse>, ApiError> {
    let records = broker
        .fetch(&query.topic, query.partition, query.offset, query.max_bytes)
        .await?;

    let messages = records
        .into_iter()
        .map(|record| Message {
            offset: record.offset,
            timestamp: record.timestamp,
            key: record.key,
            payload: BASE64.encode(&record.payload),
        })
        .collect();

    Ok(Json(FetchResponse {
        topic: query.topic,
        partition: query.partition,
        messages,
    }))
}

async fn commit(
    State(broker): State<SharedBroker>,
    Query(query): Query<CommitQuery>,
    Json(req): Json<CommitRequest>,
) -> Result<Json<CommitResponse>, ApiError> {
    broker
        .commit_offset(&query.group, &req.topic, req.partition, req.offset)
        .await?;

    Ok(Json(CommitResponse {
        status: "committed".to_string(),
    }))
}
