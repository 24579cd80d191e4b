use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use concerts_core::{ConcertError, ErrorKind, ConcertService, ConcertStore, Config, DynamoConcertStore, GenericError, MemoryConcertStore};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

type SharedService = Arc<ConcertService<Arc<dyn ConcertStore>>>;

#[tokio::main]
async fn main() -> Result<(), GenericError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let store = build_store(&config).await?;
    let service = Arc::new(ConcertService::new(store).with_timezone(config.display_timezone));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(service)).await?;

    Ok(())
}

async fn build_store(config: &Config) -> Result<Arc<dyn ConcertStore>, GenericError> {
    if let Some(path) = &config.seed_file {
        let store = MemoryConcertStore::from_json(&tokio::fs::read_to_string(path).await?)?;
        tracing::info!(path = %path.display(), concerts = store.len(), "serving concerts from seed file");
        return Ok(Arc::new(store));
    }

    let table = config.require_concerts_table()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoConcertStore::new(aws_sdk_dynamodb::Client::new(&aws_config), table);
    tracing::info!(table = store.table_name(), "serving concerts from DynamoDB");
    Ok(Arc::new(store))
}

fn app(service: SharedService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(get_concerts))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[derive(Deserialize)]
struct ConcertsQuery {
    id: Option<String>,
}

pub struct ApiError(pub ConcertError);

impl From<ConcertError> for ApiError {
    fn from(err: ConcertError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        tracing::warn!(?kind, "->> {}", self.0);

        let status = match kind {
            ErrorKind::NotFound | ErrorKind::InvalidData | ErrorKind::InPast => StatusCode::NOT_FOUND,
            ErrorKind::DecodeError | ErrorKind::StorageUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, kind.response_body()).into_response()
    }
}

async fn get_concerts(
    State(service): State<SharedService>,
    Query(query): Query<ConcertsQuery>,
) -> Result<Response, ApiError> {
    let response = match query.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => Json(service.fetch_one(id).await?).into_response(),
        None => Json(service.fetch_all().await?).into_response(),
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use chrono::Utc;
    use concerts_core::error::{INTERNAL_ERROR_BODY, NO_DATA_BODY};
    use concerts_core::{RawItem, StoreError};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct UnreachableStore;

    #[async_trait::async_trait]
    impl ConcertStore for UnreachableStore {
        async fn get_by_id(&self, _id: &str) -> Result<Option<RawItem>, StoreError> {
            Err(StoreError::new("connection refused"))
        }

        async fn scan_future_from(&self, _now_epoch: i64) -> Result<Vec<RawItem>, StoreError> {
            Err(StoreError::new("connection refused"))
        }
    }

    fn concert(id: &str, offset_secs: i64) -> Value {
        json!({
            "id": id,
            "description": "Summer Concert",
            "imageURL": "https://example.com/image1",
            "dateTime": Utc::now().timestamp() + offset_secs,
            "totalTickets": 300,
            "ticketsSold": 100,
            "fullPrice": 11.0,
            "concessionPrice": 9.0
        })
    }

    fn memory_app(items: Value) -> Router {
        let store = MemoryConcertStore::from_json(&items.to_string()).unwrap();
        app(Arc::new(ConcertService::new(Arc::new(store) as Arc<dyn ConcertStore>)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        if status == StatusCode::OK {
            assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        }
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn lists_upcoming_concerts() {
        let app = memory_app(json!([concert("A", 3600), concert("OLD", -3600)]));
        let (status, body) = get(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        let concerts: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(concerts.as_array().unwrap().len(), 1);
        assert_eq!(concerts[0]["id"], "A");
        assert_eq!(concerts[0]["availableTickets"], 200);
        assert!(concerts[0].get("dateTime").is_none());
    }

    #[tokio::test]
    async fn empty_listing_is_ok() {
        let (status, body) = get(memory_app(json!([])), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn fetches_single_concert_by_id() {
        let app = memory_app(json!([concert("A", 3600), concert("B", 7200)]));
        let (status, body) = get(app, "/?id=B").await;

        assert_eq!(status, StatusCode::OK);
        let concert: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(concert["id"], "B");
        assert_eq!(concert["fullPrice"], 11.0);
    }

    #[tokio::test]
    async fn blank_id_lists_concerts() {
        let (status, body) = get(memory_app(json!([concert("A", 3600)])), "/?id=").await;
        assert_eq!(status, StatusCode::OK);
        assert!(serde_json::from_slice::<Value>(&body).unwrap().is_array());
    }

    #[tokio::test]
    async fn unavailable_concerts_are_not_found() {
        let app = memory_app(json!([concert("OLD", -3600)]));
        for uri in ["/?id=OLD", "/?id=MISSING"] {
            let (status, body) = get(app.clone(), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, NO_DATA_BODY.as_bytes());
        }
    }

    #[tokio::test]
    async fn null_price_is_not_found() {
        let mut item = concert("A", 3600);
        item["fullPrice"] = Value::Null;
        let (status, body) = get(memory_app(json!([item])), "/?id=A").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, NO_DATA_BODY.as_bytes());
    }

    #[tokio::test]
    async fn storage_failure_is_internal_error() {
        let app = app(Arc::new(ConcertService::new(Arc::new(UnreachableStore) as Arc<dyn ConcertStore>)));
        let (status, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, INTERNAL_ERROR_BODY.as_bytes());
    }
}
