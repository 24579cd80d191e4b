use concerts_core::{ConcertError, ConcertService, ConcertStore, Config, DynamoConcertStore};
use lambda_http::{run, service_fn, tracing};
use lambda_http::{Body, Error, Request, RequestExt, Response};

async fn function_handler<S: ConcertStore>(
    service: &ConcertService<S>,
    event: Request,
) -> Result<Response<Body>, Error> {
    let id = event
        .query_string_parameters_ref()
        .and_then(|params| params.first("id"))
        .filter(|id| !id.is_empty());

    let body = match id {
        Some(id) => service.fetch_one(id).await.map(|c| serde_json::to_string(&c)),
        None => service.fetch_all().await.map(|c| serde_json::to_string(&c)),
    };

    match body {
        Ok(json) => Ok(Response::builder()
            .status(200)
            .header("content-type", "application/json")
            .body(json?.into())?),
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &ConcertError) -> Result<Response<Body>, Error> {
    let kind = err.kind();
    tracing::warn!(?kind, "->> {err}");

    Ok(Response::builder()
        .status(kind.status_code())
        .header("content-type", "text/plain")
        .body(kind.response_body().into())?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    let config = Config::from_env()?;
    let table = config.require_concerts_table()?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let client = aws_sdk_dynamodb::Client::new(&aws_config);
    let store = DynamoConcertStore::new(client, table);
    tracing::info!(table = store.table_name(), "serving concerts from DynamoDB");
    let service = ConcertService::new(store).with_timezone(config.display_timezone);

    run(service_fn(|event| function_handler(&service, event))).await
}
