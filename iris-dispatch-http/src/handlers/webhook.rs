use axum::{body::Bytes, extract::State};
use iris_dispatch::RawEvent;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::server::AppState;

/// Receive events
///
/// Accepts one event object or an array of them. Every event must pass
/// authentication before any of them is dispatched. Dispatch happens in the
/// background; the platform gets `ok` as soon as the batch is scheduled.
pub async fn receive_events(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let payload: Value = serde_json::from_slice(&body)?;
    let batch = into_batch(payload)?;

    if let Some(rejected) = batch.iter().find(|raw| !state.auth.verify(raw)) {
        warn!(
            "Rejected event with bad credentials, method {:?}",
            rejected.get("method")
        );
        return Err(AppError::Forbidden);
    }

    debug!("Accepted {} event(s)", batch.len());
    state.runner.process_events(batch);
    Ok("ok")
}

fn into_batch(payload: Value) -> Result<Vec<RawEvent>, AppError> {
    match payload {
        Value::Object(raw) => Ok(vec![raw]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(raw) => Ok(raw),
                _ => Err(AppError::InvalidPayload(format!(
                    "element {} is not an object",
                    index
                ))),
            })
            .collect(),
        _ => Err(AppError::InvalidPayload(
            "expected an object or an array of objects".to_string(),
        )),
    }
}
