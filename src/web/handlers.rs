use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, Redirect};
use axum::Json;
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info};

use super::error::ApiError;
use super::types::{HealthResponse, IdQuery};
use super::AppState;
use crate::error::ContactError;
use crate::models::{parse_contact_id, SaveContactRequest};
use crate::notify::ContactEvent;

type ApiResult<T> = Result<T, ApiError>;

pub async fn root() -> Redirect {
    Redirect::to("/Contacts/Index")
}

pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let contact_count = state.service.count_contacts().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        contact_count,
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// Full page shell; the list is fetched by the page itself.
pub async fn index(State(state): State<AppState>) -> ApiResult<Html<String>> {
    Ok(Html(state.views.index()?))
}

pub async fn get_contacts(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let contacts = state.service.list_contacts().await?;
    Ok(Html(state.views.contact_list(&contacts)?))
}

pub async fn new_contact(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let blank = state.service.prepare_new_contact();
    Ok(Html(state.views.contact_edit(&blank)?))
}

pub async fn edit_contact(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<Html<String>> {
    let id = parse_contact_id(&query.id)?;
    let contact = state.service.get_contact_for_edit(id).await?;
    Ok(Html(state.views.contact_edit(&contact)?))
}

/// Create or update. Success is an empty 200; clients learn about the change
/// from the `Update` event.
pub async fn save_contact(
    State(state): State<AppState>,
    payload: Result<Json<SaveContactRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(request) = payload.map_err(|e| ContactError::validation(e.body_text()))?;
    state.service.save_contact(request).await?;
    Ok(StatusCode::OK)
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> ApiResult<StatusCode> {
    let id = parse_contact_id(&query.id)?;
    state.service.delete_contact(id).await?;
    Ok(StatusCode::OK)
}

/// Server-sent events: one `Update` event per change. The stream ends when
/// the server shuts down.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!(subscribers = state.hub.subscriber_count() + 1, "Event stream opened");

    let stream = BroadcastStream::new(state.hub.subscribe())
        .map(|message| {
            let event = match message {
                Ok(event) => event,
                // Missed events collapse into one refetch
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Event subscriber lagged");
                    ContactEvent::Update
                }
            };
            Ok(Event::default().event(event.name()).data(event.name()))
        })
        .take_until(state.shutdown.clone().cancelled_owned());

    Sse::new(stream).keep_alive(KeepAlive::default())
}
