use crate::{ApiError, AppState};
use library_event_producer::{LibraryEvent, LibraryEventType, Publisher};
use log::{info, warn};
use ntex::web;
use std::sync::Arc;

type State<P> = web::types::State<Arc<AppState<P>>>;
type Body = web::types::Json<LibraryEvent>;

#[derive(Debug, Clone, Copy)]
enum SendMode {
    Synchronous,
    Asynchronous,
    ProducerRecord,
}

pub async fn post_library_event<P>(
    data: State<P>,
    body: Body,
) -> Result<web::HttpResponse, web::Error>
where
    P: Publisher + Clone + Send + Sync + 'static,
{
    Ok(accept(&data, body.into_inner(), LibraryEventType::New, SendMode::Asynchronous).await)
}

pub async fn post_synchronous_library_event<P>(
    data: State<P>,
    body: Body,
) -> Result<web::HttpResponse, web::Error>
where
    P: Publisher + Clone + Send + Sync + 'static,
{
    Ok(accept(&data, body.into_inner(), LibraryEventType::New, SendMode::Synchronous).await)
}

pub async fn post_asynchronous_library_event<P>(
    data: State<P>,
    body: Body,
) -> Result<web::HttpResponse, web::Error>
where
    P: Publisher + Clone + Send + Sync + 'static,
{
    Ok(accept(&data, body.into_inner(), LibraryEventType::New, SendMode::Asynchronous).await)
}

pub async fn post_asynchronous_library_event_with_record<P>(
    data: State<P>,
    body: Body,
) -> Result<web::HttpResponse, web::Error>
where
    P: Publisher + Clone + Send + Sync + 'static,
{
    Ok(accept(&data, body.into_inner(), LibraryEventType::New, SendMode::ProducerRecord).await)
}

pub async fn put_synchronous_library_event<P>(
    data: State<P>,
    body: Body,
) -> Result<web::HttpResponse, web::Error>
where
    P: Publisher + Clone + Send + Sync + 'static,
{
    Ok(accept(&data, body.into_inner(), LibraryEventType::Update, SendMode::Synchronous).await)
}

pub async fn put_asynchronous_library_event<P>(
    data: State<P>,
    body: Body,
) -> Result<web::HttpResponse, web::Error>
where
    P: Publisher + Clone + Send + Sync + 'static,
{
    Ok(accept(&data, body.into_inner(), LibraryEventType::Update, SendMode::Asynchronous).await)
}

/// Validates, tags and dispatches one event. Exactly one send is issued for
/// an accepted event and none for a rejected one.
async fn accept<P>(
    state: &AppState<P>,
    event: LibraryEvent,
    event_type: LibraryEventType,
    mode: SendMode,
) -> web::HttpResponse
where
    P: Publisher + Clone + Send + Sync + 'static,
{
    match dispatch(state, event, event_type, mode).await {
        Ok(event) => web::HttpResponse::Created().json(&event),
        Err(e) => e.error_response(),
    }
}

async fn dispatch<P>(
    state: &AppState<P>,
    event: LibraryEvent,
    event_type: LibraryEventType,
    mode: SendMode,
) -> Result<LibraryEvent, ApiError>
where
    P: Publisher + Clone + Send + Sync + 'static,
{
    if let Err(errors) = event.validate() {
        warn!("Rejected library event: {errors}");
        return Err(errors.into());
    }
    if event_type == LibraryEventType::Update && event.library_event_id.is_none() {
        warn!("Rejected library event update without id");
        return Err(ApiError::MissingLibraryEventId);
    }

    let event = event.tagged(event_type);
    info!(
        "Dispatching library event id={:?} type={event_type:?} mode={mode:?}",
        event.library_event_id
    );

    let producer = &state.producer;
    match mode {
        SendMode::Synchronous => {
            producer.send_library_event_synchronous(&event).await?;
        }
        // Completion handles are detached; the send outcome is only logged.
        SendMode::Asynchronous => drop(producer.send_library_event_asynchronous(&event)?),
        SendMode::ProducerRecord => drop(producer.send_library_event_with_record(&event)?),
    }

    Ok(event)
}
