pub mod config;
pub mod library_events;

use library_event_producer::{DispatchError, LibraryEventProducer, Publisher, ValidationErrors};
use ntex::http::StatusCode;
use ntex::web;
use std::sync::Arc;
use thiserror::Error;

pub struct AppState<P> {
    pub producer: LibraryEventProducer<P>,
}

impl<P> AppState<P> {
    pub fn new(producer: LibraryEventProducer<P>) -> Arc<Self> {
        Arc::new(AppState { producer })
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Please pass the LibraryEventId")]
    MissingLibraryEventId,

    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MissingLibraryEventId => StatusCode::BAD_REQUEST,
            ApiError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_response(&self) -> web::HttpResponse {
        web::HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

/// Registers the library event routes and the health check.
pub fn configure<P>(cfg: &mut web::ServiceConfig)
where
    P: Publisher + Clone + Send + Sync + 'static,
{
    use library_events::*;

    cfg.route("/health", web::get().to(async || "OK"))
        .route("/v1/libraryevent", web::post().to(post_library_event::<P>))
        .service(
            web::resource("/v1/synchronous-libraryevent")
                .route(web::post().to(post_synchronous_library_event::<P>))
                .route(web::put().to(put_synchronous_library_event::<P>)),
        )
        .service(
            web::resource("/v1/asynchronous-libraryevent")
                .route(web::post().to(post_asynchronous_library_event::<P>))
                .route(web::put().to(put_asynchronous_library_event::<P>)),
        )
        .route(
            "/v1/asynchronous-libraryevent-producerrecord",
            web::post().to(post_asynchronous_library_event_with_record::<P>),
        );
}
