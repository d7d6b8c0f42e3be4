//! Middleware stack para el servidor HTTP.
//!
//! - `RequestIdLayer`: genera o propaga `x-request-id`
//! - `LoggingLayer`: un span por request con metodo, ruta y request id

mod logging;
mod request_id;

pub use logging::{LoggingLayer, LoggingMiddleware};
pub use request_id::{MAX_REQUEST_ID_LEN, REQUEST_ID_HEADER, RequestIdLayer, RequestIdMiddleware};
