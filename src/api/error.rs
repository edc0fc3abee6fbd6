use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use std::io::Cursor;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("authentication failed: {0}")]
    AuthenticationFailure(String),
    #[error("login rejected: {0}")]
    LoginError(String),
    #[error("transport error: {0}")]
    TransportError(String),
    #[error("malformed response ({1}): {0}")]
    InvalidResponse(String, String),
    #[error("unexpected API response: {0}")]
    UnexpectedApiResponse(String),
    #[error("no plant found for this account")]
    NoPlants,
    #[error("unable to format metrics")]
    FormatError,
    #[error("internal error: {0}")]
    InternalError(String),
}

impl Error {
    /// Whether the upstream answered with something that could not be understood.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::InvalidResponse(..) | Error::UnexpectedApiResponse(_)
        )
    }
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let (status, error) = match self {
            Error::AuthenticationFailure(s) => (
                Status::Forbidden,
                format!("<html><body><h3>403 Forbidden</h3>Error while authenticating to downstream API: <code>{}</code></body></html>", s),
            ),
            Error::TransportError(s) => (
                Status::BadGateway,
                format!("<html><body><h3>502 Bad Gateway</h3>Downstream API request failed: <code>{}</code></body></html>", s),
            ),
            _ => (
                Status::InternalServerError,
                format!(
                    "<html><body><h3>Unknown exception</h3><code>{:?}</code></body></html>",
                    self
                ),
            ),
        };

        Response::build()
            .status(status)
            .sized_body(error.len(), Cursor::new(error))
            .header(ContentType::new("text", "html"))
            .ok()
    }
}
