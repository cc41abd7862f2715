use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use people_core::model::Person;
use serde::Serialize;
use std::borrow::Cow;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct PersonResponse {
    #[serde(skip)]
    status_code: StatusCode,
    #[serde(skip)]
    location: Option<HeaderValue>,
    #[serde(flatten)]
    person: Person,
}

impl PersonResponse {
    pub fn ok(person: Person) -> Self {
        Self {
            status_code: StatusCode::OK,
            location: None,
            person,
        }
    }

    /// 201 with a `Location` header pointing at the stored person.
    pub fn created(root_path: &str, person: Person) -> Self {
        let location = person
            .id
            .and_then(|id| HeaderValue::try_from(format!("{root_path}/{id}")).ok());

        Self {
            status_code: StatusCode::CREATED,
            location,
            person,
        }
    }
}

impl IntoResponse for PersonResponse {
    fn into_response(self) -> Response {
        match self.location.clone() {
            Some(location) => (self.status_code, [(LOCATION, location)], Json(self)).into_response(),
            None => (self.status_code, Json(self)).into_response(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LookupResponse {
    /// Number of people stored by this lookup.
    pub imported: usize,
}

impl IntoResponse for LookupResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub type ErrorMessageType = Cow<'static, str>;

#[derive(Debug, Serialize, ToSchema)]
pub struct PersonError {
    #[serde(skip)]
    status_code: StatusCode,
    #[schema(value_type = String)]
    message: ErrorMessageType,
}

impl PersonError {
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "the requested person does not exist")
    }

    pub fn bad_request(message: impl Into<ErrorMessageType>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn new(status_code: StatusCode, message: impl Into<ErrorMessageType>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

impl IntoResponse for PersonError {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}

impl From<JsonRejection> for PersonError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for PersonError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for PersonError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}
