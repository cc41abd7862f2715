use crate::error::PersonServiceError;
use crate::metrics;
use crate::report::ReportFormat;
use crate::service::{PersonService, UpdateOutcome};
use crate::state::PersonAppState;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware;
use axum::routing::{delete, get, patch, post, put};
use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
};
use engine::Pagination;
use engine::error::EndpointError;
use engine::list_criteria::ListFilter;
use engine::stream::StreamingResponse;
use people_core::PersonEngine;
use people_core::list_filter::PersonFilter;
use people_core::model::Person;
use extract::{JsonBody, PathParam, QueryParams};
use requests::{PersonPatchRequest, PersonSearch};
use responses::{LookupResponse, PersonError, PersonResponse};
use tracing::{info, instrument};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub mod extract;
pub mod requests;
pub mod responses;

pub const PEOPLE_ROOT_PATH: &str = "/people";

#[derive(OpenApi)]
#[openapi(
    nest(
        (path = PEOPLE_ROOT_PATH, api = PersonDocs),
    )
)]
struct ApiDoc;

#[derive(OpenApi)]
#[openapi(paths(
    list_people,
    get_person,
    create_person,
    update_person,
    patch_person,
    delete_person,
    people_report,
    lookup_people,
))]
struct PersonDocs;

pub const DEFAULT_PEOPLE_PAGE_SIZE: u64 = 20;

const X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

const PERSON_LIST_PATH: &str = "/";
const PERSON_GET_PATH: &str = "/{person_id}";
const PERSON_CREATE_PATH: &str = "/";
const PERSON_UPDATE_PATH: &str = "/{person_id}";
const PERSON_PATCH_PATH: &str = "/{person_id}";
const PERSON_DELETE_PATH: &str = "/{person_id}";
const PERSON_REPORT_PATH: &str = "/reports/{format}";
const PERSON_LOOKUP_PATH: &str = "/lookup";

pub fn build<T: PersonEngine>(app_state: PersonAppState<T>) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes(app_state))
        .split_for_parts();

    router.merge(SwaggerUi::new("/people/swagger-ui").url("/people/api-docs/openapi.json", api))
}

fn routes<S, T>(app_state: PersonAppState<T>) -> OpenApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
    T: PersonEngine,
{
    let main_router = OpenApiRouter::new()
        .route(PERSON_LIST_PATH, get(list_people))
        .route(PERSON_GET_PATH, get(get_person))
        .route(PERSON_CREATE_PATH, post(create_person))
        .route(PERSON_UPDATE_PATH, put(update_person))
        .route(PERSON_PATCH_PATH, patch(patch_person))
        .route(PERSON_DELETE_PATH, delete(delete_person))
        .route(PERSON_REPORT_PATH, get(people_report))
        .route(PERSON_LOOKUP_PATH, post(lookup_people));

    let router = match app_state.metrics.clone() {
        Some(handle) => {
            info!("metrics enabled, setting up metrics handler");
            main_router
                .route(
                    "/metrics",
                    get(move || {
                        let handle = handle.clone();
                        async move { handle.render() }
                    }),
                )
                .route_layer(middleware::from_fn(metrics::track_http))
        }
        None => {
            info!("metrics not enabled, setting up service unavailable metrics handler");
            main_router.route(
                "/metrics",
                get(|| async {
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Metrics endpoint is disabled. Metrics must be enabled and the service restarted",
                    )
                }),
            )
        }
    };

    OpenApiRouter::new()
        .nest(PEOPLE_ROOT_PATH, router)
        .with_state(app_state)
}

/// List people one page at a time, optionally filtered by name and city.
#[utoipa::path(
    get,
    path = PERSON_LIST_PATH,
    responses(
        (
            status = OK,
            description = "People were found on the given page. `X-Total-Count` holds the number of matches across all pages",
            body = Vec<Person>,
        ),
        (status = NO_CONTENT, description = "No people exist on the given page"),
        (status = BAD_REQUEST, description = "A query parameter could not be parsed"),
    ),
    params(
        ("page" = Option<u64>, Query, description = "The 1-based page to return, 0 is read as 1"),
        ("page_size" = Option<u64>, Query, description = "The max number of people to return"),
        ("name" = Option<String>, Query, description = "Only people whose name contains this"),
        ("city" = Option<String>, Query, description = "Only people whose city contains this"),
    )
)]
#[instrument(skip(service), err(Debug), fields(req.page = pagination.page, req.page_size = pagination.page_size))]
pub async fn list_people<T>(
    State(service): State<PersonService<T>>,
    QueryParams(pagination): QueryParams<Pagination>,
    QueryParams(search): QueryParams<PersonSearch>,
) -> Result<Response, EndpointError<PersonServiceError>>
where
    T: PersonEngine,
{
    let criteria = PersonFilter::criteria(pagination, DEFAULT_PEOPLE_PAGE_SIZE)
        .with_opt(search.name.map(PersonFilter::Name))
        .with_opt(search.city.map(PersonFilter::City));

    let page = service.list(criteria).await?;
    let total = HeaderValue::from(page.total);

    let res = if page.people.is_empty() {
        (StatusCode::NO_CONTENT, [(X_TOTAL_COUNT, total)]).into_response()
    } else {
        StreamingResponse::ok(page.people)
            .with_header(X_TOTAL_COUNT, total)
            .into_response()
    };
    Ok(res)
}

/// Get the person stored under the given id.
#[utoipa::path(
    get,
    path = PERSON_GET_PATH,
    responses(
        (status = OK, description = "A person is stored under the given id", body = Person),
        (status = NOT_FOUND, description = "No person is stored under the given id", body = PersonError),
    ),
    params(
        ("person_id" = i64, Path, description = "The id of the person to find"),
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn get_person<T>(
    State(service): State<PersonService<T>>,
    PathParam(person_id): PathParam<i64>,
) -> Result<Response, EndpointError<PersonServiceError>>
where
    T: PersonEngine,
{
    let person = service.get(person_id).await?;

    Ok(person
        .map(|p| PersonResponse::ok(p).into_response())
        .unwrap_or_else(|| PersonError::not_found().into_response()))
}

/// Store a new person. The stored person, with its new id, is returned.
#[utoipa::path(
    post,
    path = PERSON_CREATE_PATH,
    responses(
        (status = CREATED, description = "The person was stored", body = Person),
        (status = BAD_REQUEST, description = "The body already had an id", body = PersonError),
    ),
    request_body = Person
)]
#[instrument(skip_all, err(Debug), fields(req.name = ?person.name, req.city = ?person.city))]
pub async fn create_person<T>(
    State(service): State<PersonService<T>>,
    JsonBody(person): JsonBody<Person>,
) -> Result<Response, EndpointError<PersonServiceError>>
where
    T: PersonEngine,
{
    if person.id.is_some() {
        return Ok(
            PersonError::bad_request("a new person cannot already have an id").into_response(),
        );
    }

    let created = service.create(person).await?;
    Ok(PersonResponse::created(PEOPLE_ROOT_PATH, created).into_response())
}

/// Replace the person stored under the given id.
#[utoipa::path(
    put,
    path = PERSON_UPDATE_PATH,
    responses(
        (status = OK, description = "The person was replaced", body = Person),
        (status = BAD_REQUEST, description = "The body id is missing or does not match the path", body = PersonError),
        (status = NOT_FOUND, description = "No person is stored under the given id", body = PersonError),
    ),
    params(
        ("person_id" = i64, Path, description = "The id of the person to replace")
    ),
    request_body = Person,
)]
#[instrument(skip(service, person), err(Debug), fields(req.id = person.id, req.name = ?person.name, req.city = ?person.city))]
pub async fn update_person<T>(
    State(service): State<PersonService<T>>,
    PathParam(person_id): PathParam<i64>,
    JsonBody(person): JsonBody<Person>,
) -> Result<Response, EndpointError<PersonServiceError>>
where
    T: PersonEngine,
{
    match person.id {
        None => return Ok(PersonError::bad_request("the person id is required").into_response()),
        Some(id) if id != person_id => {
            return Ok(id_mismatch(person_id, id).into_response());
        }
        Some(_) => {}
    }

    let res = match service.update(person_id, person).await? {
        UpdateOutcome::Updated(p) => PersonResponse::ok(p).into_response(),
        UpdateOutcome::NotFound => PersonError::not_found().into_response(),
    };
    Ok(res)
}

/// Update only the fields given in the body. A null field is cleared.
#[utoipa::path(
    patch,
    path = PERSON_PATCH_PATH,
    responses(
        (status = OK, description = "The person was patched", body = Person),
        (status = BAD_REQUEST, description = "The body id does not match the path", body = PersonError),
        (status = NOT_FOUND, description = "No person is stored under the given id", body = PersonError),
    ),
    params(
        ("person_id" = i64, Path, description = "The id of the person to patch")
    ),
    request_body = PersonPatchRequest,
)]
#[instrument(skip(service, person), err(Debug), fields(
    person.name = person.name.as_ref().map_present_or(None, |n| Some(n.map(String::as_str).unwrap_or("null"))),
    person.city = person.city.as_ref().map_present_or(None, |c| Some(c.map(String::as_str).unwrap_or("null"))),
))]
pub async fn patch_person<T>(
    State(service): State<PersonService<T>>,
    PathParam(person_id): PathParam<i64>,
    JsonBody(person): JsonBody<PersonPatchRequest>,
) -> Result<Response, EndpointError<PersonServiceError>>
where
    T: PersonEngine,
{
    if let Some(id) = person.id.filter(|id| *id != person_id) {
        return Ok(id_mismatch(person_id, id).into_response());
    }

    let res = match service.patch(person_id, person.into_patch()).await? {
        Some(p) => PersonResponse::ok(p).into_response(),
        None => PersonError::not_found().into_response(),
    };
    Ok(res)
}

/// Delete the person stored under the given id.
#[utoipa::path(
    delete,
    path = PERSON_DELETE_PATH,
    responses(
        (status = NO_CONTENT, description = "The person was deleted"),
        (status = NOT_FOUND, description = "No person is stored under the given id", body = PersonError),
    ),
    params(
        ("person_id" = i64, Path, description = "The id of the person to delete")
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn delete_person<T>(
    State(service): State<PersonService<T>>,
    PathParam(person_id): PathParam<i64>,
) -> Result<Response, EndpointError<PersonServiceError>>
where
    T: PersonEngine,
{
    match service.delete(person_id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT.into_response()),
        None => Ok(PersonError::not_found().into_response()),
    }
}

/// Download every stored person as a CSV or JSON report.
#[utoipa::path(
    get,
    path = PERSON_REPORT_PATH,
    responses(
        (status = OK, description = "The rendered report, sent as an attachment"),
        (status = BAD_REQUEST, description = "The format is neither csv nor json", body = PersonError),
    ),
    params(
        ("format" = ReportFormat, Path, description = "csv or json")
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn people_report<T>(
    State(service): State<PersonService<T>>,
    PathParam(format): PathParam<String>,
) -> Result<Response, EndpointError<PersonServiceError>>
where
    T: PersonEngine,
{
    let format = match format.parse::<ReportFormat>() {
        Ok(format) => format,
        Err(e) => return Ok(PersonError::bad_request(e.to_string()).into_response()),
    };

    let report = service.report(format).await?;

    let headers = [
        (CONTENT_TYPE, report.format.content_type().to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.format.file_name()),
        ),
    ];
    Ok((StatusCode::OK, headers, report.body).into_response())
}

/// Import people from the external source right away instead of waiting for
/// the next scheduled lookup.
#[utoipa::path(
    post,
    path = PERSON_LOOKUP_PATH,
    responses(
        (status = OK, description = "The lookup ran, the body holds how many people were stored", body = LookupResponse),
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn lookup_people<T>(
    State(service): State<PersonService<T>>,
) -> Result<Response, EndpointError<PersonServiceError>>
where
    T: PersonEngine,
{
    let saved = service.lookup_and_save_new_people().await?;

    Ok(LookupResponse {
        imported: saved.len(),
    }
    .into_response())
}

fn id_mismatch(path_id: i64, body_id: i64) -> PersonError {
    PersonError::bad_request(format!(
        "the body id '{body_id}' does not match the path id '{path_id}'"
    ))
}
