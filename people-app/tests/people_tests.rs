use axum::http::StatusCode;
use axum_test::TestServer;
use people_app::AppEngine;
use people_core::model::Person;
use people_routes::lookup::HttpPersonSource;
use people_routes::state::PersonAppState;
use repositories::memory::MemoryPersonRepo;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

// nothing listens here, so lookups fail
const UNREACHABLE_SOURCE: &str = "http://127.0.0.1:1/people";

#[fixture]
fn server() -> TestServer {
    let engine = AppEngine::new(
        MemoryPersonRepo::new(),
        HttpPersonSource::new(UNREACHABLE_SOURCE),
    );

    TestServer::new(people_routes::routes::build(
        PersonAppState::new_without_metrics(engine),
    ))
    .unwrap()
}

#[rstest]
#[tokio::test]
async fn person_lifecycle(server: TestServer) {
    server.get("/people").await.assert_status(StatusCode::NO_CONTENT);

    let response = server
        .post("/people")
        .json(&json!({ "name": "Ada", "city": "London" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: Person = response.json();
    let id = created.id.expect("stored person has an id");
    let location = format!("/people/{id}");
    assert_eq!(location.as_str(), response.header("location"));

    let found: Person = server.get(&location).await.json();
    assert_eq!(created, found);

    let replaced: Person = server
        .put(&location)
        .json(&json!({ "id": id, "name": "Ada Lovelace" }))
        .await
        .json();
    assert_eq!(Person::new(Some(id), Some("Ada Lovelace".into()), None), replaced);

    let patched: Person = server
        .patch(&location)
        .json(&json!({ "city": "Marylebone" }))
        .await
        .json();
    assert_eq!(
        Person::new(
            Some(id),
            Some("Ada Lovelace".into()),
            Some("Marylebone".into())
        ),
        patched
    );

    let listed = server.get("/people?name=lovelace").await;
    listed.assert_status_ok();
    assert_eq!(vec![patched], listed.json::<Vec<Person>>());

    server
        .delete(&location)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server.get(&location).await.assert_status_not_found();
}

#[rstest]
#[tokio::test]
async fn paging_walks_every_person(server: TestServer) {
    for i in 0..5 {
        server
            .post("/people")
            .json(&json!({ "name": format!("person {i}") }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let response = server.get(&format!("/people?page={page}&page_size=2")).await;
        assert_eq!("5", response.header("x-total-count"));
        seen.extend(response.json::<Vec<Person>>());
    }

    assert_eq!(5, seen.len());
    server
        .get("/people?page=4&page_size=2")
        .await
        .assert_status(StatusCode::NO_CONTENT);
}

#[rstest]
#[tokio::test]
async fn reports_cover_stored_people(server: TestServer) {
    server
        .post("/people")
        .json(&json!({ "name": "Grace", "city": "Arlington" }))
        .await;

    let csv = server.get("/people/reports/csv").await;
    csv.assert_status_ok();
    assert_eq!("id,name,city\n1,Grace,Arlington\n", csv.text());

    let json = server.get("/people/reports/json").await.json::<Value>();
    assert_eq!(1, json["count"]);
}

#[rstest]
#[tokio::test]
async fn failed_lookup_is_an_internal_error(server: TestServer) {
    let response = server.post("/people/lookup").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json!({ "message": "an internal error occurred" }),
        response.json::<Value>()
    );
}
