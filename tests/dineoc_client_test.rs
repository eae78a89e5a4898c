//! DineocClient against a local stub of the provider API

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use menu_sync::client::{DineocClient, MenuProvider, PeriodMenu, PeriodResolver};
use menu_sync::config::ProviderConfig;
use menu_sync::constants::provider::USER_AGENTS;
use menu_sync::error::MenuSyncError;
use menu_sync::models::{Period, PeriodId};
use menu_sync::test_helpers::date;

const BUILDINGS: &str = r#"{"buildings": [
    {"buildingName": "Hall A", "locations": [
        {"id": "L1", "name": "Hall A Grill"},
        {"id": "L2", "name": "Hall A Cafe"}
    ]},
    {"buildingName": "Hall B", "locations": null}
]}"#;

const PERIODS: &str = r#"{"periods": [
    {"id": "p-bfast", "name": "BREAKFAST"},
    {"id": "p-lunch", "name": "Lunch"},
    {"id": "p-late", "name": "Late Night"}
]}"#;

const LUNCH_MENU: &str = r#"{"period": {"name": "Lunch", "categories": [
    {"name": "Grill", "items": [
        {"id": "m1", "name": "Burger", "desc": "Beef patty"},
        {"id": 2, "name": "Fries"}
    ]},
    {"name": "Soup", "items": [{"id": "m3", "name": "Tomato Soup"}]}
]}}"#;

/// One request as the stub saw it
#[derive(Debug, Clone)]
struct SeenRequest {
    path_and_query: String,
    accept: Option<String>,
    user_agent: Option<String>,
}

type Seen = Arc<Mutex<Vec<SeenRequest>>>;

async fn stub_handler(State(seen): State<Seen>, uri: Uri, headers: HeaderMap) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    seen.lock().unwrap().push(SeenRequest {
        path_and_query: uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_default(),
        accept: header_value(header::ACCEPT),
        user_agent: header_value(header::USER_AGENT),
    });

    let json = |body: &'static str| {
        (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    };

    match uri.path() {
        "/sites/site-1/locations-public" => json(BUILDINGS),
        "/locations/L1/periods/" => json(PERIODS),
        "/locations/L1/menu" => json(LUNCH_MENU),
        "/locations/down/periods/" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        "/locations/garbled/periods/" => {
            (StatusCode::OK, "<html>Access denied</html>").into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Start the stub on an ephemeral port and return its base URL
async fn spawn_stub() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .fallback(stub_handler)
        .with_state(seen.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{address}/"), seen)
}

fn client(base_url: &str, rotate_user_agent: bool) -> DineocClient {
    DineocClient::new(&ProviderConfig {
        base_url: base_url.to_string(),
        timeout_ms: 5_000,
        rotate_user_agent,
    })
    .unwrap()
}

fn requests(seen: &Seen) -> Vec<SeenRequest> {
    seen.lock().unwrap().clone()
}

#[tokio::test]
async fn test_list_buildings_sends_browser_headers() {
    let (base_url, seen) = spawn_stub().await;
    let client = client(&base_url, false);

    let buildings = client.list_buildings("site-1").await.unwrap();

    assert_eq!(buildings.len(), 2);
    assert_eq!(buildings[0].name, "Hall A");
    assert_eq!(buildings[0].locations[1].id, "L2");
    assert!(buildings[1].locations.is_empty());

    let requests = requests(&seen);
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].path_and_query,
        "/sites/site-1/locations-public?for_menus=true"
    );
    assert_eq!(requests[0].accept.as_deref(), Some("application/json"));
    assert_eq!(requests[0].user_agent.as_deref(), Some(USER_AGENTS[0]));
}

#[tokio::test]
async fn test_list_period_ids_matches_canonical_names() {
    let (base_url, seen) = spawn_stub().await;
    let client = client(&base_url, false);

    let spec = client
        .list_period_ids("L1", date("2024-03-01"))
        .await
        .unwrap();

    assert_eq!(spec.get(Period::Breakfast), Some(&PeriodId::new("p-bfast")));
    assert_eq!(spec.get(Period::Lunch), Some(&PeriodId::new("p-lunch")));
    assert_eq!(spec.get(Period::Dinner), None);
    assert_eq!(spec.get(Period::Everyday), None);

    assert_eq!(
        requests(&seen)[0].path_and_query,
        "/locations/L1/periods/?date=2024-03-01"
    );
}

#[tokio::test]
async fn test_resolver_fetches_offered_menu_in_category_order() {
    let (base_url, seen) = spawn_stub().await;
    let client = client(&base_url, false);
    let resolver = PeriodResolver::new(&client);

    let menu = resolver
        .menu_for("L1", Period::Lunch, date("2024-03-01"))
        .await
        .unwrap();

    let ids: Vec<&str> = menu.meals().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "2", "m3"]);
    assert_eq!(menu.meals()[0].description.as_deref(), Some("Beef patty"));

    let requests = requests(&seen);
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[1].path_and_query,
        "/locations/L1/menu?date=2024-03-01&period=p-lunch"
    );
}

#[tokio::test]
async fn test_resolver_skips_menu_request_when_not_offered() {
    let (base_url, seen) = spawn_stub().await;
    let client = client(&base_url, false);
    let resolver = PeriodResolver::new(&client);

    let menu = resolver
        .menu_for("L1", Period::Dinner, date("2024-03-01"))
        .await
        .unwrap();

    assert_eq!(menu, PeriodMenu::NotOffered);
    assert_eq!(requests(&seen).len(), 1);
}

#[tokio::test]
async fn test_menu_by_names_end_to_end() {
    let (base_url, seen) = spawn_stub().await;
    let client = client(&base_url, false);
    let resolver = PeriodResolver::new(&client);

    let menu = resolver
        .menu_by_names("hall a", "HALL A GRILL", "lunch", "site-1", date("2024-03-01"))
        .await
        .unwrap();

    assert_eq!(menu.period_name, "Lunch");
    assert_eq!(menu.options.len(), 3);
    assert_eq!(requests(&seen).len(), 3);
}

#[tokio::test]
async fn test_unknown_period_name_fails_before_any_request() {
    let (base_url, seen) = spawn_stub().await;
    let client = client(&base_url, false);
    let resolver = PeriodResolver::new(&client);

    let err = resolver
        .resolve("L1", date("2024-03-01"), "brunch")
        .await
        .unwrap_err();

    assert!(matches!(err, MenuSyncError::InvalidPeriodName(ref name) if name == "brunch"));
    assert!(requests(&seen).is_empty());
}

#[tokio::test]
async fn test_server_error_is_recoverable_network_error() {
    let (base_url, _seen) = spawn_stub().await;
    let client = client(&base_url, false);

    let err = client
        .list_period_ids("down", date("2024-03-01"))
        .await
        .unwrap_err();

    match &err {
        MenuSyncError::Network { url, status, .. } => {
            assert_eq!(*status, Some(503));
            assert!(url.contains("/locations/down/periods/"));
        }
        other => panic!("expected network error, got {other:?}"),
    }
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_not_found_is_not_recoverable() {
    let (base_url, _seen) = spawn_stub().await;
    let client = client(&base_url, false);

    let err = client.list_buildings("no-such-site").await.unwrap_err();

    assert!(matches!(err, MenuSyncError::Network { status: Some(404), .. }));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let (base_url, _seen) = spawn_stub().await;
    let client = client(&base_url, false);

    let err = client
        .list_period_ids("garbled", date("2024-03-01"))
        .await
        .unwrap_err();

    assert!(matches!(err, MenuSyncError::Decode { .. }));
}

#[tokio::test]
async fn test_rotating_user_agents_come_from_pool() {
    let (base_url, seen) = spawn_stub().await;
    let client = client(&base_url, true);

    for _ in 0..5 {
        client.list_buildings("site-1").await.unwrap();
    }

    for request in requests(&seen) {
        let agent = request.user_agent.unwrap();
        assert!(USER_AGENTS.contains(&agent.as_str()));
    }
}
