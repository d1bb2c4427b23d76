
use super::*;
use crate::data_store::store_mock::StoreMock;
use crate::web::http_error_logging::error_logging_middleware;
use actix_web::dev::ServiceResponse;
use actix_web::{http, middleware, test, App};
use serde_json::Value;
use std::sync::Arc;

const APP_SECRET: &str = "123456789abcdefghijk";

fn app_state(store: &Arc<StoreMock>) -> AppState {
    AppState {
        store: store.clone(),
        secret: APP_SECRET.to_string(),
        session_max_age: std::time::Duration::from_secs(3600),
    }
}

async fn read_json(res: ServiceResponse) -> Value {
    let body = test::read_body(res).await;
    serde_json::from_slice(&body).unwrap()
}

fn new_reservation(team_name: &str, team_number: i32, email: &str, time_slot: &str) -> Value {
    serde_json::json!({
        "team_name": team_name,
        "team_number": team_number,
        "email": email,
        "time_slot": time_slot,
    })
}

#[actix_web::test]
async fn test_create_reservation_and_availability() {
    let store = Arc::new(StoreMock::default());
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/stations/1/reservations")
        .set_json(new_reservation("Ghosts", 4, "Ghosts@Example.com", "15:30"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body["reservation"]["team_name"], "Ghosts");
    assert_eq!(body["reservation"]["email"], "ghosts@example.com");
    assert_eq!(body["reservation"]["timeDisplay"], "15:30 - 15:40");
    assert_eq!(body["reservation"]["status"], "active");
    assert_eq!(body["reservation"]["station"], 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/stations/1/availability")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["availability"]["15:30"], false);
    assert_eq!(body["availability"]["15:40"], true);
    assert_eq!(body["taken_slots"], serde_json::json!(["15:30"]));

    let req = test::TestRequest::get()
        .uri("/api/v1/stations/2/availability")
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["availability"]["15:30"], true);
}

#[actix_web::test]
async fn test_create_reservation_invalid_team_number() {
    let store = Arc::new(StoreMock::default());
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;

    for team_number in [0, 9] {
        let req = test::TestRequest::post()
            .uri("/api/v1/stations/1/reservations")
            .set_json(new_reservation("Ghosts", team_number, "a@b.com", "15:30"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
        let body = read_json(res).await;
        assert_eq!(body["httpCode"], 400);
        assert!(body["message"].as_str().unwrap().contains("between 1 and 8"));
    }
    assert!(store.data.lock().unwrap().reservations.is_empty());
    assert_eq!(store.data.lock().unwrap().facade_requests, 0);
}

#[actix_web::test]
async fn test_create_reservation_invalid_input() {
    let store = Arc::new(StoreMock::default());
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/stations/1/reservations")
        .set_json(new_reservation("Ghosts", 3, "not-an-email", "15:30"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await["message"], "Invalid email format");

    let req = test::TestRequest::post()
        .uri("/api/v1/stations/1/reservations")
        .set_json(serde_json::json!({"team_name": "Ghosts", "team_number": 3}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(res).await["message"],
        "Missing required field: email"
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/stations/1/reservations")
        .insert_header(http::header::ContentType::json())
        .set_payload("{\"team_name\": ")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/stations/3/reservations")
        .set_json(new_reservation("Ghosts", 3, "a@b.com", "15:30"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::NOT_FOUND);

    assert_eq!(store.data.lock().unwrap().facade_requests, 0);
}

#[actix_web::test]
async fn test_create_reservation_conflicts() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;

    let cases = [
        (new_reservation("Mummies", 3, "ghosts@example.com", "17:00"), "email"),
        (new_reservation("Ghosts", 3, "mummies@example.com", "17:00"), "team_name"),
        (new_reservation("Mummies", 3, "mummies@example.com", "16:00"), "time_slot"),
    ];
    for (data, field) in cases {
        let req = test::TestRequest::post()
            .uri("/api/v1/stations/1/reservations")
            .set_json(data)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
        let body = read_json(res).await;
        assert_eq!(body["field"], field);
    }
    assert_eq!(store.data.lock().unwrap().reservations.len(), 3);

    // Same data is fine at the other station, if not used there
    let req = test::TestRequest::post()
        .uri("/api/v1/stations/2/reservations")
        .set_json(new_reservation("Vampires", 8, "vampires@example.com", "16:10"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::CREATED);
}

#[actix_web::test]
async fn test_list_reservations_by_email() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/stations/1/reservations?email=GHOSTS%40example.com")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["reservations"][0]["time_slot"], "16:00");
    assert_eq!(body["reservations"][0]["timeDisplay"], "16:00 - 16:10");

    let req = test::TestRequest::get()
        .uri("/api/v1/stations/1/reservations?email=nobody%40example.com")
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/stations/1/reservations")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await["message"], "Email parameter is required");
}

#[actix_web::test]
async fn test_change_time_slot() {
    let store = Arc::new(StoreMock::default());
    let sample = sample_data::fill_sample_data(&store);
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;
    let uri = format!(
        "/api/v1/stations/1/reservations/{}/time_slot",
        sample.ghosts_reservation_id
    );

    // Occupied by "Vampires"
    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(serde_json::json!({"new_time_slot": "16:10"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
    assert_eq!(read_json(res).await["field"], "time_slot");
    assert!(store
        .data
        .lock()
        .unwrap()
        .reservations
        .iter()
        .any(|r| r.id == sample.ghosts_reservation_id && r.time_slot == "16:00"));

    // Own slot
    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(serde_json::json!({"new_time_slot": "16:00"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(serde_json::json!({"new_time_slot": "18:30"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["reservation"]["old_time_slot"], "16:00");
    assert_eq!(body["reservation"]["new_time_slot"], "18:30");
    assert_eq!(body["reservation"]["team_name"], "Ghosts");

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(serde_json::json!({"new_time_slot": "6:30pm"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(res).await["message"],
        "Invalid time slot format. Use HH:MM format"
    );

    let req = test::TestRequest::put()
        .uri("/api/v1/stations/1/reservations/9999/time_slot")
        .set_json(serde_json::json!({"new_time_slot": "19:00"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_cancel_reservation() {
    let store = Arc::new(StoreMock::default());
    let sample = sample_data::fill_sample_data(&store);
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;
    let uri = format!(
        "/api/v1/stations/1/reservations/{}/cancel",
        sample.ghosts_reservation_id
    );

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(serde_json::json!({"email": "vampires@example.com"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
    assert_eq!(read_json(res).await["message"], "Reservation not found");

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(serde_json::json!({"email": "ghosts@example.com"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["reservation"]["status"], "cancelled");
    assert_eq!(body["reservation"]["time_slot"], "16:00");

    let req = test::TestRequest::get()
        .uri("/api/v1/stations/1/reservations?email=ghosts%40example.com")
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 0);
    // The reservation of the same team at station 2 is untouched
    let req = test::TestRequest::get()
        .uri("/api/v1/stations/2/reservations?email=ghosts%40example.com")
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["count"], 1);

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(serde_json::json!({"email": "ghosts@example.com"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_record_scan() {
    let store = Arc::new(StoreMock::default());
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;
    let scan = serde_json::json!({"time_slot": "16:00", "team_name": "Ghosts", "table": 2});

    let req = test::TestRequest::post()
        .uri("/api/v1/scans")
        .set_json(scan.clone())
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["saved"], true);
    assert_eq!(body["data"], scan);

    let req = test::TestRequest::post()
        .uri("/api/v1/scans")
        .set_json(scan)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["saved"], false);
    assert_eq!(body["message"], "Record already exists, not saved");
    assert_eq!(store.data.lock().unwrap().scans.len(), 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/scans")
        .set_json(serde_json::json!({"time_slot": "16:00", "team_name": "Ghosts", "table": 5}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_record_scan_free_text() {
    let store = Arc::new(StoreMock::default());
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/scans")
        .set_json(serde_json::json!({"time_slot": "not a time", "team_name": "  Ghosts ", "table": 1}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["saved"], true);
    assert_eq!(body["data"]["team_name"], "  Ghosts ");

    let data = store.data.lock().unwrap();
    assert_eq!(data.scans.len(), 1);
    assert_eq!(data.scans[0].time_slot, "not a time");
    assert_eq!(data.scans[0].team_name, "  Ghosts ");
}

#[actix_web::test]
async fn test_reservation_qr_code() {
    let store = Arc::new(StoreMock::default());
    let sample = sample_data::fill_sample_data(&store);
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/stations/1/reservations/{}/qr.svg?email=ghosts%40example.com",
            sample.ghosts_reservation_id
        ))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    assert_eq!(
        res.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "image/svg+xml"
    );
    let body = test::read_body(res).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("<svg"));

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/stations/1/reservations/{}/qr.svg?email=vampires%40example.com",
            sample.ghosts_reservation_id
        ))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_admin_requires_session() {
    let store = Arc::new(StoreMock::default());
    sample_data::fill_sample_data(&store);
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/reservations")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/scans")
        .append_header(("X-SESSION-TOKEN", "invalid"))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);

    // Token signed with a different secret
    let mut token = SessionToken::new();
    token.set_admin(1);
    let req = test::TestRequest::get()
        .uri("/api/v1/admin/session")
        .append_header(("X-SESSION-TOKEN", token.as_string("some other secret")))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/login")
        .set_json(serde_json::json!({
            "email": sample_data::ADMIN_EMAIL,
            "password": "wrong password",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
    assert_eq!(read_json(res).await["message"], "Invalid email or password");
}

#[actix_web::test]
async fn test_admin_login_and_listing() {
    let store = Arc::new(StoreMock::default());
    let sample = sample_data::fill_sample_data(&store);
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/login")
        .set_json(serde_json::json!({
            "email": sample_data::ADMIN_EMAIL.to_uppercase(),
            "password": sample_data::ADMIN_PASSWORD,
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let session_cookie = res
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE_NAME)
        .expect("Login response should set session cookie")
        .into_owned();
    assert_eq!(session_cookie.http_only(), Some(true));
    let body = read_json(res).await;
    assert_eq!(body["admin"]["email"], sample_data::ADMIN_EMAIL);
    let session_token = body["sessionToken"].as_str().unwrap().to_owned();

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/reservations")
        .append_header(("X-SESSION-TOKEN", session_token.clone()))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["reservations"].as_array().unwrap().len(), 3);
    assert_eq!(body["stats"]["total_reservations"], 3);
    assert_eq!(body["stats"]["stations"][0]["station"], 1);
    assert_eq!(body["stats"]["stations"][0]["total_reservations"], 2);
    assert_eq!(body["stats"]["stations"][0]["free_time_slots"], 23);
    assert_eq!(body["stats"]["stations"][1]["total_reservations"], 1);

    // Filters, using the session cookie
    let req = test::TestRequest::get()
        .uri("/api/v1/admin/reservations?station=1&search=VAMP")
        .cookie(session_cookie.clone())
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["reservations"].as_array().unwrap().len(), 1);
    assert_eq!(body["reservations"][0]["team_name"], "Vampires");
    // Statistics are not affected by the filter
    assert_eq!(body["stats"]["total_reservations"], 3);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/reservations?time_slot=16:00")
        .cookie(session_cookie.clone())
        .to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["reservations"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/reservations?station=7")
        .cookie(session_cookie.clone())
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/scans?station=2")
        .cookie(session_cookie.clone())
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    assert_eq!(read_json(res).await["count"], 0);

    // Sessions of deleted admin accounts are no longer valid
    store
        .data
        .lock()
        .unwrap()
        .admins
        .retain(|a| a.id != sample.admin_id);
    let req = test::TestRequest::get()
        .uri("/api/v1/admin/session")
        .append_header(("X-SESSION-TOKEN", session_token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_store_unavailable() {
    let store = Arc::new(StoreMock::default());
    store.data.lock().unwrap().next_error = Some(crate::data_store::StoreError::ConnectionError(
        "connection refused".to_string(),
    ));
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/stations/1/availability")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(res).await;
    assert!(!body["message"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[actix_web::test]
async fn test_health_and_time_slots() {
    let store = Arc::new(StoreMock::default());
    let app = test::init_service(
        App::new()
            .configure(configure_app)
            .app_data(web::Data::new(app_state(&store)))
            .wrap(middleware::from_fn(error_logging_middleware)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body = read_json(test::call_service(&app, req).await).await;
    assert_eq!(body["status"], "ok");

    let req = test::TestRequest::get()
        .uri("/api/v1/stations/2/time_slots")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["station"], 2);
    assert_eq!(body["time_slots"].as_array().unwrap().len(), 25);
    assert_eq!(body["time_slots"][0], "15:00");

    let req = test::TestRequest::get()
        .uri("/api/v1/stations/0/time_slots")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
}
