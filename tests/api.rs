//! HTTP tests: the full `/api` scope served from an in-memory repository.

use actix_web::{
    http::{header, StatusCode},
    test,
    web::Data,
    App,
};
use chrono::Duration;
use clip_arena::api::{configure, AppState, MessageResponse};
use clip_arena::logic::TournamentsPage;
use clip_arena::{AuthDetails, Clip, MemoryRepository, Tournament, UserInfo};
use serde_json::{json, Value};
use std::sync::Arc;

fn state() -> Data<AppState> {
    Data::new(AppState::new(
        Arc::new(MemoryRepository::new()),
        Duration::hours(1),
    ))
}

fn clip_urls(prefix: &str, n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("https://tiktok.com/@{prefix}/video/{i}"))
        .collect()
}

fn tournament_body(name: &str, urls: &[String]) -> Value {
    json!({
        "name": name,
        "size": urls.len(),
        "tiktoks": urls.iter().map(|u| json!({ "url": u })).collect::<Vec<_>>(),
    })
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Register `$name` with a fixed password, log in, and yield the `AuthDetails`.
macro_rules! register_and_login {
    ($app:expr, $name:expr) => {{
        let credentials = json!({ "name": $name, "password": "hunter2" });
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&credentials)
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&credentials)
            .to_request();
        let details: AuthDetails = test::call_and_read_body_json($app, req).await;
        details
    }};
}

/// Create a tournament as the token's owner and yield it.
macro_rules! create {
    ($app:expr, $token:expr, $name:expr, $urls:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/tournament/create")
            .insert_header(bearer($token))
            .set_json(tournament_body($name, $urls))
            .to_request();
        let body: Value = test::call_and_read_body_json($app, req).await;
        serde_json::from_value::<Tournament>(body["tournament"].clone()).unwrap()
    }};
}

#[actix_web::test]
async fn health() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "ok": true, "service": "clip-arena" }));
}

#[actix_web::test]
async fn register_login_whoami() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
    let details = register_and_login!(&app, " Alice ");
    assert_eq!(details.username, "alice");

    let req = test::TestRequest::get()
        .uri("/api/auth/whoami")
        .insert_header(bearer(&details.token))
        .to_request();
    let me: UserInfo = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me.id, details.id);
    assert_eq!(me.username, "alice");

    // same name again
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "ALICE", "password": "x" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "name": "alice", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "Invalid credentials");
}

#[actix_web::test]
async fn protected_routes_need_a_valid_token() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;

    let req = test::TestRequest::get().uri("/api/auth/whoami").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::post()
        .uri("/api/tournament/create")
        .insert_header(bearer(&uuid::Uuid::new_v4().to_string()))
        .set_json(tournament_body("cats", &clip_urls("cats", 4)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::get()
        .uri("/api/user/tournaments")
        .insert_header(bearer("not-a-token"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn tournament_lifecycle() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
    let me = register_and_login!(&app, "bob");
    let urls = clip_urls("bob", 6);
    let t = create!(&app, &me.token, "bob's picks", &urls);
    assert_eq!(t.size, 6);
    assert_eq!(t.user_id, me.id);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournament/{}", t.id))
        .to_request();
    let details: Tournament = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details, t);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournament/tiktoks/{}", t.id))
        .to_request();
    let clips: Vec<Clip> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(clips.len(), 6);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/tournament/contest/{}?type=single_elimination",
            t.id
        ))
        .to_request();
    let bracket: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(bracket["countMatches"], 5);
    assert_eq!(bracket["rounds"].as_array().unwrap().len(), 3);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/tournament/contest/{}?type=king_of_the_hill",
            t.id
        ))
        .to_request();
    let bracket: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(bracket["rounds"].as_array().unwrap().len(), 5);

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournament/{}", t.id))
        .set_json(json!({ "tiktokURL": urls[3] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournament/tiktoks/{}", t.id))
        .to_request();
    let clips: Vec<Clip> = test::call_and_read_body_json(&app, req).await;
    let winner = clips.iter().find(|c| c.url == urls[3]).unwrap();
    assert_eq!(winner.wins, 1);

    let edited = clip_urls("bob", 5);
    let req = test::TestRequest::post()
        .uri(&format!("/api/tournament/edit/{}", t.id))
        .insert_header(bearer(&me.token))
        .set_json(tournament_body("bob's picks", &edited))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tournament/delete/{}", t.id))
        .insert_header(bearer(&me.token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournament/{}", t.id))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn contest_and_id_errors() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
    let me = register_and_login!(&app, "carol");
    let t = create!(&app, &me.token, "carol's", &clip_urls("carol", 4));

    for format in ["round_robin", "", "swiss_system"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/tournament/contest/{}?type={format}", t.id))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST,
            "type = {format:?}"
        );
    }

    let req = test::TestRequest::get()
        .uri("/api/tournament/not-an-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "Could not parse id not-an-id");

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournament/{}", t.id))
        .set_json(json!({ "tiktokURL": "https://example.com/other" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn only_the_owner_edits_or_deletes() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
    let owner = register_and_login!(&app, "dave");
    let other = register_and_login!(&app, "erin");
    let t = create!(&app, &owner.token, "dave's", &clip_urls("dave", 4));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tournament/delete/{}", t.id))
        .insert_header(bearer(&other.token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::delete()
        .uri("/api/tournament/delete")
        .insert_header(bearer(&other.token))
        .set_json(json!({ "tournamentIds": [t.id] }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::delete()
        .uri("/api/tournament/delete")
        .insert_header(bearer(&owner.token))
        .set_json(json!({ "tournamentIds": [t.id] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn listings_page_and_filter_by_owner() {
    let app = test::init_service(App::new().app_data(state()).configure(configure)).await;
    let frank = register_and_login!(&app, "frank");
    let gina = register_and_login!(&app, "gina");
    for i in 0..3 {
        create!(&app, &frank.token, &format!("frank {i}"), &clip_urls(&format!("f{i}"), 4));
    }
    create!(&app, &gina.token, "gina 0", &clip_urls("g0", 5));

    let req = test::TestRequest::get()
        .uri("/api/tournament?page=2&count=3&sort_name=asc")
        .to_request();
    let page: TournamentsPage = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.tournament_count, 4);
    assert_eq!(page.tournaments.len(), 1);
    assert_eq!(page.tournaments[0].name, "gina 0");

    let req = test::TestRequest::get()
        .uri("/api/tournament?page=5")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::MOVED_PERMANENTLY
    );

    let req = test::TestRequest::get()
        .uri("/api/user/tournaments?sort_size=desc")
        .insert_header(bearer(&gina.token))
        .to_request();
    let page: TournamentsPage = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page.tournament_count, 1);
    assert_eq!(page.tournaments[0].name, "gina 0");
}
