//! Integration tests for page wiring and clicks
//!
//! Run with: cargo test --test navigation_test

mod common;

use common::{sample_init_data, FakePage};
use minihack::telegram::navigation::{ClickAction, ClickContext, ClickMode, ClickOutcome, Control, Page, PageController, Route};
use minihack::{AppError, AuthClient, PayloadScope};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ALL_CONTROLS: &[&str] = &["reg-btn", "open-btn", "profile-btn", "hackathon-btn", "back-btn"];

fn ctx<'a>(page: &'a FakePage, client: &'a AuthClient) -> ClickContext<'a> {
    ClickContext {
        host: page,
        document: page,
        navigator: page,
        client,
        scope: PayloadScope::All,
    }
}

#[tokio::test]
async fn test_navigation_click_redirects_once_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let page = FakePage::new(Some(sample_init_data())).with_controls(&["profile-btn", "hackathon-btn", "reg-btn"]);
    let client = AuthClient::new(server.uri()).unwrap();
    let controller = PageController::wire(Page::Profile, &page, ClickMode::Navigate).unwrap();

    let outcome = controller.click(Control::Profile, &ctx(&page, &client)).await;

    assert_eq!(outcome, ClickOutcome::Redirected(Route::Profile));
    assert_eq!(page.redirects(), vec![Route::Profile]);
    assert!(page.popups().is_empty());
}

#[tokio::test]
async fn test_every_binding_redirects_to_its_route() {
    let page = FakePage::new(None).with_controls(ALL_CONTROLS);
    let client = AuthClient::new("http://127.0.0.1:9").unwrap();

    for page_kind in [Page::Home, Page::Profile, Page::RegForm] {
        let controller = PageController::wire(page_kind, &page, ClickMode::Navigate).unwrap();
        for &(control, route) in page_kind.bindings() {
            let outcome = controller.click(control, &ctx(&page, &client)).await;
            assert_eq!(outcome, ClickOutcome::Redirected(route), "{} on {}", control, page_kind);
        }
    }

    assert_eq!(
        page.redirects(),
        vec![
            Route::Reg,
            Route::Hackathon,
            Route::Profile,
            Route::Hackathon,
            Route::Reg,
            Route::Profile,
            Route::Hackathon,
        ]
    );
}

#[tokio::test]
async fn test_unbound_control_is_ignored() {
    let page = FakePage::new(None).with_controls(ALL_CONTROLS);
    let client = AuthClient::new("http://127.0.0.1:9").unwrap();
    let controller = PageController::wire(Page::RegForm, &page, ClickMode::Navigate).unwrap();

    let outcome = controller.click(Control::Open, &ctx(&page, &client)).await;

    assert_eq!(outcome, ClickOutcome::Ignored);
    assert!(page.redirects().is_empty());
}

#[test]
fn test_missing_control_fails_fast() {
    let page = FakePage::new(None).with_controls(&["reg-btn"]);

    let err = PageController::wire(Page::Home, &page, ClickMode::Navigate).unwrap_err();

    match err {
        AppError::MissingControl { page, control } => {
            assert_eq!(page, "home");
            assert_eq!(control, "open-btn");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_auth_on_click_only_changes_home_buttons() {
    let page = FakePage::new(None).with_controls(ALL_CONTROLS);

    let home = PageController::wire(Page::Home, &page, ClickMode::AuthOnClick).unwrap();
    assert_eq!(home.action(Control::Reg), Some(ClickAction::SubmitAuth));
    assert_eq!(home.action(Control::Open), Some(ClickAction::SubmitAuth));

    let form = PageController::wire(Page::RegForm, &page, ClickMode::AuthOnClick).unwrap();
    assert_eq!(form.action(Control::Reg), Some(ClickAction::Navigate(Route::Profile)));
}

#[tokio::test]
async fn test_auth_click_shows_success_popup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Welcome"})))
        .expect(1)
        .mount(&server)
        .await;

    let page = FakePage::new(Some(sample_init_data())).with_controls(ALL_CONTROLS);
    let client = AuthClient::new(server.uri()).unwrap();
    let controller = PageController::wire(Page::Home, &page, ClickMode::AuthOnClick).unwrap();

    let outcome = controller.click(Control::Reg, &ctx(&page, &client)).await;

    assert_eq!(outcome, ClickOutcome::Submitted(json!({"message": "Welcome"})));
    let popups = page.popups();
    assert_eq!(popups.len(), 1);
    assert_eq!(popups[0].title, "Success");
    assert_eq!(popups[0].message, "Welcome");
    assert!(page.redirects().is_empty());
    assert_eq!(page.live_elements(), 0);
}

#[tokio::test]
async fn test_auth_click_without_message_uses_default_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": 1})))
        .mount(&server)
        .await;

    let page = FakePage::new(Some(sample_init_data())).with_controls(ALL_CONTROLS);
    let client = AuthClient::new(server.uri()).unwrap();
    let controller = PageController::wire(Page::Home, &page, ClickMode::AuthOnClick).unwrap();

    controller.click(Control::Open, &ctx(&page, &client)).await;

    assert_eq!(page.popups()[0].message, "User info sent");
}

#[tokio::test]
async fn test_auth_click_failure_falls_back_to_alert() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "server error"})))
        .mount(&server)
        .await;

    let page = FakePage::new(Some(sample_init_data()))
        .with_controls(ALL_CONTROLS)
        .without_popup();
    let client = AuthClient::new(server.uri()).unwrap();
    let controller = PageController::wire(Page::Home, &page, ClickMode::AuthOnClick).unwrap();

    let outcome = controller.click(Control::Reg, &ctx(&page, &client)).await;

    assert_eq!(outcome, ClickOutcome::Failed("server error".to_string()));
    assert_eq!(page.alerts(), vec!["server error".to_string()]);
    assert_eq!(page.live_elements(), 0);
}

#[tokio::test]
async fn test_auth_click_outside_telegram_shows_error() {
    let page = FakePage::new(None).with_controls(ALL_CONTROLS);
    let client = AuthClient::new("http://127.0.0.1:9").unwrap();
    let controller = PageController::wire(Page::Home, &page, ClickMode::AuthOnClick).unwrap();

    let outcome = controller.click(Control::Reg, &ctx(&page, &client)).await;

    assert!(matches!(outcome, ClickOutcome::Failed(_)));
    assert_eq!(page.popups()[0].title, "Error");
}
