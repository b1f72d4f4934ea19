use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use migration::{Migrator, MigratorTrait};
use models::contact_message::ContactStatus;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes::build_router;
use server::state::AppState;
use service::catalog::{self, NewService};
use service::company_info::{self, CompanyProfile};
use service::contact;
use service::gallery::{self, NewGalleryImage};
use service::notify::{ContactNotifier, MailTransport, NotifyError, OutboundMail};
use service::projects::{self, NewProject, NewProjectImage};
use service::testimonials::{self, NewTestimonial};

const MEDIA_BASE: &str = "http://testserver/media/";

struct TestApp {
    router: Router,
    db: DatabaseConnection,
    media: tempfile::TempDir,
}

async fn spawn_app(notifier: ContactNotifier) -> TestApp {
    let db = models::db::connect_sqlite_memory().await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let media = tempfile::tempdir().unwrap();
    let state = AppState::new(db.clone(), notifier, MEDIA_BASE);
    let router = build_router(state, CorsLayer::very_permissive(), media.path());
    TestApp { router, db, media }
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &TestApp, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

fn titles(body: &Value) -> Vec<&str> {
    body.as_array().unwrap().iter().map(|v| v["title"].as_str().unwrap()).collect()
}

struct FailingTransport;

#[async_trait]
impl MailTransport for FailingTransport {
    async fn send(&self, _mail: &OutboundMail) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("relay unreachable".into()))
    }
}

#[tokio::test]
async fn health_and_api_document() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, doc) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/contact/").is_some());
}

#[tokio::test]
async fn company_info_is_404_until_configured() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    let (status, body) = get(&app, "/api/company-info/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");

    company_info::create_company_info(
        &app.db,
        CompanyProfile { company_name: "Rénov Plus".into(), phone: "01 23 45 67 89".into(), ..CompanyProfile::default() },
    )
    .await
    .unwrap();
    let (status, body) = get(&app, "/api/company-info/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company_name"], "Rénov Plus");
    assert_eq!(body["phone"], "01 23 45 67 89");
}

#[tokio::test]
async fn inactive_services_are_hidden() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    catalog::create_service(&app.db, NewService { title: "Cuisine".into(), order: 2, ..NewService::default() })
        .await
        .unwrap();
    catalog::create_service(&app.db, NewService { title: "Peinture".into(), is_active: false, ..NewService::default() })
        .await
        .unwrap();

    let (status, body) = get(&app, "/api/services/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Cuisine"]);
    assert!(body[0]["image"].is_null());

    assert_eq!(get(&app, "/api/services/cuisine/").await.0, StatusCode::OK);
    assert_eq!(get(&app, "/api/services/peinture/").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn projects_are_listed_featured_first() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    let bath = catalog::create_service(&app.db, NewService { title: "Salle de bain".into(), ..NewService::default() })
        .await
        .unwrap();
    for (title, featured, order, service_id) in [
        ("Alpha", true, 2, Some(bath.id)),
        ("Bravo", false, 0, None),
        ("Charlie", true, 1, Some(bath.id)),
    ] {
        projects::create_project(
            &app.db,
            NewProject { title: title.into(), is_featured: featured, order, service_id, ..NewProject::default() },
        )
        .await
        .unwrap();
    }
    projects::create_project(&app.db, NewProject { title: "Hidden".into(), is_active: false, ..NewProject::default() })
        .await
        .unwrap();

    let (status, body) = get(&app, "/api/projects/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Charlie", "Alpha", "Bravo"]);
    assert!(body[0].get("description").is_none());
    assert_eq!(body[0]["service_name"], "Salle de bain");

    let (_, featured) = get(&app, "/api/projects/featured/").await;
    assert_eq!(titles(&featured), vec!["Charlie", "Alpha"]);

    let (_, by_service) = get(&app, "/api/projects/?service=salle-de-bain").await;
    assert_eq!(titles(&by_service), vec!["Charlie", "Alpha"]);

    let (status, unknown) = get(&app, "/api/projects/?service=toiture").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown, json!([]));
}

#[tokio::test]
async fn project_detail_has_visible_images_and_absolute_urls() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    let p = projects::create_project(
        &app.db,
        NewProject {
            title: "Projet 1".into(),
            description: "Rénovation complète".into(),
            featured_image: "projects/featured/projet-1_a.jpg".into(),
            before_image: Some("projects/before/projet-1_b.jpg".into()),
            has_before_after: true,
            ..NewProject::default()
        },
    )
    .await
    .unwrap();
    projects::add_project_image(&app.db, p.id, NewProjectImage::new("projects/gallery/projet-1_1_a.jpg", 1))
        .await
        .unwrap();
    projects::add_project_image(
        &app.db,
        p.id,
        NewProjectImage { is_visible: false, ..NewProjectImage::new("projects/gallery/projet-1_2_b.jpg", 2) },
    )
    .await
    .unwrap();

    let (status, body) = get(&app, "/api/projects/projet-1/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Rénovation complète");
    assert_eq!(body["featured_image"], "http://testserver/media/projects/featured/projet-1_a.jpg");
    assert_eq!(body["featured_image_url"], "http://testserver/media/projects/featured/projet-1_a.jpg");
    assert_eq!(body["before_image"], "http://testserver/media/projects/before/projet-1_b.jpg");
    assert_eq!(body["before_image_url"], "http://testserver/media/projects/before/projet-1_b.jpg");
    assert_eq!(body["has_before_after"], true);
    assert!(body["service"].is_null());
    let images = body["images"].as_array().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0]["image"], "http://testserver/media/projects/gallery/projet-1_1_a.jpg");
    assert_eq!(images[0]["image_url"], "http://testserver/media/projects/gallery/projet-1_1_a.jpg");

    let (_, list) = get(&app, "/api/projects/").await;
    assert_eq!(list[0]["featured_image_url"], "http://testserver/media/projects/featured/projet-1_a.jpg");

    assert_eq!(get(&app, "/api/projects/projet-9/").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn testimonials_carry_project_title() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    let p = projects::create_project(&app.db, NewProject { title: "Cuisine moderne".into(), ..NewProject::default() })
        .await
        .unwrap();
    testimonials::create_testimonial(
        &app.db,
        NewTestimonial {
            client_name: "Marie L.".into(),
            content: "Travail soigné".into(),
            project_id: Some(p.id),
            ..NewTestimonial::default()
        },
    )
    .await
    .unwrap();
    testimonials::create_testimonial(
        &app.db,
        NewTestimonial { client_name: "Paul D.".into(), content: "Parfait".into(), is_active: false, ..NewTestimonial::default() },
    )
    .await
    .unwrap();

    let (status, body) = get(&app, "/api/testimonials/").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["project_title"], "Cuisine moderne");
    assert_eq!(rows[0]["project"], p.id);
    assert_eq!(rows[0]["rating"], 5);
}

#[tokio::test]
async fn gallery_filters_by_category_and_links_projects() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    let p = projects::create_project(&app.db, NewProject { title: "Projet 4".into(), ..NewProject::default() })
        .await
        .unwrap();
    gallery::create_gallery_image(
        &app.db,
        NewGalleryImage {
            title: "Salon".into(),
            image: "gallery/hero_4_a.jpg".into(),
            category: "hero".into(),
            linked_project_id: Some(p.id),
            ..NewGalleryImage::default()
        },
    )
    .await
    .unwrap();
    gallery::create_gallery_image(
        &app.db,
        NewGalleryImage { title: "Atelier".into(), image: "gallery/b.jpg".into(), category: "atelier".into(), ..NewGalleryImage::default() },
    )
    .await
    .unwrap();

    let (_, all) = get(&app, "/api/gallery/").await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, hero) = get(&app, "/api/gallery/hero/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&hero), vec!["Salon"]);
    assert_eq!(hero[0]["linked_project_slug"], "projet-4");
    assert_eq!(hero[0]["image"], "http://testserver/media/gallery/hero_4_a.jpg");

    let (_, atelier) = get(&app, "/api/gallery/?category=atelier").await;
    assert_eq!(titles(&atelier), vec!["Atelier"]);
    assert!(atelier[0]["linked_project_slug"].is_null());
}

#[tokio::test]
async fn contact_submission_is_stored_with_confirmation() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    let (status, body) = post_json(
        &app,
        "/api/contact/",
        r#"{"name":"Jean","email":"jean@example.com","phone":"0612345678","message":"Devis pour une cuisine"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], contact::CONFIRMATION_MESSAGE);

    let rows = contact::list_messages(&app.db, None).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, ContactStatus::New);
    assert_eq!(rows[0].subject, "");
}

#[tokio::test]
async fn failing_notification_does_not_fail_submission() {
    let notifier = ContactNotifier::new(Arc::new(FailingTransport), Some("owner@example.com".into()), "site@example.com");
    let app = spawn_app(notifier).await;
    let (status, _) = post_json(
        &app,
        "/api/contact/",
        r#"{"name":"Jean","email":"jean@example.com","subject":"Devis","message":"Bonjour"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(contact::list_messages(&app.db, Some(ContactStatus::New)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_contact_returns_field_errors() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    let (status, body) =
        post_json(&app, "/api/contact/", r#"{"name":"Jean","email":"not-an-email","message":"Bonjour"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["email"].is_array());

    let (status, body) = post_json(&app, "/api/contact/", r#"{"email":"jean@example.com"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["name"].is_array());
    assert!(body["fields"]["message"].is_array());

    let (status, _) = post_json(&app, "/api/contact/", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &app,
        "/api/contact/",
        r#"{"name":"Jean","email":"jean@example.com","phone":612345678,"message":"Bonjour"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["phone"].is_array());

    assert!(contact::list_messages(&app.db, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn null_optional_contact_fields_are_accepted() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    let (status, _) = post_json(
        &app,
        "/api/contact/",
        r#"{"name":"Jean","email":"jean@example.com","phone":null,"subject":null,"message":"Bonjour"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let rows = contact::list_messages(&app.db, None).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].phone, "");
    assert_eq!(rows[0].subject, "");
}

#[tokio::test]
async fn contact_only_accepts_post() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    assert_eq!(get(&app, "/api/contact/").await.0, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn stored_media_is_served() {
    let app = spawn_app(ContactNotifier::disabled()).await;
    let dir = app.media.path().join("gallery");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("a.jpg"), b"jpeg bytes").unwrap();

    let resp = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/media/gallery/a.jpg").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(get(&app, "/media/gallery/missing.jpg").await.0, StatusCode::NOT_FOUND);
}
