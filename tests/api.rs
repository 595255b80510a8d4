// tests/api.rs
//
// Rotas completas (auth_guard -> permissões -> handler) sobre o InMemoryStore.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use volunteer_backend::{
    common::error::AppError,
    config::{AppState, Settings},
    db::{AuditStore, InMemoryStore},
    models::{
        actor::{ActorKind, ActorRef, OrganizationAdmin, OrganizationProfile},
        audit::{AuditEvent, AuditOutcome, AuditUserType},
        rbac::Role,
        voluntary_work::{VoluntaryWork, WorkStatus},
        volunteer::{SkillTag, TimeSlot, Volunteer, VolunteerProfile, VolunteerType, Weekday},
    },
    routes::app_router,
    services::notification_service::{CertificateRequest, LogNotifier, Notifier},
};

const VOLUNTEER_PERMISSIONS: &[&str] = &["GET_me", "GET_voluntaryWorks", "REGISTER_voluntaryWork", "DEREGISTER_voluntaryWork"];

struct TestApp {
    router: Router,
    state: AppState,
    store: InMemoryStore,
}

fn settings(admin_respects_capacity: bool) -> Settings {
    Settings {
        database_url: "postgres://unused".into(),
        jwt_secret: "segredo-de-teste".into(),
        bind_addr: "127.0.0.1:0".into(),
        db_max_connections: 1,
        admin_registration_respects_capacity: admin_respects_capacity,
    }
}

fn test_app_with(notifier: Arc<dyn Notifier>) -> TestApp {
    let store = InMemoryStore::new();
    test_app_on(store.clone(), Arc::new(store), notifier)
}

fn test_app_on(store: InMemoryStore, audit: Arc<dyn AuditStore>, notifier: Arc<dyn Notifier>) -> TestApp {
    let state = AppState::from_stores(
        settings(false),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        audit,
        notifier,
    );
    TestApp { router: app_router(state.clone()), state, store }
}

fn test_app() -> TestApp {
    test_app_with(Arc::new(LogNotifier))
}

fn skill() -> SkillTag {
    SkillTag { id: 7, name: "Cooking".into() }
}

fn volunteer(name: &str, location: &str, permissions: &[&str]) -> Volunteer {
    Volunteer {
        id: Uuid::new_v4(),
        name: name.into(),
        email: format!("{name}@mail.com"),
        volunteer_type: VolunteerType::Volunteer,
        roles: vec![Role::new("volunteer", permissions)],
        profile: VolunteerProfile {
            id: Uuid::new_v4(),
            available_location: location.into(),
            available_days: BTreeSet::from([Weekday::Saturday]),
            available_time: BTreeSet::from([TimeSlot::Morning]),
            skill_tags: vec![skill()],
        },
    }
}

fn admin(name: &str, permissions: &[&str]) -> OrganizationAdmin {
    OrganizationAdmin {
        id: Uuid::new_v4(),
        name: name.into(),
        email: format!("{name}@org.org"),
        roles: vec![Role::new("admin", permissions)],
    }
}

fn work(id: i64, capacity: i32, creator: ActorRef) -> VoluntaryWork {
    VoluntaryWork {
        id,
        name: "Soup Kitchen".into(),
        description: "Serving lunch".into(),
        location: "Hebron".into(),
        days: BTreeSet::from([Weekday::Friday, Weekday::Saturday]),
        time: BTreeSet::from([TimeSlot::Morning, TimeSlot::Afternoon]),
        skill_tags: vec![skill()],
        capacity,
        volunteer_profiles: Vec::new(),
        rating: Vec::new(),
        avg_rating: 0.0,
        feedback: Vec::new(),
        status: WorkStatus::Pending,
        creator,
        organization_id: None,
        created_at: Utc::now(),
    }
}

impl TestApp {
    fn token(&self, kind: ActorKind, id: Uuid) -> String {
        self.state.auth_service.create_token(ActorRef { kind, id }).unwrap()
    }

    fn add_volunteer(&self, v: &Volunteer) -> String {
        self.store.insert_volunteer(v.clone());
        self.token(ActorKind::Volunteer, v.id)
    }

    fn add_admin(&self, a: &OrganizationAdmin) -> String {
        self.store.insert_organization_admin(a.clone());
        self.token(ActorKind::OrganizationAdmin, a.id)
    }

    async fn call(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        self.call_with_lang(method, uri, token, body, None).await
    }

    async fn call_with_lang(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
        lang: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(lang) = lang {
            builder = builder.header(header::ACCEPT_LANGUAGE, lang);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    // Corpo cru, para mandar JSON quebrado
    async fn call_raw(&self, method: &str, uri: &str, token: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

// Deixa as tasks de auditoria/e-mail rodarem
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn health_is_public_and_everything_else_needs_a_token() {
    let app = test_app();

    let (status, _) = app.call("GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.call("GET", "/api/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app.call("GET", "/api/me", Some("lixo"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_lists_effective_permissions() {
    let app = test_app();
    let ana = volunteer("ana", "Hebron", VOLUNTEER_PERMISSIONS);
    let token = app.add_volunteer(&ana);

    let (status, body) = app.call("GET", "/api/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "volunteer");
    assert_eq!(body["permissions"].as_array().unwrap().len(), VOLUNTEER_PERMISSIONS.len());
}

#[tokio::test]
async fn single_seat_goes_to_the_first_eligible_volunteer() {
    let app = test_app();
    app.store.insert_voluntary_work(work(1, 1, ActorRef { kind: ActorKind::OrganizationAdmin, id: Uuid::new_v4() }));
    let a = volunteer("a", "Hebron", VOLUNTEER_PERMISSIONS);
    let b = volunteer("b", "Hebron", VOLUNTEER_PERMISSIONS);
    let (token_a, token_b) = (app.add_volunteer(&a), app.add_volunteer(&b));

    let (status, body) = app.call("PUT", "/api/voluntary-works/1/register", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Registration done successfully!!");

    let (status, body) = app.call("PUT", "/api/voluntary-works/1/register", Some(&token_b), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Voluntary work is already at full capacity (1).");

    let (status, body) = app.call("GET", "/api/voluntary-works/1", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["volunteerNumbers"], 1);

    // O voluntário recusado fica com a lista vazia
    let (status, body) = app.call("GET", &format!("/api/volunteers/{}/voluntary-works", b.id), Some(&token_b), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    settle().await;
    let log = app.store.audit_log();
    assert_eq!(log.iter().filter(|e| e.outcome == AuditOutcome::Success).count(), 1);
    assert_eq!(log.iter().filter(|e| e.outcome == AuditOutcome::Failed).count(), 1);
    assert!(log.iter().all(|e| e.user_type == AuditUserType::Volunteer));
}

#[tokio::test]
async fn ineligible_volunteer_gets_the_failed_rules() {
    let app = test_app();
    app.store.insert_voluntary_work(work(1, 5, ActorRef { kind: ActorKind::OrganizationAdmin, id: Uuid::new_v4() }));
    let far = volunteer("far", "Jenin", VOLUNTEER_PERMISSIONS);
    let token = app.add_volunteer(&far);

    let (status, body) = app.call("PUT", "/api/voluntary-works/1/register", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"], json!({ "failedRules": ["location"] }));
}

#[tokio::test]
async fn missing_grant_is_forbidden_but_self_lookup_is_allowed() {
    let app = test_app();
    let a = volunteer("a", "Hebron", VOLUNTEER_PERMISSIONS);
    let b = volunteer("b", "Hebron", VOLUNTEER_PERMISSIONS);
    let token_a = app.add_volunteer(&a);
    app.store.insert_volunteer(b.clone());

    let (status, body) = app.call("GET", &format!("/api/volunteers/{}/voluntary-works", b.id), Some(&token_a), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("GET_volunteers"));

    let (status, _) = app.call("GET", &format!("/api/volunteers/{}/voluntary-works", a.id), Some(&token_a), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn rating_requires_participation_and_updates_the_average() {
    let app = test_app();
    app.store.insert_voluntary_work(work(1, 5, ActorRef { kind: ActorKind::OrganizationAdmin, id: Uuid::new_v4() }));
    // Sem PUT_rating: a escrita aberta libera o gate, a participação decide
    let member = volunteer("m", "Hebron", VOLUNTEER_PERMISSIONS);
    let outsider = volunteer("o", "Hebron", VOLUNTEER_PERMISSIONS);
    let (token_m, token_o) = (app.add_volunteer(&member), app.add_volunteer(&outsider));

    app.call("PUT", "/api/voluntary-works/1/register", Some(&token_m), None).await;

    let (status, _) = app.call("PUT", "/api/voluntary-works/1/rating", Some(&token_o), Some(json!({ "rating": 1 }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.call("PUT", "/api/voluntary-works/1/rating", Some(&token_m), Some(json!({ "rating": 4 }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["avgRating"], 4.0);

    let (status, _) = app.call("PUT", "/api/voluntary-works/1/feedback", Some(&token_m), Some(json!({ "feedback": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.call("PUT", "/api/voluntary-works/1/feedback", Some(&token_m), Some(json!({ "feedback": "Muito bom" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.call("GET", "/api/voluntary-works/1", Some(&token_m), None).await;
    assert_eq!(body["feedback"][0]["volunteerName"], "m");
}

#[tokio::test]
async fn admin_must_name_the_volunteer_and_may_overbook() {
    let app = test_app();
    let boss = admin("boss", &["REGISTER_voluntaryWork", "GET_voluntaryWorks"]);
    let token_admin = app.add_admin(&boss);
    app.store.insert_voluntary_work(work(1, 1, ActorRef { kind: ActorKind::OrganizationAdmin, id: boss.id }));
    let a = volunteer("a", "Hebron", VOLUNTEER_PERMISSIONS);
    let far = volunteer("far", "Jenin", VOLUNTEER_PERMISSIONS);
    let token_a = app.add_volunteer(&a);
    app.store.insert_volunteer(far.clone());

    let (status, body) = app.call("PUT", "/api/voluntary-works/1/register", Some(&token_admin), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["volunteerId"].is_array());

    app.call("PUT", "/api/voluntary-works/1/register", Some(&token_a), None).await;

    // Sem checagem de perfil nem de capacidade
    let (status, _) = app
        .call("PUT", "/api/voluntary-works/1/register", Some(&token_admin), Some(json!({ "volunteerId": far.id })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.call("GET", "/api/voluntary-works/1", Some(&token_admin), None).await;
    assert_eq!(body["volunteerNumbers"], 2);
}

#[tokio::test]
async fn volunteer_cannot_deregister_someone_else() {
    let app = test_app();
    app.store.insert_voluntary_work(work(1, 5, ActorRef { kind: ActorKind::OrganizationAdmin, id: Uuid::new_v4() }));
    let a = volunteer("a", "Hebron", VOLUNTEER_PERMISSIONS);
    let b = volunteer("b", "Hebron", VOLUNTEER_PERMISSIONS);
    let (token_a, token_b) = (app.add_volunteer(&a), app.add_volunteer(&b));
    app.call("PUT", "/api/voluntary-works/1/register", Some(&token_a), None).await;

    let (status, _) = app
        .call("PUT", "/api/voluntary-works/1/deregister", Some(&token_b), Some(json!({ "volunteerId": a.id })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.call("PUT", "/api/voluntary-works/1/deregister", Some(&token_b), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.call("PUT", "/api/voluntary-works/1/deregister", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.call("GET", "/api/voluntary-works/1", Some(&token_a), None).await;
    assert_eq!(body["volunteerNumbers"], 0);
}

#[tokio::test]
async fn volunteer_cannot_register_someone_else() {
    let app = test_app();
    app.store.insert_voluntary_work(work(1, 5, ActorRef { kind: ActorKind::OrganizationAdmin, id: Uuid::new_v4() }));
    let a = volunteer("a", "Hebron", VOLUNTEER_PERMISSIONS);
    let b = volunteer("b", "Hebron", VOLUNTEER_PERMISSIONS);
    let (_token_a, token_b) = (app.add_volunteer(&a), app.add_volunteer(&b));

    let (status, _) = app
        .call("PUT", "/api/voluntary-works/1/register", Some(&token_b), Some(json!({ "volunteerId": a.id })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (_, body) = app.call("GET", "/api/voluntary-works/1", Some(&token_b), None).await;
    assert_eq!(body["volunteerNumbers"], 0);

    // O próprio id no corpo é aceito
    let (status, _) = app
        .call("PUT", "/api/voluntary-works/1/register", Some(&token_b), Some(json!({ "volunteerId": b.id })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn only_creator_or_organization_admin_reaches_the_members() {
    let app = test_app();
    let creator = admin("creator", &[]);
    let org_admin = admin("org", &[]);
    let stranger = admin("stranger", &[]);
    let (token_creator, token_org, token_stranger) =
        (app.add_admin(&creator), app.add_admin(&org_admin), app.add_admin(&stranger));

    let org = OrganizationProfile { id: Uuid::new_v4(), name: "Helping Hands".into(), admin_id: Some(org_admin.id) };
    app.store.insert_organization_profile(org.clone());

    let a = volunteer("a", "Hebron", VOLUNTEER_PERMISSIONS);
    app.store.insert_volunteer(a.clone());
    let mut w = work(1, 5, ActorRef { kind: ActorKind::OrganizationAdmin, id: creator.id });
    w.organization_id = Some(org.id);
    w.volunteer_profiles = vec![a.profile.id];
    app.store.insert_voluntary_work(w);

    let (status, body) = app.call("POST", "/api/voluntary-works/1/reminder", Some(&token_creator), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recipients"], 1);

    let (status, _) = app.call("POST", "/api/voluntary-works/1/reminder", Some(&token_org), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let certificate = json!({ "organizationName": "Helping Hands", "date": "2024-06-01" });
    let (status, body) = app
        .call("POST", "/api/voluntary-works/1/certificates", Some(&token_org), Some(certificate.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["recipients"], 1);

    let (status, _) = app
        .call("POST", "/api/voluntary-works/1/certificates", Some(&token_stranger), Some(certificate))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let bad_date = json!({ "organizationName": "Helping Hands", "date": "2024-13-01" });
    let (status, _) = app
        .call("POST", "/api/voluntary-works/1/certificates", Some(&token_org), Some(bad_date))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn errors_follow_accept_language() {
    let app = test_app();
    let a = volunteer("a", "Hebron", VOLUNTEER_PERMISSIONS);
    let token = app.add_volunteer(&a);

    let (status, body) = app
        .call_with_lang("GET", "/api/voluntary-works/99", Some(&token), None, Some("pt-BR,pt;q=0.9"))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Trabalho voluntário não encontrado.");
}

struct BrokenNotifier;

#[async_trait]
impl Notifier for BrokenNotifier {
    async fn send_email(&self, _: &str, _: &str, _: &str, _: &str) -> anyhow::Result<()> {
        anyhow::bail!("SMTP fora do ar")
    }

    async fn send_certificate(&self, _: &CertificateRequest) -> anyhow::Result<()> {
        anyhow::bail!("gerador fora do ar")
    }
}

#[tokio::test]
async fn broken_email_does_not_undo_the_registration() {
    let app = test_app_with(Arc::new(BrokenNotifier));
    app.store.insert_voluntary_work(work(1, 5, ActorRef { kind: ActorKind::OrganizationAdmin, id: Uuid::new_v4() }));
    let a = volunteer("a", "Hebron", VOLUNTEER_PERMISSIONS);
    let token = app.add_volunteer(&a);

    let (status, _) = app.call("PUT", "/api/voluntary-works/1/register", Some(&token), None).await;
    settle().await;

    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = app.call("GET", "/api/voluntary-works/1", Some(&token), None).await;
    assert_eq!(body["volunteerNumbers"], 1);
}

struct BrokenAudit;

#[async_trait]
impl AuditStore for BrokenAudit {
    async fn record(&self, _: &AuditEvent) -> Result<(), AppError> {
        Err(AppError::InternalServerError(anyhow::anyhow!("tabela de logs indisponível")))
    }
}

#[tokio::test]
async fn broken_audit_does_not_undo_the_registration() {
    let app = test_app_on(InMemoryStore::new(), Arc::new(BrokenAudit), Arc::new(LogNotifier));
    app.store.insert_voluntary_work(work(1, 5, ActorRef { kind: ActorKind::OrganizationAdmin, id: Uuid::new_v4() }));
    let a = volunteer("a", "Hebron", VOLUNTEER_PERMISSIONS);
    let token = app.add_volunteer(&a);

    let (status, body) = app.call("PUT", "/api/voluntary-works/1/register", Some(&token), None).await;
    settle().await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Registration done successfully!!");
    let (_, body) = app.call("GET", "/api/voluntary-works/1", Some(&token), None).await;
    assert_eq!(body["volunteerNumbers"], 1);
    assert!(app.store.audit_log().is_empty());
}

#[tokio::test]
async fn malformed_body_is_localized_and_audited() {
    let app = test_app();
    app.store.insert_voluntary_work(work(1, 5, ActorRef { kind: ActorKind::OrganizationAdmin, id: Uuid::new_v4() }));
    let a = volunteer("a", "Hebron", VOLUNTEER_PERMISSIONS);
    let token = app.add_volunteer(&a);

    let (status, body) = app.call_raw("PUT", "/api/voluntary-works/1/rating", &token, "{\"rating\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The request body is not valid JSON.");
    assert!(body["details"]["body"].is_string());

    let (status, body) = app.call_raw("PUT", "/api/voluntary-works/1/register", &token, "nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The request body is not valid JSON.");

    let (_, body) = app.call("GET", "/api/voluntary-works/1", Some(&token), None).await;
    assert_eq!(body["volunteerNumbers"], 0);

    settle().await;
    let log = app.store.audit_log();
    assert_eq!(log.len(), 2);
    assert!(log.iter().all(|e| e.outcome == AuditOutcome::Failed));
}
