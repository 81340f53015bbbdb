use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hiu_gateway::{FindPatientRequest, GatewayClient, GatewayError, OutboundMessage};
use hiu_server::{AppConfig, AppState, build_app};
use hiu_storage::{ConsentRepository, ConsentRequest, ConsentStatus, InMemoryConsentRepository};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// Gateway stand-in that answers find requests by calling the server back over HTTP.
///
/// `alice@*` is found, `ghost@*` is unknown to the consent manager, anything
/// else never gets an answer.
struct LoopbackGateway {
    hiu_base: String,
    http: reqwest::Client,
    sent: Mutex<Vec<(OutboundMessage, String)>>,
}

impl LoopbackGateway {
    fn reply_for(request: &FindPatientRequest) -> Option<Value> {
        let id = request.query.patient.id.as_str();
        let envelope = json!({
            "requestId": uuid::Uuid::new_v4(),
            "timestamp": "2020-06-01T12:00:00.000",
            "resp": { "requestId": request.request_id },
        });
        let mut body = envelope;
        if id.starts_with("alice@") {
            body["patient"] = json!({ "id": id, "name": "Alice" });
        } else if id.starts_with("ghost@") {
            body["error"] = json!({ "code": 1000, "message": "Patient not found" });
        } else {
            return None;
        }
        Some(body)
    }

    fn sent(&self) -> Vec<(OutboundMessage, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl GatewayClient for LoopbackGateway {
    async fn send(
        &self,
        message: OutboundMessage,
        routing_suffix: &str,
    ) -> Result<(), GatewayError> {
        self.sent
            .lock()
            .unwrap()
            .push((message.clone(), routing_suffix.to_string()));

        if let OutboundMessage::FindPatient(request) = &message
            && let Some(body) = Self::reply_for(request)
        {
            let http = self.http.clone();
            let url = format!("{}/v0.5/patients/on-find", self.hiu_base);
            tokio::spawn(async move {
                let _ = http.post(url).json(&body).send().await;
            });
        }
        Ok(())
    }
}

struct TestServer {
    base: String,
    gateway: Arc<LoopbackGateway>,
    repository: Arc<InMemoryConsentRepository>,
    shutdown: tokio::sync::oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.handle.await;
    }
}

async fn start_server(request_timeout_ms: u64) -> TestServer {
    let mut cfg = AppConfig::default();
    cfg.gateway.request_timeout_ms = request_timeout_ms;

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let base = format!("http://{addr}");

    let gateway = Arc::new(LoopbackGateway {
        hiu_base: base.clone(),
        http: reqwest::Client::new(),
        sent: Mutex::new(Vec::new()),
    });
    let repository = Arc::new(InMemoryConsentRepository::new());
    let state = AppState::new(&cfg, gateway.clone(), repository.clone());
    let app = build_app(&cfg, state);

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    TestServer {
        base,
        gateway,
        repository,
        shutdown: tx,
        handle,
    }
}

#[tokio::test]
async fn healthz_reports_ok() {
    let server = start_server(2000).await;

    let resp = reqwest::get(format!("{}/healthz", server.base)).await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    server.stop().await;
}

#[tokio::test]
async fn patient_lookup_resolves_through_callback() {
    let server = start_server(2000).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let resp = client
            .get(format!("{}/v1/patients/alice@sbx", server.base))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["patient"]["identifier"], "alice@sbx");
        assert_eq!(body["patient"]["name"], "Alice");
    }

    // The second lookup is served from the result cache.
    let sent = server.gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, "sbx");

    server.stop().await;
}

#[tokio::test]
async fn patient_lookup_maps_gateway_failures() {
    let server = start_server(300).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/v1/patients/ghost@sbx", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "patient-not-found");

    let resp = client
        .get(format!("{}/v1/patients/silent@sbx", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 504);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "gateway-timeout");

    let resp = client
        .get(format!("{}/v1/patients/nosuffix", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    server.stop().await;
}

#[tokio::test]
async fn consent_notification_updates_stored_request() {
    let server = start_server(2000).await;
    let client = reqwest::Client::new();
    server
        .repository
        .save(&ConsentRequest::new("CR-1", "alice@sbx"))
        .await
        .unwrap();

    let notify = |consent_request_id: &str| {
        json!({
            "requestId": uuid::Uuid::new_v4(),
            "timestamp": "2020-06-01T12:00:00.000",
            "notification": { "consentRequestId": consent_request_id, "status": "DENIED" }
        })
    };

    for _ in 0..2 {
        let resp = client
            .post(format!("{}/v0.5/consents/hiu/notify", server.base))
            .json(&notify("CR-1"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 202);
    }
    let stored = server.repository.find_by_id("CR-1").await.unwrap().unwrap();
    assert_eq!(stored.status, ConsentStatus::Denied);

    let resp = client
        .post(format!("{}/v0.5/consents/hiu/notify", server.base))
        .json(&notify("CR-X"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert!(server.repository.find_by_id("CR-X").await.unwrap().is_none());

    server.stop().await;
}

#[tokio::test]
async fn deleted_patient_notification_purges_and_acknowledges() {
    let server = start_server(2000).await;
    let client = reqwest::Client::new();
    for (id, patient) in [("CR-1", "alice@sbx"), ("CR-2", "bob@sbx")] {
        server
            .repository
            .save(&ConsentRequest::new(id, patient))
            .await
            .unwrap();
    }

    let request_id = uuid::Uuid::new_v4();
    let resp = client
        .post(format!("{}/v0.5/patients/status/notify", server.base))
        .json(&json!({
            "requestId": request_id,
            "timestamp": "2020-06-01T12:00:00",
            "notification": { "status": "DELETED", "patient": { "id": "alice@sbx" } }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 202);

    assert!(server.repository.find_by_id("CR-1").await.unwrap().is_none());
    assert!(server.repository.find_by_id("CR-2").await.unwrap().is_some());

    let sent = server.gateway.sent();
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        (OutboundMessage::PatientStatusOnNotify(ack), suffix) => {
            assert_eq!(suffix, "sbx");
            assert_eq!(ack.resp.request_id, request_id);
        }
        other => panic!("expected acknowledgement, got {other:?}"),
    }

    server.stop().await;
}
