use std::sync::Arc;
use std::time::Duration;

use hiu_cache::{CacheAdapter, ObservableCache};
use hiu_core::routing_suffix;
use hiu_gateway::{
    CallbackHandler, Correlator, FindPatientRequest, GatewayClient, GatewayPatient,
    OutboundMessage, Patient, PatientSearchReply, RemoteErrorKind, Requester, RoutedMessage,
};

use crate::error::ConsentError;

/// Settings of the patient lookup.
#[derive(Debug, Clone)]
pub struct PatientLookupSettings {
    /// Requester id sent with every find request.
    pub hiu_id: String,
    /// Upper bound on one find exchange.
    pub timeout: Duration,
}

/// Patient discovery through the gateway.
pub struct PatientService {
    correlator: Correlator<GatewayPatient>,
    callbacks: CallbackHandler<GatewayPatient>,
    settings: PatientLookupSettings,
}

impl PatientService {
    pub fn new(
        gateway: Arc<dyn GatewayClient>,
        results: Arc<dyn CacheAdapter<Patient>>,
        replies: Arc<dyn ObservableCache<PatientSearchReply>>,
        settings: PatientLookupSettings,
    ) -> Self {
        Self {
            correlator: Correlator::new(gateway, results.clone(), replies.clone()),
            callbacks: CallbackHandler::new(results, replies),
            settings,
        }
    }

    /// Looks up the patient with health id `id`.
    ///
    /// A cached patient is returned whatever the shape of `id`; the consent
    /// manager suffix is only required when the request has to go out.
    pub async fn find_patient_with(&self, id: &str) -> Result<Patient, ConsentError> {
        let hiu_id = self.settings.hiu_id.as_str();
        self.correlator
            .request_and_await(
                id,
                move |correlation_id| -> Result<RoutedMessage, ConsentError> {
                    let suffix =
                        routing_suffix(id).map_err(|_| ConsentError::invalid_health_id(id))?;
                    let request =
                        FindPatientRequest::new(correlation_id, id, Requester::hiu(hiu_id));
                    Ok(RoutedMessage::new(
                        OutboundMessage::FindPatient(request),
                        suffix,
                    ))
                },
                self.settings.timeout,
            )
            .await
    }

    /// Like [`find_patient_with`](Self::find_patient_with), but a patient the
    /// consent manager does not know is `None` rather than an error.
    pub async fn try_find(&self, id: &str) -> Result<Option<Patient>, ConsentError> {
        match self.find_patient_with(id).await {
            Ok(patient) => Ok(Some(patient)),
            Err(ConsentError::Gateway(error))
                if error.is_remote(RemoteErrorKind::PatientNotFound) =>
            {
                tracing::error!(
                    health_id = id,
                    %error,
                    "consent request created for unknown user"
                );
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Inbound reply to a find request.
    pub async fn on_find_patient(&self, reply: PatientSearchReply) {
        self.callbacks.on_reply(reply).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hiu_cache::LocalCache;
    use hiu_gateway::{GatewayError, GatewayReply, RespError};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    struct ForwardingGateway {
        sent: AtomicUsize,
        outbound: mpsc::UnboundedSender<FindPatientRequest>,
        suffixes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl GatewayClient for ForwardingGateway {
        async fn send(&self, message: OutboundMessage, suffix: &str) -> Result<(), GatewayError> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            self.suffixes.lock().unwrap().push(suffix.to_string());
            if let OutboundMessage::FindPatient(request) = message {
                let _ = self.outbound.send(request);
            }
            Ok(())
        }
    }

    /// Service wired to a remote party that answers with `respond`.
    fn service_with<F>(
        respond: F,
    ) -> (Arc<PatientService>, Arc<ForwardingGateway>, Arc<LocalCache<Patient>>)
    where
        F: Fn(&FindPatientRequest) -> Option<PatientSearchReply> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let gateway = Arc::new(ForwardingGateway {
            sent: AtomicUsize::new(0),
            outbound: tx,
            suffixes: Mutex::new(Vec::new()),
        });
        let results: Arc<LocalCache<Patient>> =
            Arc::new(LocalCache::new("result", Duration::from_secs(300)));
        let replies: Arc<LocalCache<PatientSearchReply>> =
            Arc::new(LocalCache::new("correlation", Duration::from_secs(300)));
        let service = Arc::new(PatientService::new(
            gateway.clone(),
            results.clone(),
            replies,
            PatientLookupSettings {
                hiu_id: "hiu-1".into(),
                timeout: Duration::from_millis(2000),
            },
        ));

        let remote = Arc::clone(&service);
        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                if let Some(reply) = respond(&request) {
                    remote.on_find_patient(reply).await;
                }
            }
        });
        (service, gateway, results)
    }

    fn found(request: &FindPatientRequest) -> Option<PatientSearchReply> {
        Some(GatewayReply::success(
            request.request_id,
            GatewayPatient {
                id: request.query.patient.id.clone(),
                name: "Alice".into(),
            },
        ))
    }

    fn not_found(request: &FindPatientRequest) -> Option<PatientSearchReply> {
        Some(GatewayReply::failure(
            request.request_id,
            RespError {
                code: 1000,
                message: "Patient not found".into(),
            },
        ))
    }

    #[tokio::test]
    async fn test_find_patient_routes_by_suffix() {
        let (service, gateway, _) = service_with(found);

        let patient = service.find_patient_with("alice@sbx").await.unwrap();

        assert_eq!(patient.identifier, "alice@sbx");
        assert_eq!(patient.name, "Alice");
        assert_eq!(*gateway.suffixes.lock().unwrap(), vec!["sbx".to_string()]);
    }

    #[tokio::test]
    async fn test_repeated_lookup_served_from_cache() {
        let (service, gateway, _) = service_with(found);

        service.find_patient_with("alice@sbx").await.unwrap();
        service.find_patient_with("alice@sbx").await.unwrap();

        assert_eq!(gateway.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_try_find_downgrades_patient_not_found() {
        let (service, _, _) = service_with(not_found);

        assert_eq!(service.try_find("ghost@sbx").await.unwrap(), None);

        let err = service.find_patient_with("ghost@sbx").await.unwrap_err();
        assert!(
            err.as_gateway()
                .is_some_and(|e| e.is_remote(RemoteErrorKind::PatientNotFound))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_try_find_propagates_timeout() {
        let (service, _, _) = service_with(|_| None);

        let err = service.try_find("alice@sbx").await.unwrap_err();

        assert!(err.as_gateway().is_some_and(GatewayError::is_timeout));
    }

    #[tokio::test]
    async fn test_health_id_without_suffix_is_rejected() {
        let (service, gateway, _) = service_with(found);

        let err = service.find_patient_with("alice").await.unwrap_err();

        assert!(matches!(err, ConsentError::InvalidHealthId(_)));
        assert_eq!(gateway.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cached_patient_is_served_without_suffix() {
        let (service, gateway, results) = service_with(found);
        let cached = Patient {
            identifier: "P1".into(),
            name: "Cached".into(),
        };
        results.put("P1", cached.clone()).await;

        let patient = service.find_patient_with("P1").await.unwrap();

        assert_eq!(patient, cached);
        assert_eq!(gateway.sent.load(Ordering::SeqCst), 0);
    }
}
