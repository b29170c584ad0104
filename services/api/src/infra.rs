use careerpath::assessment::{
    AssessmentCatalog, AssessmentCompleted, AssessmentService, CompletionNotifier,
    InMemoryAttemptRepository, NotifyError,
};
use careerpath::config::ScoringConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type AttemptService = AssessmentService<InMemoryAttemptRepository, CompletionLog>;

/// Keeps completion events in memory and logs them; report generation picks them up from here.
#[derive(Default, Clone)]
pub(crate) struct CompletionLog {
    events: Arc<Mutex<Vec<AssessmentCompleted>>>,
}

impl CompletionNotifier for CompletionLog {
    fn notify(&self, event: AssessmentCompleted) -> Result<(), NotifyError> {
        tracing::info!(
            attempt_id = %event.attempt_id.0,
            student_id = %event.student_id,
            assessment_id = %event.assessment_id,
            holland_code = event.holland_code.as_deref().unwrap_or("-"),
            "assessment completion recorded"
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotifyError::Transport("completion log poisoned".to_string()))?;
        guard.push(event);
        Ok(())
    }
}

impl CompletionLog {
    pub(crate) fn events(&self) -> Vec<AssessmentCompleted> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

pub(crate) fn build_service(
    scoring: &ScoringConfig,
) -> (AttemptService, Arc<InMemoryAttemptRepository>, Arc<CompletionLog>) {
    let repository = Arc::new(InMemoryAttemptRepository::default());
    let notifier = Arc::new(CompletionLog::default());
    let service = AssessmentService::new(
        Arc::new(AssessmentCatalog::standard()),
        repository.clone(),
        notifier.clone(),
        scoring,
    );
    (service, repository, notifier)
}
