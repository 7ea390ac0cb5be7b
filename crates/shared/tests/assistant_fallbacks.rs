use std::collections::VecDeque;
use std::sync::Arc;

use shared::llm::NurseAssistant;
use shared::llm::contracts::{ProcedureKind, Vitals};
use shared::llm::gateway::{GenerationError, GenerationFuture, GenerationGateway};
use shared::llm::governor::{GovernorConfig, RateGovernedInvoker};
use tokio::sync::Mutex;

#[derive(Clone)]
struct StubGateway {
    responses: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
}

impl StubGateway {
    fn with_responses(responses: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
        }
    }

    fn always_failing() -> Self {
        Self::with_responses(Vec::new())
    }
}

impl GenerationGateway for StubGateway {
    fn generate<'a>(&'a self, _prompt: String) -> GenerationFuture<'a> {
        Box::pin(async move {
            self.responses
                .lock()
                .await
                .pop_front()
                .unwrap_or(Err(GenerationError::ProviderFailure(
                    "status=500".to_string(),
                )))
        })
    }
}

fn assistant(gateway: StubGateway) -> NurseAssistant<StubGateway> {
    let config = GovernorConfig {
        min_spacing_seconds: 0,
        max_attempts: 3,
        backoff_multiplier_seconds: 60,
    };
    NurseAssistant::new(RateGovernedInvoker::new(gateway, config).expect("invoker should build"))
}

fn sample_vitals() -> Vitals {
    Vitals {
        heart_rate: 118,
        blood_pressure: "90/60".to_string(),
        temperature_f: 101.5,
    }
}

#[tokio::test]
async fn successful_replies_decode_into_typed_records() {
    let gateway = StubGateway::with_responses(vec![Ok(
        "LEVEL: CRITICAL\nREASON: low BP\nACTION: call doctor".to_string(),
    )]);
    let assistant = assistant(gateway);

    let assessment = assistant.analyze_vitals(&sample_vitals()).await;
    assert_eq!(assessment.level, "CRITICAL");
    assert_eq!(assessment.reason, "low BP");
    assert_eq!(assessment.action, "call doctor");
}

#[tokio::test]
async fn every_capability_returns_a_populated_record_when_all_calls_fail() {
    let assistant = assistant(StubGateway::always_failing());
    let vitals = sample_vitals();

    let assessment = assistant.analyze_vitals(&vitals).await;
    assert_eq!(assessment.level, "UNKNOWN");
    assert_eq!(assessment.reason, "API call failed");
    assert_eq!(assessment.action, "Manual assessment required");

    let referral = assistant.recommend_specialist("Post-MI", &vitals).await;
    assert_eq!(referral.specialist, "General Physician");
    assert!(!referral.reason.is_empty());

    let wound = assistant.assess_wound("deep laceration").await;
    assert_eq!(wound.severity, "MODERATE");
    assert_eq!(wound.care_type, "dressing");
    assert!(!wound.steps.is_empty());

    let guide = assistant.guide_procedure(ProcedureKind::Iv).await;
    assert_eq!(guide.procedure, "IV");
    assert_eq!(guide.steps.len(), 4);

    let tracking = assistant
        .track_patient("P405", &vitals, &["Aspirin".to_string()])
        .await;
    assert_eq!(tracking.patient_id, "P405");
    assert!(!tracking.tracked_at.is_empty());
    assert!(!tracking.reminders.is_empty());

    let diet = assistant.generate_diet_plan("Diabetes", &[]).await;
    assert!(!diet.recommendations.is_empty());

    let exercise = assistant.create_exercise_plan("Post-MI", 64).await;
    assert!(!exercise.schedule.is_empty());
}

#[tokio::test]
async fn full_assessment_survives_partial_failure() {
    // Triage succeeds, referral fails, tracking succeeds.
    let gateway = StubGateway::with_responses(vec![
        Ok("LEVEL: CRITICAL\nREASON: low BP\nACTION: call doctor".to_string()),
        Err(GenerationError::ProviderFailure("status=503".to_string())),
        Ok("REMINDER1: check BP\nREMINDER2: take beta-blocker".to_string()),
    ]);
    let assistant = assistant(gateway);

    let full = assistant
        .full_assessment("P405", "Post-MI", &sample_vitals(), &["Aspirin".to_string()])
        .await;

    assert_eq!(full.patient_id, "P405");
    assert_eq!(full.vitals_assessment.level, "CRITICAL");
    assert_eq!(full.referral.specialist, "General Physician");
    assert_eq!(full.referral.reason, "Default recommendation");
    assert_eq!(
        full.tracking.reminders,
        vec!["check BP", "take beta-blocker"]
    );
}
