use chrono::Utc;
use tracing::warn;

use super::contracts::{
    DietPlan, ExercisePlan, FullAssessment, PatientTracking, ProcedureGuide, ProcedureKind,
    SpecialistReferral, Vitals, VitalsAssessment, WoundAssessment,
};
use super::decode;
use super::gateway::GenerationGateway;
use super::governor::{InvokeError, RateGovernedInvoker};
use super::prompts;

/// One method per clinical capability. Every method returns a fully
/// populated record: when the governed call ultimately fails, the
/// capability's fixed fallback record is substituted and the failure is
/// visible only through its sentinel values, never as an error.
pub struct NurseAssistant<G> {
    invoker: RateGovernedInvoker<G>,
}

impl<G> NurseAssistant<G>
where
    G: GenerationGateway,
{
    pub fn new(invoker: RateGovernedInvoker<G>) -> Self {
        Self { invoker }
    }

    pub async fn analyze_vitals(&self, vitals: &Vitals) -> VitalsAssessment {
        match self.invoker.invoke(&prompts::vitals_prompt(vitals)).await {
            Ok(raw) => decode::decode_vitals(&raw),
            Err(err) => {
                log_fallback("vitals_triage", &err);
                VitalsAssessment::fallback()
            }
        }
    }

    pub async fn recommend_specialist(
        &self,
        diagnosis: &str,
        vitals: &Vitals,
    ) -> SpecialistReferral {
        match self
            .invoker
            .invoke(&prompts::referral_prompt(diagnosis, vitals))
            .await
        {
            Ok(raw) => decode::decode_referral(&raw),
            Err(err) => {
                log_fallback("specialist_referral", &err);
                SpecialistReferral::fallback()
            }
        }
    }

    pub async fn assess_wound(&self, wound_description: &str) -> WoundAssessment {
        match self
            .invoker
            .invoke(&prompts::wound_prompt(wound_description))
            .await
        {
            Ok(raw) => decode::decode_wound(&raw),
            Err(err) => {
                log_fallback("wound_assessment", &err);
                WoundAssessment::fallback()
            }
        }
    }

    pub async fn guide_procedure(&self, kind: ProcedureKind) -> ProcedureGuide {
        match self.invoker.invoke(&prompts::procedure_prompt(kind)).await {
            Ok(raw) => decode::decode_procedure(kind, &raw),
            Err(err) => {
                log_fallback("procedure_guidance", &err);
                ProcedureGuide::fallback(kind)
            }
        }
    }

    pub async fn track_patient(
        &self,
        patient_id: &str,
        vitals: &Vitals,
        medications: &[String],
    ) -> PatientTracking {
        let tracked_at = Utc::now().format("%H:%M").to_string();
        match self
            .invoker
            .invoke(&prompts::tracking_prompt(
                patient_id,
                &tracked_at,
                vitals,
                medications,
            ))
            .await
        {
            Ok(raw) => decode::decode_tracking(patient_id, &tracked_at, &raw),
            Err(err) => {
                log_fallback("patient_tracking", &err);
                PatientTracking::fallback(patient_id, &tracked_at)
            }
        }
    }

    pub async fn generate_diet_plan(&self, diagnosis: &str, allergies: &[String]) -> DietPlan {
        match self
            .invoker
            .invoke(&prompts::diet_prompt(diagnosis, allergies))
            .await
        {
            Ok(raw) => decode::decode_diet(&raw),
            Err(err) => {
                log_fallback("diet_plan", &err);
                DietPlan::fallback()
            }
        }
    }

    pub async fn create_exercise_plan(&self, diagnosis: &str, age: u32) -> ExercisePlan {
        match self
            .invoker
            .invoke(&prompts::exercise_prompt(diagnosis, age))
            .await
        {
            Ok(raw) => decode::decode_exercise(&raw),
            Err(err) => {
                log_fallback("exercise_plan", &err);
                ExercisePlan::fallback()
            }
        }
    }

    /// Sequential triage, referral and tracking for one patient. Each
    /// sub-call already degrades to its own fallback, so a failing section
    /// never aborts the remaining ones.
    pub async fn full_assessment(
        &self,
        patient_id: &str,
        diagnosis: &str,
        vitals: &Vitals,
        medications: &[String],
    ) -> FullAssessment {
        let vitals_assessment = self.analyze_vitals(vitals).await;
        let referral = self.recommend_specialist(diagnosis, vitals).await;
        let tracking = self.track_patient(patient_id, vitals, medications).await;

        FullAssessment {
            patient_id: patient_id.to_string(),
            vitals_assessment,
            referral,
            tracking,
            generated_at: Utc::now(),
        }
    }
}

fn log_fallback(capability: &str, err: &InvokeError) {
    warn!(
        capability,
        error = %err,
        "generation call failed; substituting fallback record"
    );
}
