pub mod assistant;
pub mod contracts;
pub mod decode;
pub mod gateway;
pub mod gemini;
pub mod governor;
pub mod prompts;

pub use assistant::NurseAssistant;
pub use contracts::{
    DietPlan, ExercisePlan, FullAssessment, PatientTracking, ProcedureGuide, ProcedureKind,
    SpecialistReferral, Vitals, VitalsAssessment, WoundAssessment,
};
pub use gateway::{GenerationError, GenerationFuture, GenerationGateway};
pub use gemini::{GeminiGateway, GeminiGatewayConfig};
pub use governor::{GovernorConfig, InvokeError, RateGovernedInvoker};
