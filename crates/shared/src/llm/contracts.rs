use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vital signs supplied by the caller. Blood pressure stays a display
/// string (`"120/80"`), as charted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    pub heart_rate: u32,
    pub blood_pressure: String,
    pub temperature_f: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcedureKind {
    Iv,
    Injection,
    Drip,
}

impl ProcedureKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Iv => "IV",
            Self::Injection => "Injection",
            Self::Drip => "Drip",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsAssessment {
    pub level: String,
    pub reason: String,
    pub action: String,
}

impl Default for VitalsAssessment {
    fn default() -> Self {
        Self {
            level: "UNKNOWN".to_string(),
            reason: String::new(),
            action: String::new(),
        }
    }
}

impl VitalsAssessment {
    pub fn fallback() -> Self {
        Self {
            level: "UNKNOWN".to_string(),
            reason: "API call failed".to_string(),
            action: "Manual assessment required".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistReferral {
    pub specialist: String,
    pub reason: String,
}

impl Default for SpecialistReferral {
    fn default() -> Self {
        Self {
            specialist: "General Physician".to_string(),
            reason: String::new(),
        }
    }
}

impl SpecialistReferral {
    pub fn fallback() -> Self {
        Self {
            specialist: "General Physician".to_string(),
            reason: "Default recommendation".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WoundAssessment {
    pub severity: String,
    pub care_type: String,
    pub steps: Vec<String>,
}

impl Default for WoundAssessment {
    fn default() -> Self {
        Self {
            severity: "MODERATE".to_string(),
            care_type: "dressing".to_string(),
            steps: Vec::new(),
        }
    }
}

impl WoundAssessment {
    pub fn fallback() -> Self {
        Self {
            severity: "MODERATE".to_string(),
            care_type: "dressing".to_string(),
            steps: vec![
                "Clean wound".to_string(),
                "Apply sterile dressing".to_string(),
                "Monitor for infection".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureGuide {
    pub procedure: String,
    pub steps: Vec<String>,
}

impl ProcedureGuide {
    pub fn empty(kind: ProcedureKind) -> Self {
        Self {
            procedure: kind.label().to_string(),
            steps: Vec::new(),
        }
    }

    pub fn fallback(kind: ProcedureKind) -> Self {
        Self {
            procedure: kind.label().to_string(),
            steps: vec![
                "Prepare equipment".to_string(),
                "Follow sterile technique".to_string(),
                "Administer as prescribed".to_string(),
                "Monitor patient".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientTracking {
    pub patient_id: String,
    pub tracked_at: String,
    pub reminders: Vec<String>,
}

impl PatientTracking {
    pub fn empty(patient_id: &str, tracked_at: &str) -> Self {
        Self {
            patient_id: patient_id.to_string(),
            tracked_at: tracked_at.to_string(),
            reminders: Vec::new(),
        }
    }

    pub fn fallback(patient_id: &str, tracked_at: &str) -> Self {
        Self {
            patient_id: patient_id.to_string(),
            tracked_at: tracked_at.to_string(),
            reminders: vec![
                "Monitor vitals regularly".to_string(),
                "Administer medications on schedule".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DietPlan {
    pub recommendations: Vec<String>,
}

impl DietPlan {
    pub fn fallback() -> Self {
        Self {
            recommendations: vec![
                "Balanced nutrition".to_string(),
                "Adequate hydration".to_string(),
                "Follow doctor's dietary advice".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExercisePlan {
    pub schedule: Vec<String>,
}

impl ExercisePlan {
    pub fn fallback() -> Self {
        Self {
            schedule: vec![
                "Morning: Gentle breathing exercises".to_string(),
                "Afternoon: Short walk with assistance".to_string(),
                "Evening: Range of motion exercises".to_string(),
            ],
        }
    }
}

/// Triage, referral and tracking for one patient in a single pass. Each
/// section degrades to its own fallback independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullAssessment {
    pub patient_id: String,
    pub vitals_assessment: VitalsAssessment,
    pub referral: SpecialistReferral,
    pub tracking: PatientTracking,
    pub generated_at: DateTime<Utc>,
}
