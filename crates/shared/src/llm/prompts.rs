//! Prompt templates for each clinical capability. Templates are fixed
//! strings interpolating only the supplied fields, and pin the `MARKER:`
//! reply format the decoder expects.

use super::contracts::{ProcedureKind, Vitals};

pub fn vitals_prompt(vitals: &Vitals) -> String {
    format!(
        "You are an expert nurse. Analyze these patient vitals:\n\n\
         Heart Rate: {} bpm\n\
         Blood Pressure: {} mmHg\n\
         Temperature: {}°F\n\n\
         Provide:\n\
         1. Emergency Level (CRITICAL, MODERATE, STABLE)\n\
         2. Brief reasoning (2 sentences max)\n\
         3. Immediate action needed (if any)\n\n\
         Respond in this exact format:\n\
         LEVEL: [emergency level]\n\
         REASON: [your reasoning]\n\
         ACTION: [recommended action]",
        vitals.heart_rate, vitals.blood_pressure, vitals.temperature_f
    )
}

pub fn referral_prompt(diagnosis: &str, vitals: &Vitals) -> String {
    format!(
        "Patient diagnosis: {diagnosis}\n\
         Current vitals: HR {}, BP {}, Temp {}°F\n\n\
         Recommend the most appropriate specialist doctor and explain why in 1 sentence.\n\n\
         Format:\n\
         SPECIALIST: [doctor type]\n\
         REASON: [why this specialist]",
        vitals.heart_rate, vitals.blood_pressure, vitals.temperature_f
    )
}

pub fn wound_prompt(wound_description: &str) -> String {
    format!(
        "Wound description: {wound_description}\n\n\
         As a nurse, provide:\n\
         1. Wound severity (MINOR, MODERATE, SEVERE)\n\
         2. Required care (dressing/stitching)\n\
         3. Simple care steps (3 steps max)\n\n\
         Format:\n\
         SEVERITY: [level]\n\
         CARE: [dressing or stitching]\n\
         STEPS: [step 1; step 2; step 3]"
    )
}

pub fn procedure_prompt(kind: ProcedureKind) -> String {
    format!(
        "Provide simple {} procedure guidance for a nurse.\n\n\
         Give 4 key steps in this format:\n\
         STEP1: [step]\n\
         STEP2: [step]\n\
         STEP3: [step]\n\
         STEP4: [step]",
        kind.label()
    )
}

pub fn tracking_prompt(
    patient_id: &str,
    tracked_at: &str,
    vitals: &Vitals,
    medications: &[String],
) -> String {
    format!(
        "Patient {patient_id} tracking at {tracked_at}:\n\
         Vitals: HR {}, BP {}, Temp {}°F\n\
         Medications: {}\n\n\
         Generate 2 important reminders for this patient (short, clear).\n\n\
         Format:\n\
         REMINDER1: [text]\n\
         REMINDER2: [text]",
        vitals.heart_rate,
        vitals.blood_pressure,
        vitals.temperature_f,
        medications.join(", ")
    )
}

pub fn diet_prompt(diagnosis: &str, allergies: &[String]) -> String {
    let allergies_text = if allergies.is_empty() {
        "None".to_string()
    } else {
        allergies.join(", ")
    };

    format!(
        "Diagnosis: {diagnosis}\n\
         Allergies: {allergies_text}\n\n\
         Suggest 3 dietary recommendations for this patient (brief, clear).\n\n\
         Format:\n\
         DIET1: [recommendation]\n\
         DIET2: [recommendation]\n\
         DIET3: [recommendation]"
    )
}

pub fn exercise_prompt(diagnosis: &str, age: u32) -> String {
    format!(
        "Patient: {age} years old with {diagnosis}\n\n\
         Create a simple daily exercise/physiotherapy schedule (3 activities, max 2 lines each).\n\n\
         Format:\n\
         ACTIVITY1: [time] - [activity description]\n\
         ACTIVITY2: [time] - [activity description]\n\
         ACTIVITY3: [time] - [activity description]"
    )
}
