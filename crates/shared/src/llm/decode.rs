//! Line-oriented decoding of semi-structured model replies.
//!
//! Replies follow a loose `MARKER: value` grammar surrounded by arbitrary
//! prose. Decoding is table-driven: each capability declares a slice of
//! marker rules, and unmatched lines are ignored. Decoding never fails;
//! empty or garbled input yields the capability's default-populated record.

use super::contracts::{
    DietPlan, ExercisePlan, PatientTracking, ProcedureGuide, ProcedureKind, SpecialistReferral,
    VitalsAssessment, WoundAssessment,
};

enum MarkerRule<T> {
    /// Exact case-sensitive marker; strip and trim, last occurrence wins.
    Scalar {
        marker: &'static str,
        assign: fn(&mut T, String),
    },
    /// Exact marker whose remainder is a `;`-separated list.
    List {
        marker: &'static str,
        assign: fn(&mut T, Vec<String>),
    },
    /// Enumerated marker family (`STEP1:`..`STEP4:`, `REMINDER1:`, ...);
    /// appends in order of appearance, not sorted by marker number.
    Append {
        prefix: &'static str,
        push: fn(&mut T, String),
    },
}

fn decode_lines<T>(raw: &str, mut record: T, rules: &[MarkerRule<T>]) -> T {
    for line in raw.lines() {
        for rule in rules {
            match rule {
                MarkerRule::Scalar { marker, assign } => {
                    if let Some(rest) = line.strip_prefix(marker) {
                        assign(&mut record, rest.trim().to_string());
                        break;
                    }
                }
                MarkerRule::List { marker, assign } => {
                    if let Some(rest) = line.strip_prefix(marker) {
                        let items = rest
                            .split(';')
                            .map(|item| item.trim().to_string())
                            .collect();
                        assign(&mut record, items);
                        break;
                    }
                }
                MarkerRule::Append { prefix, push } => {
                    if line.starts_with(prefix) {
                        let value = match line.split_once(':') {
                            Some((_, rest)) => rest.trim().to_string(),
                            None => line.to_string(),
                        };
                        push(&mut record, value);
                        break;
                    }
                }
            }
        }
    }
    record
}

pub fn decode_vitals(raw: &str) -> VitalsAssessment {
    decode_lines(
        raw,
        VitalsAssessment::default(),
        &[
            MarkerRule::Scalar {
                marker: "LEVEL:",
                assign: |record, value| record.level = value,
            },
            MarkerRule::Scalar {
                marker: "REASON:",
                assign: |record, value| record.reason = value,
            },
            MarkerRule::Scalar {
                marker: "ACTION:",
                assign: |record, value| record.action = value,
            },
        ],
    )
}

pub fn decode_referral(raw: &str) -> SpecialistReferral {
    decode_lines(
        raw,
        SpecialistReferral::default(),
        &[
            MarkerRule::Scalar {
                marker: "SPECIALIST:",
                assign: |record, value| record.specialist = value,
            },
            MarkerRule::Scalar {
                marker: "REASON:",
                assign: |record, value| record.reason = value,
            },
        ],
    )
}

pub fn decode_wound(raw: &str) -> WoundAssessment {
    decode_lines(
        raw,
        WoundAssessment::default(),
        &[
            MarkerRule::Scalar {
                marker: "SEVERITY:",
                assign: |record, value| record.severity = value,
            },
            MarkerRule::Scalar {
                marker: "CARE:",
                assign: |record, value| record.care_type = value.to_lowercase(),
            },
            MarkerRule::List {
                marker: "STEPS:",
                assign: |record, value| record.steps = value,
            },
        ],
    )
}

pub fn decode_procedure(kind: ProcedureKind, raw: &str) -> ProcedureGuide {
    decode_lines(
        raw,
        ProcedureGuide::empty(kind),
        &[MarkerRule::Append {
            prefix: "STEP",
            push: |record, value| record.steps.push(value),
        }],
    )
}

pub fn decode_tracking(patient_id: &str, tracked_at: &str, raw: &str) -> PatientTracking {
    decode_lines(
        raw,
        PatientTracking::empty(patient_id, tracked_at),
        &[MarkerRule::Append {
            prefix: "REMINDER",
            push: |record, value| record.reminders.push(value),
        }],
    )
}

pub fn decode_diet(raw: &str) -> DietPlan {
    decode_lines(
        raw,
        DietPlan::default(),
        &[MarkerRule::Append {
            prefix: "DIET",
            push: |record, value| record.recommendations.push(value),
        }],
    )
}

pub fn decode_exercise(raw: &str) -> ExercisePlan {
    decode_lines(
        raw,
        ExercisePlan::default(),
        &[MarkerRule::Append {
            prefix: "ACTIVITY",
            push: |record, value| record.schedule.push(value),
        }],
    )
}
