//! Message content for the reminder and alert notifications. Templates
//! differ only in content; dispatch mechanics are identical for all of
//! them. The critical alert is routed to the designated clinician contact
//! by `NotificationDispatcher::send_critical_alert`, never to the patient.

use chrono::Utc;

/// One logical notification, rendered for both channels.
#[derive(Debug, Clone)]
pub struct ReminderMessage {
    pub sms_text: String,
    pub email_subject: String,
    pub email_body: String,
    pub email_html: Option<String>,
}

pub fn medication_reminder(patient_name: &str, medication: &str) -> ReminderMessage {
    let current_time = Utc::now().format("%I:%M %p").to_string();

    let sms_text = format!(
        "Reminder: {patient_name}, it's time for your medication: {medication}. Time: {current_time}"
    );
    let email_body = format!(
        "Dear {patient_name},\n\n\
         This is a reminder to take your medication:\n\n\
         Medication: {medication}\n\
         Time: {current_time}\n\n\
         Please take your medication as prescribed by your doctor.\n\n\
         Best regards,\nNurse Triage System"
    );
    let email_html = format!(
        "<html><body>\
         <h2>Medication Reminder</h2>\
         <p>Dear {patient_name},</p>\
         <p>This is a reminder to take your medication:</p>\
         <p><strong>Medication:</strong> {medication}<br>\
         <strong>Time:</strong> {current_time}</p>\
         <p>Please take your medication as prescribed by your doctor.</p>\
         <p>Best regards,<br>Nurse Triage System</p>\
         </body></html>"
    );

    ReminderMessage {
        sms_text,
        email_subject: format!("Medication Reminder - {medication}"),
        email_body,
        email_html: Some(email_html),
    }
}

pub fn vitals_check_reminder(patient_name: &str) -> ReminderMessage {
    ReminderMessage {
        sms_text: format!(
            "Reminder: {patient_name}, please check your vitals (BP, HR, Temperature). Report to nurse station."
        ),
        email_subject: "Vitals Check Reminder".to_string(),
        email_body: format!(
            "Dear {patient_name},\n\n\
             This is a reminder to check your vital signs:\n\n\
             - Blood Pressure\n- Heart Rate\n- Temperature\n\n\
             Please report to the nurse station for vitals monitoring.\n\n\
             Best regards,\nNurse Triage System"
        ),
        email_html: None,
    }
}

pub fn diet_reminder(patient_name: &str, diet_item: &str) -> ReminderMessage {
    ReminderMessage {
        sms_text: format!(
            "Diet Reminder: {patient_name}, time for your meal: {diet_item}. Follow your prescribed diet plan."
        ),
        email_subject: "Diet Reminder".to_string(),
        email_body: format!(
            "Dear {patient_name},\n\n\
             Diet Reminder: {diet_item}\n\n\
             Please follow your prescribed diet plan as recommended by your doctor.\n\n\
             Best regards,\nNurse Triage System"
        ),
        email_html: None,
    }
}

pub fn exercise_reminder(patient_name: &str, exercise: &str) -> ReminderMessage {
    ReminderMessage {
        sms_text: format!(
            "Exercise Reminder: {patient_name}, it's time for: {exercise}. Follow your physiotherapy schedule."
        ),
        email_subject: "Exercise/Physiotherapy Reminder".to_string(),
        email_body: format!(
            "Dear {patient_name},\n\n\
             Exercise Reminder: {exercise}\n\n\
             Please follow your prescribed physiotherapy schedule.\n\n\
             Best regards,\nNurse Triage System"
        ),
        email_html: None,
    }
}

/// High-priority alert for the designated clinician. The SMS variant
/// truncates the reasoning to its first 100 characters.
pub fn critical_alert(
    patient_id: &str,
    patient_name: &str,
    emergency_level: &str,
    reasoning: &str,
) -> ReminderMessage {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let short_reasoning: String = reasoning.chars().take(100).collect();

    let sms_text = format!(
        "CRITICAL ALERT: Patient {patient_id} ({patient_name}) - {emergency_level}. \
         {short_reasoning}... Check dashboard immediately."
    );
    let email_body = format!(
        "CRITICAL PATIENT ALERT\n\n\
         Patient ID: {patient_id}\n\
         Patient Name: {patient_name}\n\
         Emergency Level: {emergency_level}\n\n\
         Reasoning: {reasoning}\n\n\
         ACTION REQUIRED: Please check the patient immediately and review the triage dashboard.\n\n\
         Time: {timestamp}\n\n\
         Best regards,\nNurse Triage System"
    );
    let email_html = format!(
        "<html><body>\
         <h2>CRITICAL PATIENT ALERT</h2>\
         <p><strong>Patient ID:</strong> {patient_id}<br>\
         <strong>Patient Name:</strong> {patient_name}<br>\
         <strong>Emergency Level:</strong> {emergency_level}</p>\
         <p><strong>Reasoning:</strong> {reasoning}</p>\
         <p><strong>ACTION REQUIRED:</strong> Please check the patient immediately.</p>\
         <p>Time: {timestamp}</p>\
         </body></html>"
    );

    ReminderMessage {
        sms_text,
        email_subject: format!("CRITICAL ALERT - Patient {patient_id}"),
        email_body,
        email_html: Some(email_html),
    }
}
