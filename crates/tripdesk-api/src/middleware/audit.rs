//! Security audit logging
//!
//! Structured audit entries for security-relevant back office events:
//! - Rejected sessions
//! - Signed-in users without an admin profile
//! - Media deletions (successful or not)
//!
//! Entries are emitted as JSON on the `audit` target.

use serde::Serialize;
use std::collections::BTreeMap;
use tripdesk_core::RemovalReport;
use uuid::Uuid;

/// Audit event types for categorization
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    AuthenticationFailure,
    /// Valid session, but the user is not an administrator
    AccessDenied,
    MediaDeleted,
    MediaDeleteFailed,
}

/// Structured audit log entry
#[derive(Debug, Serialize)]
pub struct AuditLogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub event_type: AuditEventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AuditLogEntry {
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            event_type,
            user_id: None,
            client_ip: None,
            request_path: None,
            details: None,
            success: true,
            error_message: None,
        }
    }

    pub fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_client_ip_opt(mut self, client_ip: Option<String>) -> Self {
        if let Some(ip) = client_ip {
            self.client_ip = Some(ip);
        }
        self
    }

    pub fn with_request_path(mut self, path: impl Into<String>) -> Self {
        self.request_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Mark as failure
    pub fn with_failure(mut self, error_message: impl Into<String>) -> Self {
        self.success = false;
        self.error_message = Some(error_message.into());
        self
    }

    /// Log the audit entry
    pub fn log(&self) {
        let json = serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string());

        if self.success {
            tracing::event!(
                target: "audit",
                tracing::Level::INFO,
                audit_entry = %json,
                event_type = ?self.event_type,
                user_id = ?self.user_id,
                success = self.success,
                "Security audit log"
            );
        } else {
            tracing::event!(
                target: "audit",
                tracing::Level::WARN,
                audit_entry = %json,
                event_type = ?self.event_type,
                user_id = ?self.user_id,
                success = self.success,
                error = ?self.error_message,
                "Security audit log - failure"
            );
        }
    }
}

pub fn log_authentication_failure(client_ip: Option<String>, reason: &str) {
    AuditLogEntry::new(AuditEventType::AuthenticationFailure)
        .with_client_ip_opt(client_ip)
        .with_failure(reason)
        .log();
}

pub fn log_access_denied(user_id: Uuid, client_ip: Option<String>, path: &str) {
    AuditLogEntry::new(AuditEventType::AccessDenied)
        .with_user_id(user_id)
        .with_client_ip_opt(client_ip)
        .with_request_path(path)
        .with_failure("No admin profile")
        .log();
}

fn removal_details(media_id: &str, report: &RemovalReport) -> serde_json::Value {
    let removed: BTreeMap<&str, u64> = report.removed();
    serde_json::json!({
        "media_id": media_id,
        "removed": removed,
        "cleanup_errors": report.failures(),
    })
}

pub fn log_media_deleted(
    user_id: Option<Uuid>,
    media_id: &str,
    client_ip: Option<String>,
    report: &RemovalReport,
) {
    let mut entry = AuditLogEntry::new(AuditEventType::MediaDeleted)
        .with_client_ip_opt(client_ip)
        .with_details(removal_details(media_id, report));
    if let Some(id) = user_id {
        entry = entry.with_user_id(id);
    }
    entry.log();
}

pub fn log_media_delete_failed(
    user_id: Option<Uuid>,
    media_id: &str,
    client_ip: Option<String>,
    error: &str,
) {
    let mut entry = AuditLogEntry::new(AuditEventType::MediaDeleteFailed)
        .with_client_ip_opt(client_ip)
        .with_details(serde_json::json!({ "media_id": media_id }))
        .with_failure(error);
    if let Some(id) = user_id {
        entry = entry.with_user_id(id);
    }
    entry.log();
}
