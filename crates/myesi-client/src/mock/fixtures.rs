//! Demo notification records, timestamped relative to the moment they are
//! generated.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde_json::{Map, Value, json};

use myesi_entity::notification::{Notification, NotificationId, Severity};

const VULNERABILITIES_URL: &str = "/admin/dashboard#vulnerabilities";
const BILLING_URL: &str = "/admin/billing";

/// The seven demo notifications, newest first.
pub fn demo_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    let mut records = vec![
        cve(
            1,
            "cve_critical",
            Severity::Critical,
            "Critical CVE Detected",
            "CVE-2024-1234: Remote Code Execution vulnerability found in OpenSSL 3.0.1",
            ("CVE-2024-1234", 9.8, "OpenSSL 3.0.1"),
            now - Duration::minutes(15),
            false,
        ),
        cve(
            2,
            "cve_critical",
            Severity::Critical,
            "Critical Vulnerability Alert",
            "CVE-2024-5678: SQL Injection vulnerability in PostgreSQL 14.2",
            ("CVE-2024-5678", 9.2, "PostgreSQL 14.2"),
            now - Duration::hours(2),
            false,
        ),
        cve(
            3,
            "cve_high",
            Severity::High,
            "High Severity CVE",
            "CVE-2024-9012: Cross-Site Scripting in React 18.2.0",
            ("CVE-2024-9012", 7.5, "React 18.2.0"),
            now - Duration::hours(5),
            true,
        ),
        billing(
            4,
            "payment_failed",
            Severity::Critical,
            "Payment Failed",
            "Your payment of $199.00 for Professional Plan failed. Please update your payment method.",
            details(json!({ "amount": 19900, "planName": "Professional Plan" })),
            now - Duration::minutes(30),
            false,
        ),
        billing(
            5,
            "payment_success",
            Severity::Info,
            "Payment Successful",
            "Your payment of $99.00 for Enterprise Plan has been processed successfully.",
            details(json!({ "amount": 9900, "planName": "Enterprise Plan" })),
            now - Duration::days(1),
            true,
        ),
        billing(
            6,
            "subscription_expiring",
            Severity::Warning,
            "Subscription Expiring Soon",
            "Your Professional Plan subscription will expire in 3 days. Renew now to avoid service interruption.",
            details(json!({
                "planName": "Professional Plan",
                "expiryDate": (now + Duration::days(3)).to_rfc3339(),
            })),
            now - Duration::hours(12),
            false,
        ),
        billing(
            7,
            "invoice_available",
            Severity::Info,
            "New Invoice Available",
            "Your invoice for November 2025 is now available for download.",
            details(json!({ "invoiceId": "INV-2025-11-001" })),
            now - Duration::days(2),
            true,
        ),
    ];
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

/// A freshly arrived unread record: a critical CVE or a failed payment,
/// chosen at random. The id is the arrival time in milliseconds.
pub fn realtime_notification<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Notification {
    let id = NotificationId::from(now.timestamp_millis().max(0) as u64);

    let mut notification = if rng.random_bool(0.5) {
        let cve_number = rng.random_range(0..9999);
        let mut n = base(
            id,
            "cve_critical",
            Severity::Critical,
            "New Critical CVE Detected",
            &format!("CVE-2024-{cve_number}: Critical vulnerability detected"),
            now,
        );
        n.cvss_score = Some(9.0 + rng.random::<f64>());
        n
    } else {
        base(
            id,
            "payment_failed",
            Severity::Critical,
            "Payment Failed",
            "Payment processing failed. Please check your payment method.",
            now,
        )
    };
    notification.read = false;
    notification
}

#[allow(clippy::too_many_arguments)]
fn cve(
    id: u64,
    kind: &str,
    severity: Severity,
    title: &str,
    message: &str,
    (cve_id, cvss, component): (&str, f64, &str),
    timestamp: DateTime<Utc>,
    read: bool,
) -> Notification {
    let mut n = base(id.into(), kind, severity, title, message, timestamp);
    n.read = read;
    n.cvss_score = Some(cvss);
    n.action_url = Some(VULNERABILITIES_URL.to_string());
    n.details = details(json!({ "cveId": cve_id, "affectedComponent": component }));
    n
}

#[allow(clippy::too_many_arguments)]
fn billing(
    id: u64,
    kind: &str,
    severity: Severity,
    title: &str,
    message: &str,
    extra: Map<String, Value>,
    timestamp: DateTime<Utc>,
    read: bool,
) -> Notification {
    let mut n = base(id.into(), kind, severity, title, message, timestamp);
    n.read = read;
    n.action_url = Some(BILLING_URL.to_string());
    n.details = extra;
    n
}

fn base(
    id: NotificationId,
    kind: &str,
    severity: Severity,
    title: &str,
    message: &str,
    timestamp: DateTime<Utc>,
) -> Notification {
    Notification {
        id,
        notification_type: kind.to_string(),
        severity,
        title: title.to_string(),
        message: message.to_string(),
        timestamp,
        read: false,
        action_url: None,
        cvss_score: None,
        details: Map::new(),
    }
}

fn details(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
