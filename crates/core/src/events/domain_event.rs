//! Domain event types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about domain data changes. Runtime adapters
/// translate them into platform-specific actions (cache invalidation,
/// client notifications, etc.).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A transaction was created, updated, or deleted and its summaries
    /// were recomputed.
    TransactionsChanged {
        user_id: String,
        /// Dates whose daily summaries were recomputed
        dates: Vec<NaiveDate>,
    },

    /// A report was created or refreshed.
    ReportGenerated { user_id: String, report_id: String },
}

impl DomainEvent {
    /// Creates a TransactionsChanged event.
    pub fn transactions_changed(user_id: String, dates: Vec<NaiveDate>) -> Self {
        Self::TransactionsChanged { user_id, dates }
    }

    /// Creates a ReportGenerated event.
    pub fn report_generated(user_id: String, report_id: String) -> Self {
        Self::ReportGenerated { user_id, report_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_event_serialization() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let event = DomainEvent::transactions_changed("u1".to_string(), vec![date]);

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("transactions_changed"));

        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();
        match deserialized {
            DomainEvent::TransactionsChanged { user_id, dates } => {
                assert_eq!(user_id, "u1");
                assert_eq!(dates, vec![date]);
            }
            _ => panic!("Expected TransactionsChanged"),
        }
    }

    #[test]
    fn test_report_generated_serialization() {
        let event = DomainEvent::report_generated("u1".to_string(), "r1".to_string());
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("report_generated"));
        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }
}
