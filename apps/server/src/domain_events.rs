//! Domain event bridge for the HTTP server.
//!
//! Core services emit events through [`ServerDomainEventSink`]; a background
//! worker drains the channel and records each event in the trace log.

use ledgerly_core::events::{DomainEvent, DomainEventSink};
use tokio::sync::mpsc;

pub struct ServerDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
}

impl ServerDomainEventSink {
    /// Creates the sink and spawns its worker. Must be called inside a
    /// Tokio runtime.
    pub fn start() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(event_worker(rx));
        Self { tx }
    }
}

impl DomainEventSink for ServerDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("Domain event worker is gone; event dropped");
        }
    }
}

async fn event_worker(mut rx: mpsc::UnboundedReceiver<DomainEvent>) {
    tracing::debug!("Domain event worker started");
    while let Some(event) = rx.recv().await {
        match &event {
            DomainEvent::TransactionsChanged { user_id, dates } => {
                tracing::info!(user_id = %user_id, days = dates.len(), "summaries refreshed");
            }
            DomainEvent::ReportGenerated { user_id, report_id } => {
                tracing::info!(user_id = %user_id, report_id = %report_id, "report generated");
            }
        }
    }
    tracing::debug!("Domain event worker shutting down");
}
