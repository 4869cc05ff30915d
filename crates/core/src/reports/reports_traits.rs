use async_trait::async_trait;

use super::reports_model::{
    CategoryTotal, ExportFormat, NewReport, Report, ReportData, ReportRequest,
};
use crate::errors::Result;

/// Trait for report persistence.
#[async_trait]
pub trait ReportRepositoryTrait: Send + Sync {
    async fn create(&self, new_report: NewReport) -> Result<Report>;

    /// Loads a report owned by `user_id`. Reports owned by someone else are
    /// reported as `NotFound`.
    fn find_by_id_and_owner(&self, report_id: &str, user_id: &str) -> Result<Report>;

    /// All reports of the user, newest first.
    fn list(&self, user_id: &str) -> Result<Vec<Report>>;

    /// Overwrites the stored document of an existing report.
    async fn save(&self, report: Report) -> Result<Report>;

    async fn delete(&self, report_id: &str, user_id: &str) -> Result<usize>;
}

/// Renders a report document into an export format.
pub trait ReportFormatter: Send + Sync {
    fn format(&self, data: &ReportData, format: ExportFormat) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait ReportServiceTrait: Send + Sync {
    async fn create_report(&self, user_id: &str, request: ReportRequest) -> Result<Report>;

    /// Re-synthesizes the document of an existing report against the
    /// current ledger.
    async fn update_report(&self, report_id: &str, user_id: &str) -> Result<Report>;

    fn get_report(&self, report_id: &str, user_id: &str) -> Result<Report>;

    fn list_reports(&self, user_id: &str) -> Result<Vec<Report>>;

    async fn delete_report(&self, report_id: &str, user_id: &str) -> Result<()>;

    fn top_categories(
        &self,
        user_id: &str,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<CategoryTotal>>;

    fn category_charts(
        &self,
        user_id: &str,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<CategoryTotal>>;

    fn export_report(
        &self,
        report_id: &str,
        format: ExportFormat,
        user_id: &str,
    ) -> Result<Vec<u8>>;
}
