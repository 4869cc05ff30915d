//! Reports module - period resolution, document synthesis, and export.

pub mod aggregation;
mod export;
mod period;
mod reports_model;
mod reports_service;
mod reports_traits;


pub use export::DefaultReportFormatter;
pub use period::TrendGranularity;
pub use reports_model::*;
pub use reports_service::ReportService;
pub use reports_traits::{ReportFormatter, ReportRepositoryTrait, ReportServiceTrait};
