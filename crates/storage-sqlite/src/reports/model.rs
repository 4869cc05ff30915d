//! Database model for stored reports. The document lives in `data` as JSON.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::errors::StorageError;
use crate::utils::{format_date, parse_date, parse_label};
use ledgerly_core::reports::{NewReport, Report};

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReportDB {
    pub id: String,
    pub user_id: String,
    pub report_type: String,
    pub period_start: String,
    pub period_end: String,
    pub data: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ReportDB {
    pub fn from_new(id: String, domain: &NewReport, now: NaiveDateTime) -> Result<Self, StorageError> {
        Ok(Self {
            id,
            user_id: domain.user_id.clone(),
            report_type: domain.report_type.as_str().to_string(),
            period_start: format_date(domain.period_start),
            period_end: format_date(domain.period_end),
            data: serde_json::to_string(&domain.data)?,
            created_at: now,
            updated_at: now,
        })
    }
}

impl TryFrom<ReportDB> for Report {
    type Error = StorageError;

    fn try_from(db: ReportDB) -> Result<Self, Self::Error> {
        Ok(Self {
            report_type: parse_label(&db.report_type, "reports.report_type")?,
            period_start: parse_date(&db.period_start, "reports.period_start")?,
            period_end: parse_date(&db.period_end, "reports.period_end")?,
            data: serde_json::from_str(&db.data)?,
            id: db.id,
            user_id: db.user_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
