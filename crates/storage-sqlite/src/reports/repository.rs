use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use ledgerly_core::errors::{Error, Result};
use ledgerly_core::reports::{NewReport, Report, ReportRepositoryTrait};

use super::model::ReportDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::reports;
use crate::schema::reports::dsl::*;

pub struct ReportRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

fn not_found(report_id: &str) -> Error {
    Error::NotFound(format!("Report {}", report_id))
}

impl ReportRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ReportRepositoryTrait for ReportRepository {
    async fn create(&self, new_report: NewReport) -> Result<Report> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Report> {
                let row = ReportDB::from_new(
                    Uuid::new_v4().to_string(),
                    &new_report,
                    Utc::now().naive_utc(),
                )?;
                debug!("storing {} report {} for {}", row.report_type, row.id, row.user_id);
                let inserted = diesel::insert_into(reports::table)
                    .values(&row)
                    .returning(ReportDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Report::try_from(inserted)?)
            })
            .await
    }

    fn find_by_id_and_owner(&self, report_id: &str, owner: &str) -> Result<Report> {
        let mut conn = get_connection(&self.pool)?;
        let row = reports
            .filter(id.eq(report_id))
            .filter(user_id.eq(owner))
            .select(ReportDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| not_found(report_id))?;
        Ok(Report::try_from(row)?)
    }

    fn list(&self, owner: &str) -> Result<Vec<Report>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = reports
            .filter(user_id.eq(owner))
            .order((created_at.desc(), id.desc()))
            .select(ReportDB::as_select())
            .load(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| Report::try_from(row).map_err(Error::from))
            .collect()
    }

    async fn save(&self, report: Report) -> Result<Report> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Report> {
                let document = serde_json::to_string(&report.data).map_err(StorageError::from)?;
                let updated = diesel::update(
                    reports
                        .filter(id.eq(&report.id))
                        .filter(user_id.eq(&report.user_id)),
                )
                .set((data.eq(document), updated_at.eq(Utc::now().naive_utc())))
                .returning(ReportDB::as_returning())
                .get_result(conn)
                .optional()
                .map_err(StorageError::from)?
                .ok_or_else(|| not_found(&report.id))?;
                Ok(Report::try_from(updated)?)
            })
            .await
    }

    async fn delete(&self, report_id: &str, owner: &str) -> Result<usize> {
        let report_id = report_id.to_string();
        let owner = owner.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(reports.filter(id.eq(report_id)).filter(user_id.eq(owner)))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
