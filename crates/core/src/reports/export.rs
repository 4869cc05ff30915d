//! Export formatters for report documents.

use rust_decimal::Decimal;
use std::fmt::Write as _;

use super::reports_model::{ExportFormat, ReportData};
use super::reports_traits::ReportFormatter;
use crate::errors::{Error, Result};

const PDF_LINES_PER_PAGE: usize = 52;
const PDF_FONT_SIZE: u32 = 10;
const PDF_LEADING: u32 = 14;

/// CSV and plain-text PDF rendering of report documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultReportFormatter;

impl DefaultReportFormatter {
    pub fn new() -> Self {
        Self
    }

    fn to_csv(&self, data: &ReportData) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        writer.write_record(["Report", data.period.report_type.as_str()])?;
        writer.write_record([
            "Period".to_string(),
            data.period.start.to_string(),
            data.period.end.to_string(),
        ])?;
        writer.write_record([""])?;

        let summary = &data.summary;
        writer.write_record(["Summary"])?;
        writer.write_record(["Metric", "Amount"])?;
        for (label, amount) in [
            ("Total income", summary.total_income),
            ("Total expense", summary.total_expense),
            ("Net savings", summary.net_savings),
            ("Budgeted amount", summary.budgeted_amount),
            ("Budget difference", summary.budget_difference),
        ] {
            writer.write_record([label.to_string(), amount.to_string()])?;
        }
        writer.write_record([""])?;

        for (title, section) in [
            ("Income by category", &data.income),
            ("Expenses by category", &data.expenses),
        ] {
            writer.write_record([title])?;
            writer.write_record(["Category", "Amount", "Percentage"])?;
            for row in &section.by_category {
                writer.write_record([
                    row.category.to_string(),
                    row.amount.to_string(),
                    row.percentage.to_string(),
                ])?;
            }
            writer.write_record([""])?;
        }

        writer.write_record(["Budgets"])?;
        writer.write_record(["Category", "Budgeted", "Spent", "Percentage used"])?;
        for row in &data.budgets.by_category {
            writer.write_record([
                row.category.to_string(),
                row.budgeted.to_string(),
                row.spent.to_string(),
                row.percentage_used.to_string(),
            ])?;
        }
        let overall = &data.budgets.overall_usage;
        writer.write_record([
            "Overall".to_string(),
            overall.budgeted.to_string(),
            overall.spent.to_string(),
            overall.percentage_used.to_string(),
        ])?;
        writer.write_record([""])?;

        writer.write_record(["Savings goals"])?;
        writer.write_record([
            "Name",
            "Target amount",
            "Saved amount",
            "Percentage",
            "Due date",
            "Status",
        ])?;
        for goal in &data.savings_goals {
            writer.write_record([
                goal.name.clone(),
                goal.target_amount.to_string(),
                goal.saved_amount.to_string(),
                goal.percentage.to_string(),
                goal.due_date.map(|d| d.to_string()).unwrap_or_default(),
                goal.status.as_str().to_string(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| Error::Export(format!("Failed to flush CSV output: {}", e)))
    }

    fn text_lines(&self, data: &ReportData) -> Vec<String> {
        let money = |amount: Decimal| format!("{:.2}", amount);
        let mut lines = vec![
            format!(
                "Financial report ({}): {} to {}",
                data.period.report_type, data.period.start, data.period.end
            ),
            String::new(),
            "Summary".to_string(),
            format!("  Total income: {}", money(data.summary.total_income)),
            format!("  Total expense: {}", money(data.summary.total_expense)),
            format!("  Net savings: {}", money(data.summary.net_savings)),
            format!("  Budgeted amount: {}", money(data.summary.budgeted_amount)),
            format!(
                "  Budget difference: {}",
                money(data.summary.budget_difference)
            ),
        ];

        for (title, section) in [
            ("Income by category", &data.income),
            ("Expenses by category", &data.expenses),
        ] {
            lines.push(String::new());
            lines.push(title.to_string());
            for row in &section.by_category {
                lines.push(format!(
                    "  {}: {} ({}%)",
                    row.category,
                    money(row.amount),
                    row.percentage
                ));
            }
        }

        lines.push(String::new());
        lines.push("Budgets".to_string());
        for row in &data.budgets.by_category {
            lines.push(format!(
                "  {}: spent {} of {} ({}%)",
                row.category,
                money(row.spent),
                money(row.budgeted),
                row.percentage_used
            ));
        }

        lines.push(String::new());
        lines.push("Savings goals".to_string());
        for goal in &data.savings_goals {
            let due = goal
                .due_date
                .map(|d| format!(", due {}", d))
                .unwrap_or_default();
            lines.push(format!(
                "  {}: {} of {} ({}%{}) {}",
                goal.name,
                money(goal.saved_amount),
                money(goal.target_amount),
                goal.percentage,
                due,
                goal.status.as_str()
            ));
        }
        lines
    }

    fn to_pdf(&self, data: &ReportData) -> Result<Vec<u8>> {
        let lines = self.text_lines(data);
        let pages: Vec<&[String]> = lines.chunks(PDF_LINES_PER_PAGE).collect();

        // Object layout: 1 catalog, 2 page tree, 3 font, then a
        // (page, content) pair per page.
        let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + i * 2).collect();
        let mut objects: Vec<String> = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                page_ids
                    .iter()
                    .map(|id| format!("{} 0 R", id))
                    .collect::<Vec<_>>()
                    .join(" "),
                pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];

        for (page, page_id) in pages.iter().zip(&page_ids) {
            let mut stream = format!(
                "BT /F1 {} Tf {} TL 50 800 Td\n",
                PDF_FONT_SIZE, PDF_LEADING
            );
            for line in page.iter() {
                let _ = writeln!(stream, "({}) Tj T*", escape_pdf_text(line));
            }
            stream.push_str("ET");

            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                page_id + 1
            ));
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ));
        }

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            let _ = write!(out, "{} 0 obj\n{}\nendobj\n", index + 1, body);
        }

        let xref_start = out.len();
        let _ = writeln!(out, "xref\n0 {}", objects.len() + 1);
        out.push_str("0000000000 65535 f \n");
        for offset in offsets {
            let _ = writeln!(out, "{:010} 00000 n ", offset);
        }
        let _ = write!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        );
        Ok(out.into_bytes())
    }
}

/// Escapes PDF string delimiters and drops characters outside the
/// single-byte range the built-in font can render.
fn escape_pdf_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            c if c.is_ascii() && !c.is_ascii_control() => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}

impl ReportFormatter for DefaultReportFormatter {
    fn format(&self, data: &ReportData, format: ExportFormat) -> Result<Vec<u8>> {
        match format {
            ExportFormat::Csv => self.to_csv(data),
            ExportFormat::Pdf => self.to_pdf(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::reports_model::{
        BudgetsSection, CategoryAmount, CategoryBreakdown, GoalProgress, GoalStatus, ReportPeriod,
        ReportSummary, ReportType,
    };
    use crate::transactions::Category;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample() -> ReportData {
        ReportData {
            period: ReportPeriod {
                report_type: ReportType::Monthly,
                start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            },
            summary: ReportSummary {
                total_income: dec!(2000),
                total_expense: dec!(50),
                net_savings: dec!(1950),
                budgeted_amount: dec!(200),
                budget_difference: dec!(150),
                savings_progress: None,
            },
            income: CategoryBreakdown {
                by_category: vec![CategoryAmount {
                    category: Category::Salary,
                    amount: dec!(2000),
                    percentage: dec!(100),
                }],
                trend: vec![],
            },
            expenses: CategoryBreakdown::default(),
            budgets: BudgetsSection::default(),
            savings_goals: vec![GoalProgress {
                name: "Trip (Japan)".to_string(),
                target_amount: dec!(1000),
                saved_amount: dec!(600),
                percentage: dec!(60),
                due_date: None,
                status: GoalStatus::InProgress,
            }],
        }
    }

    #[test]
    fn csv_contains_sections() {
        let bytes = DefaultReportFormatter::new()
            .format(&sample(), ExportFormat::Csv)
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("Summary"));
        assert!(text.contains("Total income,2000"));
        assert!(text.contains("salary,2000,100"));
        assert!(text.contains("Savings goals"));
        assert!(text.contains("Trip (Japan),1000,600,60,,inProgress"));
    }

    #[test]
    fn pdf_has_header_and_escaped_text() {
        let bytes = DefaultReportFormatter::new()
            .format(&sample(), ExportFormat::Pdf)
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        assert!(text.contains("Trip \\(Japan\\)"));
        assert!(text.contains("/BaseFont /Helvetica"));
    }
}
