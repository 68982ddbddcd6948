//! Statement tables and CSV export.

use std::io::Write;

use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{StatementKind, StatementRow, StatementTable};
use crate::forecast::{ForecastRun, MonthlyForecastRow};

/// Decimal places shown in exported statements.
const PRESENTATION_DP: u32 = 2;

type LineFn = fn(&MonthlyForecastRow) -> Decimal;

const INCOME_STATEMENT_LINES: [(&str, LineFn); 10] = [
    ("Management Fee Revenue", |m| m.income_statement.revenue_mgmt_fee),
    ("Admin Fee Revenue", |m| m.income_statement.revenue_admin_fee),
    ("Total Revenue", |m| m.income_statement.total_revenue),
    ("Staff Costs", |m| m.income_statement.staff_costs),
    ("Administrative Expenses", |m| m.income_statement.admin_expenses),
    ("Total Operating Expenses", |m| m.income_statement.total_opex),
    ("Investment Return", |m| m.income_statement.investment_return),
    ("Profit Before Tax", |m| m.income_statement.profit_before_tax),
    ("Tax", |m| m.income_statement.tax),
    ("Net Profit", |m| m.income_statement.net_profit),
];

const BALANCE_SHEET_LINES: [(&str, LineFn); 10] = [
    ("Cash", |m| m.balance_sheet.cash_balance),
    ("Fixed Assets", |m| m.balance_sheet.fixed_assets),
    ("Accrued Investment Income", |m| m.balance_sheet.accrued_investment_income),
    ("Total Assets", |m| m.balance_sheet.total_assets),
    ("Liabilities", |m| m.balance_sheet.liabilities),
    ("Tax Payable", |m| m.balance_sheet.tax_payable),
    ("Contributed Capital", |m| m.balance_sheet.contributed_capital),
    ("Retained Earnings", |m| m.balance_sheet.retained_earnings),
    ("Total Liabilities & Equity", |m| m.balance_sheet.total_liabilities_and_equity),
    ("AUM (Memo)", |m| m.balance_sheet.aum_liability),
];

const CASH_FLOW_LINES: [(&str, LineFn); 6] = [
    ("Opening Cash", |m| m.cash_flow.opening_cash),
    ("Net Cash From Operating Activities", |m| m.cash_flow.net_cash_from_operations),
    ("Net Cash From Investing Activities", |m| m.cash_flow.net_cash_from_investing),
    ("Net Cash From Financing Activities", |m| m.cash_flow.net_cash_from_financing),
    ("Net Change In Cash", |m| m.cash_flow.net_change_in_cash),
    ("Closing Cash", |m| m.cash_flow.closing_cash),
];

/// Report service for laying out and exporting forecast statements.
pub struct ReportService;

impl ReportService {
    /// Lays out one statement of a run.
    #[must_use]
    pub fn statement(run: &ForecastRun, kind: StatementKind) -> StatementTable {
        let lines: &[(&str, LineFn)] = match kind {
            StatementKind::IncomeStatement => &INCOME_STATEMENT_LINES,
            StatementKind::BalanceSheet => &BALANCE_SHEET_LINES,
            StatementKind::CashFlow => &CASH_FLOW_LINES,
        };

        let rows = lines
            .iter()
            .map(|(description, line)| StatementRow {
                description: (*description).to_string(),
                values: run
                    .months
                    .iter()
                    .map(|m| line(m).round_dp(PRESENTATION_DP))
                    .collect(),
            })
            .collect();

        StatementTable {
            kind,
            forecast_year: run.forecast_year,
            periods: run.months.iter().map(|m| m.period.clone()).collect(),
            rows,
        }
    }

    /// Income statement table.
    #[must_use]
    pub fn income_statement(run: &ForecastRun) -> StatementTable {
        Self::statement(run, StatementKind::IncomeStatement)
    }

    /// Balance sheet table.
    #[must_use]
    pub fn balance_sheet(run: &ForecastRun) -> StatementTable {
        Self::statement(run, StatementKind::BalanceSheet)
    }

    /// Cash flow table.
    #[must_use]
    pub fn cash_flow(run: &ForecastRun) -> StatementTable {
        Self::statement(run, StatementKind::CashFlow)
    }

    /// Writes a table as CSV: `Description` then one column per period.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `writer` fails.
    pub fn write_csv<W: Write>(table: &StatementTable, writer: W) -> Result<(), ReportError> {
        let mut wtr = csv::Writer::from_writer(writer);

        let header: Vec<&str> = std::iter::once("Description")
            .chain(table.periods.iter().map(String::as_str))
            .collect();
        wtr.write_record(&header)?;

        for row in &table.rows {
            let record: Vec<String> = std::iter::once(row.description.clone())
                .chain(row.values.iter().map(|v| format!("{v:.2}")))
                .collect();
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Renders a table as a CSV string.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV cannot be written.
    pub fn to_csv_string(table: &StatementTable) -> Result<String, ReportError> {
        let mut buffer = Vec::new();
        Self::write_csv(table, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget_input::{ApprovedExpenseTotals, CreateAssumptionInput};
    use crate::forecast::{ForecastEngine, ForecastSeeds};
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn run() -> ForecastRun {
        let assumptions = CreateAssumptionInput::with_defaults(
            "FY26 Base",
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        )
        .into_assumption_set(chrono::Utc::now());
        let totals = ApprovedExpenseTotals {
            budget_year: 2026,
            total_annual_opex: dec!(120000000),
            total_annual_capex: dec!(12000000),
        };
        ForecastEngine::default().run(&assumptions, &totals, &ForecastSeeds::default())
    }

    #[test]
    fn test_income_statement_layout() {
        let table = ReportService::income_statement(&run());

        assert_eq!(table.periods.len(), 12);
        assert_eq!(table.periods[0], "Jan-26");
        assert_eq!(table.rows.len(), 10);

        let revenue = table.row("Total Revenue").unwrap();
        assert_eq!(revenue.values[0], dec!(2500000.00));
        let admin = table.row("Administrative Expenses").unwrap();
        assert_eq!(admin.values[0], dec!(10041666.67));
    }

    #[test]
    fn test_values_rounded_to_two_places() {
        let table = ReportService::balance_sheet(&run());
        assert!(
            table
                .rows
                .iter()
                .flat_map(|r| r.values.iter())
                .all(|v| v.scale() <= 2)
        );
    }

    #[test]
    fn test_cash_flow_closing_matches_run() {
        let run = run();
        let table = ReportService::cash_flow(&run);
        let closing = table.row("Closing Cash").unwrap();

        assert_eq!(closing.values[11], run.closing_cash_final().round_dp(2));
    }

    #[test]
    fn test_csv_header_and_rows() {
        let table = ReportService::income_statement(&run());
        let csv = ReportService::to_csv_string(&table).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("Description,Jan-26,Feb-26"));
        assert!(header.ends_with("Dec-26"));

        let first = lines.next().unwrap();
        assert!(first.starts_with("Management Fee Revenue,2083333.33,"));
        assert_eq!(csv.lines().count(), 11);
    }

    #[test]
    fn test_csv_escapes_descriptions() {
        let table = StatementTable {
            kind: StatementKind::IncomeStatement,
            forecast_year: 2026,
            periods: vec!["Jan-26".to_string()],
            rows: vec![
                StatementRow {
                    description: r#"Fees, "net""#.to_string(),
                    values: vec![dec!(1234.5)],
                },
                StatementRow {
                    description: "Total Liabilities & Equity".to_string(),
                    values: vec![dec!(-7)],
                },
            ],
        };
        let csv = ReportService::to_csv_string(&table).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Description,Jan-26");
        assert_eq!(lines[1], r#""Fees, ""net""",1234.50"#);
        assert_eq!(lines[2], "Total Liabilities & Equity,-7.00");
    }

    #[rstest]
    #[case("income_statement", StatementKind::IncomeStatement)]
    #[case("bs", StatementKind::BalanceSheet)]
    #[case("cash_flow", StatementKind::CashFlow)]
    fn test_statement_kind_parse(#[case] input: &str, #[case] expected: StatementKind) {
        assert_eq!(input.parse::<StatementKind>().unwrap(), expected);
        assert_eq!(expected.as_str().parse::<StatementKind>().unwrap(), expected);
    }

    #[test]
    fn test_statement_kind_unknown() {
        let err = "trial_balance".parse::<StatementKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown statement: trial_balance");
    }
}
