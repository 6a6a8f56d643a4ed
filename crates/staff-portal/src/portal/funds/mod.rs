//! Donation-fund transparency tables.
//!
//! Income is folded into a department × month matrix and expenses into an
//! expense type → project × month matrix. Rows and columns follow the caller's
//! [`FundLayout`] so the rendered tables keep a stable shape even when a department or a
//! month has no records; groups missing from the layout are appended in discovery order.
//! Records that lack their grouping key are skipped rather than rejected.

mod import;

pub use import::{FundImportError, FundRecordImporter};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{FundFlow, FundRecord};

/// Reference ordering for the rows and columns of the fund tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundLayout {
    pub departments: Vec<String>,
    pub months: Vec<String>,
    #[serde(default)]
    pub expense_types: Vec<String>,
}

impl FundLayout {
    /// Twelve calendar months and the six contributing departments.
    pub fn standard() -> Self {
        Self {
            departments: ["技术部", "客服部", "运营部", "产品部", "行政部", "财务部"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            months: (1..=12).map(|month| format!("{month}月")).collect(),
            expense_types: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    pub month: String,
    pub amount: i64,
}

/// One department row; `cells` align with [`IncomeMatrix::months`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeRow {
    pub department: String,
    pub cells: Vec<i64>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeMatrix {
    pub months: Vec<String>,
    pub rows: Vec<IncomeRow>,
    pub month_totals: Vec<MonthTotal>,
    pub grand_total: i64,
}

impl IncomeMatrix {
    pub fn cell(&self, department: &str, month: &str) -> i64 {
        let Some(column) = self.months.iter().position(|m| m == month) else {
            return 0;
        };
        self.rows
            .iter()
            .find(|row| row.department == department)
            .map(|row| row.cells[column])
            .unwrap_or(0)
    }

    pub fn department_total(&self, department: &str) -> i64 {
        self.rows
            .iter()
            .find(|row| row.department == department)
            .map(|row| row.total)
            .unwrap_or(0)
    }

    pub fn month_total(&self, month: &str) -> i64 {
        month_total(&self.month_totals, month)
    }
}

/// One project row inside an expense type block; `cells` align with the months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseProjectRow {
    pub project: String,
    pub cells: Vec<i64>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseTypeBlock {
    pub expense_type: String,
    pub projects: Vec<ExpenseProjectRow>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseMatrix {
    pub months: Vec<String>,
    pub types: Vec<ExpenseTypeBlock>,
    pub month_totals: Vec<MonthTotal>,
    pub grand_total: i64,
}

impl ExpenseMatrix {
    pub fn cell(&self, expense_type: &str, project: &str, month: &str) -> i64 {
        let Some(column) = self.months.iter().position(|m| m == month) else {
            return 0;
        };
        self.project_row(expense_type, project)
            .map(|row| row.cells[column])
            .unwrap_or(0)
    }

    pub fn project_total(&self, expense_type: &str, project: &str) -> i64 {
        self.project_row(expense_type, project)
            .map(|row| row.total)
            .unwrap_or(0)
    }

    pub fn type_total(&self, expense_type: &str) -> i64 {
        self.types
            .iter()
            .find(|block| block.expense_type == expense_type)
            .map(|block| block.total)
            .unwrap_or(0)
    }

    pub fn month_total(&self, month: &str) -> i64 {
        month_total(&self.month_totals, month)
    }

    fn project_row(&self, expense_type: &str, project: &str) -> Option<&ExpenseProjectRow> {
        self.types
            .iter()
            .find(|block| block.expense_type == expense_type)?
            .projects
            .iter()
            .find(|row| row.project == project)
    }
}

/// Headline figures shown above the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FundSummary {
    pub total_income: i64,
    pub total_expense: i64,
    pub balance: i64,
}

impl FundSummary {
    pub fn from_records(records: &[FundRecord]) -> Self {
        let (total_income, total_expense) =
            records
                .iter()
                .fold((0, 0), |(income, expense), record| match record.flow {
                    FundFlow::Income { .. } => (income + record.amount, expense),
                    FundFlow::Expense { .. } => (income, expense + record.amount),
                });

        Self {
            total_income,
            total_expense,
            balance: total_income - total_expense,
        }
    }
}

/// Every invoice and product image attached to one expense project, in record order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectProofs {
    pub project: String,
    pub invoices: Vec<String>,
    pub products: Vec<String>,
}

impl ProjectProofs {
    pub fn collect(records: &[FundRecord], project: &str) -> Self {
        let mut proofs = Self {
            project: project.to_string(),
            invoices: Vec::new(),
            products: Vec::new(),
        };

        for record in records {
            if let FundFlow::Expense {
                project: Some(name),
                ..
            } = &record.flow
            {
                if name == project {
                    proofs.invoices.extend(record.invoice_images.iter().cloned());
                    proofs.products.extend(record.product_images.iter().cloned());
                }
            }
        }

        proofs
    }
}

/// Both matrices plus the summary, as served to the transparency screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FundReport {
    pub summary: FundSummary,
    pub income: IncomeMatrix,
    pub expense: ExpenseMatrix,
}

impl FundReport {
    pub fn build(records: &[FundRecord], layout: &FundLayout) -> Self {
        Self {
            summary: FundSummary::from_records(records),
            income: build_income_matrix(records, layout),
            expense: build_expense_matrix(records, layout),
        }
    }
}

pub fn build_income_matrix(records: &[FundRecord], layout: &FundLayout) -> IncomeMatrix {
    let mut departments = KeyOrder::seeded(&layout.departments);
    let mut months = KeyOrder::seeded(&layout.months);
    let mut placed = Vec::new();

    for record in records {
        let FundFlow::Income { department } = &record.flow else {
            continue;
        };
        let Some(department) = non_blank(department.as_deref()) else {
            debug!(record = %record.id, "income record without department skipped");
            continue;
        };
        let Some(month) = non_blank(Some(record.month.as_str())) else {
            debug!(record = %record.id, "income record without month skipped");
            continue;
        };

        let row = departments.slot(department);
        let column = months.slot(month);
        placed.push((row, column, record.amount));
    }

    let mut grid = vec![vec![0_i64; months.len()]; departments.len()];
    for (row, column, amount) in placed {
        grid[row][column] += amount;
    }

    let rows: Vec<IncomeRow> = departments
        .into_keys()
        .into_iter()
        .zip(grid)
        .map(|(department, cells)| IncomeRow {
            total: cells.iter().sum(),
            department,
            cells,
        })
        .collect();

    let months = months.into_keys();
    let month_totals = column_totals(&months, rows.iter().map(|row| row.cells.as_slice()));
    let grand_total = rows.iter().map(|row| row.total).sum();

    IncomeMatrix {
        months,
        rows,
        month_totals,
        grand_total,
    }
}

pub fn build_expense_matrix(records: &[FundRecord], layout: &FundLayout) -> ExpenseMatrix {
    let mut types = KeyOrder::seeded(&layout.expense_types);
    let mut projects: Vec<KeyOrder> = (0..types.len()).map(|_| KeyOrder::default()).collect();
    let mut months = KeyOrder::seeded(&layout.months);
    let mut placed = Vec::new();

    for record in records {
        let FundFlow::Expense {
            expense_type,
            project,
            ..
        } = &record.flow
        else {
            continue;
        };
        let (Some(expense_type), Some(project)) =
            (non_blank(expense_type.as_deref()), non_blank(project.as_deref()))
        else {
            debug!(record = %record.id, "expense record without type or project skipped");
            continue;
        };
        let Some(month) = non_blank(Some(record.month.as_str())) else {
            debug!(record = %record.id, "expense record without month skipped");
            continue;
        };

        let type_slot = types.slot(expense_type);
        if type_slot == projects.len() {
            projects.push(KeyOrder::default());
        }
        let project_slot = projects[type_slot].slot(project);
        let column = months.slot(month);
        placed.push((type_slot, project_slot, column, record.amount));
    }

    let month_count = months.len();
    let mut grid: Vec<Vec<Vec<i64>>> = projects
        .iter()
        .map(|order| vec![vec![0_i64; month_count]; order.len()])
        .collect();
    for (type_slot, project_slot, column, amount) in placed {
        grid[type_slot][project_slot][column] += amount;
    }

    let types: Vec<ExpenseTypeBlock> = types
        .into_keys()
        .into_iter()
        .zip(projects.into_iter().zip(grid))
        .map(|(expense_type, (order, cells_by_project))| {
            let projects: Vec<ExpenseProjectRow> = order
                .into_keys()
                .into_iter()
                .zip(cells_by_project)
                .map(|(project, cells)| ExpenseProjectRow {
                    total: cells.iter().sum(),
                    project,
                    cells,
                })
                .collect();
            ExpenseTypeBlock {
                total: projects.iter().map(|row| row.total).sum(),
                expense_type,
                projects,
            }
        })
        .collect();

    let months = months.into_keys();
    let month_totals = column_totals(
        &months,
        types
            .iter()
            .flat_map(|block| block.projects.iter().map(|row| row.cells.as_slice())),
    );
    let grand_total = types.iter().map(|block| block.total).sum();

    ExpenseMatrix {
        months,
        types,
        month_totals,
        grand_total,
    }
}

fn column_totals<'a, I>(months: &[String], rows: I) -> Vec<MonthTotal>
where
    I: Iterator<Item = &'a [i64]>,
{
    let mut totals = vec![0_i64; months.len()];
    for cells in rows {
        for (total, cell) in totals.iter_mut().zip(cells) {
            *total += cell;
        }
    }

    months
        .iter()
        .cloned()
        .zip(totals)
        .map(|(month, amount)| MonthTotal { month, amount })
        .collect()
}

fn month_total(totals: &[MonthTotal], month: &str) -> i64 {
    totals
        .iter()
        .find(|total| total.month == month)
        .map(|total| total.amount)
        .unwrap_or(0)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Insertion-ordered key set mapping names to row or column slots.
#[derive(Debug, Default)]
struct KeyOrder {
    keys: Vec<String>,
    index: HashMap<String, usize>,
}

impl KeyOrder {
    fn seeded(reference: &[String]) -> Self {
        let mut order = Self::default();
        for key in reference {
            order.slot(key);
        }
        order
    }

    fn slot(&mut self, key: &str) -> usize {
        if let Some(&slot) = self.index.get(key) {
            return slot;
        }
        let slot = self.keys.len();
        self.keys.push(key.to_string());
        self.index.insert(key.to_string(), slot);
        slot
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn into_keys(self) -> Vec<String> {
        self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::domain::RecordId;

    fn income(id: &str, department: Option<&str>, month: &str, amount: i64) -> FundRecord {
        FundRecord {
            id: RecordId::from(id),
            month: month.to_string(),
            amount,
            flow: FundFlow::Income {
                department: department.map(str::to_string),
            },
            invoice_images: Vec::new(),
            product_images: Vec::new(),
        }
    }

    fn expense(
        id: &str,
        expense_type: Option<&str>,
        project: Option<&str>,
        month: &str,
        amount: i64,
    ) -> FundRecord {
        FundRecord {
            id: RecordId::from(id),
            month: month.to_string(),
            amount,
            flow: FundFlow::Expense {
                expense_type: expense_type.map(str::to_string),
                project: project.map(str::to_string),
                needed_amount: None,
            },
            invoice_images: vec![format!("{id}-invoice.png")],
            product_images: vec![format!("{id}-product.png")],
        }
    }

    #[test]
    fn income_matrix_matches_worked_example() {
        let records = vec![
            income("inc1", Some("技术部"), "1月", 500),
            income("inc2", Some("技术部"), "2月", 450),
        ];
        let matrix = build_income_matrix(&records, &FundLayout::standard());

        assert_eq!(matrix.department_total("技术部"), 950);
        assert_eq!(matrix.month_total("1月"), 500);
        assert_eq!(matrix.month_total("2月"), 450);
        assert_eq!(matrix.grand_total, 950);
    }

    #[test]
    fn income_rows_follow_reference_order_including_unused() {
        let records = vec![
            income("a", Some("财务部"), "3月", 10),
            income("b", Some("技术部"), "1月", 20),
        ];
        let layout = FundLayout::standard();
        let matrix = build_income_matrix(&records, &layout);

        let departments: Vec<&str> = matrix.rows.iter().map(|row| row.department.as_str()).collect();
        assert_eq!(departments, vec!["技术部", "客服部", "运营部", "产品部", "行政部", "财务部"]);
        assert_eq!(matrix.months, layout.months);
        assert_eq!(matrix.department_total("客服部"), 0);
        assert_eq!(matrix.month_total("12月"), 0);
    }

    #[test]
    fn unknown_groups_are_appended_after_reference_order() {
        let records = vec![income("a", Some("市场部"), "13月", 5)];
        let matrix = build_income_matrix(&records, &FundLayout::standard());

        assert_eq!(matrix.rows.last().map(|row| row.department.as_str()), Some("市场部"));
        assert_eq!(matrix.months.last().map(String::as_str), Some("13月"));
        assert_eq!(matrix.cell("市场部", "13月"), 5);
    }

    #[test]
    fn records_missing_grouping_keys_are_skipped() {
        let records = vec![
            income("a", None, "1月", 100),
            income("b", Some("  "), "1月", 100),
            expense("c", None, Some("下午茶"), "1月", 80),
            expense("d", Some("活动支出"), None, "1月", 80),
            income("e", Some("技术部"), "1月", 7),
        ];
        let report = FundReport::build(&records, &FundLayout::standard());

        assert_eq!(report.income.grand_total, 7);
        assert_eq!(report.expense.grand_total, 0);
        assert!(report.expense.types.is_empty());
    }

    #[test]
    fn expense_matrix_nests_type_project_month() {
        let records = vec![
            expense("exp1", Some("活动支出"), Some("下午茶"), "1月", 800),
            expense("exp2", Some("活动支出"), Some("下午茶"), "2月", 750),
            expense("exp3", Some("公益捐赠"), Some("流浪动物救助"), "1月", 500),
            expense("exp4", Some("公益捐赠"), Some("流浪动物救助"), "2月", 500),
            expense("exp5", Some("活动支出"), Some("团建"), "2月", 300),
        ];
        let matrix = build_expense_matrix(&records, &FundLayout::standard());

        let types: Vec<&str> = matrix.types.iter().map(|block| block.expense_type.as_str()).collect();
        assert_eq!(types, vec!["活动支出", "公益捐赠"]);
        assert_eq!(matrix.cell("活动支出", "下午茶", "2月"), 750);
        assert_eq!(matrix.project_total("活动支出", "下午茶"), 1550);
        assert_eq!(matrix.type_total("活动支出"), 1850);
        assert_eq!(matrix.type_total("公益捐赠"), 1000);
        assert_eq!(matrix.month_total("1月"), 1300);
        assert_eq!(matrix.month_total("2月"), 1550);
        assert_eq!(matrix.grand_total, 2850);
    }

    #[test]
    fn grand_totals_agree_with_row_and_month_sums() {
        let records = vec![
            income("1", Some("技术部"), "1月", 500),
            income("2", Some("客服部"), "2月", 320),
            income("3", Some("运营部"), "5月", 210),
            expense("4", Some("活动支出"), Some("下午茶"), "1月", 800),
            expense("5", Some("公益捐赠"), Some("助学"), "7月", 90),
        ];
        let report = FundReport::build(&records, &FundLayout::standard());

        let income_by_month: i64 = report.income.month_totals.iter().map(|t| t.amount).sum();
        let income_by_row: i64 = report.income.rows.iter().map(|row| row.total).sum();
        assert_eq!(report.income.grand_total, income_by_month);
        assert_eq!(report.income.grand_total, income_by_row);

        let expense_by_month: i64 = report.expense.month_totals.iter().map(|t| t.amount).sum();
        let expense_by_type: i64 = report.expense.types.iter().map(|block| block.total).sum();
        assert_eq!(report.expense.grand_total, expense_by_month);
        assert_eq!(report.expense.grand_total, expense_by_type);
    }

    #[test]
    fn summary_reports_balance() {
        let records = vec![
            income("1", Some("技术部"), "1月", 500),
            expense("2", Some("活动支出"), Some("下午茶"), "1月", 800),
        ];
        let summary = FundSummary::from_records(&records);
        assert_eq!(summary.total_income, 500);
        assert_eq!(summary.total_expense, 800);
        assert_eq!(summary.balance, -300);
    }

    #[test]
    fn proofs_gather_images_across_months() {
        let records = vec![
            expense("exp1", Some("活动支出"), Some("下午茶"), "1月", 800),
            expense("exp3", Some("公益捐赠"), Some("流浪动物救助"), "1月", 500),
            expense("exp2", Some("活动支出"), Some("下午茶"), "2月", 750),
        ];
        let proofs = ProjectProofs::collect(&records, "下午茶");
        assert_eq!(proofs.invoices, vec!["exp1-invoice.png", "exp2-invoice.png"]);
        assert_eq!(proofs.products, vec!["exp1-product.png", "exp2-product.png"]);
    }
}
