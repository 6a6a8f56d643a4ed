use crate::infra::load_portal;
use chrono::NaiveDate;
use clap::Args;
use staff_portal::config::PortalConfig;
use staff_portal::error::AppError;
use staff_portal::portal::{
    ContactForm, EvaluationSheet, FundReport, PortalState, RankedNotice, RecordId,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct FundsReportArgs {
    /// Fund ledger CSV export replacing the seeded records.
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct NoticesListArgs {
    /// Reference date for pinning and expiry (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the reporting date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Fund ledger CSV export used in the fund section of the demo.
    #[arg(long)]
    pub(crate) funds_csv: Option<PathBuf>,
    /// Skip the benefit checkout portion of the demo.
    #[arg(long)]
    pub(crate) skip_checkout: bool,
}

pub(crate) fn run_funds_report(config: &PortalConfig, args: FundsReportArgs) -> Result<(), AppError> {
    let portal = load_portal(config, args.csv)?;
    render_fund_report(&portal.fund_report());
    Ok(())
}

pub(crate) fn run_notices_list(config: &PortalConfig, args: NoticesListArgs) -> Result<(), AppError> {
    let portal = PortalState::seeded(config);
    let today = args.today.unwrap_or_else(|| portal.today());
    render_notices(&portal.ranked_notices(today), today);
    Ok(())
}

pub(crate) fn run_demo(config: &PortalConfig, args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        funds_csv,
        skip_checkout,
    } = args;

    let mut portal = load_portal(config, funds_csv)?;
    if let Some(today) = today {
        portal = portal.with_today(today);
    }
    let today = portal.today();

    println!("Staff portal demo for {} ({})", portal.user().name, today);
    render_notices(&portal.ranked_notices(today), today);
    render_fund_report(&portal.fund_report());

    let user_id = portal.user().id.clone();
    println!("\nLeaderboard after a 5000 point bonus for {user_id}");
    let entries = portal.adjust_points(&user_id, 5000)?;
    for entry in entries.iter().take(5) {
        println!("  #{} {} ({}) {}", entry.rank, entry.name, entry.department, entry.score);
    }

    render_promotion(&mut portal, &user_id)?;

    if skip_checkout {
        return Ok(());
    }
    render_checkout(&mut portal)
}

fn render_notices(notices: &[RankedNotice], today: NaiveDate) {
    println!("\nNotices as of {today}");
    for ranked in notices {
        let marker = if ranked.effective_pin { "[置顶] " } else { "" };
        let expiry = if ranked.is_expired {
            "expired".to_string()
        } else if ranked.notice.expiry_date.is_some() {
            format!("{} days left", ranked.days_remaining)
        } else {
            "no expiry".to_string()
        };
        println!(
            "  - {marker}{} | {} | {} reads | {expiry}",
            ranked.notice.title, ranked.notice.publisher, ranked.notice.read_count
        );
    }
}

fn render_fund_report(report: &FundReport) {
    println!("\nFund summary");
    println!(
        "  income {} | expense {} | balance {}",
        report.summary.total_income, report.summary.total_expense, report.summary.balance
    );

    println!("Income by department");
    for row in &report.income.rows {
        if row.total == 0 {
            continue;
        }
        let months = active_months(&report.income.months, &row.cells);
        println!("  - {}: {} ({months})", row.department, row.total);
    }

    println!("Expenses by type");
    for block in &report.expense.types {
        if block.projects.is_empty() {
            continue;
        }
        println!("  - {}: {}", block.expense_type, block.total);
        for project in &block.projects {
            let months = active_months(&report.expense.months, &project.cells);
            println!("      {}: {} ({months})", project.project, project.total);
        }
    }
}

fn active_months(months: &[String], cells: &[i64]) -> String {
    let active: Vec<String> = months
        .iter()
        .zip(cells)
        .filter(|(_, amount)| **amount != 0)
        .map(|(month, amount)| format!("{month} {amount}"))
        .collect();
    active.join(", ")
}

fn render_promotion(portal: &mut PortalState, employee_id: &RecordId) -> Result<(), AppError> {
    println!("\nPromotion review for {employee_id}");
    let mut sheet: EvaluationSheet = portal.evaluation_sheet(employee_id)?;
    for score in sheet.values_mut() {
        *score = 90.0;
    }
    let result = portal.evaluate_promotion(employee_id, &sheet)?;
    match result.score.value() {
        Some(score) => println!("  weighted score {score:.1}"),
        None => println!("  no rubric configured for the next level"),
    }
    if let Some(progress) = result.next_level_progress {
        println!("  progress towards next level {progress:.0}%");
    }
    if result.promotion_due {
        println!("  promotion due");
    }
    Ok(())
}

fn render_checkout(portal: &mut PortalState) -> Result<(), AppError> {
    let item_id = RecordId::from("101");
    println!("\nHybrid checkout for benefit {item_id}");

    let balance = portal.user().total_points;
    let checkout = portal.start_checkout(&item_id)?;
    let maximum = checkout.max_deduction(balance);
    println!(
        "  {} | price {} | deduct up to {maximum} points",
        checkout.item().title,
        checkout.item().price
    );

    let checkout = portal.choose_deduction(maximum / 2)?;
    println!("  {} points chosen, {:.2} due", checkout.deduction(), checkout.amount_due());
    portal.proceed_to_form()?;
    let nickname = portal.user().name.clone();
    portal.submit_contact(ContactForm {
        nickname,
        phone: "13800000000".to_string(),
        address: "3号楼 502".to_string(),
    })?;

    let receipt = portal.confirm_payment()?;
    println!(
        "  paid {:.2} for {} using {} points; {} points left",
        receipt.cash_paid,
        receipt.title,
        receipt.points_deducted,
        portal.user().total_points
    );
    Ok(())
}
