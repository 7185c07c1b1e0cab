//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use chrono::NaiveDate;
use colored::{ColoredString, Colorize};
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use influ::db::{Collaboration, FollowerSnapshot, Purchase, VideoIdea};
use influ::reports::{Dashboard, IncomeReport, IncomeTotals, UrgentReturn};
use influ::returns::UrgencyLevel;
use influ::tax::{BillingType, TaxBreakdown};
use influ::utils::{format_currency, format_decimal_pl};

const DATE_FORMAT: &str = "%d.%m.%Y";

fn colored_urgency(urgency: UrgencyLevel) -> ColoredString {
    match urgency {
        UrgencyLevel::Overdue => urgency.as_str().red().bold(),
        UrgencyLevel::Today => urgency.as_str().red(),
        UrgencyLevel::Urgent => urgency.as_str().yellow().bold(),
        UrgencyLevel::Soon => urgency.as_str().yellow(),
        UrgencyLevel::Ok => urgency.as_str().green(),
    }
}

fn days_left_label(days_remaining: i64) -> String {
    match days_remaining {
        d if d < 0 => format!("{} late", -d),
        0 => "today".to_string(),
        d => d.to_string(),
    }
}

/// Itemized breakdown of one amount
pub fn format_breakdown_table(billing: BillingType, breakdown: &TaxBreakdown) -> String {
    #[derive(Tabled)]
    struct Line {
        #[tabled(rename = "Item")]
        item: &'static str,
        #[tabled(rename = "Amount")]
        amount: String,
    }

    let mut lines = vec![Line {
        item: "Gross",
        amount: format_currency(breakdown.gross),
    }];
    if billing.is_platform() {
        lines.push(Line {
            item: "Use.me commission",
            amount: format_currency(-breakdown.commission),
        });
    }
    if billing.kup_rate().is_some() {
        lines.push(Line {
            item: "KUP",
            amount: format_currency(breakdown.kup),
        });
    }
    if billing == BillingType::UmowaPraca {
        lines.push(Line {
            item: "Social insurance (ZUS)",
            amount: format_currency(-breakdown.social_insurance),
        });
        lines.push(Line {
            item: "Health insurance",
            amount: format_currency(-breakdown.health_insurance),
        });
    }
    if billing.is_fiscal() {
        lines.push(Line {
            item: "Tax base",
            amount: format_currency(breakdown.tax_base),
        });
        lines.push(Line {
            item: "PIT",
            amount: format_currency(-breakdown.tax),
        });
    }
    lines.push(Line {
        item: "Net",
        amount: format_currency(breakdown.net).bold().to_string(),
    });

    let mut table = Table::new(&lines);
    table.with(Style::rounded());
    table.modify(Columns::new(1..), Alignment::right());

    format!(
        "\n{} {} ({})\n\n{}\n",
        "💰".cyan().bold(),
        billing.display_name().bold(),
        billing.as_str(),
        table
    )
}

/// One row per billing type for the same gross
pub fn format_comparison_table(gross: Decimal, rows: &[(BillingType, TaxBreakdown)]) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Type")]
        billing: &'static str,
        #[tabled(rename = "Commission")]
        commission: String,
        #[tabled(rename = "KUP")]
        kup: String,
        #[tabled(rename = "PIT")]
        tax: String,
        #[tabled(rename = "ZUS + health")]
        contributions: String,
        #[tabled(rename = "Net")]
        net: String,
    }

    let best = rows.iter().map(|(_, b)| b.net).max();

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|(billing, b)| {
            let net = format_decimal_pl(b.net);
            Row {
                billing: billing.as_str(),
                commission: format_decimal_pl(b.commission),
                kup: format_decimal_pl(b.kup),
                tax: format_decimal_pl(b.tax),
                contributions: format_decimal_pl(b.social_insurance + b.health_insurance),
                net: if Some(b.net) == best {
                    net.green().bold().to_string()
                } else {
                    net
                },
            }
        })
        .collect();

    let mut table = Table::new(&table_rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());

    format!(
        "\n{} Net from {} gross\n\n{}\n",
        "📊".cyan().bold(),
        format_currency(gross),
        table
    )
}

pub fn format_collabs_table(collabs: &[Collaboration]) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Brand")]
        brand: String,
        #[tabled(rename = "Type")]
        billing: String,
        #[tabled(rename = "Gross")]
        gross: String,
        #[tabled(rename = "Net")]
        net: String,
        #[tabled(rename = "Team")]
        team: String,
        #[tabled(rename = "Paid")]
        paid: String,
    }

    let rows: Vec<Row> = collabs
        .iter()
        .map(|c| Row {
            id: c.id.map(|id| id.to_string()).unwrap_or_default(),
            date: c.collab_date.format(DATE_FORMAT).to_string(),
            brand: c.brand.clone(),
            billing: if c.billing().is_some() {
                c.billing_type.clone()
            } else {
                format!("{} (?)", c.billing_type).yellow().to_string()
            },
            gross: format_decimal_pl(c.amount_gross),
            net: format_decimal_pl(c.breakdown().net),
            team: if c.team_members.is_empty() {
                "-".to_string()
            } else {
                format!("{} ({})", c.team_members.len(), format_decimal_pl(c.team_total()))
            },
            paid: if c.is_paid {
                "yes".green().to_string()
            } else {
                "no".yellow().to_string()
            },
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(4..6), Alignment::right());

    let total_net: Decimal = collabs.iter().map(|c| c.breakdown().net).sum();
    format!(
        "{}\n\n{:<12} {}\n",
        table,
        "Total net:".bold(),
        format_currency(total_net).green()
    )
}

pub fn format_purchases_table(purchases: &[Purchase], as_of: NaiveDate) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Store")]
        store: String,
        #[tabled(rename = "Bought")]
        bought: String,
        #[tabled(rename = "Amount")]
        amount: String,
        #[tabled(rename = "Deadline")]
        deadline: String,
        #[tabled(rename = "Days left")]
        days_left: String,
        #[tabled(rename = "Urgency")]
        urgency: String,
        #[tabled(rename = "Status")]
        status: String,
    }

    let rows: Vec<Row> = purchases
        .iter()
        .map(|p| {
            let status = p.return_status(as_of);
            let open = p.status.is_open();
            Row {
                id: p.id.map(|id| id.to_string()).unwrap_or_default(),
                store: p.store_name.clone(),
                bought: p.purchase_date.format(DATE_FORMAT).to_string(),
                amount: format_decimal_pl(p.amount),
                deadline: status.return_deadline.format(DATE_FORMAT).to_string(),
                days_left: if open {
                    days_left_label(status.days_remaining)
                } else {
                    "-".to_string()
                },
                urgency: if open {
                    colored_urgency(status.urgency).to_string()
                } else {
                    "-".to_string()
                },
                status: match p.returned_at {
                    Some(day) => format!("{} {}", p.status, day.format(DATE_FORMAT)),
                    None => p.status.to_string(),
                },
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(3..4), Alignment::right());
    table.to_string()
}

pub fn format_ideas_table(ideas: &[VideoIdea]) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Title")]
        title: String,
        #[tabled(rename = "Platform")]
        platform: String,
        #[tabled(rename = "Status")]
        status: String,
    }

    let rows: Vec<Row> = ideas
        .iter()
        .map(|i| Row {
            id: i.id.map(|id| id.to_string()).unwrap_or_default(),
            title: i.title.clone(),
            platform: i
                .platform
                .map(|p| p.display_name().to_string())
                .unwrap_or_else(|| "-".to_string()),
            status: i.status.as_str().to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.to_string()
}

pub fn format_followers_table(snapshots: &[FollowerSnapshot]) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Platform")]
        platform: &'static str,
        #[tabled(rename = "Followers")]
        followers: i64,
        #[tabled(rename = "Recorded")]
        recorded: String,
    }

    let rows: Vec<Row> = snapshots
        .iter()
        .map(|s| Row {
            platform: s.platform.display_name(),
            followers: s.followers,
            recorded: s.recorded_on.format(DATE_FORMAT).to_string(),
        })
        .collect();
    let total: i64 = snapshots.iter().map(|s| s.followers).sum();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..2), Alignment::right());

    format!("{}\n\n{:<12} {}\n", table, "Total:".bold(), total.to_string().green())
}

fn totals_line(label: &str, totals: &IncomeTotals) -> String {
    format!(
        "  {:<10} {:>3} collabs  gross {:>16}  net {:>16}",
        label,
        totals.count,
        format_currency(totals.gross),
        format_currency(totals.net).green()
    )
}

pub fn format_income_report(report: &IncomeReport) -> String {
    #[derive(Tabled)]
    struct MonthRow {
        #[tabled(rename = "Month")]
        month: &'static str,
        #[tabled(rename = "Collabs")]
        count: usize,
        #[tabled(rename = "Gross")]
        gross: String,
        #[tabled(rename = "Commission")]
        commission: String,
        #[tabled(rename = "PIT")]
        tax: String,
        #[tabled(rename = "ZUS + health")]
        contributions: String,
        #[tabled(rename = "Net")]
        net: String,
    }

    #[derive(Tabled)]
    struct TypeRow {
        #[tabled(rename = "Type")]
        billing: String,
        #[tabled(rename = "Collabs")]
        count: usize,
        #[tabled(rename = "Gross")]
        gross: String,
        #[tabled(rename = "Net")]
        net: String,
    }

    let mut output = format!("\n{} Income {}\n\n", "📊".cyan().bold(), report.year);

    let months: Vec<MonthRow> = report
        .months
        .iter()
        .map(|m| MonthRow {
            month: m.month_name,
            count: m.totals.count,
            gross: format_decimal_pl(m.totals.gross),
            commission: format_decimal_pl(m.totals.commission),
            tax: format_decimal_pl(m.totals.tax),
            contributions: format_decimal_pl(m.totals.contributions),
            net: format_decimal_pl(m.totals.net),
        })
        .collect();
    let mut table = Table::new(&months);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());

    let types: Vec<TypeRow> = report
        .by_billing_type
        .iter()
        .map(|(tag, totals)| TypeRow {
            billing: tag.clone(),
            count: totals.count,
            gross: format_decimal_pl(totals.gross),
            net: format_decimal_pl(totals.net),
        })
        .collect();
    let mut table = Table::new(&types);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&format!("\n\n{}\n{}\n\n", "By billing type:".bold(), table));

    output.push_str(&totals_line("Fiscal", &report.fiscal));
    output.push('\n');
    output.push_str(&totals_line("Cash", &report.cash));
    output.push('\n');
    output.push_str(&totals_line("Total", &report.total));
    output.push('\n');

    if report.unpaid_net > Decimal::ZERO {
        output.push_str(&format!(
            "\n{} Awaiting payment: {}\n",
            "ℹ".blue().bold(),
            format_currency(report.unpaid_net).yellow()
        ));
    }
    if report.unknown_billing_rows > 0 {
        output.push_str(&format!(
            "{} {} collaboration(s) have an unknown billing type and are counted at gross\n",
            "⚠".yellow().bold(),
            report.unknown_billing_rows
        ));
    }

    output
}

/// Urgent returns widget, shared by `purchases urgent` and the dashboard
pub fn format_urgent_widget(count: usize, purchases: &[UrgentReturn]) -> String {
    if count == 0 {
        return format!("{} No returns due this week\n", "✓".green().bold());
    }

    let mut output = format!(
        "{} {} return(s) due within a week\n",
        "⏰".yellow().bold(),
        count.to_string().yellow().bold()
    );
    for p in purchases {
        output.push_str(&format!(
            "  #{:<4} {:<24} {:>14}  {:>6}  {}\n",
            p.id.map(|id| id.to_string()).unwrap_or_default(),
            p.store_name,
            format_currency(p.amount),
            days_left_label(p.days_remaining),
            colored_urgency(p.urgency)
        ));
    }
    output
}

pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let mut output = format!(
        "\n{} Dashboard {}\n\n",
        "📊".cyan().bold(),
        dashboard.as_of.format(DATE_FORMAT)
    );

    output.push_str(&format!("{}\n", format!("Income {}", dashboard.income.year).bold()));
    output.push_str(&totals_line("Fiscal", &dashboard.income.fiscal));
    output.push('\n');
    output.push_str(&totals_line("Cash", &dashboard.income.cash));
    output.push_str("\n\n");

    output.push_str(&format!("{}\n", "Returns".bold()));
    output.push_str(&format_urgent_widget(dashboard.urgent_count, &dashboard.urgent_returns));
    if dashboard.overdue_open > 0 {
        output.push_str(&format!(
            "  {} open purchase(s) past their deadline\n",
            dashboard.overdue_open.to_string().red()
        ));
    }
    output.push('\n');

    output.push_str(&format!("{}\n", "Ideas".bold()));
    if dashboard.ideas_by_status.is_empty() {
        output.push_str("  none yet\n");
    } else {
        let pipeline: Vec<String> = dashboard
            .ideas_by_status
            .iter()
            .map(|(status, count)| format!("{} {}", status.as_str(), count))
            .collect();
        output.push_str(&format!("  {}\n", pipeline.join("  →  ")));
    }
    output.push('\n');

    output.push_str(&format!("{}\n", "Followers".bold()));
    for f in &dashboard.followers {
        output.push_str(&format!("  {:<10} {:>10}\n", f.platform, f.followers));
    }
    output.push_str(&format!(
        "  {:<10} {:>10}\n",
        "Total",
        dashboard.total_followers.to_string().green().bold()
    ));

    output
}
