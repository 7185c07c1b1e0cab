// Reports module - income summaries, CSV export and the dashboard snapshot

pub mod dashboard;
pub mod export;
pub mod income;

pub use dashboard::{build_dashboard, urgent_widget, Dashboard, UrgentReturn};
pub use export::{collaborations_csv_string, export_collaborations_csv, write_collaborations_csv};
pub use income::{calculate_income_report, summarize_income, IncomeReport, IncomeTotals};
