use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser)]
#[command(name = "influ")]
#[command(
    version,
    about = "Admin panel for influencers: collaborations, Polish freelance tax, purchase returns"
)]
#[command(
    long_about = "Track brand collaborations with net income after Polish freelance deductions (KUP, PIT, Use.me commission, ZUS), purchase return deadlines, video ideas and follower counts."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long = "as-of", global = true, value_name = "DATE")]
    pub as_of: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Net income calculator
    Tax {
        #[command(subcommand)]
        action: TaxCommands,
    },

    /// Brand collaborations
    Collabs {
        #[command(subcommand)]
        action: CollabCommands,
    },

    /// Income summaries
    Income {
        #[command(subcommand)]
        action: IncomeCommands,
    },

    /// Purchases and their return deadlines
    Purchases {
        #[command(subcommand)]
        action: PurchaseCommands,
    },

    /// Video idea pipeline
    Ideas {
        #[command(subcommand)]
        action: IdeaCommands,
    },

    /// Follower counts per platform
    Followers {
        #[command(subcommand)]
        action: FollowerCommands,
    },

    /// Income, urgent returns, ideas and followers at a glance
    Dashboard {
        /// Income year (defaults to the year of --as-of)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum TaxCommands {
    /// Show the breakdown of one gross amount
    Calc {
        /// Gross amount in PLN (e.g., 1500 or "1 500,00")
        gross: String,

        /// Billing type: umowa_50, umowa_20, useme_50, useme_20, umowa_praca, gotowka
        billing_type: String,
    },

    /// Compare every billing type for one gross amount
    Compare {
        /// Gross amount in PLN
        gross: String,
    },
}

#[derive(Subcommand)]
pub enum CollabCommands {
    /// Add a collaboration
    Add {
        /// Brand name
        brand: String,

        /// Gross amount in PLN
        gross: String,

        /// Billing type (defaults to the configured one)
        billing_type: Option<String>,

        /// Collaboration date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Already paid
        #[arg(long)]
        paid: bool,

        #[arg(long)]
        notes: Option<String>,

        /// Team member share, as name=amount (repeatable)
        #[arg(short, long = "member", value_name = "NAME=AMOUNT")]
        members: Vec<String>,
    },

    /// List collaborations
    List {
        /// Only this year
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Change a collaboration; the net amount is recomputed
    Update {
        id: i64,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        gross: Option<String>,

        /// New billing type
        #[arg(long = "type", value_name = "BILLING_TYPE")]
        billing_type: Option<String>,

        #[arg(short, long)]
        date: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long, conflicts_with = "unpaid")]
        paid: bool,

        #[arg(long)]
        unpaid: bool,

        /// Replace team members, as name=amount (repeatable)
        #[arg(short, long = "member", value_name = "NAME=AMOUNT")]
        members: Vec<String>,

        /// Remove all team members
        #[arg(long, conflicts_with = "members")]
        clear_members: bool,
    },

    /// Delete a collaboration and its team members
    Remove { id: i64 },

    /// Export collaborations to CSV
    Export {
        /// Only this year
        #[arg(short, long)]
        year: Option<i32>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Monthly and per-billing-type totals for a year
    Summary { year: i32 },
}

#[derive(Subcommand)]
pub enum PurchaseCommands {
    /// Add a purchase
    Add {
        /// Store name
        store: String,

        /// Amount paid in PLN
        amount: String,

        /// What was bought
        #[arg(short, long)]
        items: Option<String>,

        /// Purchase date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Return window in days (defaults to the configured one)
        #[arg(short, long)]
        window: Option<u32>,
    },

    /// List purchases, most pressing deadline first
    List,

    /// Mark a purchase kept, partially returned or returned
    Status {
        id: i64,

        /// kept, partial or returned
        status: String,

        /// Amount refunded
        #[arg(long)]
        returned_amount: Option<String>,
    },

    /// Purchases to return within a week
    Urgent,

    /// Delete a purchase
    Remove { id: i64 },
}

#[derive(Subcommand)]
pub enum IdeaCommands {
    /// Add a video idea
    Add {
        title: String,

        #[arg(short, long)]
        notes: Option<String>,

        /// instagram, tiktok, youtube, facebook or other
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// List ideas
    List {
        /// idea, scripted, filmed or published
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Move an idea to another stage
    Status { id: i64, status: String },

    /// Delete an idea
    Remove { id: i64 },
}

#[derive(Subcommand)]
pub enum FollowerCommands {
    /// Record the follower count of a platform
    Record {
        platform: String,

        count: i64,

        /// Day of the count (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Latest count per platform and the total
    Show,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,
}
