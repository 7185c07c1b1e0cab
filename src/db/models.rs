use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PanelError;
use crate::returns::{self, PurchaseStatus, ReturnStatus, Returnable, StatusChange};
use crate::tax::{self, BillingType, TaxBreakdown};

/// Paid brand collaboration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaboration {
    pub id: Option<i64>,
    pub brand: String,
    pub description: Option<String>,
    pub collab_date: NaiveDate,
    pub amount_gross: Decimal,
    /// Raw tag as persisted; may be a value this build does not recognize
    pub billing_type: String,
    /// Net computed by the tax engine before the row was written
    pub amount_net: Decimal,
    pub is_paid: bool,
    pub notes: Option<String>,
    pub team_members: Vec<TeamMember>,
    pub created_at: DateTime<Utc>,
}

impl Collaboration {
    pub fn new(
        brand: &str,
        collab_date: NaiveDate,
        amount_gross: Decimal,
        billing_type: BillingType,
    ) -> Self {
        Self {
            id: None,
            brand: brand.to_string(),
            description: None,
            collab_date,
            amount_gross,
            billing_type: billing_type.as_str().to_string(),
            amount_net: tax::calculate_net(amount_gross, billing_type),
            is_paid: false,
            notes: None,
            team_members: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Parsed billing type, `None` for tags this build does not know
    pub fn billing(&self) -> Option<BillingType> {
        self.billing_type.parse().ok()
    }

    /// Breakdown of the stored gross. Unknown tags give the identity breakdown.
    pub fn breakdown(&self) -> TaxBreakdown {
        tax::breakdown_for_tag(self.amount_gross, &self.billing_type)
    }

    /// Cash income is tracked privately only. Unknown tags count as fiscal.
    pub fn is_fiscal(&self) -> bool {
        self.billing().map(|b| b.is_fiscal()).unwrap_or(true)
    }

    /// Recompute `amount_net` from gross and billing tag
    pub fn refresh_net(&mut self) {
        self.amount_net = tax::net_for_tag(self.amount_gross, &self.billing_type);
    }

    pub fn team_total(&self) -> Decimal {
        self.team_members.iter().map(|m| m.share_amount).sum()
    }
}

/// Person paid out of a collaboration (editor, photographer, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Option<i64>,
    pub collaboration_id: Option<i64>,
    pub name: String,
    pub share_amount: Decimal,
}

impl TeamMember {
    pub fn new(name: &str, share_amount: Decimal) -> Self {
        Self {
            id: None,
            collaboration_id: None,
            name: name.to_string(),
            share_amount,
        }
    }
}

/// Retail purchase that may still be returned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Option<i64>,
    pub store_name: String,
    pub items_description: Option<String>,
    pub purchase_date: NaiveDate,
    pub return_window_days: u32,
    pub amount: Decimal,
    pub status: PurchaseStatus,
    pub returned_amount: Option<Decimal>,
    pub returned_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    pub fn new(store_name: &str, purchase_date: NaiveDate, return_window_days: u32, amount: Decimal) -> Self {
        Self {
            id: None,
            store_name: store_name.to_string(),
            items_description: None,
            purchase_date,
            return_window_days,
            amount,
            status: PurchaseStatus::Kept,
            returned_amount: None,
            returned_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn return_status(&self, as_of: NaiveDate) -> ReturnStatus {
        returns::compute_return_status(self.purchase_date, self.return_window_days, as_of)
    }

    /// Move to `status`, maintaining `returned_at`
    pub fn set_status(&mut self, status: PurchaseStatus, as_of: NaiveDate) -> StatusChange {
        let from = self.status;
        self.returned_at = returns::next_returned_at(from, status, self.returned_at, as_of);
        self.status = status;

        StatusChange {
            from,
            to: status,
            returned_at: self.returned_at,
        }
    }
}

impl Returnable for Purchase {
    fn status(&self) -> PurchaseStatus {
        self.status
    }

    fn purchase_date(&self) -> NaiveDate {
        self.purchase_date
    }

    fn return_window_days(&self) -> u32 {
        self.return_window_days
    }

    fn returned_at(&self) -> Option<NaiveDate> {
        self.returned_at
    }

    fn sort_key(&self) -> Option<i64> {
        self.id
    }
}

/// Stage of a short-form video idea
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    Idea,
    Scripted,
    Filmed,
    Published,
}

impl IdeaStatus {
    pub const ALL: [IdeaStatus; 4] = [
        IdeaStatus::Idea,
        IdeaStatus::Scripted,
        IdeaStatus::Filmed,
        IdeaStatus::Published,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Idea => "idea",
            IdeaStatus::Scripted => "scripted",
            IdeaStatus::Filmed => "filmed",
            IdeaStatus::Published => "published",
        }
    }
}

impl FromStr for IdeaStatus {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idea" => Ok(IdeaStatus::Idea),
            "scripted" | "script" => Ok(IdeaStatus::Scripted),
            "filmed" => Ok(IdeaStatus::Filmed),
            "published" | "posted" => Ok(IdeaStatus::Published),
            other => Err(PanelError::ParseError(format!(
                "unknown idea status '{}' (expected idea, scripted, filmed or published)",
                other
            ))),
        }
    }
}

/// Social platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    #[serde(rename = "tiktok")]
    TikTok,
    #[serde(rename = "youtube")]
    YouTube,
    Facebook,
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
            Platform::Facebook => "facebook",
            Platform::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
            Platform::Facebook => "Facebook",
            Platform::Other => "Other",
        }
    }
}

impl FromStr for Platform {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" | "ig" => Ok(Platform::Instagram),
            "tiktok" | "tt" => Ok(Platform::TikTok),
            "youtube" | "yt" => Ok(Platform::YouTube),
            "facebook" | "fb" => Ok(Platform::Facebook),
            "other" => Ok(Platform::Other),
            other => Err(PanelError::ParseError(format!("unknown platform '{}'", other))),
        }
    }
}

/// Short-form video idea
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoIdea {
    pub id: Option<i64>,
    pub title: String,
    pub notes: Option<String>,
    pub platform: Option<Platform>,
    pub status: IdeaStatus,
    pub created_at: DateTime<Utc>,
}

/// Follower count for one platform on one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowerSnapshot {
    pub id: Option<i64>,
    pub platform: Platform,
    pub followers: i64,
    pub recorded_on: NaiveDate,
}
