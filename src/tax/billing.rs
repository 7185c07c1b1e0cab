use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PanelError;

/// How a collaboration was billed. Drives the tax engine branch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum BillingType {
    /// Umowa o dzieło, 50% KUP
    #[serde(rename = "umowa_50")]
    Umowa50,
    /// Umowa o dzieło, 20% KUP
    #[serde(rename = "umowa_20")]
    Umowa20,
    /// Contract through Use.me, 50% KUP plus platform commission
    #[serde(rename = "useme_50")]
    Useme50,
    /// Contract through Use.me, 20% KUP plus platform commission
    #[serde(rename = "useme_20")]
    Useme20,
    /// Umowa o pracę (ZUS + health + PIT withheld)
    UmowaPraca,
    /// Cash, no deductions and not declared
    Gotowka,
}

impl BillingType {
    pub const ALL: [BillingType; 6] = [
        BillingType::Umowa50,
        BillingType::Umowa20,
        BillingType::Useme50,
        BillingType::Useme20,
        BillingType::UmowaPraca,
        BillingType::Gotowka,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingType::Umowa50 => "umowa_50",
            BillingType::Umowa20 => "umowa_20",
            BillingType::Useme50 => "useme_50",
            BillingType::Useme20 => "useme_20",
            BillingType::UmowaPraca => "umowa_praca",
            BillingType::Gotowka => "gotowka",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BillingType::Umowa50 => "Umowa o dzieło (50% KUP)",
            BillingType::Umowa20 => "Umowa o dzieło (20% KUP)",
            BillingType::Useme50 => "Use.me (50% KUP)",
            BillingType::Useme20 => "Use.me (20% KUP)",
            BillingType::UmowaPraca => "Umowa o pracę",
            BillingType::Gotowka => "Gotówka",
        }
    }

    /// Standard cost deduction rate, `None` for types without KUP.
    pub fn kup_rate(&self) -> Option<Decimal> {
        match self {
            BillingType::Umowa50 | BillingType::Useme50 => Some(Decimal::new(50, 2)),
            BillingType::Umowa20 | BillingType::Useme20 => Some(Decimal::new(20, 2)),
            BillingType::UmowaPraca | BillingType::Gotowka => None,
        }
    }

    /// Billed through the Use.me platform (commission applies)
    pub fn is_platform(&self) -> bool {
        matches!(self, BillingType::Useme50 | BillingType::Useme20)
    }

    /// Income that must be declared. Cash is tracked privately only.
    pub fn is_fiscal(&self) -> bool {
        !matches!(self, BillingType::Gotowka)
    }
}

impl fmt::Display for BillingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingType {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "umowa_50" => Ok(BillingType::Umowa50),
            "umowa_20" => Ok(BillingType::Umowa20),
            "useme_50" => Ok(BillingType::Useme50),
            "useme_20" => Ok(BillingType::Useme20),
            "umowa_praca" => Ok(BillingType::UmowaPraca),
            "gotowka" | "gotówka" => Ok(BillingType::Gotowka),
            _ => Err(PanelError::UnknownBillingType(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_from_str() {
        for billing in BillingType::ALL {
            assert_eq!(billing.as_str().parse::<BillingType>().unwrap(), billing);
        }
    }

    #[test]
    fn test_from_str_is_lenient_about_case_and_dashes() {
        assert_eq!("USEME-50".parse::<BillingType>().unwrap(), BillingType::Useme50);
        assert_eq!(" Umowa_Praca ".parse::<BillingType>().unwrap(), BillingType::UmowaPraca);
        assert_eq!("gotówka".parse::<BillingType>().unwrap(), BillingType::Gotowka);
        assert_eq!("GOTÓWKA".parse::<BillingType>().unwrap(), BillingType::Gotowka);
    }

    #[test]
    fn test_unknown_tag_is_an_error() {
        let err = "b2b".parse::<BillingType>().unwrap_err();
        assert!(matches!(err, PanelError::UnknownBillingType(ref t) if t == "b2b"));
    }

    #[test]
    fn test_only_cash_is_outside_fiscal_tracking() {
        let non_fiscal: Vec<_> = BillingType::ALL.iter().filter(|b| !b.is_fiscal()).collect();
        assert_eq!(non_fiscal, vec![&BillingType::Gotowka]);
    }

    #[test]
    fn test_serde_uses_wire_tags() {
        let json = serde_json::to_string(&BillingType::Useme20).unwrap();
        assert_eq!(json, "\"useme_20\"");
        let parsed: BillingType = serde_json::from_str("\"umowa_praca\"").unwrap();
        assert_eq!(parsed, BillingType::UmowaPraca);
    }
}
