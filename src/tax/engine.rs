use rust_decimal::Decimal;
use serde::Serialize;

use super::billing::BillingType;

/// PIT rate on the taxable base (12%)
pub const TAX_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);
/// Use.me commission as a share of gross (7.8%)
pub const USEME_COMMISSION_RATE: Decimal = Decimal::from_parts(78, 0, 0, false, 3);
/// Use.me never charges less than this (PLN)
pub const USEME_MIN_COMMISSION: Decimal = Decimal::from_parts(29, 0, 0, false, 0);
/// ZUS social insurance withheld from gross on umowa o pracę (13.71%)
pub const SOCIAL_INSURANCE_RATE: Decimal = Decimal::from_parts(1371, 0, 0, false, 4);
/// Health insurance on the post-ZUS base (9%)
pub const HEALTH_INSURANCE_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 2);

/// Itemized gross-to-net conversion.
///
/// Amounts are full precision; round only when presenting.
/// `net == gross - commission - social_insurance - health_insurance - tax` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    pub gross: Decimal,
    pub commission: Decimal,
    pub kup: Decimal,
    pub tax_base: Decimal,
    pub tax: Decimal,
    pub social_insurance: Decimal,
    pub health_insurance: Decimal,
    pub net: Decimal,
}

impl TaxBreakdown {
    /// No deductions at all: net equals gross.
    pub fn identity(gross: Decimal) -> Self {
        Self {
            gross,
            commission: Decimal::ZERO,
            kup: Decimal::ZERO,
            tax_base: Decimal::ZERO,
            tax: Decimal::ZERO,
            social_insurance: Decimal::ZERO,
            health_insurance: Decimal::ZERO,
            net: gross,
        }
    }

    /// Everything withheld between gross and net
    pub fn total_deductions(&self) -> Decimal {
        self.commission + self.social_insurance + self.health_insurance + self.tax
    }
}

/// Net amount for a gross amount under the given billing type.
pub fn calculate_net(gross: Decimal, billing_type: BillingType) -> Decimal {
    get_breakdown(gross, billing_type).net
}

/// Full breakdown for a gross amount under the given billing type.
///
/// Never fails. Negative gross is clamped to zero; callers are expected to
/// reject it before it gets here.
pub fn get_breakdown(gross: Decimal, billing_type: BillingType) -> TaxBreakdown {
    let gross = gross.max(Decimal::ZERO);

    match billing_type {
        BillingType::Umowa50 | BillingType::Umowa20 => contract_breakdown(gross, billing_type, Decimal::ZERO),
        BillingType::Useme50 | BillingType::Useme20 => {
            contract_breakdown(gross, billing_type, useme_commission(gross))
        }
        BillingType::UmowaPraca => employment_breakdown(gross),
        BillingType::Gotowka => TaxBreakdown::identity(gross),
    }
}

/// Breakdown for a raw billing tag as stored in the database.
///
/// Unrecognized tags fall back to the identity breakdown (net == gross).
/// That under-taxes bad data silently, so callers should log it.
pub fn breakdown_for_tag(gross: Decimal, tag: &str) -> TaxBreakdown {
    match tag.parse::<BillingType>() {
        Ok(billing_type) => get_breakdown(gross, billing_type),
        Err(_) => TaxBreakdown::identity(gross.max(Decimal::ZERO)),
    }
}

/// Net amount for a raw billing tag, see [`breakdown_for_tag`].
pub fn net_for_tag(gross: Decimal, tag: &str) -> Decimal {
    breakdown_for_tag(gross, tag).net
}

/// Use.me commission: 7.8% of gross with a 29 PLN floor
pub fn useme_commission(gross: Decimal) -> Decimal {
    (gross * USEME_COMMISSION_RATE).max(USEME_MIN_COMMISSION)
}

// KUP and tax base are computed from gross even when a commission is taken.
fn contract_breakdown(gross: Decimal, billing_type: BillingType, commission: Decimal) -> TaxBreakdown {
    let kup = gross * billing_type.kup_rate().unwrap_or(Decimal::ZERO);
    let tax_base = gross - kup;
    let tax = tax_base * TAX_RATE;

    TaxBreakdown {
        gross,
        commission,
        kup,
        tax_base,
        tax,
        social_insurance: Decimal::ZERO,
        health_insurance: Decimal::ZERO,
        net: gross - commission - tax,
    }
}

// ZUS from gross, then health and PIT on what is left after ZUS.
fn employment_breakdown(gross: Decimal) -> TaxBreakdown {
    let social_insurance = gross * SOCIAL_INSURANCE_RATE;
    let tax_base = gross - social_insurance;
    let health_insurance = tax_base * HEALTH_INSURANCE_RATE;
    let tax = tax_base * TAX_RATE;

    TaxBreakdown {
        gross,
        commission: Decimal::ZERO,
        kup: Decimal::ZERO,
        tax_base,
        tax,
        social_insurance,
        health_insurance,
        net: gross - social_insurance - health_insurance - tax,
    }
}
