//! UK tax-year configuration and banded tax arithmetic
//!
//! All tax constants (personal allowance, income-tax bands, National
//! Insurance thresholds, stamp-duty schedules, ISA/pension allowances) live
//! in a versioned [`TaxYearConfig`] record rather than in algorithm code, so
//! a new tax year is a config change, not a code change.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit TOML path, when the caller provides one
//! 2. Fall back to embedded defaults (2025/26, compiled into the binary)

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::TaxAssessment;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/uk_2025_26.toml");

/// One marginal band: a rate applied to the slice of the amount that falls
/// below `up_to` and above the previous band's ceiling. The final band of a
/// schedule leaves `up_to` unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to: Option<f64>,
    pub rate: f64,
}

/// Income-tax section: personal allowance plus ascending marginal bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxConfig {
    pub personal_allowance: f64,
    pub bands: Vec<Band>,
}

/// Employee Class 1 National Insurance thresholds and rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalInsuranceConfig {
    pub primary_threshold: f64,
    pub upper_earnings_limit: f64,
    pub main_rate: f64,
    pub upper_rate: f64,
}

/// Annual contribution allowances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowancesConfig {
    pub isa_annual: f64,
    pub pension_annual: f64,
}

/// State pension entitlement used by the retirement planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePensionConfig {
    pub annual_amount: f64,
}

/// Stamp-duty schedules: standard bands plus the first-time-buyer relief
/// schedule, which only applies at or below `first_time_buyer_cap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampDutyConfig {
    pub first_time_buyer_cap: f64,
    pub standard: Vec<Band>,
    pub first_time_buyer: Vec<Band>,
}

/// All constants for one UK tax year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    /// Label such as "2025/26"
    pub tax_year: String,
    pub income_tax: IncomeTaxConfig,
    pub national_insurance: NationalInsuranceConfig,
    pub allowances: AllowancesConfig,
    pub state_pension: StatePensionConfig,
    pub stamp_duty: StampDutyConfig,
}

impl TaxYearConfig {
    /// Load tax-year constants.
    ///
    /// With a path, reads that TOML file; otherwise parses the embedded
    /// 2025/26 defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = match path {
            Some(p) => {
                debug!(path = %p.display(), "Loading tax config from file");
                toml::from_str(&fs::read_to_string(p)?)?
            }
            None => toml::from_str(DEFAULT_CONFIG)?,
        };
        Ok(config)
    }

    /// Parse tax-year constants from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Income tax due on a gross annual income.
    ///
    /// Taxable income is everything above the personal allowance; each
    /// band's rate applies only to the slice inside that band, in ascending
    /// order.
    pub fn income_tax_due(&self, annual_gross: f64) -> f64 {
        banded_tax(
            annual_gross,
            self.income_tax.personal_allowance,
            &self.income_tax.bands,
        )
    }

    /// Employee National Insurance due on a gross annual income.
    ///
    /// Main rate between the primary threshold and upper earnings limit,
    /// upper rate above the limit, each on its own slice.
    pub fn national_insurance_due(&self, annual_gross: f64) -> f64 {
        let ni = &self.national_insurance;
        let main_slice =
            (annual_gross.min(ni.upper_earnings_limit) - ni.primary_threshold).max(0.0);
        let upper_slice = (annual_gross - ni.upper_earnings_limit).max(0.0);
        main_slice * ni.main_rate + upper_slice * ni.upper_rate
    }

    /// Combined income tax + NI assessment for a gross annual income
    pub fn calculate_tax_and_ni(&self, annual_gross: f64) -> TaxAssessment {
        let gross = annual_gross.max(0.0);
        let income_tax = self.income_tax_due(gross);
        let national_insurance = self.national_insurance_due(gross);
        let total_deductions = income_tax + national_insurance;
        let effective_rate = if gross > 0.0 {
            (total_deductions / gross * 100.0).round() as u8
        } else {
            0
        };
        TaxAssessment {
            income_tax,
            national_insurance,
            total_deductions,
            effective_rate,
        }
    }

    /// Stamp duty on a property purchase.
    ///
    /// First-time-buyer relief applies only at or below the relief cap;
    /// above it the purchase falls back to the standard schedule.
    pub fn stamp_duty(&self, price: f64, first_time_buyer: bool) -> f64 {
        let schedule = if first_time_buyer && price <= self.stamp_duty.first_time_buyer_cap {
            &self.stamp_duty.first_time_buyer
        } else {
            &self.stamp_duty.standard
        };
        banded_tax(price, 0.0, schedule)
    }
}

/// Walk ascending marginal bands, taxing the slice of `amount` inside each
/// band above `floor`. No band is skipped and none is double-counted.
fn banded_tax(amount: f64, floor: f64, bands: &[Band]) -> f64 {
    let mut total = 0.0;
    let mut lower = floor;
    for band in bands {
        let upper = band.up_to.unwrap_or(f64::MAX);
        let slice = (amount.min(upper) - lower).max(0.0);
        total += slice * band.rate;
        if upper >= amount {
            break;
        }
        lower = upper;
    }
    total
}
