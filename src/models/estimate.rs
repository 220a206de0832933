use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ValidationError;

// ─── Calculator inputs ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SystemType {
    Solar,
    Wind,
    Battery,
    Hybrid,
}

impl SystemType {
    pub const ALL: [SystemType; 4] = [
        SystemType::Solar,
        SystemType::Wind,
        SystemType::Battery,
        SystemType::Hybrid,
    ];

    /// Battery capacity is quoted in kWh, everything else in kW.
    pub fn size_unit(&self) -> &'static str {
        match self {
            SystemType::Battery => "kWh",
            _ => "kW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserSegment {
    Residential,
    Commercial,
    Agricultural,
}

/// One calculator form submission. Built per request, discarded after the
/// result is produced — nothing here is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstimateInput {
    /// City or ZIP code
    pub location: String,
    /// Monthly energy usage in kWh
    pub monthly_usage_kwh: f64,
    /// Investment budget in configured currency
    pub budget: f64,
    pub system_type: SystemType,
    pub user_segment: UserSegment,
}

impl EstimateInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.location.trim().is_empty() {
            return Err(ValidationError::EmptyLocation);
        }
        if !self.monthly_usage_kwh.is_finite() || self.monthly_usage_kwh <= 0.0 {
            return Err(ValidationError::NonPositiveUsage(self.monthly_usage_kwh));
        }
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(ValidationError::NonPositiveBudget(self.budget));
        }
        Ok(())
    }
}

// ─── Calculator outputs ──────────────────────────────────────────────────────

/// One month of illustrative production/consumption chart data.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MonthlyPoint {
    /// Three-letter month label ("Jan" .. "Dec")
    pub month: String,
    pub production_kwh: f64,
    pub consumption_kwh: f64,
}

/// One year of the 25-year savings projection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct YearlyPoint {
    pub year: i32,
    pub annual_savings: f64,
    pub cumulative_savings: f64,
}

/// Full projection bundle for one estimate. Deterministic for a given input
/// except the two jittered chart series.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EstimateResult {
    pub system_type: SystemType,
    /// kW, or kWh for battery systems
    pub system_size: f64,
    /// "kW" or "kWh", per system type
    pub size_unit: String,
    pub initial_cost: f64,
    pub annual_production_kwh: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    /// Share of the monthly bill covered by savings, clamped to 0–100
    pub savings_percentage: f64,
    /// Years to recoup the budget; `None` when annual savings are zero
    pub break_even_years: Option<f64>,
    pub roi_10_year_percent: f64,
    pub co2_reduction_tons: f64,
    pub monthly_series: Vec<MonthlyPoint>,
    pub yearly_series: Vec<YearlyPoint>,
}

/// One row of the budget comparison table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComparisonRow {
    pub system_type: SystemType,
    pub system_size: f64,
    /// "kW" or "kWh", per system type
    pub size_unit: String,
    pub annual_production_kwh: f64,
    pub annual_savings: f64,
    pub break_even_years: Option<f64>,
    pub roi_10_year_percent: f64,
}

/// Side-by-side metrics for every system type at a single budget.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComparisonResult {
    pub budget: f64,
    pub rows: Vec<ComparisonRow>,
}

// ─── Quick estimator (ZIP-code teaser on the landing page) ──────────────────

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuickEstimateRequest {
    pub zip_code: String,
}

impl QuickEstimateRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.zip_code.trim().len() < 5 {
            return Err(ValidationError::InvalidZipCode);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuickEstimate {
    pub monthly_savings: f64,
    pub yearly_production_kwh: f64,
    pub co2_reduction_tons: f64,
}
