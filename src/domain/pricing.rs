//! Valuation and mortgage arithmetic used for display.

use crate::domain::entities::{EnergyLabel, Property, ValuationBasis};

/// Half-width of the valuation range.
pub const VALUATION_SPREAD: f64 = 0.05;

/// Transfer tax on owner-occupied homes.
pub const TRANSFER_TAX_RATE: f64 = 0.02;

/// Relative price effect of an energy label.
pub fn energy_label_premium(label: Option<EnergyLabel>) -> f64 {
    match label {
        Some(EnergyLabel::APlus4 | EnergyLabel::APlus3 | EnergyLabel::APlus2) => 0.04,
        Some(EnergyLabel::APlus1 | EnergyLabel::A) => 0.03,
        Some(EnergyLabel::B) => 0.015,
        Some(EnergyLabel::C) | None => 0.0,
        Some(EnergyLabel::D) => -0.01,
        Some(EnergyLabel::E) => -0.02,
        Some(EnergyLabel::F) => -0.03,
        Some(EnergyLabel::G) => -0.04,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationEstimate {
    pub estimated_value: i64,
    pub low_estimate: i64,
    pub high_estimate: i64,
    pub price_per_m2: Option<i64>,
    pub basis: ValuationBasis,
}

/// Estimates the market value of a property.
///
/// The base is the WOZ value when known, else the asking price, else living
/// area times `regional_price_per_m2`. The base is indexed by the regional
/// year-on-year change only when it is the WOZ value (which lags the market
/// by a year), then corrected for the energy label.
pub fn estimate_value(
    property: &Property,
    regional_price_per_m2: f64,
    yearly_change_pct: f64,
) -> ValuationEstimate {
    let (base, basis, indexed) = match (property.woz_value, property.asking_price) {
        (Some(woz), _) if woz > 0 => (woz as f64, ValuationBasis::WozValue, true),
        (_, asking) if asking > 0 => (asking as f64, ValuationBasis::AskingPrice, false),
        _ => (
            f64::from(property.living_area_m2.max(0)) * regional_price_per_m2,
            ValuationBasis::LivingArea,
            false,
        ),
    };

    let index = if indexed {
        1.0 + yearly_change_pct / 100.0
    } else {
        1.0
    };
    let estimate = base * index * (1.0 + energy_label_premium(property.energy_label));

    let price_per_m2 = (property.living_area_m2 > 0)
        .then(|| (estimate / f64::from(property.living_area_m2)).round() as i64);

    ValuationEstimate {
        estimated_value: round_to_thousand(estimate),
        low_estimate: round_to_thousand(estimate * (1.0 - VALUATION_SPREAD)),
        high_estimate: round_to_thousand(estimate * (1.0 + VALUATION_SPREAD)),
        price_per_m2,
        basis,
    }
}

fn round_to_thousand(value: f64) -> i64 {
    ((value / 1_000.0).round() * 1_000.0) as i64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MortgageQuote {
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub transfer_tax: f64,
    pub total_cost: f64,
}

/// Annuity mortgage quote for a purchase.
///
/// `annual_rate_pct` is the nominal yearly interest rate in percent,
/// compounded monthly. A zero rate repays the loan linearly.
pub fn mortgage_quote(
    purchase_price: f64,
    down_payment: f64,
    annual_rate_pct: f64,
    years: u32,
) -> MortgageQuote {
    let loan_amount = (purchase_price - down_payment).max(0.0);
    let months = f64::from(years.max(1) * 12);
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;

    let monthly_payment = if monthly_rate == 0.0 {
        loan_amount / months
    } else {
        loan_amount * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-months))
    };

    let total_paid = monthly_payment * months;
    let total_interest = total_paid - loan_amount;
    let transfer_tax = purchase_price * TRANSFER_TAX_RATE;

    MortgageQuote {
        loan_amount: round_cents(loan_amount),
        monthly_payment: round_cents(monthly_payment),
        total_interest: round_cents(total_interest),
        transfer_tax: round_cents(transfer_tax),
        total_cost: round_cents(down_payment + total_paid + transfer_tax),
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
