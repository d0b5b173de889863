use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A community member together with their metered usage, one reading per billing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub readings: Vec<f64>,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, readings: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            readings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub participant_id: String,
    pub name: String,
    pub total_usage: f64,
    pub average_usage: f64,
    /// Share of the community total, in `0.0..=1.0`.
    pub proportion: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTerms {
    pub installation_days: u32,
    pub warranty_years: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub provider_id: String,
    pub total_cost: Decimal,
    #[serde(default)]
    pub terms: QuoteTerms,
}

impl Quote {
    pub fn new(provider_id: impl Into<String>, total_cost: Decimal) -> Self {
        Self {
            provider_id: provider_id.into(),
            total_cost,
            terms: QuoteTerms::default(),
        }
    }

    pub fn with_terms(mut self, installation_days: u32, warranty_years: u32) -> Self {
        self.terms = QuoteTerms {
            installation_days,
            warranty_years,
        };
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBreakdownItem {
    pub participant_id: String,
    pub name: String,
    pub average_usage: f64,
    pub proportion: f64,
    pub full_payment: Decimal,
    pub monthly_installment: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub voter_id: String,
    pub option_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    NetBanking,
    Upi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentOption {
    Full,
    Installments(u32),
}

impl PaymentOption {
    pub fn payment_count(&self) -> u32 {
        match self {
            PaymentOption::Full => 1,
            PaymentOption::Installments(count) => *count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub transaction_id: Uuid,
    pub installment_number: u32,
    pub total_installments: u32,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub method: Option<PaymentMethod>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlan {
    pub id: Uuid,
    pub participant_id: String,
    pub option: PaymentOption,
    pub original_amount: Decimal,
    pub payments: Vec<Payment>,
    pub created_at: DateTime<Utc>,
}
