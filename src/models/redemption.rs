use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Eligibility details returned by a successful validation.
///
/// Held by the controller only between validation and the next transition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RedemptionInfo {
    /// Display name of the credential holder
    #[serde(default)]
    pub holder_name: String,
    /// Campus or student identifier of the holder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_id: Option<String>,
    /// Human-readable description of the event or meal
    #[serde(default)]
    pub resource_label: String,
    /// Price charged on use, when the resource is paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Currency code for `price`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// When the credential was issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
    /// When the credential stops being valid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
}

impl RedemptionInfo {
    pub fn new(holder_name: impl Into<String>, resource_label: impl Into<String>) -> Self {
        Self {
            holder_name: holder_name.into(),
            resource_label: resource_label.into(),
            ..Self::default()
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

/// Confirmation that a credential has been consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedemptionReceipt {
    /// Server-side identifier of the redemption record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
    /// When the server recorded the redemption
    pub redeemed_at: DateTime<Utc>,
    /// Amount settled on use, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Optional confirmation text from the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RedemptionReceipt {
    pub fn new(redeemed_at: DateTime<Utc>) -> Self {
        Self {
            receipt_id: None,
            redeemed_at,
            amount: None,
            message: None,
        }
    }
}
