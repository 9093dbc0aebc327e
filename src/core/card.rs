//! Catalog data model: operators, charge cards, and price lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// A charging network operator. Owned by the catalog; this crate only
/// reads it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub identifier: String,
    pub name: String,

    /// Logo locator, content-addressed by its file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One priced tariff product usable at an operator's chargers.
///
/// A value type: replaced wholesale on refresh, never mutated field by
/// field.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, bon::Builder)]
pub struct ChargeCard {
    #[builder(into)]
    pub identifier: String,

    #[builder(into)]
    pub name: String,

    #[builder(into)]
    pub provider: String,

    /// €/kWh.
    pub price: f64,

    /// Minute from which the per-minute blocking fee applies.
    #[serde(default, rename = "blockingFeeStart", skip_serializing_if = "Option::is_none")]
    pub blocking_fee_start: Option<u32>,

    /// €/min once the blocking fee applies.
    #[serde(default, rename = "blockingFee", skip_serializing_if = "Option::is_none")]
    pub blocking_fee: Option<f64>,

    #[serde(default, rename = "monthlyFee", skip_serializing_if = "Option::is_none")]
    pub monthly_fee: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Purchase page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Card logo locator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Freshness timestamp, epoch seconds on the wire.
    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    pub updated: DateTime<Utc>,
}

/// Charging current type, priced independently per operator.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, derive_more::Display)]
pub enum ChargeType {
    #[display("AC")]
    Ac,

    #[display("DC")]
    Dc,
}

/// The catalog's answer for one operator: its metadata and both price
/// lists. The lists may differ in length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperatorPrices {
    pub operator: Operator,

    #[serde(default)]
    pub ac: Vec<ChargeCard>,

    #[serde(default)]
    pub dc: Vec<ChargeCard>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_round_trips_with_epoch_seconds() -> crate::prelude::Result {
        let json = r#"{
            "identifier": "adac",
            "name": "ADAC e-Charge",
            "provider": "EnBW",
            "price": 0.57,
            "blockingFeeStart": 240,
            "blockingFee": 0.1,
            "updated": 1700000000
        }"#;
        let card: ChargeCard = serde_json::from_str(json)?;
        assert_eq!(card.updated.timestamp(), 1_700_000_000);
        assert_eq!(card.blocking_fee_start, Some(240));
        assert!(card.monthly_fee.is_none());

        let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&card)?)?;
        assert_eq!(value["updated"], 1_700_000_000);
        assert_eq!(value["blockingFee"], 0.1);
        assert!(value.get("note").is_none());
        Ok(())
    }
}
