//! Personalized EinfachStromLaden pricing for Maingau customers.

use chrono::Utc;

use crate::core::card::{ChargeCard, ChargeType};

/// Sentinel identifier marking the personalized record, so downstream
/// consumers can tell it apart from catalog cards.
pub const CARD_IDENTIFIER: &str = "maingau-personalized";

const CARD_NAME: &str = "EinfachStromLaden";
const PROVIDER: &str = "Maingau Energie";
const IONITY: &str = "ionity";

/// Flat customer rates in €/kWh. Stored data depends on the exact values.
const AC_RATE: f64 = 0.49;
const DC_RATE: f64 = 0.59;
const IONITY_DC_RATE: f64 = 0.75;

/// The personalized price record for the given operator and current type,
/// or `None` when the customer rate does not apply.
pub fn subscriber_card(
    charge_type: ChargeType,
    operator_id: &str,
    is_customer: bool,
) -> Option<ChargeCard> {
    if !is_customer {
        return None;
    }
    let price = if operator_id.eq_ignore_ascii_case(IONITY) {
        match charge_type {
            // Ionity AC keeps its catalog price even for customers.
            ChargeType::Ac => return None,
            ChargeType::Dc => IONITY_DC_RATE,
        }
    } else {
        match charge_type {
            ChargeType::Ac => AC_RATE,
            ChargeType::Dc => DC_RATE,
        }
    };
    Some(
        ChargeCard::builder()
            .identifier(CARD_IDENTIFIER)
            .name(CARD_NAME)
            .provider(PROVIDER)
            .price(price)
            .updated(Utc::now())
            .build(),
    )
}
