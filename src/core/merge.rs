//! Combines the AC and DC price lists of one operator into a unified,
//! display-ready sequence.

use itertools::Itertools;

use crate::core::{
    card::{ChargeCard, ChargeType, Operator},
    maingau,
};

/// The AC and DC sides of one card identifier. A side is `None` only if
/// neither the catalog nor the personalized rate supplied it.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedEntry {
    pub identifier: String,
    pub ac: Option<ChargeCard>,
    pub dc: Option<ChargeCard>,
}

/// Merge both price lists and apply the personalized rate on top.
///
/// The longer input list drives the ordering (AC on a tie); identifiers
/// that only appear in the shorter list are appended afterwards, in their
/// own order. Each distinct identifier yields exactly one entry.
pub fn merge(
    operator: &Operator,
    ac_cards: &[ChargeCard],
    dc_cards: &[ChargeCard],
    maingau_customer: bool,
) -> Vec<MergedEntry> {
    let (driver, trailer) = if dc_cards.len() > ac_cards.len() {
        (dc_cards, ac_cards)
    } else {
        (ac_cards, dc_cards)
    };
    let mut entries = driver
        .iter()
        .chain(trailer)
        .unique_by(|card| card.identifier.clone())
        .map(|card| MergedEntry {
            identifier: card.identifier.clone(),
            ac: find_card(ac_cards, &card.identifier),
            dc: find_card(dc_cards, &card.identifier),
        })
        .collect_vec();

    for charge_type in [ChargeType::Ac, ChargeType::Dc] {
        let Some(card) =
            maingau::subscriber_card(charge_type, &operator.identifier, maingau_customer)
        else {
            continue;
        };
        let index = entries
            .iter()
            .position(|entry| entry.identifier == card.identifier)
            .unwrap_or_else(|| {
                entries.push(MergedEntry {
                    identifier: card.identifier.clone(),
                    ac: None,
                    dc: None,
                });
                entries.len() - 1
            });
        match charge_type {
            ChargeType::Ac => entries[index].ac = Some(card),
            ChargeType::Dc => entries[index].dc = Some(card),
        }
    }

    entries
}

fn find_card(cards: &[ChargeCard], identifier: &str) -> Option<ChargeCard> {
    cards.iter().find(|card| card.identifier == identifier).cloned()
}
