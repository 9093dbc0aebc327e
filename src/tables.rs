use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::{
    card::{ChargeCard, Operator},
    maingau,
    merge::MergedEntry,
};

pub fn build_price_table(entries: &[MergedEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Card", "Provider", "AC €/kWh", "DC €/kWh", "Monthly", ""]);
    for entry in entries {
        let Some(card) = entry.ac.as_ref().or(entry.dc.as_ref()) else {
            continue;
        };
        let name_cell = if entry.identifier == maingau::CARD_IDENTIFIER {
            Cell::new(&card.name).fg(Color::Yellow)
        } else {
            Cell::new(&card.name)
        };
        table.add_row(vec![
            name_cell,
            Cell::new(&card.provider).add_attribute(Attribute::Dim),
            price_cell(entry.ac.as_ref()),
            price_cell(entry.dc.as_ref()),
            monthly_cell(card),
            blocking_fee_cell(entry),
        ]);
    }
    table
}

pub fn build_operator_table(operators: &[Operator]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Identifier", "Name"]);
    for operator in operators {
        table.add_row(vec![
            Cell::new(&operator.identifier).add_attribute(Attribute::Dim),
            Cell::new(&operator.name),
        ]);
    }
    table
}

fn price_cell(card: Option<&ChargeCard>) -> Cell {
    match card {
        Some(card) => Cell::new(format!("{:.2}", card.price)).set_alignment(CellAlignment::Right),
        None => Cell::new("–").set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
    }
}

fn monthly_cell(card: &ChargeCard) -> Cell {
    match card.monthly_fee {
        Some(fee) if fee > 0.0 => {
            Cell::new(format!("{fee:.2}")).set_alignment(CellAlignment::Right)
        }
        _ => Cell::new("–").set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
    }
}

/// Marks cards that charge a per-minute fee after the grace period.
fn blocking_fee_cell(entry: &MergedEntry) -> Cell {
    let has_blocking_fee = [entry.ac.as_ref(), entry.dc.as_ref()]
        .into_iter()
        .flatten()
        .any(|card| card.blocking_fee.is_some_and(|fee| fee > 0.0));
    if has_blocking_fee { Cell::new("▲").fg(Color::DarkYellow) } else { Cell::new("") }
}
