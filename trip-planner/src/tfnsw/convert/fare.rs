//! Fare calculation from a journey's ticket list.

use serde_json::Value;
use tracing::debug;

use crate::domain::{Fare, FareStatus, PersonCategory};
use crate::tfnsw::types::{FareDto, TicketDto};

use super::{from_object, meaningful};

/// Compute the fare for one passenger category.
///
/// The ticket list mixes per-leg tickets with one summary ticket per
/// category (the one carrying an `evaluationTicket` code). The summary
/// ticket wins when present; otherwise the per-leg prices and access fees
/// are summed.
///
/// Returns `None` when the fare block is absent, has no tickets for the
/// category, or none of those tickets are priced.
pub fn convert_fare(fare: Option<&FareDto>, person: &PersonCategory) -> Option<Fare> {
    let tickets: Vec<TicketDto> = fare?
        .tickets
        .iter()
        .filter_map(|t: &Value| from_object::<TicketDto>(t, "ticket").ok())
        .filter(|t: &TicketDto| {
            t.person
                .as_deref()
                .is_some_and(|p| PersonCategory::from_api(p) == *person)
        })
        .collect();

    if tickets.is_empty() {
        debug!(person = %person, "no fare tickets for category");
        return None;
    }

    let summary = tickets.iter().find(|t| {
        t.properties
            .as_ref()
            .is_some_and(|p| p.evaluation_ticket.is_some())
    });

    match summary {
        Some(ticket) => summary_fare(ticket, person),
        None => per_leg_fare(&tickets, person),
    }
}

fn summary_fare(ticket: &TicketDto, person: &PersonCategory) -> Option<Fare> {
    let props = ticket.properties.as_ref()?;
    let access_fee = props.price_station_access_fee.unwrap_or(0.0);
    let price_total = props
        .price_total_fare
        .or_else(|| ticket.price_brutto.map(|p| p + access_fee))?;

    Some(Fare {
        person: person.clone(),
        price_total,
        ticket_price: ticket.price_brutto.unwrap_or(price_total - access_fee),
        station_access_fee: access_fee,
        status: props
            .evaluation_ticket
            .as_deref()
            .map_or(FareStatus::Unknown, FareStatus::from_api),
        rider_category_name: meaningful(props.rider_category_name.as_deref()),
        from_leg: ticket.from_leg,
        to_leg: ticket.to_leg,
    })
}

fn per_leg_fare(tickets: &[TicketDto], person: &PersonCategory) -> Option<Fare> {
    let priced: Vec<&TicketDto> = tickets.iter().filter(|t| t.price_brutto.is_some()).collect();
    if priced.is_empty() {
        debug!(person = %person, "fare tickets carry no prices");
        return None;
    }

    let ticket_price: f64 = priced.iter().filter_map(|t| t.price_brutto).sum();
    let access_fee: f64 = priced
        .iter()
        .filter_map(|t| t.properties.as_ref()?.price_station_access_fee)
        .sum();

    Some(Fare {
        person: person.clone(),
        price_total: ticket_price + access_fee,
        ticket_price,
        station_access_fee: access_fee,
        status: FareStatus::Unknown,
        rider_category_name: priced
            .iter()
            .find_map(|t| meaningful(t.properties.as_ref()?.rider_category_name.as_deref())),
        from_leg: priced.iter().filter_map(|t| t.from_leg).min(),
        to_leg: priced.iter().filter_map(|t| t.to_leg).max(),
    })
}
