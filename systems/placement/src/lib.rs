#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Placement system validating and applying defender placement and removal.
//!
//! Every rejection updates the world status with the player-facing reason and
//! is reported through a rejection event, so collaborators never need to
//! translate error values themselves.

use std::time::Duration;

use lane_defence_core::{CellCoord, DefenderId, DefenderKind, Event, IntentError, RemovalCause};
use lane_defence_world::World;
use tracing::debug;

/// Checks whether a defender of `kind` may be placed at `cell` at time `now`.
///
/// Conditions are evaluated in a fixed order and the first failure is
/// reported: battle active, cell in bounds, cell free, type known, resource
/// sufficient, card cooldown elapsed.
pub fn can_place(
    world: &World,
    cell: CellCoord,
    kind: &DefenderKind,
    now: Duration,
) -> Result<(), IntentError> {
    if !world.is_battle_active() {
        return Err(IntentError::NotActive);
    }
    if !world.contains_cell(cell) {
        return Err(IntentError::InvalidCell);
    }
    if world.find_defender_at(cell).is_some() {
        return Err(IntentError::Occupied);
    }
    let definition = world
        .defender_definition(kind)
        .ok_or(IntentError::UnknownType)?;
    if world.sun() < definition.cost {
        return Err(IntentError::InsufficientResource);
    }
    if now < world.cooldown_until(kind) {
        return Err(IntentError::CoolingDown);
    }
    Ok(())
}

/// Places a defender of `kind` at `cell`, debiting its cost and starting the card cooldown.
pub fn place(
    world: &mut World,
    cell: CellCoord,
    kind: &DefenderKind,
    now: Duration,
    out_events: &mut Vec<Event>,
) -> Result<DefenderId, IntentError> {
    if let Err(reason) = can_place(world, cell, kind, now) {
        return Err(reject_placement(world, cell, reason, out_events));
    }
    let Some(definition) = world.defender_definition(kind).cloned() else {
        return Err(reject_placement(
            world,
            cell,
            IntentError::UnknownType,
            out_events,
        ));
    };

    let defender = world.factory().make_defender(&definition, cell, now);
    let id = match world.insert_defender(defender) {
        Ok(id) => id,
        Err(_) => {
            return Err(reject_placement(
                world,
                cell,
                IntentError::Occupied,
                out_events,
            ))
        }
    };
    let _ = world.debit_sun(definition.cost);
    world.set_cooldown_until(kind.clone(), now + definition.cooldown());
    world.set_status(format!("Planted {}", definition.name));

    debug!(
        target: "lane_defence::placement",
        defender = id.get(),
        kind = %kind,
        row = cell.row(),
        column = cell.column(),
        "defender placed"
    );
    out_events.push(Event::DefenderPlaced {
        defender: id,
        kind: kind.clone(),
        cell,
        cost: definition.cost,
    });
    Ok(id)
}

/// Places the currently selected card at `cell`, clearing the selection on success.
pub fn place_selected(
    world: &mut World,
    cell: CellCoord,
    now: Duration,
    out_events: &mut Vec<Event>,
) -> Result<DefenderId, IntentError> {
    let Some(kind) = world.selected_card().cloned() else {
        let reason = if world.is_battle_active() {
            IntentError::UnknownType
        } else {
            IntentError::NotActive
        };
        return Err(reject_placement(world, cell, reason, out_events));
    };
    let id = place(world, cell, &kind, now, out_events)?;
    world.clear_selection();
    Ok(id)
}

/// Removes the defender occupying `cell`.
pub fn remove_at(
    world: &mut World,
    cell: CellCoord,
    out_events: &mut Vec<Event>,
) -> Result<DefenderId, IntentError> {
    let target = if !world.is_battle_active() {
        Err(IntentError::NotActive)
    } else if !world.contains_cell(cell) {
        Err(IntentError::InvalidCell)
    } else {
        world
            .find_defender_at(cell)
            .map(|defender| defender.id)
            .ok_or(IntentError::Empty)
    };

    let id = match target {
        Ok(id) => id,
        Err(reason) => {
            world.set_status(reason.to_string());
            out_events.push(Event::RemovalRejected { cell, reason });
            return Err(reason);
        }
    };

    let _ = world.remove_defender_with_cause(id, RemovalCause::Player, out_events);
    world.set_status("Defender removed");
    debug!(target: "lane_defence::placement", defender = id.get(), "defender dug up");
    Ok(id)
}

fn reject_placement(
    world: &mut World,
    cell: CellCoord,
    reason: IntentError,
    out_events: &mut Vec<Event>,
) -> IntentError {
    world.set_status(reason.to_string());
    debug!(target: "lane_defence::placement", reason = reason.code(), "placement rejected");
    out_events.push(Event::PlacementRejected { cell, reason });
    reason
}
