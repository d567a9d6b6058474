use std::fmt::Write;

use crate::engine::occupancy::{CharStatus, EntityId};
use crate::world::{Rarity, Room};

/// Presentation hooks used while describing a room. The defaults produce
/// plain text.
pub trait Presenter {
    fn colorize(&self, _rarity: Rarity, raw: &str) -> String {
        raw.to_string()
    }

    fn status_label(&self, status: CharStatus) -> String {
        status.label().to_string()
    }
}

/// No styling at all.
pub struct PlainText;

impl Presenter for PlainText {}

/// Object names wrapped in ANSI colors by rarity.
pub struct AnsiColors;

impl Presenter for AnsiColors {
    fn colorize(&self, rarity: Rarity, raw: &str) -> String {
        let code = match rarity.color_code() {
            "&g" => "32",
            "&b" => "34",
            "&m" => "35",
            "&y" => "33",
            _ => "37",
        };
        format!("\x1b[{}m{}\x1b[0m", code, raw)
    }
}

/// Text sent to a viewer standing in `room`: name, description, exits in
/// canonical order, objects, NPCs with their status, then every other
/// player. `viewer` is left out of the player list.
pub fn describe_room(room: &Room, viewer: Option<EntityId>, presenter: &dyn Presenter) -> String {
    let mut buf = String::new();

    let _ = write!(buf, "\n{}\n{}\nExits: ", room.name, room.description);

    let exits: Vec<&str> = room.exits().map(|(d, _)| d.name()).collect();
    if exits.is_empty() {
        buf.push_str("(none)");
    } else {
        buf.push_str(&exits.join(", "));
    }

    let snapshot = room.occupants().snapshot();

    if !snapshot.objects.is_empty() {
        buf.push_str("\n\nItems:");
        for obj in &snapshot.objects {
            let _ = write!(buf, "\n  {}", presenter.colorize(obj.rarity, &obj.name));
        }
    }

    buf.push_str("\n\n");

    for npc in &snapshot.npcs {
        let _ = writeln!(buf, "{} is {}.", npc.name(), presenter.status_label(npc.status()));
    }

    let others: Vec<_> = snapshot
        .players
        .iter()
        .filter(|p| Some(p.id()) != viewer)
        .collect();
    if !others.is_empty() {
        buf.push_str("\nPeople in this room:");
        for p in &others {
            let _ = write!(buf, "\n  {}", p.name());
        }
    }

    buf
}
