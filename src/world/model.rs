use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::RoomOccupancy;
use crate::error::{Result, WorldError};

pub type AreaId = u32;
pub type RoomId = usize;

/// Number of exit slots on every room.
pub const MAX_ROOM_EXITS: usize = 4;

//////////////////////////////
/// GAME STRUCTS AND ENUMS ///
//////////////////////////////

/// Exit directions in canonical scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; MAX_ROOM_EXITS] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Direction> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }

    pub fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Accepts full names and single-letter abbreviations, ignoring case.
    pub fn parse(s: &str) -> Option<Direction> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| s == d.name() || (s.len() == 1 && d.name().starts_with(s.as_str())))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One directed edge. Destination room, destination area and lock state
/// always travel together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exit {
    pub to_room: RoomId,
    pub to_area: AreaId,
    pub locked: bool,
}

impl Exit {
    pub fn new(to_area: AreaId, to_room: RoomId) -> Self {
        Exit {
            to_room,
            to_area,
            locked: false,
        }
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn destination(&self) -> Location {
        Location::new(self.to_area, self.to_room)
    }

    pub fn leaves_area(&self, from: AreaId) -> bool {
        self.to_area != from
    }
}

/// Position of an entity in the world. External owners keep one of these
/// as the back-reference to the room their entity occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub area_id: AreaId,
    pub room_id: RoomId,
}

impl Location {
    pub fn new(area_id: AreaId, room_id: RoomId) -> Self {
        Location { area_id, room_id }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.area_id, self.room_id)
    }
}

/// A graph node. Name, description and exits are fixed after load; the
/// occupant sets mutate behind their own lock.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub area_id: AreaId,
    pub name: String,
    pub description: String,
    exits: [Option<Exit>; MAX_ROOM_EXITS],
    occupants: RoomOccupancy,
}

impl Room {
    pub fn new(
        id: RoomId,
        area_id: AreaId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Room {
            id,
            area_id,
            name: name.into(),
            description: description.into(),
            exits: [None; MAX_ROOM_EXITS],
            occupants: RoomOccupancy::default(),
        }
    }

    pub fn with_exit(mut self, direction: Direction, exit: Exit) -> Self {
        self.exits[direction.index()] = Some(exit);
        self
    }

    pub fn location(&self) -> Location {
        Location::new(self.area_id, self.id)
    }

    pub fn exit(&self, direction: Direction) -> Option<&Exit> {
        self.exits[direction.index()].as_ref()
    }

    /// Existing exits in canonical direction order.
    pub fn exits(&self) -> impl Iterator<Item = (Direction, &Exit)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.exit(d).map(|e| (d, e)))
    }

    pub fn occupants(&self) -> &RoomOccupancy {
        &self.occupants
    }
}

/// A named set of rooms sharing one dense room-id space.
#[derive(Debug)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    rooms: Vec<Room>,
}

impl Area {
    /// Builds an area, placing each room at the index equal to its id.
    /// Ids must be unique and cover `0..rooms.len()` exactly.
    pub fn new(id: AreaId, name: impl Into<String>, rooms: Vec<Room>) -> Result<Self> {
        let count = rooms.len();
        let mut slots: Vec<Option<Room>> = (0..count).map(|_| None).collect();

        for room in rooms {
            if room.area_id != id {
                return Err(WorldError::validation(
                    "area_id",
                    format!(
                        "room {} belongs to area {} but was loaded into area {}",
                        room.id, room.area_id, id
                    ),
                ));
            }

            let room_id = room.id;
            let slot = slots.get_mut(room_id).ok_or_else(|| {
                WorldError::validation(
                    "id",
                    format!("room id {} is outside 0..{} (ids must be dense)", room_id, count),
                )
            })?;
            if slot.is_some() {
                return Err(WorldError::validation(
                    "id",
                    format!("duplicate room id {}", room_id),
                ));
            }
            *slot = Some(room);
        }

        // n rooms on n distinct ids below n: no slot is empty.
        let rooms: Vec<Room> = slots.into_iter().flatten().collect();

        for room in &rooms {
            for (direction, exit) in room.exits() {
                if !exit.leaves_area(id) && exit.to_room >= count {
                    return Err(WorldError::validation(
                        "exits",
                        format!(
                            "room {} exit {} targets missing room {}",
                            room.id, direction, exit.to_room
                        ),
                    ));
                }
            }
        }

        Ok(Area {
            id,
            name: name.into(),
            rooms,
        })
    }

    pub fn num_rooms(&self) -> usize {
        self.rooms.len()
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }
}
