use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use super::loader::{DocumentFormat, load_area_from_file, load_area_from_str};
use super::model::{Area, AreaId, Direction, Location, Room, RoomId};
use super::validator::validate_world;
use crate::config::WorldConfig;
use crate::error::{Result, WorldError};

/// Table of loaded areas.
///
/// Areas are added through `&mut self` during startup; once the world is
/// shared (typically as `Arc<World>`) it is read-only and lookups need no
/// locking. Only per-room occupant sets change after that point.
#[derive(Debug, Default)]
pub struct World {
    areas: BTreeMap<AreaId, Area>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every area listed in `config`, in order, then report any
    /// cross-area references that do not resolve.
    pub fn load_from_config(config: &WorldConfig) -> Result<Self> {
        let mut world = World::new();
        for file in &config.areas {
            world.load_area(&config.area_dir.join(file))?;
        }

        for issue in validate_world(&world) {
            warn!("{}", issue.message);
        }

        info!("World ready: {} areas", world.areas.len());
        Ok(world)
    }

    /// Load one area document and register it. On failure the registry is
    /// left exactly as it was.
    pub fn load_area(&mut self, path: &Path) -> Result<AreaId> {
        let area = load_area_from_file(path)?;
        self.insert_area(area)
    }

    pub fn load_area_from_str(&mut self, contents: &str, format: DocumentFormat) -> Result<AreaId> {
        let area = load_area_from_str(contents, format)?;
        self.insert_area(area)
    }

    pub fn insert_area(&mut self, area: Area) -> Result<AreaId> {
        if self.areas.contains_key(&area.id) {
            return Err(WorldError::validation(
                "id",
                format!("area {} is already loaded", area.id),
            ));
        }
        let id = area.id;
        self.areas.insert(id, area);
        Ok(id)
    }

    pub fn area(&self, id: AreaId) -> Option<&Area> {
        self.areas.get(&id)
    }

    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.values()
    }

    pub fn get_room(&self, area_id: AreaId, room_id: RoomId) -> Result<&Room> {
        let area = self
            .area(area_id)
            .ok_or_else(|| WorldError::InvalidArgument(format!("unknown area {}", area_id)))?;
        area.room(room_id).ok_or_else(|| {
            WorldError::InvalidArgument(format!(
                "room {} is outside area {} (0..{})",
                room_id,
                area_id,
                area.num_rooms()
            ))
        })
    }

    pub fn room_at(&self, location: Location) -> Result<&Room> {
        self.get_room(location.area_id, location.room_id)
    }

    /// Follow the exit of `room` in `direction`, crossing into another
    /// area when the exit says so. Locked exits resolve like any other.
    pub fn exit_destination(&self, room: &Room, direction: Direction) -> Result<Option<&Room>> {
        match room.exit(direction) {
            Some(exit) => self.room_at(exit.destination()).map(Some),
            None => Ok(None),
        }
    }
}
