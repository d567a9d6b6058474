use serde::Deserialize;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::model::{Area, AreaId, Direction, Exit, MAX_ROOM_EXITS, Room, RoomId};
use super::object::{Flag, GameObject, ObjectDocument};
use crate::error::{Result, WorldError};

/// Encoding of an area document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(DocumentFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(DocumentFormat::Toml),
            _ => Err(WorldError::Parse(format!(
                "'{}': expected a .json or .toml area document",
                path.display()
            ))),
        }
    }
}

///////////////////////
/// DOCUMENT STRUCTS ///
///////////////////////

#[derive(Deserialize)]
struct AreaFile {
    id: AreaId,
    name: String,
    rooms: Vec<RoomConfig>,
}

#[derive(Deserialize)]
struct RoomConfig {
    id: RoomId,
    area_id: AreaId,
    name: String,
    description: String,

    // Four slots: north, east, south, west. Null or negative means no exit.
    exits: Vec<Option<i64>>,

    #[serde(default)]
    exit_areas: Vec<Option<AreaId>>,

    #[serde(default)]
    locked_exits: Vec<Option<Flag>>,

    #[serde(default)]
    objects: Vec<ObjectDocument>,
}

//////////////////////////
/// AREA PARSE FUNCTIONS ///
//////////////////////////

/// Load an area from a `.json` or `.toml` file on disk.
pub fn load_area_from_file(path: &Path) -> Result<Area> {
    let format = DocumentFormat::from_path(path)?;
    let contents = fs::read_to_string(path).map_err(|source| WorldError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let area = load_area_from_str(&contents, format).inspect_err(|e| {
        warn!("Rejected area document '{}': {}", path.display(), e);
    })?;

    info!(
        "Loaded area {} '{}' ({} rooms) from {}",
        area.id,
        area.name,
        area.num_rooms(),
        path.display()
    );
    Ok(area)
}

/// Build an area from document text. Nothing is kept on failure: every
/// room and object built so far is dropped with the error.
pub fn load_area_from_str(contents: &str, format: DocumentFormat) -> Result<Area> {
    let area_file: AreaFile = match format {
        DocumentFormat::Json => serde_json::from_str(contents)?,
        DocumentFormat::Toml => toml::from_str(contents)?,
    };

    if area_file.name.trim().is_empty() {
        return Err(WorldError::validation("name", "area name may not be empty"));
    }

    let mut rooms: Vec<Room> = Vec::with_capacity(area_file.rooms.len());
    for room_cfg in area_file.rooms {
        rooms.push(build_room(room_cfg)?);
    }

    Area::new(area_file.id, area_file.name, rooms)
}

fn build_room(cfg: RoomConfig) -> Result<Room> {
    for (field, len) in [
        ("exits", cfg.exits.len()),
        ("exit_areas", cfg.exit_areas.len()),
        ("locked_exits", cfg.locked_exits.len()),
    ] {
        if len > MAX_ROOM_EXITS {
            return Err(WorldError::validation(
                field,
                format!(
                    "room {} has {} entries (max: {})",
                    cfg.id, len, MAX_ROOM_EXITS
                ),
            ));
        }
    }

    let mut room = Room::new(
        cfg.id,
        cfg.area_id,
        cfg.name,
        normalize_multiline_desc(&cfg.description),
    );

    for direction in Direction::ALL {
        let i = direction.index();

        let to_room = match cfg.exits.get(i).copied().flatten() {
            Some(id) if id >= 0 => RoomId::try_from(id).map_err(|_| {
                WorldError::validation(
                    "exits",
                    format!("room {} exit {} targets out-of-range room {}", cfg.id, direction, id),
                )
            })?,
            _ => continue,
        };
        let to_area = cfg
            .exit_areas
            .get(i)
            .copied()
            .flatten()
            .unwrap_or(cfg.area_id);
        let locked = cfg
            .locked_exits
            .get(i)
            .copied()
            .flatten()
            .is_some_and(Flag::as_bool);

        room = room.with_exit(
            direction,
            Exit {
                to_room,
                to_area,
                locked,
            },
        );
    }

    for doc in cfg.objects {
        let obj = GameObject::from_document(doc)?;
        room.occupants().put_object(obj);
    }

    Ok(room)
}

/// Collapse the author's line wrapping: single breaks become spaces, one
/// blank line becomes a newline, two or more become a paragraph break.
fn normalize_multiline_desc(raw: &str) -> String {
    let mut result = String::new();
    let mut pending_blank_lines = 0usize;
    let mut first_text_seen = false;

    for line in raw.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            pending_blank_lines += 1;
            continue;
        }

        if first_text_seen {
            match pending_blank_lines {
                0 => result.push(' '),
                1 => result.push('\n'),
                _ => result.push_str("\n\n"),
            }
        }
        result.push_str(trimmed);
        first_text_seen = true;
        pending_blank_lines = 0;
    }

    result
}
