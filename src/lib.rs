pub mod config;
pub mod engine;
pub mod error;
pub mod world;

pub use config::WorldConfig;
pub use engine::{
    AnsiColors, CharStatus, Color, EntityId, NpcOccupant, OccupancySnapshot, Occupant, PlainText,
    Presenter, RouteStep, Traversal, describe_room, find_route, lookup_object_by_keyword,
    path_directions, reconstruct_path, shortest_path,
};
pub use error::{Result, WorldError};
pub use world::{
    Area, AreaId, Direction, DocumentFormat, Exit, GameObject, Location, ObjectDocument,
    ObjectKind, Rarity, Room, RoomId, World, load_area_from_file, load_area_from_str,
};

#[cfg(feature = "wasm")]
mod wasm_bindings {
    use super::*;
    use serde::Serialize;
    use serde_wasm_bindgen::to_value;
    use wasm_bindgen::prelude::*;

    #[derive(Serialize)]
    struct WasmPath {
        rooms: Vec<RoomId>,
        directions: Vec<Direction>,
    }

    #[wasm_bindgen]
    pub struct WasmWorld {
        world: World,
        area_id: AreaId,
    }

    #[wasm_bindgen]
    impl WasmWorld {
        /// Build a one-area world from a TOML area document.
        #[wasm_bindgen(constructor)]
        pub fn new(area_toml: &str) -> std::result::Result<WasmWorld, JsValue> {
            let mut world = World::new();
            let area_id = world
                .load_area_from_str(area_toml, DocumentFormat::Toml)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(WasmWorld { world, area_id })
        }

        /// Plain-text description of a room, or an empty string for unknown ids.
        #[wasm_bindgen]
        pub fn describe(&self, room_id: usize) -> String {
            match self.world.get_room(self.area_id, room_id) {
                Ok(room) => describe_room(room, None, &PlainText),
                Err(_) => String::new(),
            }
        }

        /// Shortest path between two rooms of the area, or null.
        #[wasm_bindgen]
        pub fn path(&self, from: usize, to: usize) -> JsValue {
            let Some(area) = self.world.area(self.area_id) else {
                return JsValue::NULL;
            };
            let Ok(result) = shortest_path(area, from) else {
                return JsValue::NULL;
            };
            match reconstruct_path(&result, from, to) {
                Some(rooms) => {
                    let directions = path_directions(area, &rooms).unwrap_or_default();
                    to_value(&WasmPath { rooms, directions }).unwrap_or(JsValue::NULL)
                }
                None => JsValue::NULL,
            }
        }
    }
}
