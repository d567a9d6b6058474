mod loader;
mod model;
mod object;
mod registry;
mod validator;

pub use loader::{DocumentFormat, load_area_from_file, load_area_from_str};

pub use model::{Area, AreaId, Direction, Exit, Location, MAX_ROOM_EXITS, Room, RoomId};
pub use object::{
    Flag, GameObject, MAX_KEYWORD_LEN, MAX_KEYWORDS, MAX_NAME_LEN, ObjectDocument, ObjectKind,
    Rarity, Tag,
};
pub use registry::World;
pub use validator::{ValidationIssue, validate_world};
