mod occupancy;
mod render;
mod traversal;

pub use occupancy::{
    CharStatus, EntityId, NpcOccupant, OccupancySnapshot, Occupant, RoomOccupancy,
    lookup_object_by_keyword,
};
pub use render::{AnsiColors, PlainText, Presenter, describe_room};
pub use traversal::{
    Color, RouteStep, Traversal, find_route, path_directions, reconstruct_path, shortest_path,
};
