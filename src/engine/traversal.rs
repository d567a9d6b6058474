use std::collections::{HashMap, VecDeque};

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, WorldError};
use crate::world::{Area, Direction, Location, RoomId, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Color {
    Unvisited,
    Discovered,
    Finished,
}

/// Breadth-first search state for one area, indexed by room id. Rooms the
/// search never reached keep `Unvisited`, distance 0 and no predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Traversal {
    pub colors: Vec<Color>,
    pub distances: Vec<u32>,
    pub predecessors: Vec<Option<RoomId>>,
}

impl Traversal {
    fn new(num_rooms: usize) -> Self {
        Traversal {
            colors: vec![Color::Unvisited; num_rooms],
            distances: vec![0; num_rooms],
            predecessors: vec![None; num_rooms],
        }
    }

    pub fn reached(&self, room: RoomId) -> bool {
        self.colors
            .get(room)
            .is_some_and(|c| *c != Color::Unvisited)
    }

    pub fn distance(&self, room: RoomId) -> Option<u32> {
        self.reached(room).then(|| self.distances[room])
    }
}

/// Hop distances and the predecessor tree from `source` over the exits
/// that stay inside `area`. Exits are scanned in canonical direction
/// order, so when several rooms on one frontier could discover a room,
/// the first one dequeued claims it. Locked exits count as edges.
pub fn shortest_path(area: &Area, source: RoomId) -> Result<Traversal> {
    let n = area.num_rooms();
    if source >= n {
        return Err(WorldError::InvalidArgument(format!(
            "source room {} is outside area {} (0..{})",
            source, area.id, n
        )));
    }

    let mut data = Traversal::new(n);
    let mut queue: VecDeque<RoomId> = VecDeque::with_capacity(n);

    data.colors[source] = Color::Discovered;
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        let Some(room) = area.room(u) else { continue };

        for (_, exit) in room.exits() {
            if exit.leaves_area(area.id) {
                continue;
            }
            let v = exit.to_room;
            if data.colors.get(v) == Some(&Color::Unvisited) {
                data.colors[v] = Color::Discovered;
                data.distances[v] = data.distances[u] + 1;
                data.predecessors[v] = Some(u);
                queue.push_back(v);
            }
        }
        data.colors[u] = Color::Finished;
    }

    debug!(
        "bfs from {}:{} reached {} of {} rooms",
        area.id,
        source,
        data.colors.iter().filter(|c| **c == Color::Finished).count(),
        n
    );
    Ok(data)
}

/// Rooms from `source` to `target`, both included, following the
/// predecessor tree of `result`. `None` when `target` was not reached
/// from `source`.
pub fn reconstruct_path(result: &Traversal, source: RoomId, target: RoomId) -> Option<Vec<RoomId>> {
    if target >= result.predecessors.len() {
        return None;
    }

    let mut path = vec![target];
    let mut current = target;
    while current != source {
        current = result.predecessors[current]?;
        path.push(current);
        // A predecessor chain is a tree; a longer walk means `result` was not built from `source`.
        if path.len() > result.predecessors.len() {
            return None;
        }
    }

    path.reverse();
    Some(path)
}

/// Directions to walk along a path produced by `reconstruct_path`.
pub fn path_directions(area: &Area, path: &[RoomId]) -> Option<Vec<Direction>> {
    path.windows(2)
        .map(|pair| {
            area.room(pair[0])?
                .exits()
                .find(|(_, e)| !e.leaves_area(area.id) && e.to_room == pair[1])
                .map(|(d, _)| d)
        })
        .collect()
}

/// One move of a cross-area route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteStep {
    pub direction: Direction,
    pub to: Location,
}

/// Shortest route between any two loaded rooms, following exits across
/// area boundaries. Exits into areas or rooms that are not loaded are
/// skipped. `Ok(None)` when `to` is unreachable.
pub fn find_route(world: &World, from: Location, to: Location) -> Result<Option<Vec<RouteStep>>> {
    world.room_at(from)?;
    world.room_at(to)?;

    let mut came_from: HashMap<Location, (Location, Direction)> = HashMap::new();
    let mut queue: VecDeque<Location> = VecDeque::new();
    queue.push_back(from);

    let mut found = from == to;
    while let Some(here) = queue.pop_front() {
        if found {
            break;
        }
        let room = world.room_at(here)?;

        for (direction, exit) in room.exits() {
            let next = exit.destination();
            if next == from || came_from.contains_key(&next) || world.room_at(next).is_err() {
                continue;
            }
            came_from.insert(next, (here, direction));
            if next == to {
                found = true;
                break;
            }
            queue.push_back(next);
        }
    }

    if !found {
        return Ok(None);
    }

    let mut steps: Vec<RouteStep> = Vec::new();
    let mut current = to;
    while current != from {
        let Some(&(prev, direction)) = came_from.get(&current) else {
            return Ok(None);
        };
        steps.push(RouteStep {
            direction,
            to: current,
        });
        current = prev;
    }
    steps.reverse();
    Ok(Some(steps))
}
