use super::model::Location;
use super::object::ObjectKind;
use super::registry::World;

/// A reference in the loaded world that does not resolve. Reported, not fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: Location,
    pub message: String,
}

impl ValidationIssue {
    fn new(location: Location, msg: impl Into<String>) -> Self {
        ValidationIssue {
            location,
            message: msg.into(),
        }
    }
}

/// Check cross-area exits and key targets against everything loaded so far.
/// Same-area exits are already checked when an area is built.
pub fn validate_world(world: &World) -> Vec<ValidationIssue> {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    for area in world.areas() {
        for room in area.rooms() {
            let here = room.location();

            for (direction, exit) in room.exits() {
                if !exit.leaves_area(area.id) {
                    continue;
                }
                if world.room_at(exit.destination()).is_err() {
                    issues.push(ValidationIssue::new(
                        here,
                        format!(
                            "room {} exit {} targets missing room {}",
                            here,
                            direction,
                            exit.destination()
                        ),
                    ));
                }
            }

            room.occupants().with_objects(|objects| {
                for obj in objects {
                    if let ObjectKind::Key {
                        opens_area_id,
                        opens_room_id,
                    } = obj.kind
                    {
                        let target = Location::new(opens_area_id, opens_room_id);
                        if world.room_at(target).is_err() {
                            issues.push(ValidationIssue::new(
                                here,
                                format!(
                                    "key '{}' in room {} opens missing room {}",
                                    obj.name, here, target
                                ),
                            ));
                        }
                    }
                }
            });
        }
    }

    issues
}
