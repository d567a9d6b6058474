use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::world::GameObject;

pub type EntityId = u64;

/// Activity an NPC is shown doing in a room description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharStatus {
    #[default]
    Standing,
    Sitting,
    Resting,
    Sleeping,
    Fighting,
    Dead,
}

impl CharStatus {
    pub fn label(self) -> &'static str {
        match self {
            CharStatus::Standing => "standing here",
            CharStatus::Sitting => "sitting here",
            CharStatus::Resting => "resting here",
            CharStatus::Sleeping => "sleeping here",
            CharStatus::Fighting => "fighting",
            CharStatus::Dead => "lying dead here",
        }
    }
}

/// A player or NPC as seen from a room. The owner of the entity also owns
/// its back-reference to the room it is in; adding or removing it here
/// does not touch that.
pub trait Occupant: Send + Sync {
    fn id(&self) -> EntityId;
    fn name(&self) -> &str;
}

pub trait NpcOccupant: Occupant {
    fn status(&self) -> CharStatus;
}

#[derive(Default)]
struct Occupants {
    players: Vec<Arc<dyn Occupant>>,
    npcs: Vec<Arc<dyn NpcOccupant>>,
    objects: Vec<GameObject>,
}

/// Point-in-time copy of a room's occupants, in storage order.
pub struct OccupancySnapshot {
    pub players: Vec<Arc<dyn Occupant>>,
    pub npcs: Vec<Arc<dyn NpcOccupant>>,
    pub objects: Vec<GameObject>,
}

/// The three occupant sets of one room, serialized by a single lock.
///
/// Every method takes the lock once and never calls out while holding it,
/// except `with_objects`, whose closure must not touch this same room.
#[derive(Default)]
pub struct RoomOccupancy {
    inner: Mutex<Occupants>,
}

impl fmt::Debug for RoomOccupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("RoomOccupancy")
            .field("players", &inner.players.len())
            .field("npcs", &inner.npcs.len())
            .field("objects", &inner.objects.len())
            .finish()
    }
}

impl RoomOccupancy {
    /// Returns false, leaving the set as it was, if a player with the same
    /// id is already here.
    pub fn add_player(&self, player: Arc<dyn Occupant>) -> bool {
        let id = player.id();
        let mut inner = self.inner.lock();
        if inner.players.iter().any(|p| p.id() == id) {
            return false;
        }
        debug!("player {} '{}' enters", id, player.name());
        inner.players.push(player);
        true
    }

    /// Returns whether the player was present.
    pub fn remove_player(&self, player: &dyn Occupant) -> bool {
        let id = player.id();
        let mut inner = self.inner.lock();
        match inner.players.iter().position(|p| p.id() == id) {
            Some(idx) => {
                inner.players.remove(idx);
                debug!("player {} leaves", id);
                true
            }
            None => false,
        }
    }

    /// Returns false if an NPC with the same id is already here.
    pub fn add_npc(&self, npc: Arc<dyn NpcOccupant>) -> bool {
        let id = npc.id();
        let mut inner = self.inner.lock();
        if inner.npcs.iter().any(|n| n.id() == id) {
            return false;
        }
        debug!("npc {} '{}' enters", id, npc.name());
        inner.npcs.push(npc);
        true
    }

    /// Returns whether the NPC was present.
    pub fn remove_npc(&self, npc: &dyn NpcOccupant) -> bool {
        let id = npc.id();
        let mut inner = self.inner.lock();
        match inner.npcs.iter().position(|n| n.id() == id) {
            Some(idx) => {
                inner.npcs.remove(idx);
                debug!("npc {} leaves", id);
                true
            }
            None => false,
        }
    }

    pub fn contains_player(&self, id: EntityId) -> bool {
        self.inner.lock().players.iter().any(|p| p.id() == id)
    }

    /// Current players in storage order.
    pub fn players(&self) -> Vec<Arc<dyn Occupant>> {
        self.inner.lock().players.clone()
    }

    /// Current NPCs in storage order.
    pub fn npcs(&self) -> Vec<Arc<dyn NpcOccupant>> {
        self.inner.lock().npcs.clone()
    }

    pub fn player_count(&self) -> usize {
        self.inner.lock().players.len()
    }

    pub fn npc_count(&self) -> usize {
        self.inner.lock().npcs.len()
    }

    /// Takes ownership of `obj`; it now lives in this room.
    pub fn put_object(&self, obj: GameObject) {
        self.inner.lock().objects.push(obj);
    }

    /// Remove and hand back the first object matching `key`.
    pub fn take_object(&self, key: &str) -> Option<GameObject> {
        let mut inner = self.inner.lock();
        let idx = inner.objects.iter().position(|o| o.matches_keyword(key))?;
        let obj = inner.objects.remove(idx);
        debug!("object '{}' taken with key '{}'", obj.name, key);
        Some(obj)
    }

    pub fn object_names(&self) -> Vec<String> {
        self.inner
            .lock()
            .objects
            .iter()
            .map(|o| o.name.clone())
            .collect()
    }

    pub fn object_count(&self) -> usize {
        self.inner.lock().objects.len()
    }

    /// Copy of all three sets taken under one acquisition of the lock.
    pub fn snapshot(&self) -> OccupancySnapshot {
        let inner = self.inner.lock();
        OccupancySnapshot {
            players: inner.players.clone(),
            npcs: inner.npcs.clone(),
            objects: inner.objects.clone(),
        }
    }

    /// Run `f` over the objects while holding this room's lock.
    pub fn with_objects<R>(&self, f: impl FnOnce(&[GameObject]) -> R) -> R {
        let inner = self.inner.lock();
        f(&inner.objects)
    }
}

/// First object, in storage order, with a keyword that `key` is a
/// case-insensitive prefix of. Keywords are tried in declared order, so
/// the earliest stored object wins any ambiguity.
pub fn lookup_object_by_keyword<'a>(
    objects: &'a [GameObject],
    key: &str,
) -> Option<&'a GameObject> {
    objects.iter().find(|o| o.matches_keyword(key))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) struct TestPlayer {
        pub id: EntityId,
        pub name: String,
    }

    impl Occupant for TestPlayer {
        fn id(&self) -> EntityId {
            self.id
        }
        fn name(&self) -> &str {
            &self.name
        }
    }

    pub(crate) struct TestNpc {
        pub id: EntityId,
        pub name: String,
        pub status: CharStatus,
    }

    impl Occupant for TestNpc {
        fn id(&self) -> EntityId {
            self.id
        }
        fn name(&self) -> &str {
            &self.name
        }
    }

    impl NpcOccupant for TestNpc {
        fn status(&self) -> CharStatus {
            self.status
        }
    }

    pub(crate) fn player(id: EntityId, name: &str) -> Arc<TestPlayer> {
        Arc::new(TestPlayer {
            id,
            name: name.to_string(),
        })
    }

    fn object(name: &str, keywords: &[&str]) -> GameObject {
        GameObject::new(name, keywords.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn ids(occ: &RoomOccupancy) -> Vec<EntityId> {
        occ.players().iter().map(|p| p.id()).collect()
    }

    #[test]
    fn test_add_then_remove_restores_membership() {
        let occ = RoomOccupancy::default();
        occ.add_player(player(1, "ana"));
        occ.add_player(player(2, "bo"));
        let before = ids(&occ);

        let carl = player(3, "carl");
        occ.add_player(carl.clone());
        assert!(occ.contains_player(3));
        assert!(occ.remove_player(carl.as_ref()));

        assert_eq!(ids(&occ), before);
    }

    #[test]
    fn test_remove_absent_player_is_not_an_error() {
        let occ = RoomOccupancy::default();
        occ.add_player(player(1, "ana"));
        assert!(!occ.remove_player(player(9, "ghost").as_ref()));
        assert_eq!(occ.player_count(), 1);
    }

    #[test]
    fn test_npcs_add_remove() {
        let occ = RoomOccupancy::default();
        let rat = Arc::new(TestNpc {
            id: 10,
            name: "a rat".to_string(),
            status: CharStatus::Sleeping,
        });
        occ.add_npc(rat.clone());
        assert_eq!(occ.npc_count(), 1);
        assert_eq!(occ.npcs()[0].status(), CharStatus::Sleeping);

        assert!(occ.remove_npc(rat.as_ref()));
        assert!(!occ.remove_npc(rat.as_ref()));
        assert_eq!(occ.npc_count(), 0);
    }

    #[test]
    fn test_lookup_first_match_wins() {
        let objects = vec![
            object("a sword and shield", &["sword", "shield"]),
            object("a swan", &["swan"]),
        ];

        let hit = lookup_object_by_keyword(&objects, "sw").unwrap();
        assert_eq!(hit.name, "a sword and shield");
        assert_eq!(lookup_object_by_keyword(&objects, "SWA").unwrap().name, "a swan");
        assert!(lookup_object_by_keyword(&objects, "axe").is_none());
        assert_eq!(
            lookup_object_by_keyword(&objects, "").unwrap().name,
            "a sword and shield"
        );
    }

    #[test]
    fn test_double_add_keeps_one_entry() {
        let occ = RoomOccupancy::default();
        let ana = player(1, "ana");
        assert!(occ.add_player(ana.clone()));
        assert!(!occ.add_player(ana.clone()));
        assert!(!occ.add_player(player(1, "ana again")));
        assert_eq!(occ.player_count(), 1);

        assert!(occ.remove_player(ana.as_ref()));
        assert_eq!(occ.player_count(), 0);
        assert!(!occ.contains_player(1));

        let rat = Arc::new(TestNpc {
            id: 10,
            name: "a rat".to_string(),
            status: CharStatus::Standing,
        });
        assert!(occ.add_npc(rat.clone()));
        assert!(!occ.add_npc(rat.clone()));
        assert!(occ.remove_npc(rat.as_ref()));
        assert_eq!(occ.npc_count(), 0);
    }

    #[test]
    fn test_snapshot_copies_all_sets() {
        let occ = RoomOccupancy::default();
        occ.add_player(player(1, "ana"));
        occ.put_object(object("a lamp", &["lamp"]));

        let snap = occ.snapshot();
        occ.add_player(player(2, "bo"));

        assert_eq!(snap.players.len(), 1);
        assert!(snap.npcs.is_empty());
        assert_eq!(snap.objects[0].name, "a lamp");
    }

    #[test]
    fn test_take_object_transfers_ownership() {
        let occ = RoomOccupancy::default();
        occ.put_object(object("a lamp", &["lamp"]));
        occ.put_object(object("a ladder", &["ladder"]));

        let taken = occ.take_object("la").unwrap();
        assert_eq!(taken.name, "a lamp");
        assert_eq!(occ.object_names(), vec!["a ladder"]);
        assert!(occ.take_object("lamp").is_none());
    }

    #[test]
    fn test_with_objects_sees_storage_order() {
        let occ = RoomOccupancy::default();
        occ.put_object(object("first", &["one"]));
        occ.put_object(object("second", &["two"]));

        let found =
            occ.with_objects(|objs| lookup_object_by_keyword(objs, "t").map(|o| o.name.clone()));
        assert_eq!(found.as_deref(), Some("second"));
        assert_eq!(occ.object_count(), 2);
    }
}
