use crate::config::write_atomic;
use crate::error::PetError;
use crate::item::Inventory;
use crate::model::{Archetype, Character, Flags, Stats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

// Written out verbatim whenever no usable document exists on disk.
const DEFAULT_DOCUMENT: &str = include_str!("../assets/default_save.json");

/// Wire form of a character. Everything a slot needs to rebuild the pet:
/// identity, score, the five meters, the three condition flags, and the six
/// inventory counts. Cooldowns are deliberately absent; they reset on load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPayload {
    pub name: String,
    pub slot: u8,
    pub score: u32,
    pub archetype_id: u8,
    pub health: f32,
    pub sleep: f32,
    pub happiness: f32,
    pub fullness: f32,
    pub stress: f32,
    pub sleep_locked: bool,
    pub anger_locked: bool,
    pub hunger_locked: bool,
    pub items: [u32; 6],
}

impl CharacterPayload {
    pub fn from_character(c: &Character) -> Self {
        Self {
            name: c.name.clone(),
            slot: c.slot,
            score: c.score,
            archetype_id: c.archetype.id(),
            health: c.stats.health,
            sleep: c.stats.sleep,
            happiness: c.stats.happiness,
            fullness: c.stats.fullness,
            stress: c.stats.stress,
            sleep_locked: c.flags.sleep_locked,
            anger_locked: c.flags.anger_locked,
            hunger_locked: c.flags.hunger_locked,
            items: c.inventory.counts(),
        }
    }

    /// Fails on an unknown archetype id. Meters from a hand-edited file are
    /// snapped back into range rather than rejected.
    pub fn into_character(self) -> Result<Character, PetError> {
        let archetype = Archetype::from_id(self.archetype_id)?;
        let mut stats = Stats {
            health: self.health,
            sleep: self.sleep,
            happiness: self.happiness,
            fullness: self.fullness,
            stress: self.stress,
        };
        stats.clamp_all();
        Ok(Character {
            name: self.name,
            archetype,
            slot: self.slot,
            score: self.score,
            stats,
            flags: Flags {
                sleep_locked: self.sleep_locked,
                anger_locked: self.anger_locked,
                hunger_locked: self.hunger_locked,
            },
            inventory: Inventory::from_counts(self.items),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotEntry {
    #[serde(default)]
    pub character: Option<CharacterPayload>,
}

/// Flat settings and counters section. Counters are plain integers
/// throughout; nothing is wrapped in a type-tagged container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParentalControls {
    #[serde(rename = "Password")]
    pub password: String,
    pub morning_parent_block: bool,
    pub afternoon_parent_block: bool,
    pub evening_parent_block: bool,
    pub weekday_parent_block: bool,
    pub weekend_parent_block: bool,
    pub total_seconds_played: u64,
    pub total_sessions_played: u64,
    pub average_playtime_per_session: u64,
}

impl Default for ParentalControls {
    fn default() -> Self {
        Self {
            password: String::new(),
            morning_parent_block: false,
            afternoon_parent_block: false,
            evening_parent_block: false,
            weekday_parent_block: false,
            weekend_parent_block: false,
            total_seconds_played: 0,
            total_sessions_played: 0,
            average_playtime_per_session: 0,
        }
    }
}

/// The whole on-disk document: one entry per save slot plus the settings
/// section. Unknown fields from newer writers are ignored on read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveDocument {
    #[serde(default)]
    pub games: BTreeMap<String, SlotEntry>,
    #[serde(default, rename = "parentalControls")]
    pub parental_controls: ParentalControls,
}

/// Owns the document and its location. Every save rewrites the whole file
/// through a temp-and-rename; there is no incremental or per-slot write.
#[derive(Debug)]
pub struct SaveStore {
    path: PathBuf,
    doc: SaveDocument,
}

impl SaveStore {
    /// Load the document at `path`. A missing or unparseable file is treated
    /// as "no save": the bundled default document is written fresh.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PetError> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<SaveDocument>(&text) {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!("save document unreadable, starting fresh: {err}");
                    Self::init_fresh(&path)?
                }
            },
            Err(_) => Self::init_fresh(&path)?,
        };
        Ok(Self { path, doc })
    }

    /// Open at the platform data dir.
    pub fn open_default() -> Result<Self, PetError> {
        Self::open(crate::config::default_save_path()?)
    }

    fn init_fresh(path: &Path) -> Result<SaveDocument, PetError> {
        let doc: SaveDocument = serde_json::from_str(DEFAULT_DOCUMENT)?;
        write_atomic(path, &doc)?;
        Ok(doc)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full synchronous overwrite of the document. A failure here is fatal
    /// to the caller; no partial document is ever left behind.
    pub fn save(&self) -> Result<(), PetError> {
        write_atomic(&self.path, &self.doc)
    }

    pub fn save_character(&mut self, character: &Character) -> Result<(), PetError> {
        let payload = CharacterPayload::from_character(character);
        self.doc
            .games
            .insert(character.slot.to_string(), SlotEntry {
                character: Some(payload),
            });
        self.save()
    }

    pub fn load_character(&self, slot: u8) -> Result<Character, PetError> {
        self.doc
            .games
            .get(&slot.to_string())
            .and_then(|e| e.character.clone())
            .ok_or(PetError::EmptySlot(slot))?
            .into_character()
    }

    pub fn has_character(&self, slot: u8) -> bool {
        self.doc
            .games
            .get(&slot.to_string())
            .map_or(false, |e| e.character.is_some())
    }

    pub fn controls(&self) -> &ParentalControls {
        &self.doc.parental_controls
    }

    pub fn controls_mut(&mut self) -> &mut ParentalControls {
        &mut self.doc.parental_controls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;
    use crate::model::Archetype;

    fn temp_store() -> (tempfile::TempDir, SaveStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::open(dir.path().join("save.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_initializes_default_document() {
        let (_dir, store) = temp_store();
        assert!(store.doc.games.is_empty());
        assert_eq!(store.controls().total_sessions_played, 0);
        // The fresh document is also written to disk.
        assert!(store.path().exists());
    }

    #[test]
    fn corrupt_file_is_replaced_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SaveStore::open(&path).unwrap();
        assert!(store.doc.games.is_empty());
        let text = fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<SaveDocument>(&text).is_ok());
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(
            &path,
            r#"{"games": {}, "parentalControls": {"Password": "pw"}, "futureSection": 7}"#,
        )
        .unwrap();
        let store = SaveStore::open(&path).unwrap();
        assert_eq!(store.controls().password, "pw");
    }

    #[test]
    fn character_round_trips_exactly() {
        let (_dir, mut store) = temp_store();
        let mut c = Character::new("Mochi", Archetype::Ravenous, 2);
        c.score = 450;
        c.stats.health = 33.25;
        c.stats.refresh_stress();
        c.flags.hunger_locked = true;
        c.inventory.add(ItemKind::Feast, 3);
        c.inventory.add(ItemKind::Plush, 1);
        store.save_character(&c).unwrap();

        // Reopen from disk to prove the trip goes through the file.
        let reopened = SaveStore::open(store.path()).unwrap();
        let back = reopened.load_character(2).unwrap();
        assert_eq!(back.name, c.name);
        assert_eq!(back.archetype, c.archetype);
        assert_eq!(back.score, c.score);
        assert_eq!(back.stats, c.stats);
        assert_eq!(back.flags, c.flags);
        assert_eq!(back.inventory, c.inventory);
    }

    #[test]
    fn slots_are_independent() {
        let (_dir, mut store) = temp_store();
        store
            .save_character(&Character::new("A", Archetype::Relaxed, 0))
            .unwrap();
        store
            .save_character(&Character::new("B", Archetype::Moody, 1))
            .unwrap();
        assert_eq!(store.load_character(0).unwrap().name, "A");
        assert_eq!(store.load_character(1).unwrap().name, "B");
        assert!(matches!(
            store.load_character(3),
            Err(PetError::EmptySlot(3))
        ));
    }

    #[test]
    fn bad_archetype_id_fails_load() {
        let (_dir, mut store) = temp_store();
        let c = Character::new("Mochi", Archetype::Relaxed, 0);
        let mut payload = CharacterPayload::from_character(&c);
        payload.archetype_id = 9;
        store.doc.games.insert(
            "0".into(),
            SlotEntry {
                character: Some(payload),
            },
        );
        assert!(matches!(
            store.load_character(0),
            Err(PetError::UnknownArchetype(9))
        ));
    }

    #[test]
    fn loaded_meters_are_snapped_into_range() {
        let c = Character::new("Mochi", Archetype::Relaxed, 0);
        let mut payload = CharacterPayload::from_character(&c);
        payload.health = 250.0;
        payload.sleep = -4.0;
        let back = payload.into_character().unwrap();
        assert_eq!(back.stats.health, 100.0);
        assert_eq!(back.stats.sleep, 0.0);
    }

    #[test]
    fn settings_persist_with_the_document() {
        let (_dir, mut store) = temp_store();
        store.controls_mut().morning_parent_block = true;
        store.controls_mut().total_seconds_played = 1234;
        store.save().unwrap();
        let reopened = SaveStore::open(store.path()).unwrap();
        assert!(reopened.controls().morning_parent_block);
        assert_eq!(reopened.controls().total_seconds_played, 1234);
    }
}
