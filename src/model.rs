use crate::error::PetError;
use crate::item::{Inventory, ItemKind};

pub(crate) const STAT_MIN: f32 = 0.0;
pub(crate) const STAT_MAX: f32 = 100.0;

/// The five fixed pet personalities. Each carries its own starting stats and
/// decay-rate profile, looked up in [`Archetype::profile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Archetype {
    Relaxed,
    Brave,
    Restless,
    Ravenous,
    Moody,
}

#[derive(Clone, Copy, Debug)]
pub struct DecayRates {
    pub happiness: f32,
    pub fullness: f32,
    pub sleep: f32,
    pub health: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct StartStats {
    pub health: f32,
    pub sleep: f32,
    pub happiness: f32,
    pub fullness: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct ArchetypeProfile {
    pub start: StartStats,
    pub decay: DecayRates,
}

// Indexed by archetype id.
const PROFILES: [ArchetypeProfile; 5] = [
    // Relaxed: the baseline pet, everything drifts at unit rate.
    ArchetypeProfile {
        start: StartStats {
            health: 80.0,
            sleep: 80.0,
            happiness: 80.0,
            fullness: 80.0,
        },
        decay: DecayRates {
            happiness: 1.0,
            fullness: 1.0,
            sleep: 1.0,
            health: 1.0,
        },
    },
    // Brave: starts banged up but topped off everywhere else, burns fast.
    ArchetypeProfile {
        start: StartStats {
            health: 10.0,
            sleep: 100.0,
            happiness: 100.0,
            fullness: 100.0,
        },
        decay: DecayRates {
            happiness: 1.5,
            fullness: 1.5,
            sleep: 1.5,
            health: 2.0,
        },
    },
    // Restless: tires twice as fast.
    ArchetypeProfile {
        start: StartStats {
            health: 90.0,
            sleep: 60.0,
            happiness: 90.0,
            fullness: 90.0,
        },
        decay: DecayRates {
            happiness: 1.0,
            fullness: 1.0,
            sleep: 2.0,
            health: 1.0,
        },
    },
    // Ravenous: always hungry, and starvation bites harder.
    ArchetypeProfile {
        start: StartStats {
            health: 85.0,
            sleep: 85.0,
            happiness: 85.0,
            fullness: 50.0,
        },
        decay: DecayRates {
            happiness: 1.0,
            fullness: 2.0,
            sleep: 1.0,
            health: 1.5,
        },
    },
    // Moody: cheers down twice as fast.
    ArchetypeProfile {
        start: StartStats {
            health: 90.0,
            sleep: 90.0,
            happiness: 40.0,
            fullness: 90.0,
        },
        decay: DecayRates {
            happiness: 2.0,
            fullness: 1.0,
            sleep: 1.0,
            health: 1.0,
        },
    },
];

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Relaxed,
        Archetype::Brave,
        Archetype::Restless,
        Archetype::Ravenous,
        Archetype::Moody,
    ];

    pub fn id(self) -> u8 {
        match self {
            Archetype::Relaxed => 0,
            Archetype::Brave => 1,
            Archetype::Restless => 2,
            Archetype::Ravenous => 3,
            Archetype::Moody => 4,
        }
    }

    /// Numeric ids only exist at the persistence boundary. An id outside
    /// 0..=4 is a broken save or host bug and fails construction.
    pub fn from_id(id: u8) -> Result<Self, PetError> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(PetError::UnknownArchetype(id))
    }

    pub fn profile(self) -> &'static ArchetypeProfile {
        &PROFILES[self.id() as usize]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatKind {
    Health,
    Sleep,
    Happiness,
    Fullness,
    Stress,
}

/// The five bounded meters. Every write path clamps to [0, 100]; stress is
/// derived and gets overwritten by [`Stats::refresh_stress`] after each
/// mutation batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub health: f32,
    pub sleep: f32,
    pub happiness: f32,
    pub fullness: f32,
    pub stress: f32,
}

impl Stats {
    /// Out-of-range values snap to the nearest bound, they are never rejected.
    pub fn set(&mut self, kind: StatKind, value: f32) {
        let v = value.clamp(STAT_MIN, STAT_MAX);
        match kind {
            StatKind::Health => self.health = v,
            StatKind::Sleep => self.sleep = v,
            StatKind::Happiness => self.happiness = v,
            StatKind::Fullness => self.fullness = v,
            StatKind::Stress => self.stress = v,
        }
    }

    pub fn average(&self) -> f32 {
        (self.health + self.happiness + self.fullness + self.sleep) / 4.0
    }

    pub fn refresh_stress(&mut self) {
        self.stress = self.average();
    }

    pub(crate) fn clamp_all(&mut self) {
        self.health = self.health.clamp(STAT_MIN, STAT_MAX);
        self.sleep = self.sleep.clamp(STAT_MIN, STAT_MAX);
        self.happiness = self.happiness.clamp(STAT_MIN, STAT_MAX);
        self.fullness = self.fullness.clamp(STAT_MIN, STAT_MAX);
        self.stress = self.stress.clamp(STAT_MIN, STAT_MAX);
    }
}

/// Sticky adverse conditions. Set when a meter bottoms out, cleared only once
/// the meter climbs back over its release threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub sleep_locked: bool,
    pub anger_locked: bool,
    pub hunger_locked: bool,
}

/// The single behavioral state the pet is in right now. Purely derived from
/// health and the condition flags; never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PetState {
    Dead,
    Sleeping,
    Angry,
    Hungry,
    Neutral,
}

#[derive(Clone, Debug)]
pub struct Character {
    pub name: String,
    pub archetype: Archetype,
    pub slot: u8,
    pub score: u32,
    pub stats: Stats,
    pub flags: Flags,
    pub inventory: Inventory,
}

impl Character {
    pub fn new(name: impl Into<String>, archetype: Archetype, slot: u8) -> Self {
        let p = archetype.profile();
        let mut stats = Stats {
            health: p.start.health,
            sleep: p.start.sleep,
            happiness: p.start.happiness,
            fullness: p.start.fullness,
            stress: 0.0,
        };
        stats.refresh_stress();
        Self {
            name: name.into(),
            archetype,
            slot,
            score: 0,
            stats,
            flags: Flags::default(),
            inventory: Inventory::default(),
        }
    }

    /// Highest-priority condition wins: Dead, then Sleeping, Angry, Hungry.
    pub fn state(&self) -> PetState {
        if self.stats.health < crate::sim::DEATH_BELOW {
            PetState::Dead
        } else if self.flags.sleep_locked {
            PetState::Sleeping
        } else if self.flags.anger_locked {
            PetState::Angry
        } else if self.flags.hunger_locked {
            PetState::Hungry
        } else {
            PetState::Neutral
        }
    }
}

/// Which sprite variant an in-progress action shows. The two animation frames
/// alternate on a timer while the action lock runs down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimKind {
    Eating,
    Playing,
    Workout,
    Checkup,
    Ball,
    Plush,
    Robot,
}

impl AnimKind {
    pub(crate) fn for_gift(item: ItemKind) -> AnimKind {
        match item {
            ItemKind::Ball => AnimKind::Ball,
            ItemKind::Plush => AnimKind::Plush,
            ItemKind::Robot => AnimKind::Robot,
            // Food items never reach a gift animation.
            ItemKind::Snack | ItemKind::Meal | ItemKind::Feast => AnimKind::Eating,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionAnim {
    pub kind: AnimKind,
    pub frame: bool,
}

/// Symbolic name of the visual to show. The presentation layer maps these to
/// actual assets; the core never loads anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayKey {
    Happy,
    Blink,
    Dead,
    Angry,
    Sleep1,
    Sleep2,
    Hungry1,
    Hungry2,
    Eat1,
    Eat2,
    Play1,
    Play2,
    Gym1,
    Gym2,
    Doc1,
    Doc2,
    Ball1,
    Ball2,
    Plush1,
    Plush2,
    Robot1,
    Robot2,
}

impl DisplayKey {
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayKey::Happy => "happy",
            DisplayKey::Blink => "blink",
            DisplayKey::Dead => "dead",
            DisplayKey::Angry => "angry",
            DisplayKey::Sleep1 => "sleep1",
            DisplayKey::Sleep2 => "sleep2",
            DisplayKey::Hungry1 => "hungry1",
            DisplayKey::Hungry2 => "hungry2",
            DisplayKey::Eat1 => "eat1",
            DisplayKey::Eat2 => "eat2",
            DisplayKey::Play1 => "play1",
            DisplayKey::Play2 => "play2",
            DisplayKey::Gym1 => "gym1",
            DisplayKey::Gym2 => "gym2",
            DisplayKey::Doc1 => "doc1",
            DisplayKey::Doc2 => "doc2",
            DisplayKey::Ball1 => "ball1",
            DisplayKey::Ball2 => "ball2",
            DisplayKey::Plush1 => "plush1",
            DisplayKey::Plush2 => "plush2",
            DisplayKey::Robot1 => "robot1",
            DisplayKey::Robot2 => "robot2",
        }
    }
}

impl ActionAnim {
    fn key(self) -> DisplayKey {
        match (self.kind, self.frame) {
            (AnimKind::Eating, false) => DisplayKey::Eat1,
            (AnimKind::Eating, true) => DisplayKey::Eat2,
            (AnimKind::Playing, false) => DisplayKey::Play1,
            (AnimKind::Playing, true) => DisplayKey::Play2,
            (AnimKind::Workout, false) => DisplayKey::Gym1,
            (AnimKind::Workout, true) => DisplayKey::Gym2,
            (AnimKind::Checkup, false) => DisplayKey::Doc1,
            (AnimKind::Checkup, true) => DisplayKey::Doc2,
            (AnimKind::Ball, false) => DisplayKey::Ball1,
            (AnimKind::Ball, true) => DisplayKey::Ball2,
            (AnimKind::Plush, false) => DisplayKey::Plush1,
            (AnimKind::Plush, true) => DisplayKey::Plush2,
            (AnimKind::Robot, false) => DisplayKey::Robot1,
            (AnimKind::Robot, true) => DisplayKey::Robot2,
        }
    }
}

/// Pure mapping from current state to display key. An in-progress action
/// animation overrides the idle variants; death overrides everything.
pub fn derive_display_key(
    state: PetState,
    anim: Option<ActionAnim>,
    idle_frame: bool,
) -> DisplayKey {
    if state == PetState::Dead {
        return DisplayKey::Dead;
    }
    if let Some(a) = anim {
        return a.key();
    }
    match state {
        PetState::Dead => DisplayKey::Dead,
        PetState::Sleeping => {
            if idle_frame {
                DisplayKey::Sleep2
            } else {
                DisplayKey::Sleep1
            }
        }
        PetState::Angry => DisplayKey::Angry,
        PetState::Hungry => {
            if idle_frame {
                DisplayKey::Hungry2
            } else {
                DisplayKey::Hungry1
            }
        }
        PetState::Neutral => {
            if idle_frame {
                DisplayKey::Blink
            } else {
                DisplayKey::Happy
            }
        }
    }
}
