use thiserror::Error;

/// Errors surfaced by the simulation core. Out-of-range stat writes are not
/// errors; they clamp silently. Refused actions are not errors either, they
/// report failure through their return value.
#[derive(Debug, Error)]
pub enum PetError {
    #[error("unknown archetype id {0}")]
    UnknownArchetype(u8),

    #[error("save slot {0} holds no character")]
    EmptySlot(u8),

    #[error("could not resolve a data directory for save files")]
    NoDataDir,

    #[error("save file io: {0}")]
    Io(#[from] std::io::Error),

    #[error("save file format: {0}")]
    Format(#[from] serde_json::Error),
}
