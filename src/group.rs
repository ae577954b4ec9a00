use serde::{Deserialize, Serialize};

/// Key prefix used by the persisted `floorPeople` mapping (`floor1`, `floor2`, ...).
pub const STORAGE_KEY_PREFIX: &str = "floor";

/// One group of people sharing a bill. In a building this is a floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u32,
    pub label: String,
    pub people_count: u32,
}

impl Group {
    pub fn new(id: u32, people_count: u32) -> Self {
        Self {
            id,
            label: Self::label_for(id),
            people_count,
        }
    }

    pub fn label_for(id: u32) -> String {
        format!("Floor {id}")
    }

    pub fn storage_key(&self) -> String {
        format!("{STORAGE_KEY_PREFIX}{}", self.id)
    }

    /// Parses `floor<N>` back into `N`. Returns `None` for anything else,
    /// including `floor0`.
    pub fn id_from_storage_key(key: &str) -> Option<u32> {
        let digits = key.strip_prefix(STORAGE_KEY_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().filter(|id| *id > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_round_trips_through_id() {
        let group = Group::new(7, 3);
        assert_eq!(group.storage_key(), "floor7");
        assert_eq!(Group::id_from_storage_key("floor7"), Some(7));
        assert_eq!(group.label, "Floor 7");
    }

    #[test]
    fn rejects_foreign_storage_keys() {
        for key in ["floor", "floor0", "floor-1", "floor1a", "piso1", "Floor1", "floor+2"] {
            assert_eq!(Group::id_from_storage_key(key), None, "{key}");
        }
    }
}
