use serde::{Deserialize, Serialize};

/// A squad member as supplied by the roster collaborator.
///
/// Jersey numbers are unique within a team but *not* across the two teams
/// of a match; disambiguation is the turbo resolver's job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub jersey_number: u8,
    /// Free-form position label from the roster feed ("GK", "CB", "ST", ...).
    pub position: String,
}

impl Player {
    pub fn is_goalkeeper(&self) -> bool {
        matches!(self.position.to_ascii_uppercase().as_str(), "GK" | "GOALKEEPER")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(position: &str) -> Player {
        Player {
            id: "p1".to_string(),
            name: "Test Player".to_string(),
            jersey_number: 1,
            position: position.to_string(),
        }
    }

    #[test]
    fn test_goalkeeper_detection() {
        assert!(player("GK").is_goalkeeper());
        assert!(player("gk").is_goalkeeper());
        assert!(player("Goalkeeper").is_goalkeeper());
        assert!(!player("CB").is_goalkeeper());
        assert!(!player("ST").is_goalkeeper());
    }
}
