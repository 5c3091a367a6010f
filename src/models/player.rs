//! Roster entry model.

use serde::{Deserialize, Serialize};

/// A roster entry, keyed by player name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique player identifier; match rows join on this
    pub name: String,

    /// Picture filename under the player picture directory
    pub picture: Option<String>,

    /// Group/category label (source column "service line")
    pub group: Option<String>,
}

impl Player {
    pub fn new(name: String) -> Self {
        Self {
            name,
            picture: None,
            group: None,
        }
    }

    /// Builder method to set the picture filename.
    pub fn with_picture(mut self, picture: &str) -> Self {
        self.picture = Some(picture.to_string());
        self
    }

    /// Builder method to set the group label.
    pub fn with_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let player = Player::new("Alice".to_string())
            .with_picture("alice.png")
            .with_group("Platform");

        assert_eq!(player.name, "Alice");
        assert_eq!(player.picture.as_deref(), Some("alice.png"));
        assert_eq!(player.group.as_deref(), Some("Platform"));
    }
}
