use serde::{Deserialize, Serialize};

use crate::game::Player;

/// Per-player win tally, persisted as `{"1": n, "2": m}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinCounts {
    #[serde(rename = "1")]
    player_one: u32,
    #[serde(rename = "2")]
    player_two: u32,
}

impl WinCounts {
    pub fn new(player_one: u32, player_two: u32) -> Self {
        WinCounts {
            player_one,
            player_two,
        }
    }

    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::One => self.player_one,
            Player::Two => self.player_two,
        }
    }

    /// Add one win for `player`. Counts never go down.
    pub fn record_win(&mut self, player: Player) {
        let slot = match player {
            Player::One => &mut self.player_one,
            Player::Two => &mut self.player_two,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u64 {
        u64::from(self.player_one) + u64::from(self.player_two)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_win_only_touches_winner() {
        let mut counts = WinCounts::default();
        counts.record_win(Player::Two);
        counts.record_win(Player::Two);
        counts.record_win(Player::One);
        assert_eq!(counts.get(Player::One), 1);
        assert_eq!(counts.get(Player::Two), 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_record_win_saturates() {
        let mut counts = WinCounts::new(u32::MAX, 0);
        counts.record_win(Player::One);
        assert_eq!(counts.get(Player::One), u32::MAX);
    }

    #[test]
    fn test_json_shape() {
        let counts = WinCounts::new(3, 5);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"1":3,"2":5}"#);
    }

    #[test]
    fn test_missing_keys_default_to_zero() {
        let counts: WinCounts = serde_json::from_str(r#"{"2": 4}"#).unwrap();
        assert_eq!(counts, WinCounts::new(0, 4));

        let counts: WinCounts = serde_json::from_str("{}").unwrap();
        assert_eq!(counts, WinCounts::default());
    }

    #[test]
    fn test_negative_count_is_rejected() {
        assert!(serde_json::from_str::<WinCounts>(r#"{"1": -1}"#).is_err());
    }
}
