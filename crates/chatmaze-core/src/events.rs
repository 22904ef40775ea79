use serde::{Deserialize, Serialize};

/// Side effects emitted by a simulation tick.
///
/// The core does not play sounds or draw anything; collaborators react to
/// these events instead (the audio layer plays the coin chime on
/// [`GameEvent::CoinCollected`], for example).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A player jumped on the uncollected coin.
    CoinCollected { player_id: String, coins: u32 },
    /// A player walked onto a key and every matching door opened.
    KeyCollected { player_id: String, key: u32 },
    /// The collected coin expired and a fresh maze was generated.
    RoundReset { round: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = GameEvent::CoinCollected {
            player_id: "u1".to_string(),
            coins: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "coin_collected");
        assert_eq!(json["coins"], 2);
    }
}
