//! Player module - participants and their trust ledger

use crate::error::DomainError;
use crate::rules::STARTING_TRUST;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique identifier for a player based on UUIDv7
///
/// Two players are the same participant iff their ids are equal; names are
/// display-only and may collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(u128);

impl PlayerId {
    /// Generate a new UUIDv7-based PlayerId
    ///
    /// # Examples
    ///
    /// ```
    /// use mindgames_domain::PlayerId;
    ///
    /// let a = PlayerId::new();
    /// let b = PlayerId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a PlayerId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Who controls a player: a human or one of the AI strength tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerType {
    /// Moves come from a person
    Human,
    /// Weakest AI tier
    AiEasy,
    /// Default AI tier
    AiMedium,
    /// Strong AI tier
    AiHard,
    /// Strongest, most aggressive AI tier
    AiRuthless,
}

impl PlayerType {
    /// Wire tag sent to the decision backend
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerType::Human => "HUMAN",
            PlayerType::AiEasy => "AI_EASY",
            PlayerType::AiMedium => "AI_MEDIUM",
            PlayerType::AiHard => "AI_HARD",
            PlayerType::AiRuthless => "AI_RUTHLESS",
        }
    }

    /// Parse a tier from its wire tag or a bare difficulty name
    ///
    /// ```
    /// use mindgames_domain::PlayerType;
    ///
    /// assert_eq!(PlayerType::parse("ai_hard").unwrap(), PlayerType::AiHard);
    /// assert_eq!(PlayerType::parse("easy").unwrap(), PlayerType::AiEasy);
    /// ```
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_uppercase().as_str() {
            "HUMAN" => Ok(PlayerType::Human),
            "AI_EASY" | "EASY" => Ok(PlayerType::AiEasy),
            "AI_MEDIUM" | "MEDIUM" => Ok(PlayerType::AiMedium),
            "AI_HARD" | "HARD" => Ok(PlayerType::AiHard),
            "AI_RUTHLESS" | "RUTHLESS" => Ok(PlayerType::AiRuthless),
            other => Err(DomainError::UnknownPlayerType(other.to_string())),
        }
    }

    /// Difficulty name understood by `/ai/set_difficulty`
    pub fn difficulty(&self) -> Option<&'static str> {
        match self {
            PlayerType::Human => None,
            PlayerType::AiEasy => Some("easy"),
            PlayerType::AiMedium => Some("medium"),
            PlayerType::AiHard => Some("hard"),
            PlayerType::AiRuthless => Some("ruthless"),
        }
    }

    /// True for every AI tier
    pub fn is_ai(&self) -> bool {
        !matches!(self, PlayerType::Human)
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a player's trust history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustRecord {
    /// Round in which the change was applied
    pub round: u32,
    /// Signed trust change
    pub trust_delta: i32,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

/// A game participant
///
/// Owned by [`crate::GameState`]. The mutating methods exist for the game
/// engine; everything handed to callers is a snapshot clone.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    id: PlayerId,
    name: String,
    player_type: PlayerType,
    trust_score: i32,
    successful_bluffs: u32,
    failed_bluffs: u32,
    successful_challenges: u32,
    failed_challenges: u32,
    history: Vec<TrustRecord>,
}

impl Player {
    /// Create a player with the neutral starting trust
    pub fn new(name: impl Into<String>, player_type: PlayerType) -> Self {
        Self::with_trust_score(name, player_type, STARTING_TRUST)
    }

    /// Create a player with a custom starting trust (handicap games)
    pub fn with_trust_score(
        name: impl Into<String>,
        player_type: PlayerType,
        trust_score: i32,
    ) -> Self {
        Self {
            id: PlayerId::new(),
            name: name.into(),
            player_type,
            trust_score,
            successful_bluffs: 0,
            failed_bluffs: 0,
            successful_challenges: 0,
            failed_challenges: 0,
            history: Vec::new(),
        }
    }

    /// Unique identifier
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Controller type
    pub fn player_type(&self) -> PlayerType {
        self.player_type
    }

    /// Current trust score
    pub fn trust_score(&self) -> i32 {
        self.trust_score
    }

    /// Bluffs that survived a challenge
    pub fn successful_bluffs(&self) -> u32 {
        self.successful_bluffs
    }

    /// Bluffs that were caught
    pub fn failed_bluffs(&self) -> u32 {
        self.failed_bluffs
    }

    /// Challenges that exposed a bluff
    pub fn successful_challenges(&self) -> u32 {
        self.successful_challenges
    }

    /// Challenges made against a true claim
    pub fn failed_challenges(&self) -> u32 {
        self.failed_challenges
    }

    /// Ordered trust history
    pub fn history(&self) -> &[TrustRecord] {
        &self.history
    }

    /// Apply a trust change and append it to the history
    pub fn apply_trust(&mut self, round: u32, delta: i32) {
        self.trust_score += delta;
        self.history.push(TrustRecord {
            round,
            trust_delta: delta,
            timestamp: now_millis(),
        });
    }

    /// Count a bluff that survived a challenge
    pub fn record_successful_bluff(&mut self) {
        self.successful_bluffs += 1;
    }

    /// Count a caught bluff
    pub fn record_failed_bluff(&mut self) {
        self.failed_bluffs += 1;
    }

    /// Count a challenge that exposed a bluff
    pub fn record_successful_challenge(&mut self) {
        self.successful_challenges += 1;
    }

    /// Count a challenge against a true claim
    pub fn record_failed_challenge(&mut self) {
        self.failed_challenges += 1;
    }

    /// Share of bluffs that survived, 0.0 with no attempts
    pub fn bluff_success_rate(&self) -> f64 {
        rate(self.successful_bluffs, self.failed_bluffs)
    }

    /// Share of challenges that succeeded, 0.0 with no attempts
    pub fn challenge_success_rate(&self) -> f64 {
        rate(self.successful_challenges, self.failed_challenges)
    }
}

fn rate(hits: u32, misses: u32) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        f64::from(hits) / f64::from(total)
    }
}

pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
