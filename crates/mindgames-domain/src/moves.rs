//! Move module - the single unit of input to the game engine

use crate::claim::Claim;
use crate::error::DomainError;
use crate::player::PlayerId;
use std::fmt;

/// Default metadata confidence for moves built without one
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Kind of action a move represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Put a claim on the table (Claim phase)
    Claim,
    /// Dispute the pending claim (Challenge phase)
    Challenge,
    /// Let the pending claim stand (Challenge phase), or acknowledge a resolution
    Accept,
}

impl MoveKind {
    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveKind::Claim => "CLAIM",
            MoveKind::Challenge => "CHALLENGE",
            MoveKind::Accept => "ACCEPT",
        }
    }

    /// Parse an action name, case-insensitive
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_uppercase().as_str() {
            "CLAIM" => Ok(MoveKind::Claim),
            "CHALLENGE" => Ok(MoveKind::Challenge),
            "ACCEPT" => Ok(MoveKind::Accept),
            other => Err(DomainError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable move
///
/// Built through the per-kind factories, which make a Claim move without a
/// payload (or a Challenge/Accept move with one) unrepresentable. Confidence
/// is metadata only and never feeds game logic.
///
/// ```
/// use mindgames_domain::{Claim, ClaimType, Move, MoveKind, PlayerId};
///
/// let who = PlayerId::new();
/// let mv = Move::claiming(who, Claim::new("I hold the key", ClaimType::Information, 0.4), 0.8);
/// assert_eq!(mv.kind(), MoveKind::Claim);
/// assert!(!mv.is_challenge());
///
/// let challenge = Move::challenging(who, 0.7);
/// assert!(challenge.is_challenge());
/// assert!(challenge.claim().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    player: PlayerId,
    kind: MoveKind,
    claim: Option<Claim>,
    confidence: f64,
}

impl Move {
    /// A Claim move carrying its payload
    pub fn claiming(player: PlayerId, claim: Claim, confidence: f64) -> Self {
        Self {
            player,
            kind: MoveKind::Claim,
            claim: Some(claim),
            confidence: clamp_confidence(confidence),
        }
    }

    /// A Challenge move against the pending claim
    pub fn challenging(player: PlayerId, confidence: f64) -> Self {
        Self {
            player,
            kind: MoveKind::Challenge,
            claim: None,
            confidence: clamp_confidence(confidence),
        }
    }

    /// An Accept move
    pub fn accepting(player: PlayerId, confidence: f64) -> Self {
        Self {
            player,
            kind: MoveKind::Accept,
            claim: None,
            confidence: clamp_confidence(confidence),
        }
    }

    /// Build a move from decoded parts, validating payload presence
    ///
    /// # Errors
    ///
    /// - [`DomainError::MissingClaim`] for a Claim move without payload
    /// - [`DomainError::UnexpectedClaim`] for a Challenge/Accept move with payload
    pub fn new(
        player: PlayerId,
        kind: MoveKind,
        claim: Option<Claim>,
        confidence: f64,
    ) -> Result<Self, DomainError> {
        match (kind, claim) {
            (MoveKind::Claim, Some(claim)) => Ok(Self::claiming(player, claim, confidence)),
            (MoveKind::Claim, None) => Err(DomainError::MissingClaim),
            (other, Some(_)) => Err(DomainError::UnexpectedClaim(other.to_string())),
            (MoveKind::Challenge, None) => Ok(Self::challenging(player, confidence)),
            (MoveKind::Accept, None) => Ok(Self::accepting(player, confidence)),
        }
    }

    /// Acting player
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Kind of action
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Claim payload, present iff the kind is `Claim`
    pub fn claim(&self) -> Option<&Claim> {
        self.claim.as_ref()
    }

    /// True iff this move disputes the pending claim
    pub fn is_challenge(&self) -> bool {
        self.kind == MoveKind::Challenge
    }

    /// Metadata confidence in `[0, 1]`
    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        DEFAULT_CONFIDENCE
    } else {
        confidence.clamp(0.0, 1.0)
    }
}
