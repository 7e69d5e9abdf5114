//! Output formatting for the CLI.

use colored::*;
use mindgames_domain::{GamePhase, GameState, Move, MoveKind, Player, RoundResult};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Player statistics as a table.
    ///
    /// `evaluations` holds each player's position evaluation, when known.
    pub fn scoreboard(&self, state: &GameState, evaluations: Option<(f64, f64)>) -> String {
        let mut builder = Builder::default();
        builder.push_record([
            "Player", "Type", "Trust", "Bluffs", "Challenges", "Position",
        ]);

        let rows = [
            (&state.player1, evaluations.map(|e| e.0)),
            (&state.player2, evaluations.map(|e| e.1)),
        ];
        for (player, evaluation) in rows {
            builder.push_record([
                player.name().to_string(),
                player.player_type().to_string(),
                player.trust_score().to_string(),
                tally(
                    player.successful_bluffs(),
                    player.failed_bluffs(),
                    player.bluff_success_rate(),
                ),
                tally(
                    player.successful_challenges(),
                    player.failed_challenges(),
                    player.challenge_success_rate(),
                ),
                evaluation
                    .map(|e| format!("{:+.1}", e))
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Round and phase banner.
    pub fn banner(&self, state: &GameState) -> String {
        let text = format!(
            "Round {} | {} phase | {} to act",
            state.current_round,
            state.phase,
            state.current().name()
        );
        self.colorize(&text, "cyan")
    }

    /// One-line description of a submitted move.
    pub fn describe_move(&self, player: &Player, mv: &Move) -> String {
        let text = match (mv.kind(), mv.claim()) {
            (MoveKind::Claim, Some(claim)) => format!(
                "{} claims [{}, boldness {:.2}]: \"{}\"",
                player.name(),
                claim.claim_type(),
                claim.boldness(),
                claim.description()
            ),
            (MoveKind::Challenge, _) => format!("{} challenges the claim", player.name()),
            _ => format!("{} accepts", player.name()),
        };
        self.colorize(&text, "magenta")
    }

    /// Outcome of a processed move.
    pub fn round_result(&self, result: &RoundResult) -> String {
        let color = match result.trust_change {
            d if d > 0 => "green",
            d if d < 0 => "red",
            _ => "blue",
        };
        let mut text = result.message.clone();
        if result.trust_change != 0 {
            text.push_str(&format!(" ({:+})", result.trust_change));
        }
        if result.round_complete {
            text.push_str(&format!(
                " Scores: {} / {}",
                result.player1_score, result.player2_score
            ));
        }
        self.colorize(&text, color)
    }

    /// Final message of a finished game.
    pub fn game_over(&self, state: &GameState) -> String {
        let message = state.victory_message.as_deref().unwrap_or("Game over");
        self.colorize(&format!("★ {}", message), "yellow")
    }

    /// What the human may type in the current phase.
    pub fn phase_help(&self, phase: GamePhase) -> String {
        let text = match phase {
            GamePhase::Claim => {
                "claim <information|prediction|accusation|alliance> <boldness 0-1> <text...>"
            }
            GamePhase::Challenge => "challenge | accept",
            GamePhase::Resolution => "next (or press Enter)",
        };
        self.info(&format!("{}   (also: hint, stats, help, quit)", text))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

fn tally(successes: u32, failures: u32, rate: f64) -> String {
    format!(
        "{}/{} ({:.0}%)",
        successes,
        successes + failures,
        rate * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindgames_domain::{Claim, ClaimType, PlayerType};

    fn state() -> GameState {
        GameState::new(
            Player::new("Alice", PlayerType::Human),
            Player::with_trust_score("Bot", PlayerType::AiHard, 65),
        )
    }

    #[test]
    fn test_scoreboard() {
        let formatter = Formatter::new(false);
        let output = formatter.scoreboard(&state(), Some((-5.0, 5.0)));
        assert!(output.contains("Trust"));
        assert!(output.contains("Alice"));
        assert!(output.contains("AI_HARD"));
        assert!(output.contains("65"));
        assert!(output.contains("+5.0"));

        let output = formatter.scoreboard(&state(), None);
        assert!(output.contains("Position"));
    }

    #[test]
    fn test_scoreboard_success_rates() {
        let mut state = state();
        state.player1.record_successful_bluff();
        state.player1.record_successful_bluff();
        state.player1.record_failed_bluff();
        state.player2.record_failed_challenge();

        let output = Formatter::new(false).scoreboard(&state, None);
        assert!(output.contains("2/3 (67%)"));
        assert!(output.contains("0/1 (0%)"));
        assert!(output.contains("0/0 (0%)"));
    }

    #[test]
    fn test_describe_move() {
        let formatter = Formatter::new(false);
        let state = state();
        let mv = Move::claiming(
            state.player1.id(),
            Claim::new("I saw the ledger", ClaimType::Information, 0.25),
            0.5,
        );
        assert_eq!(
            formatter.describe_move(&state.player1, &mv),
            "Alice claims [INFORMATION, boldness 0.25]: \"I saw the ledger\""
        );
        let mv = Move::challenging(state.player2.id(), 0.7);
        assert_eq!(
            formatter.describe_move(&state.player2, &mv),
            "Bot challenges the claim"
        );
    }

    #[test]
    fn test_round_result() {
        let formatter = Formatter::new(false);
        let result = RoundResult {
            success: true,
            message: "Claim accepted.".to_string(),
            trust_change: 5,
            ..RoundResult::default()
        };
        assert_eq!(formatter.round_result(&result), "Claim accepted. (+5)");

        let result = RoundResult {
            success: true,
            message: "Round 3 complete.".to_string(),
            round_complete: true,
            player1_score: 40,
            player2_score: 70,
            ..RoundResult::default()
        };
        assert_eq!(
            formatter.round_result(&result),
            "Round 3 complete. Scores: 40 / 70"
        );
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
