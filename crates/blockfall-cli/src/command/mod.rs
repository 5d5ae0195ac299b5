use blockfall_engine::{DEFAULT_LEVEL, DEFAULT_ROWS, GameConfig, GameSession, PieceSeed};
use clap::{Parser, Subcommand};
use rand::Rng as _;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run a headless game with random placements and print the final state
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Board and randomness options shared by all modes.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GameArg {
    /// Visible rows (odd values round up; clamped to 10..=400)
    #[clap(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,
    /// Starting level
    #[clap(long, default_value_t = DEFAULT_LEVEL)]
    level: usize,
    /// Piece seed as 32 hex digits (random when omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
}

impl Default for GameArg {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            level: DEFAULT_LEVEL,
            seed: None,
        }
    }
}

impl GameArg {
    pub(crate) fn config(&self) -> GameConfig {
        GameConfig::new(self.rows, self.level)
    }

    /// The `--seed` value, or a fresh random seed when it was omitted.
    pub(crate) fn resolve_seed(&self) -> PieceSeed {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }

    pub(crate) fn session(&self) -> GameSession {
        GameSession::with_seed(self.config(), self.resolve_seed())
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_play() {
        let args = CommandArgs::try_parse_from(["blockfall"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_parse_play_flags() {
        let args = CommandArgs::try_parse_from([
            "blockfall",
            "play",
            "--rows",
            "21",
            "--level",
            "3",
            "--scale",
            "1.5",
            "--no-ghost",
        ])
        .unwrap();
        let Some(Mode::Play(arg)) = args.mode else {
            panic!("expected play mode");
        };
        let config = arg.game.config();
        assert_eq!(config.rows(), 22);
        assert_eq!(config.starting_level(), 3);
        assert!(arg.no_ghost);
    }

    #[test]
    fn test_rejects_bad_scale() {
        for scale in ["0", "-1", "NaN", "inf"] {
            let result =
                CommandArgs::try_parse_from(["blockfall", "play", "--scale", scale]);
            assert!(result.is_err(), "{scale}");
        }
    }

    #[test]
    fn test_rejects_bad_seed() {
        let result = CommandArgs::try_parse_from(["blockfall", "simulate", "--seed", "xyz"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_simulate_flags() {
        let args = CommandArgs::try_parse_from([
            "blockfall",
            "simulate",
            "--pieces",
            "5",
            "--seed",
            "000102030405060708090a0b0c0d0e0f",
        ])
        .unwrap();
        let Some(Mode::Simulate(arg)) = args.mode else {
            panic!("expected simulate mode");
        };
        assert_eq!(arg.pieces, 5);
        assert!(arg.game.seed.is_some());
    }
}
