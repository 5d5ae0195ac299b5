use std::{cmp::Ordering, path::PathBuf};

use blockfall_engine::{GameSession, Intent, PieceSeed, SessionSnapshot};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{command::GameArg, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(crate) game: GameArg,
    /// Number of pieces to place before stopping
    #[clap(long, default_value_t = 100)]
    pub(crate) pieces: usize,
    /// Output file path (stdout when omitted)
    #[clap(long)]
    output: Option<PathBuf>,
}

/// Final state of a headless run, with the seed needed to reproduce it.
#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: PieceSeed,
    snapshot: SessionSnapshot,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        game,
        pieces,
        output,
    } = arg;

    let seed = game.resolve_seed();
    let mut session = GameSession::with_seed(game.config(), seed);
    let mut rng = placement_rng(seed);
    simulate(&mut session, *pieces, &mut rng);

    let report = SimulationReport {
        seed,
        snapshot: session.snapshot(),
    };
    util::save_json(&report, output.as_deref())?;
    Ok(())
}

/// Placement choices get their own stream, derived from the piece seed so a
/// seeded run is reproducible.
#[expect(clippy::cast_possible_truncation)]
fn placement_rng(seed: PieceSeed) -> Pcg32 {
    let state = u128::from_be_bytes(seed.to_bytes());
    Pcg32::seed_from_u64((state ^ (state >> 64)) as u64)
}

/// Places pieces at random until `pieces` have locked or the game ends.
///
/// Each piece may be swapped through hold, is rotated a random number of
/// quarter turns, slid toward a random column and hard-dropped. Blocked moves
/// are skipped, so the final column may differ from the chosen one.
fn simulate<R>(session: &mut GameSession, pieces: usize, rng: &mut R)
where
    R: Rng,
{
    let columns = session.config().columns();
    while session.stats().completed_pieces() < pieces && !session.session_state().is_game_over()
    {
        if rng.random_ratio(1, 8) {
            let _ = session.apply(Intent::Hold);
        }
        for _ in 0..rng.random_range(0..4) {
            let _ = session.apply(Intent::RotateCw);
        }

        let target = rng.random_range(0..columns);
        for _ in 0..columns {
            let left = leftmost_column(session);
            let intent = match left.cmp(&target) {
                Ordering::Less => Intent::MoveRight,
                Ordering::Greater => Intent::MoveLeft,
                Ordering::Equal => break,
            };
            if session.apply(intent).is_err() {
                break;
            }
        }

        let _ = session.apply(Intent::HardDrop);
    }
}

fn leftmost_column(session: &GameSession) -> usize {
    let piece = session.field().active_piece();
    let x = piece.cells().iter().map(|p| p.x).min().unwrap_or(0);
    usize::try_from(x).unwrap_or(0)
}
