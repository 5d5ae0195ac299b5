use blockfall_runtime::Runtime;

use crate::{command::GameArg, ui::widgets::CellSize};

use self::app::PlayApp;

mod app;
mod input;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    pub(crate) game: GameArg,
    /// Display scale of board cells (1.0 = two columns by one row per cell)
    #[clap(long, default_value_t = 1.0, value_parser = parse_scale)]
    pub(crate) scale: f64,
    /// Hide the ghost piece
    #[clap(long)]
    pub(crate) no_ghost: bool,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            game: GameArg::default(),
            scale: 1.0,
            no_ghost: false,
        }
    }
}

fn parse_scale(s: &str) -> Result<f64, String> {
    let scale: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(format!("scale must be a positive finite number, got {s}"))
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        game,
        scale,
        no_ghost,
    } = arg;

    let mut app = PlayApp::new(game.session(), CellSize::from_scale(*scale), !*no_ghost);
    Runtime::new().run(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scale() {
        assert_eq!(parse_scale("1.5"), Ok(1.5));
        assert!(parse_scale("0").is_err());
        assert!(parse_scale("-2").is_err());
        assert!(parse_scale("inf").is_err());
        assert!(parse_scale("NaN").is_err());
        assert!(parse_scale("big").is_err());
    }
}
