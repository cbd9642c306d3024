//! Demo runner helpers: argument parsing and random swap generation

use anyhow::{anyhow, Result};

use crate::core::{BoardConfig, Grid, SimpleRng};
use crate::types::Pos;

pub const DEFAULT_DEMO_MOVES: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoArgs {
    pub seed: Option<u32>,
    pub moves: u32,
    pub width: Option<u8>,
    pub height: Option<u8>,
    /// Print only the final board
    pub quiet: bool,
    /// Play the cascade back through the tokio driver, honouring delay hints
    pub paced: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            seed: None,
            moves: DEFAULT_DEMO_MOVES,
            width: None,
            height: None,
            quiet: false,
            paced: false,
        }
    }
}

impl DemoArgs {
    /// Flags override whatever the environment configured
    pub fn apply(&self, config: &mut BoardConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
    }
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a String> {
    args.get(i)
        .ok_or_else(|| anyhow!("demo: missing value for {}", flag))
}

pub fn parse_demo_args(args: &[String]) -> Result<DemoArgs> {
    let mut out = DemoArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = flag_value(args, i, "--seed")?;
                out.seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("demo: invalid --seed value: {}", v))?,
                );
            }
            "--moves" => {
                i += 1;
                let v = flag_value(args, i, "--moves")?;
                out.moves = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("demo: invalid --moves value: {}", v))?;
            }
            "--width" => {
                i += 1;
                let v = flag_value(args, i, "--width")?;
                out.width = Some(
                    v.parse::<u8>()
                        .map_err(|_| anyhow!("demo: invalid --width value: {}", v))?,
                );
            }
            "--height" => {
                i += 1;
                let v = flag_value(args, i, "--height")?;
                out.height = Some(
                    v.parse::<u8>()
                        .map_err(|_| anyhow!("demo: invalid --height value: {}", v))?,
                );
            }
            "--quiet" | "-q" => out.quiet = true,
            "--paced" => out.paced = true,
            other => {
                return Err(anyhow!("demo: unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(out)
}

/// Pick a random cell and one of its on-board neighbours.
///
/// Only the grid's dimensions matter, so an empty grid of the right size works.
pub fn random_adjacent_swap(rng: &mut SimpleRng, grid: &Grid) -> Option<(Pos, Pos)> {
    if grid.is_empty() {
        return None;
    }
    let i = rng.next_range(grid.len() as u32) as usize;
    let a = grid.positions().nth(i)?;
    let neighbours = grid.neighbours(a);
    if neighbours.is_empty() {
        return None;
    }
    let b = neighbours[rng.next_range(neighbours.len() as u32) as usize];
    Some((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = parse_demo_args(&[]).unwrap();
        assert_eq!(parsed, DemoArgs::default());
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = parse_demo_args(&args(&[
            "--seed", "42", "--moves", "5", "--width", "8", "--height", "7", "--quiet", "--paced",
        ]))
        .unwrap();
        assert_eq!(parsed.seed, Some(42));
        assert_eq!(parsed.moves, 5);
        assert_eq!(parsed.width, Some(8));
        assert_eq!(parsed.height, Some(7));
        assert!(parsed.quiet);
        assert!(parsed.paced);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_demo_args(&args(&["--seed"])).is_err());
        assert!(parse_demo_args(&args(&["--width", "300"])).is_err());
        assert!(parse_demo_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_apply_overrides_config() {
        let mut config = BoardConfig::default();
        let parsed = parse_demo_args(&args(&["--seed", "9", "--width", "4"])).unwrap();
        parsed.apply(&mut config);
        assert_eq!(config.seed, 9);
        assert_eq!(config.width, 4);
        assert_eq!(config.height, BoardConfig::default().height);
    }

    #[test]
    fn test_random_swap_is_adjacent_and_on_board() {
        let grid = Grid::new(6, 5);
        let mut rng = SimpleRng::new(7);
        for _ in 0..200 {
            let (a, b) = random_adjacent_swap(&mut rng, &grid).unwrap();
            assert!(grid.contains(a));
            assert!(grid.contains(b));
            assert!(a.is_adjacent(b));
        }
    }
}
