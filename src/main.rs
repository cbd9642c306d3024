//! Gem Cascade demo runner (default binary).
//!
//! Generates a board from `GEM_CASCADE_*` environment settings plus flags,
//! then plays seeded random adjacent swaps against it and prints what each
//! cascade did.
//!
//! ```text
//! gem-cascade [--seed N] [--moves N] [--width N] [--height N] [--quiet] [--paced]
//! ```

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;

use gem_cascade::adapter::{run_driver, BoardEvent, DriverConfig, SwapAdapter, SwapCommit};
use gem_cascade::core::{BoardConfig, Grid, NullPresenter, SimpleRng, SwapOutcome};
use gem_cascade::demo::{parse_demo_args, random_adjacent_swap, DemoArgs};

/// Keeps the move stream independent of the board's own refill sequence
const MOVE_SEED_SALT: u32 = 0x9E37_79B9;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let demo = parse_demo_args(&args)?;

    let mut config = BoardConfig::from_env();
    demo.apply(&mut config);
    config
        .validate()
        .map_err(|e| anyhow!("config: {}", e))?;

    if demo.paced {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| anyhow!("runtime: {}", e))?;
        rt.block_on(run_paced(config, &demo))
    } else {
        run(config, &demo)
    }
}

fn print_board(rows: &[String]) {
    for row in rows {
        println!("  {}", row);
    }
}

fn run(config: BoardConfig, demo: &DemoArgs) -> Result<()> {
    let mut moves_rng = SimpleRng::new(config.seed ^ MOVE_SEED_SALT);
    let mut adapter = SwapAdapter::from_config(config, NullPresenter::new())
        .map_err(|e| anyhow!("board: {}", e))?;

    if !demo.quiet {
        println!("initial board:");
        print_board(&adapter.engine().grid().to_letters());
    }

    let mut committed = 0u32;
    let mut cleared = 0usize;
    for i in 1..=demo.moves {
        let Some((a, b)) = random_adjacent_swap(&mut moves_rng, adapter.engine().grid()) else {
            break;
        };
        let commit = SwapCommit::new(i as u64, a, b);
        match adapter.commit(&commit) {
            Ok(result) => {
                if let Some(summary) = &result.summary {
                    committed += 1;
                    cleared += summary.tiles_cleared;
                    if !demo.quiet {
                        println!(
                            "move {}: {} <-> {} committed: passes={} cleared={} spawned={} max_groups={} delay={}ms",
                            i,
                            a,
                            b,
                            summary.passes,
                            summary.tiles_cleared,
                            summary.tiles_spawned,
                            summary.max_groups_in_pass(),
                            summary.total_delay_hint_ms,
                        );
                        print_board(&adapter.engine().grid().to_letters());
                    }
                } else if !demo.quiet {
                    let label = match result.outcome {
                        SwapOutcome::Reverted => "reverted",
                        SwapOutcome::Kept => "kept",
                        SwapOutcome::Queued { .. } => "queued",
                        SwapOutcome::Committed { .. } => "committed",
                    };
                    println!("move {}: {} <-> {} {}", i, a, b, label);
                }
            }
            Err(e) => {
                if !demo.quiet {
                    println!("move {}: {} <-> {} rejected: {} ({})", i, a, b, e.code(), e);
                }
            }
        }
    }

    println!("final board:");
    print_board(&adapter.engine().grid().to_letters());
    let snapshot = adapter.engine().snapshot();
    println!(
        "moves={} committed={} cleared={} hash={:016x}",
        demo.moves, committed, cleared, snapshot.board_hash
    );
    Ok(())
}

async fn run_paced(config: BoardConfig, demo: &DemoArgs) -> Result<()> {
    let mut moves_rng = SimpleRng::new(config.seed ^ MOVE_SEED_SALT);
    let shape = Grid::new(config.width, config.height);
    let adapter = SwapAdapter::from_config(config, NullPresenter::new())
        .map_err(|e| anyhow!("board: {}", e))?;

    let (commit_tx, commit_rx) = mpsc::channel::<SwapCommit>(16);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<BoardEvent>();
    let driver = tokio::spawn(run_driver(
        adapter,
        DriverConfig::from_env(),
        commit_rx,
        event_tx,
    ));

    for i in 1..=demo.moves {
        let Some((a, b)) = random_adjacent_swap(&mut moves_rng, &shape) else {
            break;
        };
        if commit_tx.send(SwapCommit::new(i as u64, a, b)).await.is_err() {
            eprintln!("[Demo] driver stopped early");
            break;
        }
    }
    drop(commit_tx);

    while let Some(event) = event_rx.recv().await {
        if !demo.quiet {
            println!("{}", serde_json::to_string(&event)?);
        }
    }

    let adapter = driver
        .await
        .map_err(|e| anyhow!("driver task: {}", e))??;
    println!("final board:");
    print_board(&adapter.engine().grid().to_letters());
    println!("hash={:016x}", adapter.engine().snapshot().board_hash);
    Ok(())
}
