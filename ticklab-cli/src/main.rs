//! TickLab CLI — single backtests and parameter sweeps.
//!
//! Commands:
//! - `run` — one backtest with explicit parameters, optional per-tick trace
//! - `sweep` — grid search around a base parameter set with live progress

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use ticklab_core::domain::{ParameterSet, PriceSeries};
use ticklab_core::engine::{run_backtest, run_backtest_traced};
use ticklab_runner::{
    compute_dataset_hash, default_worker_count, export_leaderboard_csv, export_trace_csv,
    load_ticks, sweep_with_progress, synthetic_series, write_manifest, GridConfig, Leaderboard,
    ParamGrid, RunManifest, SweepConfig, SweepSnapshot, DEFAULT_POLL_INTERVAL,
};

#[derive(Parser)]
#[command(name = "ticklab", about = "TickLab CLI — tick strategy backtesting and grid search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// CSV tick file (rows of index,bid,ask).
    #[arg(long)]
    data: Option<PathBuf>,

    /// Generate a synthetic series of this many ticks instead of loading.
    #[arg(long)]
    synthetic: Option<usize>,
}

#[derive(Args)]
struct ParamArgs {
    /// Short rolling-average window, in ticks.
    #[arg(long, default_value_t = 80)]
    short_window: usize,

    /// Ticks to wait after a high-spread exit before entering.
    #[arg(long, default_value_t = 80)]
    waiting_period: usize,

    /// Minimum short-average move from the regime-exit baseline.
    #[arg(long, default_value_t = 0.2)]
    exit_threshold: f64,

    /// Minimum short-average pullback that exits a position.
    #[arg(long, default_value_t = 0.9)]
    turn_threshold: f64,
}

impl ParamArgs {
    fn to_params(&self) -> ParameterSet {
        ParameterSet {
            short_window: self.short_window,
            waiting_period: self.waiting_period,
            hs_exit_change_threshold: self.exit_threshold,
            ma_turn_threshold: self.turn_threshold,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run one backtest and print its PnL and fees.
    Run {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        params: ParamArgs,

        /// Write the per-tick trace to this CSV file.
        #[arg(long)]
        trace_out: Option<PathBuf>,
    },
    /// Grid-search around a base parameter set.
    Sweep {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        params: ParamArgs,

        /// TOML sweep config; mutually exclusive with the flag-based setup.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Percent fuzz range around each base value.
        #[arg(long, default_value_t = 10)]
        pct_range: u32,

        /// Percent step inside the fuzz range.
        #[arg(long, default_value_t = 1)]
        pct_step: u32,

        /// Worker threads (0 = auto-detect).
        #[arg(long, default_value_t = 0)]
        workers: usize,

        /// Output directory for leaderboard.csv, manifest.json and the
        /// best run's trace.csv.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            params,
            trace_out,
        } => cmd_run(&data, params.to_params(), trace_out),
        Commands::Sweep {
            data,
            params,
            config,
            pct_range,
            pct_step,
            workers,
            output_dir,
        } => cmd_sweep(
            &data,
            params.to_params(),
            config,
            GridConfig {
                pct_range,
                pct_step,
            },
            workers,
            output_dir,
        ),
    }
}

/// Resolves the tick source: a CSV file or a labeled synthetic series.
fn resolve_series(data: &DataArgs) -> Result<(PriceSeries, String, String)> {
    match (&data.data, data.synthetic) {
        (Some(_), Some(_)) => bail!("--data and --synthetic are mutually exclusive"),
        (Some(path), None) => {
            let loaded = load_ticks(path)
                .with_context(|| format!("loading ticks from {}", path.display()))?;
            Ok((
                loaded.series,
                path.display().to_string(),
                loaded.dataset_hash,
            ))
        }
        (None, Some(len)) => {
            let series = synthetic_series("ticklab-demo", len);
            let hash = compute_dataset_hash(&series);
            Ok((series, format!("synthetic:{len}"), hash))
        }
        (None, None) => bail!("one of --data or --synthetic is required"),
    }
}

fn cmd_run(data: &DataArgs, params: ParameterSet, trace_out: Option<PathBuf>) -> Result<()> {
    params.validate()?;
    let (series, source, _) = resolve_series(data)?;
    println!("Loaded {} ticks from {source}", series.len());

    if let Some(path) = trace_out {
        let (result, trace) = run_backtest_traced(&series, &params);
        export_trace_csv(&trace, &path)?;
        println!("Trace written to {}", path.display());
        print_result(&params, result.pnl, result.total_fees);
    } else {
        let result = run_backtest(&series, &params);
        print_result(&params, result.pnl, result.total_fees);
    }
    Ok(())
}

fn cmd_sweep(
    data: &DataArgs,
    base: ParameterSet,
    config_path: Option<PathBuf>,
    grid: GridConfig,
    workers: usize,
    output_dir: PathBuf,
) -> Result<()> {
    if config_path.is_some() && (data.data.is_some() || data.synthetic.is_some()) {
        bail!("--config and --data/--synthetic are mutually exclusive");
    }

    // A config file replaces the flag-based setup wholesale.
    let (series, source, dataset_hash, base, grid, workers) =
        if let Some(path) = config_path {
            let config = SweepConfig::from_file(&path)?;
            let loaded = load_ticks(&config.data)
                .with_context(|| format!("loading ticks from {}", config.data.display()))?;
            (
                loaded.series,
                config.data.display().to_string(),
                loaded.dataset_hash,
                config.base,
                config.grid,
                config.workers,
            )
        } else {
            let (series, source, hash) = resolve_series(data)?;
            (series, source, hash, base, grid, workers)
        };

    base.validate()?;
    let cells = ParamGrid::around(&base, &grid)?.size();
    let worker_count = if workers == 0 {
        default_worker_count()
    } else {
        workers
    };
    println!("Loaded {} ticks from {source}", series.len());
    println!("Testing {cells} parameter combinations on {worker_count} threads...");

    // Baseline first, so the final report can say how much the search won.
    let baseline = run_backtest(&series, &base);
    println!(
        "Baseline [SW={}, WP={}, HSX={:.3}, MAT={:.3}] => PnL={:.2}, fees={:.2}",
        base.short_window,
        base.waiting_period,
        base.hs_exit_change_threshold,
        base.ma_turn_threshold,
        baseline.pnl,
        baseline.total_fees,
    );

    let board = sweep_with_progress(
        &base,
        &grid,
        &series,
        workers,
        DEFAULT_POLL_INTERVAL,
        print_progress,
    )?;
    eprintln!();

    print_leaderboard(&board, baseline.pnl);

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let leaderboard_path = output_dir.join("leaderboard.csv");
    export_leaderboard_csv(&board, &leaderboard_path)?;

    let manifest = RunManifest {
        generated_at: chrono::Local::now().naive_local(),
        data_path: source,
        dataset_hash,
        tick_count: series.len(),
        grid_cells: cells,
        worker_count,
        top: board.entries().to_vec(),
    };
    write_manifest(&manifest, &output_dir.join("manifest.json"))?;

    // Re-run the winner with tracing for the full per-tick report.
    if let Some(best) = board.best() {
        let (_, trace) = run_backtest_traced(&series, &best.result.params);
        export_trace_csv(&trace, &output_dir.join("trace.csv"))?;
    }

    println!("Results saved to {}", output_dir.display());
    Ok(())
}

/// Single-line carriage-return progress with the current top 3.
fn print_progress(snapshot: &SweepSnapshot) {
    let pct = 100.0 * snapshot.completed as f64 / snapshot.total as f64;
    let mut line = format!(
        "\rProgress: {}/{} ({pct:.1}%)  ",
        snapshot.completed, snapshot.total
    );
    let top_count = snapshot.top.len().min(3);
    if top_count > 0 {
        line.push_str(&format!("Top {top_count}: "));
        for entry in &snapshot.top[..top_count] {
            let p = &entry.result.params;
            line.push_str(&format!(
                "[SW={}, WP={}, HSX={:.3}, MAT={:.3} => {:.2}]  ",
                p.short_window,
                p.waiting_period,
                p.hs_exit_change_threshold,
                p.ma_turn_threshold,
                entry.result.pnl,
            ));
        }
    }
    line.push_str("\x1b[K");
    eprint!("{line}");
}

fn print_result(params: &ParameterSet, pnl: f64, total_fees: f64) {
    println!();
    println!("=== Backtest Result ===");
    println!("Short window:   {}", params.short_window);
    println!("Waiting period: {}", params.waiting_period);
    println!("Exit threshold: {:.3}", params.hs_exit_change_threshold);
    println!("Turn threshold: {:.3}", params.ma_turn_threshold);
    println!("PnL:            {pnl:.2}");
    println!("Total fees:     {total_fees:.2}");
}

fn print_leaderboard(board: &Leaderboard, baseline_pnl: f64) {
    println!();
    println!("=== Final Top {} ===", board.len());
    for (rank, entry) in board.entries().iter().enumerate() {
        let p = &entry.result.params;
        println!(
            "{:>2}) [SW={}, WP={}, HSX={:.3}, MAT={:.3}] => PnL={:.2}, fees={:.2} ({:+.2} vs baseline)",
            rank + 1,
            p.short_window,
            p.waiting_period,
            p.hs_exit_change_threshold,
            p.ma_turn_threshold,
            entry.result.pnl,
            entry.result.total_fees,
            entry.result.pnl - baseline_pnl,
        );
    }
}
