//! # Simulation Driver
//!
//! Runs independent games sequentially or on a bounded rayon pool.
//!
//! Game `i` of a run draws from stream `i` of a `ChaCha8Rng` seeded with the
//! run's master seed, so the sequential and parallel paths produce the same
//! games for the same seed. Parallel results are re-ordered by game index
//! before they are handed back.

use crate::error::{Result, SimError};
use crate::game::GameResult;
use crossbeam_channel::unbounded;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

/// Cooperative cancellation flag shared between a caller and a run.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Per-run knobs. Every field is optional.
#[derive(Default)]
pub struct RunOptions<'a> {
    pub seed: Option<u64>,
    pub progress: Option<Box<dyn FnMut(Progress) + 'a>>,
    pub cancel: Option<CancellationToken>,
}

impl<'a> RunOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Called on the calling thread once per completed game.
    pub fn on_progress(mut self, callback: impl FnMut(Progress) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn report(&mut self, completed: usize, total: usize) {
        if let Some(callback) = self.progress.as_mut() {
            callback(Progress { completed, total });
        }
    }
}

/// Completed games of one run, in game-index order.
#[derive(Debug)]
pub struct RunOutput {
    pub seed: u64,
    pub games: Vec<GameResult>,
    pub cancelled: bool,
}

/// The random stream of game `index` under `seed`.
pub fn game_rng(seed: u64, index: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

/// Worker count clamped to `[1, available cores]`.
pub fn effective_workers(requested: Option<usize>) -> usize {
    let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    requested.unwrap_or(cores).clamp(1, cores)
}

pub fn run_sequential<F>(n: usize, seed: u64, options: &mut RunOptions<'_>, play: F) -> RunOutput
where
    F: Fn(&mut ChaCha8Rng) -> GameResult,
{
    let mut games = Vec::with_capacity(n);
    let mut cancelled = false;

    for index in 0..n {
        if options.is_cancelled() {
            cancelled = true;
            break;
        }
        let mut rng = game_rng(seed, index);
        games.push(play(&mut rng));
        options.report(games.len(), n);
    }

    info!(games = games.len(), requested = n, cancelled, "sequential run finished");
    RunOutput { seed, games, cancelled }
}

pub fn run_parallel<F>(
    n: usize,
    workers: usize,
    seed: u64,
    options: &mut RunOptions<'_>,
    play: F,
) -> Result<RunOutput>
where
    F: Fn(&mut ChaCha8Rng) -> GameResult + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| SimError::WorkerPool(e.to_string()))?;

    let cancel = options.cancel.clone().unwrap_or_default();
    let (tx, rx) = unbounded::<(usize, GameResult)>();
    let mut slots: Vec<Option<GameResult>> = (0..n).map(|_| None).collect();
    let mut completed = 0;

    thread::scope(|scope| {
        let (pool, play, cancel) = (&pool, &play, &cancel);
        scope.spawn(move || {
            pool.install(|| {
                (0..n).into_par_iter().for_each_with(tx, |tx, index| {
                    if cancel.is_cancelled() {
                        return;
                    }
                    let mut rng = game_rng(seed, index);
                    let result = play(&mut rng);
                    // the receiver outlives every sender
                    let _ = tx.send((index, result));
                });
            });
        });

        // ends once the last sender clone is dropped
        for (index, result) in rx.iter() {
            completed += 1;
            slots[index] = Some(result);
            debug!(index, completed, "game finished");
            options.report(completed, n);
        }
    });

    let games: Vec<GameResult> = slots.into_iter().flatten().collect();
    let cancelled = games.len() < n;
    info!(games = games.len(), requested = n, workers, cancelled, "parallel run finished");
    Ok(RunOutput { seed, games, cancelled })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PlayCounts;
    use crate::stats::PlayerStatLine;
    use rand::Rng;
    use std::cell::RefCell;

    fn fake_game(rng: &mut ChaCha8Rng) -> GameResult {
        GameResult {
            home: "PHI".into(),
            away: "DAL".into(),
            home_score: 7 * rng.gen_range(0..5),
            away_score: 3 * rng.gen_range(0..5),
            stats: PlayerStatLine::new(),
            counts: PlayCounts::default(),
        }
    }

    fn scores(output: &RunOutput) -> Vec<(u32, u32)> {
        output.games.iter().map(|g| (g.home_score, g.away_score)).collect()
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let sequential = run_sequential(64, 99, &mut RunOptions::new(), fake_game);
        let parallel = run_parallel(64, 4, 99, &mut RunOptions::new(), fake_game).unwrap();
        assert_eq!(scores(&sequential), scores(&parallel));
        assert!(!parallel.cancelled);
    }

    #[test]
    fn test_progress_called_once_per_game() {
        let calls = RefCell::new(Vec::new());
        let mut options = RunOptions::new().on_progress(|p| calls.borrow_mut().push(p.completed));
        run_parallel(20, 3, 1, &mut options, fake_game).unwrap();
        drop(options);
        assert_eq!(calls.into_inner(), (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_cancelled_before_start_returns_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let mut options = RunOptions::new().cancel_token(token.clone());
        let output = run_sequential(10, 1, &mut options, fake_game);
        assert!(output.cancelled);
        assert!(output.games.is_empty());

        let output = run_parallel(10, 2, 1, &mut options, fake_game).unwrap();
        assert!(output.cancelled);
        assert!(output.games.is_empty());
    }

    #[test]
    fn test_cancel_mid_run_keeps_completed_games() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let mut options = RunOptions::new().cancel_token(token).on_progress(move |p| {
            if p.completed == 5 {
                trigger.cancel();
            }
        });
        let output = run_sequential(50, 3, &mut options, fake_game);
        assert!(output.cancelled);
        assert_eq!(output.games.len(), 5);
    }

    #[test]
    fn test_streams_differ_per_game() {
        let mut a = game_rng(5, 0);
        let mut b = game_rng(5, 1);
        assert_ne!(a.gen::<u64>(), b.gen::<u64>());
        assert_eq!(game_rng(5, 3).gen::<u64>(), game_rng(5, 3).gen::<u64>());
    }

    #[test]
    fn test_worker_clamp() {
        assert_eq!(effective_workers(Some(0)), 1);
        assert!(effective_workers(Some(10_000)) >= 1);
        assert!(effective_workers(None) >= 1);
    }
}
