use std::{cmp::Ordering, path::PathBuf};

use chrono::Utc;
use log::{debug, info};
use rand::Rng;
use rand_pcg::Pcg32;
use stackfall_engine::{BOARD_WIDTH, Command, GameSession, LockEvent, PieceSeed, StepOutcome};

use crate::{schema::record::SavedScore, util::Output};

/// Stream selector for the autoplayer's generator, distinct from the one
/// drawing pieces from the same seed.
const AUTOPLAYER_STREAM: u64 = 0x5a17_fa11_0000_0001;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Piece seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Player name stored in the score record
    #[arg(long, default_value = "autoplayer")]
    player: String,
    /// Stop after this many pieces have locked
    #[arg(long, default_value_t = 1000)]
    max_pieces: usize,
    /// Simulated frame length in milliseconds, used when gravity locks a piece
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Probability of hard-dropping a piece instead of letting it fall
    #[arg(long, default_value_t = 0.5)]
    hard_drop_ratio: f64,
    /// Print the final board to stderr
    #[arg(long)]
    show_board: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Plays each piece with random rotations and a random target column.
#[derive(Debug)]
struct Autoplayer {
    rng: Pcg32,
    frame_seconds: f64,
    hard_drop_ratio: f64,
}

impl Autoplayer {
    fn new(seed: PieceSeed, frame_seconds: f64, hard_drop_ratio: f64) -> Self {
        let [state @ .., _, _, _, _, _, _, _, _] = *seed.as_bytes();
        Self {
            rng: Pcg32::new(u64::from_be_bytes(state), AUTOPLAYER_STREAM),
            frame_seconds,
            hard_drop_ratio,
        }
    }

    /// Steers the current piece and returns once it locks.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    fn play_piece(&mut self, session: &mut GameSession) -> anyhow::Result<LockEvent> {
        for _ in 0..self.rng.random_range(0..4) {
            session.try_rotate()?;
        }

        let target_x = self.rng.random_range(0..BOARD_WIDTH) as i32;
        loop {
            let command = match session.current_piece().origin().x.cmp(&target_x) {
                Ordering::Less => Command::MoveRight,
                Ordering::Greater => Command::MoveLeft,
                Ordering::Equal => break,
            };
            if session.apply(command)?.is_rejected() {
                break;
            }
        }

        if self.rng.random_bool(self.hard_drop_ratio) {
            if let StepOutcome::Locked(event) = session.try_hard_drop()? {
                return Ok(event);
            }
            anyhow::bail!("hard drop did not lock the piece");
        }
        loop {
            if let StepOutcome::Locked(event) = session.tick(self.frame_seconds)? {
                return Ok(event);
            }
        }
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        player,
        max_pieces,
        frame_ms,
        hard_drop_ratio,
        show_board,
        output,
    } = arg;

    anyhow::ensure!(*frame_ms > 0, "--frame-ms must be positive");
    anyhow::ensure!(
        (0.0..=1.0).contains(hard_drop_ratio),
        "--hard-drop-ratio must be between 0 and 1, got {hard_drop_ratio}"
    );

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut session = GameSession::with_seed(seed);
    session.start()?;

    #[expect(clippy::cast_precision_loss)]
    let frame_seconds = *frame_ms as f64 / 1000.0;
    let mut autoplayer = Autoplayer::new(seed, frame_seconds, *hard_drop_ratio);

    eprintln!("Simulating with seed {seed}...");
    let mut pieces = 0;
    while !session.is_over() && pieces < *max_pieces {
        let event = autoplayer.play_piece(&mut session)?;
        pieces += 1;
        if event.cleared_lines() > 0 {
            debug!(
                "piece {pieces}: cleared rows {:?} for {} points",
                event.cleared_rows, event.points
            );
        }
    }
    info!(
        "simulation finished after {pieces} pieces (game over: {})",
        session.is_over()
    );
    eprintln!(
        "Finished after {pieces} pieces: score {}, level {}, lines {}",
        session.score(),
        session.level(),
        session.total_cleared_lines()
    );

    let saved = SavedScore {
        recorded_at: Utc::now(),
        seed,
        record: session.score_record(player.as_str()),
        final_snapshot: session.snapshot(),
    };
    if *show_board {
        eprintln!("{}", saved.final_snapshot);
    }
    Output::save_json(&saved, output.clone())?;

    Ok(())
}
