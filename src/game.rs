use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::colors::{generate_options, random_color, Color, OPTION_COUNT};
use crate::settings::Rules;
use crate::store::ScoreStore;

/// What the last thing that happened in the round was, shown to the player as a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Wrong,
    Timeout,
}

impl Feedback {
    pub fn message(&self) -> &'static str {
        use Feedback::*;
        match self {
            None => "",
            Correct => "✔ Correct!",
            Wrong => "✗ Wrong!",
            Timeout => "✗ Timeout!",
        }
    }

    /// Short style tag for whoever renders the message.
    pub fn style(&self) -> &'static str {
        use Feedback::*;
        match self {
            None => "",
            Correct => "correct",
            Wrong => "wrong",
            Timeout => "timeout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Wrong,
    /// Not accepting guesses right now (between rounds or after the last one).
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GameStatus {
    Playing,
    /// The last round's feedback is up; the next round is already set but its clock waits.
    Transition { hold: f64 },
    Over,
}

/// A round's clock. Expiry fires once; a new round gets a new countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    remaining: f64,
    expired: bool,
}

impl Countdown {
    fn new(seconds: f64) -> Self {
        Countdown {
            remaining: seconds,
            expired: false,
        }
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Runs the clock down, floored at zero. True only on the call that first reaches zero.
    fn run(&mut self, delta: f64) -> bool {
        self.remaining = (self.remaining - delta).max(0.0);
        if self.remaining == 0.0 && !self.expired {
            self.expired = true;
            return true;
        }
        false
    }

    fn stop(&mut self) {
        self.expired = true;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    index: u32,
    target: Color,
    options: [Color; OPTION_COUNT],
    countdown: Countdown,
    feedback: Feedback,
}

impl RoundState {
    /// 1-based.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn target(&self) -> Color {
        self.target
    }

    pub fn options(&self) -> &[Color; OPTION_COUNT] {
        &self.options
    }

    pub fn time_remaining(&self) -> f64 {
        self.countdown.remaining()
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }
}

/// Everything the screen needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GameView {
    pub target: Color,
    pub options: [Color; OPTION_COUNT],
    pub time_remaining: f64,
    pub round: u32,
    pub rounds: u32,
    pub score: u32,
    pub best_score: u32,
    pub feedback: Feedback,
    pub is_over: bool,
}

impl GameView {
    /// One decimal place, e.g. `"39.9"`.
    pub fn time_text(&self) -> String {
        format!("{:.1}", self.time_remaining)
    }

    /// e.g. `"2/5"`.
    pub fn round_text(&self) -> String {
        format!("{}/{}", self.round, self.rounds)
    }
}

/// The round engine: owns the whole game state and the only way to change it.
pub struct Game<S: ScoreStore, R: Rng = StdRng> {
    rules: Rules,
    rng: R,
    store: S,
    status: GameStatus,
    round: RoundState,
    score: u32,
    best_score: u32,
}

impl<S: ScoreStore> Game<S> {
    /// A default game seeded from the OS.
    pub fn new(store: S) -> Self {
        Game::with_rng(Rules::default(), store, StdRng::from_entropy())
    }
}

impl<S: ScoreStore, R: Rng> Game<S, R> {
    /// Starts round 1 straight away; the best score is read from `store` once, here.
    pub fn with_rng(rules: Rules, store: S, mut rng: R) -> Self {
        let best_score = store.best_score();
        let round = Self::fresh_round(&rules, &mut rng, 1);
        debug!("round 1: target {}", round.target);
        Game {
            rules,
            rng,
            store,
            status: GameStatus::Playing,
            round,
            score: 0,
            best_score,
        }
    }

    fn fresh_round(rules: &Rules, rng: &mut R, index: u32) -> RoundState {
        let target = random_color(rng);
        RoundState {
            index,
            target,
            options: generate_options(rng, target),
            countdown: Countdown::new(rules.round_seconds),
            feedback: Feedback::None,
        }
    }

    /// Replaces the current round with a fresh one: new target and options, full clock, no feedback.
    ///
    /// `index` is clamped to the configured rounds. Does nothing once the game is over.
    pub fn start_round(&mut self, index: u32) -> &RoundState {
        if self.status != GameStatus::Over {
            let index = index.min(self.rules.rounds).max(1);
            self.round = Self::fresh_round(&self.rules, &mut self.rng, index);
            self.status = GameStatus::Playing;
            debug!("round {}: target {}", index, self.round.target);
        }
        &self.round
    }

    /// Advances time by `delta` seconds. Negative or non-finite deltas count as no time at all.
    pub fn tick(&mut self, delta: f64) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        match self.status {
            GameStatus::Playing => {
                if self.round.countdown.run(delta) {
                    debug!("round {} timed out", self.round.index);
                    self.round.feedback = Feedback::Timeout;
                    self.advance();
                }
            }
            GameStatus::Transition { hold } => {
                let hold = hold - delta;
                if hold > 0.0 {
                    self.status = GameStatus::Transition { hold };
                } else {
                    self.round.feedback = Feedback::None;
                    self.status = GameStatus::Playing;
                }
            }
            GameStatus::Over => {}
        }
    }

    pub fn submit_guess(&mut self, color: Color) -> GuessOutcome {
        if self.status != GameStatus::Playing {
            return GuessOutcome::Ignored;
        }
        if color != self.round.target {
            debug!("round {}: {} is wrong", self.round.index, color);
            self.round.feedback = Feedback::Wrong;
            return GuessOutcome::Wrong;
        }

        debug!("round {}: {} is correct", self.round.index, color);
        self.round.feedback = Feedback::Correct;
        self.score = self.score.saturating_add(self.rules.score_increment);
        if self.score > self.best_score {
            info!("new best score {}", self.score);
            self.best_score = self.score;
            self.store.set_best_score(self.score);
        }
        self.advance();
        GuessOutcome::Correct
    }

    /// The single way a round ends, whether by guess or by timeout.
    fn advance(&mut self) {
        let feedback = self.round.feedback;
        if self.round.index < self.rules.rounds {
            self.start_round(self.round.index + 1);
            self.round.feedback = feedback;
            if self.rules.feedback_hold > 0.0 {
                self.status = GameStatus::Transition {
                    hold: self.rules.feedback_hold,
                };
            }
        } else {
            self.round.countdown.stop();
            self.status = GameStatus::Over;
            info!("game over, score {} (best {})", self.score, self.best_score);
        }
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Over
    }

    /// Whether guesses are being taken right now.
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> GameView {
        GameView {
            target: self.round.target,
            options: self.round.options,
            time_remaining: self.round.time_remaining(),
            round: self.round.index,
            rounds: self.rules.rounds,
            score: self.score,
            best_score: self.best_score,
            feedback: self.round.feedback,
            is_over: self.is_over(),
        }
    }
}
