//! KOLOR: a timed color-matching quiz.
//!
//! A target color is shown alongside four swatches; pick the matching one before the clock runs out. Five rounds,
//! ten points per correct pick, and the best score is remembered between sessions.
//!
//! [`Game`] is the whole game state and the only thing that changes it. Drive it with [`Game::tick`] from a steady
//! clock (see [`Ticker`]) and [`Game::submit_guess`] on input, and draw [`Game::view`] however you like; [`Screen`]
//! draws it into an RGBA frame.

pub mod colors;
pub mod game;
pub mod screen;
pub mod settings;
pub mod store;
pub mod timing;

pub use colors::{generate_options, random_color, Color, ColorError, OPTION_COUNT};
pub use game::{Feedback, Game, GameView, GuessOutcome, RoundState};
pub use screen::{Layout, Screen, HEIGHT, WIDTH};
pub use settings::{Rules, Settings, SettingsError};
pub use store::{FileStore, MemoryStore, ScoreStore, StoreError, BEST_SCORE_KEY};
pub use timing::Ticker;
