//! # gr-slot: slot engine for GemReel
//!
//! Weighted grid generation, payline evaluation with wild, scatter and bonus
//! symbols, and a session controller that runs the spin state machine.
//!
//! ## Architecture
//!
//! ```text
//! SlotMachine
//!     │
//!     ├── GameConfig (grid, symbols, paylines, bet limits, rules)
//!     ├── PayTable (symbol catalog, active paylines, pay rules)
//!     ├── SessionState (balance, bet, free spins, autoplay, stats)
//!     └── BonusRound (pending prize reveal)
//!           │
//!           v
//!     SpinOutcome { Grid, WinResult, WinTier }
//! ```
//!
//! Presentation lives outside this crate: a front end renders [`Grid`]s,
//! highlights [`WinResult::winning_cells`] and plays the [`TimingConfig`]
//! churn schedule while a spin is in flight.

pub mod bonus;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod paytable;
pub mod session;
pub mod sim;
pub mod spin;
pub mod symbols;
pub mod timing;

pub use bonus::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use paytable::*;
pub use session::*;
pub use sim::*;
pub use spin::*;
pub use symbols::*;
pub use timing::*;
