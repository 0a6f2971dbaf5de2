//! Timing profiles for spin presentation
//!
//! The controller settles a spin in one step. Front ends stretch it over wall
//! clock time by playing a churn schedule: a fast phase where many cells flip
//! to random symbols, then a short slow-down phase, then the settled grid.

use serde::{Deserialize, Serialize};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Studio mode (instant for testing)
    Studio,
}

impl TimingProfile {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "turbo" => Some(Self::Turbo),
            "studio" => Some(Self::Studio),
            _ => None,
        }
    }
}

/// Detailed timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Length of the fast churn phase (ms)
    pub spin_duration_ms: u64,

    /// Interval between fast churn frames (ms)
    pub churn_interval_ms: u64,

    /// Chance each cell changes on a fast frame
    pub churn_probability: f64,

    /// Frames in the slow-down phase
    pub slowdown_steps: u32,

    /// Interval between slow-down frames (ms)
    pub slowdown_interval_ms: u64,

    /// Chance each cell changes on a slow-down frame
    pub slowdown_probability: f64,

    /// Pause before the next autoplay spin (ms)
    pub auto_spin_delay_ms: u64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            spin_duration_ms: 2000,
            churn_interval_ms: 50,
            churn_probability: 0.3,
            slowdown_steps: 5,
            slowdown_interval_ms: 100,
            slowdown_probability: 0.1,
            auto_spin_delay_ms: 1000,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            spin_duration_ms: 600,
            churn_interval_ms: 40,
            churn_probability: 0.4,
            slowdown_steps: 2,
            slowdown_interval_ms: 60,
            slowdown_probability: 0.1,
            auto_spin_delay_ms: 300,
        }
    }

    /// Studio mode: no animation, no pauses
    pub fn studio() -> Self {
        Self {
            profile: TimingProfile::Studio,
            spin_duration_ms: 0,
            churn_interval_ms: 0,
            churn_probability: 0.0,
            slowdown_steps: 0,
            slowdown_interval_ms: 0,
            slowdown_probability: 0.0,
            auto_spin_delay_ms: 0,
        }
    }

    /// Create from profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Studio => Self::studio(),
        }
    }

    /// Frame schedule for one spin animation
    pub fn churn_frames(&self) -> Vec<ChurnFrame> {
        let mut frames = Vec::new();

        if self.churn_interval_ms > 0 {
            let fast = self.spin_duration_ms / self.churn_interval_ms;
            frames.extend((0..fast).map(|_| ChurnFrame {
                delay_ms: self.churn_interval_ms,
                probability: self.churn_probability,
            }));
        }

        frames.extend((0..self.slowdown_steps).map(|_| ChurnFrame {
            delay_ms: self.slowdown_interval_ms,
            probability: self.slowdown_probability,
        }));

        frames
    }

    /// Total animation length (ms)
    pub fn animation_ms(&self) -> u64 {
        self.churn_frames().iter().map(|f| f.delay_ms).sum()
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// One animation frame: redraw each cell with `probability`, then wait `delay_ms`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChurnFrame {
    pub delay_ms: u64,
    pub probability: f64,
}
