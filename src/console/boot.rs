//! Loader boot sequence: progress percentage and status line for a given elapsed time.

use std::time::Duration;

/// Status lines shown while the console boots, in order.
pub const BOOT_MESSAGES: [&str; 12] = [
    "Initializing core protocols…",
    "Program start: OK",
    "Calibrating lattice parameters…",
    "Establishing neural link…",
    "Neural link: SYNCHRONIZED [100%]",
    "Deploying AR modules…",
    "Querying user biometric streams…",
    "Cognitive guardrails: NOMINAL",
    "Model selected: resonantia-echo-enhanced v3.5",
    "Echo amplifier: WARMING",
    "Entropy dampener: ACTIVE",
    "Permissions: CLASSIFIED // LIMITED",
];

/// Past this share of the loading window the bar pins to 100%.
const COMPLETE_AT: f64 = 0.85;

/// One rendered moment of the boot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootFrame {
    pub percent: u8,
    pub message: &'static str,
    /// The access prompt may be shown.
    pub ready: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BootSequence {
    pub min_duration: Duration,
    pub initial_delay: Duration,
}

impl Default for BootSequence {
    fn default() -> Self {
        Self {
            min_duration: Duration::from_millis(3000),
            initial_delay: Duration::from_millis(800),
        }
    }
}

impl BootSequence {
    pub fn new(min_duration: Duration, initial_delay: Duration) -> Self {
        Self {
            min_duration,
            initial_delay: initial_delay.min(min_duration),
        }
    }

    /// Frame for `elapsed` since the loader appeared. Progress never decreases as
    /// `elapsed` grows.
    pub fn progress(&self, elapsed: Duration) -> BootFrame {
        let ready = elapsed >= self.min_duration;
        if elapsed < self.initial_delay {
            return BootFrame {
                percent: 0,
                message: BOOT_MESSAGES[0],
                ready,
            };
        }

        let loading = (elapsed - self.initial_delay).as_secs_f64();
        let window = self.min_duration.saturating_sub(self.initial_delay).as_secs_f64();
        let base = if window <= 0.0 {
            1.0
        } else {
            (loading / window).min(1.0)
        };

        let percent = if base >= COMPLETE_AT {
            100
        } else {
            (base * 100.0).round() as u8
        };
        let idx = ((BOOT_MESSAGES.len() as f64 * base).floor() as usize).min(BOOT_MESSAGES.len() - 1);

        BootFrame {
            percent,
            message: BOOT_MESSAGES[idx],
            ready,
        }
    }
}
