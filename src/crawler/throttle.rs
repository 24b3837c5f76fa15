//! Courtesy delay between requests
//!
//! Every request after the first waits a random duration drawn uniformly
//! from `[min, max]`. There is no back-off: a rate-limited response does not
//! lengthen the next delay.

use crate::config::ScrapeConfig;
use rand::Rng;
use std::time::Duration;

/// Random inter-request delay
#[derive(Debug, Clone)]
pub struct Throttle {
    min: Duration,
    max: Duration,

    /// Set once the first request has gone out
    primed: bool,
}

impl Throttle {
    /// Creates a throttle with the given bounds
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn new(min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            primed: false,
        }
    }

    /// Creates a throttle from validated scrape settings
    pub fn from_config(config: &ScrapeConfig) -> Self {
        let (min, max) = config.sleep_bounds();
        Self::new(min, max)
    }

    /// Draws the next delay
    pub fn next_delay(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Waits before a request; the first call returns immediately
    pub async fn wait(&mut self) {
        if !self.primed {
            self.primed = true;
            return;
        }

        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }

        tracing::debug!("Sleeping {:.2}s before next request", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}
