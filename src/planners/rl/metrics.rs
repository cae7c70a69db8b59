//! Training metrics for the boss policy

use std::collections::VecDeque;
use std::time::Instant;

use tracing::info;

/// Moving average over the last `window_size` values
#[derive(Debug, Clone)]
pub struct MovingAverage {
    values: VecDeque<f32>,
    window_size: usize,
    sum: f32,
}

impl MovingAverage {
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            values: VecDeque::with_capacity(window_size),
            window_size,
            sum: 0.0,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.values.len() >= self.window_size {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }
        self.values.push_back(value);
        self.sum += value;
    }

    pub fn average(&self) -> f32 {
        if self.values.is_empty() {
            0.0
        } else {
            self.sum / self.values.len() as f32
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-episode outcome fed to [`TrainingMetrics`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// Sum of every boss reward in the episode (player phase included)
    pub total_reward: f32,
    pub rounds: u32,
    pub boss_won: bool,
}

/// Training metrics tracker
#[derive(Debug)]
pub struct TrainingMetrics {
    /// Episode rewards
    pub episode_rewards: MovingAverage,
    /// Rounds played per episode
    pub episode_lengths: MovingAverage,
    /// Fraction of episodes the boss won
    pub boss_win_rate: MovingAverage,
    /// Episodes recorded so far
    pub episodes: usize,
    /// Boss wins over the whole run
    pub total_boss_wins: usize,
    /// Training start time
    start_time: Instant,
}

impl TrainingMetrics {
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_rewards: MovingAverage::new(window_size),
            episode_lengths: MovingAverage::new(window_size),
            boss_win_rate: MovingAverage::new(window_size),
            episodes: 0,
            total_boss_wins: 0,
            start_time: Instant::now(),
        }
    }

    /// Record episode completion
    pub fn record_episode(&mut self, summary: &EpisodeSummary) {
        self.episode_rewards.push(summary.total_reward);
        self.episode_lengths.push(summary.rounds as f32);
        self.boss_win_rate
            .push(if summary.boss_won { 1.0 } else { 0.0 });
        self.episodes += 1;
        if summary.boss_won {
            self.total_boss_wins += 1;
        }
    }

    /// Get training duration in seconds
    pub fn training_duration_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Get episodes per second
    pub fn episodes_per_second(&self) -> f64 {
        let duration = self.training_duration_secs();
        if duration > 0.0 {
            self.episodes as f64 / duration
        } else {
            0.0
        }
    }

    /// Log current metrics to console
    pub fn log_to_console(&self, epsilon: f64) {
        info!(
            "Episode {} | EPS {:.1} | epsilon {:.4}",
            self.episodes,
            self.episodes_per_second(),
            epsilon
        );
        info!(
            "  Recent: reward={:.2}, rounds={:.1}, boss wins={:.1}% (overall {}/{})",
            self.episode_rewards.average(),
            self.episode_lengths.average(),
            self.boss_win_rate.average() * 100.0,
            self.total_boss_wins,
            self.episodes
        );
    }
}

impl Default for TrainingMetrics {
    fn default() -> Self {
        Self::new(100)
    }
}
