//! Fixed-period SLAM cycle orchestration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use crate::algorithms::localization::ParticleFilter;
use crate::algorithms::mapping::Mapper;
use crate::config::SlamConfig;
use crate::core::types::{Point2D, Twist2D};
use crate::error::Result;
use crate::io::messages::{CycleResult, GridSnapshot, LandmarkMessage, PoseEstimate};
use crate::io::snapshot::SnapshotCell;

use super::exploration::ExplorationPolicy;

/// Producer-side handles for feeding the estimation loop.
///
/// Clone freely; all clones write into the same snapshot cells read at the
/// start of each cycle.
#[derive(Debug, Clone, Default)]
pub struct SlamInputs {
    /// Latest velocity command.
    pub control: SnapshotCell<Twist2D>,
    /// Latest range scan, as robot-frame offsets.
    pub range_points: SnapshotCell<Vec<Point2D>>,
    /// Latest landmark observations, as robot-frame offsets.
    pub landmark_observations: SnapshotCell<Vec<Point2D>>,
}

/// Runs the snapshot / localize / map / explore cycle.
///
/// Owns the localizer and mapper outright; all their state is mutated only
/// from [`tick`](SlamOrchestrator::tick), so a cycle never races producers
/// beyond the snapshot cells.
#[derive(Debug)]
pub struct SlamOrchestrator {
    localizer: ParticleFilter,
    mapper: Mapper,
    exploration: ExplorationPolicy,
    inputs: SlamInputs,
    last_control: Twist2D,
    last_range_points: Vec<Point2D>,
    last_observations: Vec<Point2D>,
    cycle_period: Duration,
    shutdown: Arc<AtomicBool>,
}

impl SlamOrchestrator {
    /// Build the full estimation stack from a validated configuration.
    pub fn new(config: SlamConfig) -> Result<Self> {
        config.validate()?;

        // The filter integrates control over exactly one cycle.
        let mut filter_config = config.particle_filter.clone();
        filter_config.timestep = config.cycle_period_s;

        Ok(Self {
            localizer: ParticleFilter::new(filter_config, config.initial_pose)?,
            mapper: Mapper::new(config.mapper)?,
            exploration: ExplorationPolicy::new(config.exploration),
            inputs: SlamInputs::default(),
            last_control: Twist2D::zero(),
            last_range_points: Vec::new(),
            last_observations: Vec::new(),
            cycle_period: Duration::from_secs_f32(config.cycle_period_s),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Input handles for producer threads.
    pub fn inputs(&self) -> SlamInputs {
        self.inputs.clone()
    }

    /// Flag that stops [`run`](SlamOrchestrator::run) after the current
    /// cycle completes.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// The localizer (for inspection).
    pub fn localizer(&self) -> &ParticleFilter {
        &self.localizer
    }

    /// The mapper (for inspection).
    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    /// Export the current occupancy grid.
    pub fn grid_snapshot(&self) -> GridSnapshot {
        GridSnapshot::from_grid(self.mapper.grid())
    }

    /// Run one estimation cycle.
    ///
    /// Takes a consistent copy of each input stream, keeping the previous
    /// value for any stream with no new data, then localizes, maps, and
    /// asks the exploration policy for the next command.
    pub fn tick(&mut self) -> CycleResult {
        if let Some(control) = self.inputs.control.snapshot() {
            self.last_control = control;
        }
        if let Some(points) = self.inputs.range_points.snapshot() {
            self.last_range_points = points;
        }
        if let Some(observations) = self.inputs.landmark_observations.snapshot() {
            self.last_observations = observations;
        }

        let (pose, covariance) = self.localizer.update(
            &self.last_control,
            &self.last_observations,
            self.mapper.landmarks(),
        );
        self.mapper.update(
            &pose,
            &covariance,
            &self.last_range_points,
            &self.last_observations,
        );

        let command = self.exploration.next_command(&pose, self.mapper.landmarks());

        CycleResult {
            estimate: PoseEstimate { pose, covariance },
            landmarks: self
                .mapper
                .landmarks()
                .iter()
                .map(LandmarkMessage::from)
                .collect(),
            neff: self.localizer.state().neff,
            resampled: self.localizer.state().resampled,
            command,
        }
    }

    /// Drive the cycle at the configured period until shut down.
    ///
    /// Each result goes out over the channel; a closed receiver stops the
    /// loop, as does the shutdown flag. There is no mid-cycle cancellation.
    pub fn run(&mut self, results: &Sender<CycleResult>) {
        log::info!(
            "SLAM loop started, period {:.0} ms",
            self.cycle_period.as_secs_f64() * 1000.0
        );
        while !self.shutdown.load(Ordering::Relaxed) {
            let start = Instant::now();
            let result = self.tick();
            if results.send(result).is_err() {
                log::info!("Result channel closed, stopping SLAM loop");
                break;
            }
            if let Some(remaining) = self.cycle_period.checked_sub(start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
        log::info!("SLAM loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quiet_config() -> SlamConfig {
        let mut config = SlamConfig::default();
        config.particle_filter.num_particles = 20;
        config.particle_filter.position_std_dev = 0.0;
        config.particle_filter.seed = 17;
        config
    }

    #[test]
    fn test_tick_without_inputs_estimates_initial_pose() {
        let mut orchestrator = SlamOrchestrator::new(quiet_config()).expect("valid config");
        let result = orchestrator.tick();

        assert_relative_eq!(result.estimate.pose.x, 0.0);
        assert_relative_eq!(result.estimate.pose.y, 0.0);
        assert!(result.landmarks.is_empty());
        // No landmarks yet, so the policy emits the search pattern.
        let command = result.command.expect("exploration enabled");
        assert!(command.angular > 0.0);
    }

    #[test]
    fn test_observations_become_landmarks_and_targets() {
        let mut orchestrator = SlamOrchestrator::new(quiet_config()).expect("valid config");
        let inputs = orchestrator.inputs();
        inputs
            .landmark_observations
            .publish(vec![Point2D::new(3.0, 0.0)]);

        let result = orchestrator.tick();
        assert_eq!(result.landmarks.len(), 1);
        assert_relative_eq!(result.landmarks[0].position.x, 3.0, epsilon = 1e-4);

        // With a landmark tracked, the command drives toward it.
        let command = result.command.expect("exploration enabled");
        assert!(command.linear_x > 0.0);
        assert_relative_eq!(command.angular, 0.0);
    }

    #[test]
    fn test_stale_inputs_are_reused() {
        let mut orchestrator = SlamOrchestrator::new(quiet_config()).expect("valid config");
        let inputs = orchestrator.inputs();
        inputs.range_points.publish(vec![Point2D::new(2.0, 0.0)]);

        orchestrator.tick();
        let (_, _, occupied_after_first) = orchestrator.mapper().grid().count_cells();
        // No new scan published; the last one is applied again.
        orchestrator.tick();
        let (free, _, occupied) = orchestrator.mapper().grid().count_cells();

        assert!(occupied_after_first > 0);
        assert_eq!(occupied, occupied_after_first);
        assert!(free > 0);
    }

    #[test]
    fn test_control_moves_estimate() {
        let mut orchestrator = SlamOrchestrator::new(quiet_config()).expect("valid config");
        let inputs = orchestrator.inputs();
        inputs.control.publish(Twist2D::new(0.5, 0.0, 0.0));

        let mut pose = crate::core::types::Pose2D::identity();
        for _ in 0..10 {
            pose = orchestrator.tick().estimate.pose;
        }
        // 0.5 m/s over 10 cycles of 0.1 s.
        assert_relative_eq!(pose.x, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_run_loop_stops_on_shutdown() {
        let mut config = quiet_config();
        config.cycle_period_s = 0.005;
        let mut orchestrator = SlamOrchestrator::new(config).expect("valid config");
        let shutdown = orchestrator.shutdown_handle();
        let (tx, rx) = crossbeam_channel::unbounded();

        let handle = std::thread::spawn(move || {
            orchestrator.run(&tx);
        });

        // Collect a few results, then stop the loop.
        for _ in 0..3 {
            rx.recv_timeout(Duration::from_secs(2)).expect("cycle result");
        }
        shutdown.store(true, Ordering::Relaxed);
        handle.join().expect("loop thread");
    }

    #[test]
    fn test_run_loop_stops_when_receiver_drops() {
        let mut config = quiet_config();
        config.cycle_period_s = 0.005;
        let mut orchestrator = SlamOrchestrator::new(config).expect("valid config");
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);

        // Returns immediately on the first failed send.
        orchestrator.run(&tx);
    }
}
