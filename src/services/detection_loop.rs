/// Detection loop
///
/// A `CoachSession` owns the camera stream, the pose detector and the form
/// analyzer for one coaching page. Sampling runs at a fixed cadence rather
/// than per video frame; every tick captures a frame, detects a pose and
/// republishes the metrics snapshot.
///
/// States: Idle → Ready (model loaded, camera attached) → Sampling ⇄ Ready,
/// and any state → Stopped on teardown.

use serde::Serialize;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::DetectionConfig;
use crate::errors::CoachError;
use crate::models::{DetectedPose, ExerciseType, MetricsSnapshot};
use crate::services::form_analyzer::FormAnalyzer;
use crate::services::pose_detector::{
    CameraConstraints, CameraDevice, CameraGuard, DetectorGuard, DetectorLoader,
};

/// Lifecycle state of a coaching session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No camera or model
    Idle,
    /// Model loaded and camera attached, not sampling
    Ready,
    /// Producing snapshots at the sample interval
    Sampling,
    /// Camera and model released
    Stopped,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::Sampling => write!(f, "sampling"),
            SessionState::Stopped => write!(f, "stopped"),
        }
    }
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A pose was analysed and the snapshot replaced
    Updated,
    /// The detector found nobody; previous snapshot kept
    NoPose,
    /// Capture or detection failed; the frame was dropped
    Dropped(CoachError),
}

/// User actions forwarded to a running session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Start,
    Pause,
    SelectExercise(ExerciseType),
    Teardown,
}

pub struct CoachSession {
    id: Uuid,
    state: SessionState,
    config: DetectionConfig,
    analyzer: FormAnalyzer,
    snapshot: MetricsSnapshot,
    detector: Option<DetectorGuard>,
    camera: Option<CameraGuard>,
    last_error: Option<CoachError>,
}

impl CoachSession {
    pub fn new(exercise: ExerciseType, config: DetectionConfig) -> Self {
        let analyzer = FormAnalyzer::from_config(exercise, &config);
        let snapshot = analyzer.empty_snapshot();

        Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            config,
            analyzer,
            snapshot,
            detector: None,
            camera: None,
            last_error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn exercise(&self) -> ExerciseType {
        self.analyzer.exercise()
    }

    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    /// Resource failure from the last initialization attempt, for a retry prompt
    pub fn last_error(&self) -> Option<&CoachError> {
        self.last_error.as_ref()
    }

    fn invalid(&self, action: &'static str) -> CoachError {
        CoachError::InvalidTransition {
            from: self.state,
            action,
        }
    }

    fn record_failure(&mut self, err: CoachError) -> CoachError {
        error!(session_id = %self.id, "Session initialization failed: {}", err);
        self.last_error = Some(err.clone());
        err
    }

    /// Load the detector and open the camera: Idle → Ready
    ///
    /// On failure the session stays Idle and anything already acquired is
    /// released. Calling again is the user's retry.
    pub async fn initialize(
        &mut self,
        loader: &dyn DetectorLoader,
        camera: &dyn CameraDevice,
    ) -> Result<(), CoachError> {
        if self.state != SessionState::Idle {
            return Err(self.invalid("initialize"));
        }

        let detector = match loader.load().await {
            Ok(detector) => DetectorGuard::new(detector),
            Err(err) => return Err(self.record_failure(err)),
        };

        let constraints = CameraConstraints::from(&self.config);
        // The detector guard is dropped, and the model disposed, if this fails
        let stream = match camera.open(&constraints).await {
            Ok(stream) => CameraGuard::new(stream),
            Err(err) => return Err(self.record_failure(err)),
        };

        self.detector = Some(detector);
        self.camera = Some(stream);
        self.last_error = None;
        self.state = SessionState::Ready;

        info!(
            session_id = %self.id,
            "Session ready ({}x{} camera)",
            constraints.width, constraints.height
        );
        Ok(())
    }

    /// Ready → Sampling
    pub fn start(&mut self) -> Result<(), CoachError> {
        match self.state {
            SessionState::Ready => {
                self.state = SessionState::Sampling;
                info!(session_id = %self.id, "Sampling started for {}", self.exercise());
                Ok(())
            }
            SessionState::Sampling => Ok(()),
            _ => Err(self.invalid("start sampling")),
        }
    }

    /// Sampling → Ready, keeping angle history
    pub fn pause(&mut self) -> Result<(), CoachError> {
        match self.state {
            SessionState::Sampling => {
                self.state = SessionState::Ready;
                info!(session_id = %self.id, "Sampling paused");
                Ok(())
            }
            SessionState::Ready => Ok(()),
            _ => Err(self.invalid("pause")),
        }
    }

    /// Switch exercise, clearing all angle history; stops sampling
    pub fn select_exercise(&mut self, exercise: ExerciseType) -> Result<(), CoachError> {
        if self.state == SessionState::Stopped {
            return Err(self.invalid("select an exercise"));
        }
        if self.state == SessionState::Sampling {
            self.state = SessionState::Ready;
        }

        self.analyzer.select_exercise(exercise);
        self.snapshot = self.analyzer.empty_snapshot();

        info!(session_id = %self.id, "Exercise switched to {}", exercise);
        Ok(())
    }

    /// Run one detection step
    pub async fn tick(&mut self) -> Result<TickOutcome, CoachError> {
        if self.state != SessionState::Sampling {
            return Err(self.invalid("sample"));
        }
        let (Some(camera), Some(detector)) = (self.camera.as_mut(), self.detector.as_mut()) else {
            return Err(self.invalid("sample"));
        };

        let frame = match camera.capture_frame() {
            Ok(frame) => frame,
            Err(err) => {
                warn!(session_id = %self.id, "Dropping tick: {}", err);
                return Ok(TickOutcome::Dropped(err));
            }
        };

        let poses = match detector.estimate_poses(&frame).await {
            Ok(poses) => poses,
            Err(err) => {
                warn!(session_id = %self.id, "Dropping tick: {}", err);
                return Ok(TickOutcome::Dropped(err));
            }
        };

        let Some(pose) = DetectedPose::best(&poses) else {
            debug!(session_id = %self.id, "No pose detected, keeping previous snapshot");
            return Ok(TickOutcome::NoPose);
        };

        self.snapshot = self.analyzer.analyze(pose);
        debug!(session_id = %self.id, tick = self.snapshot.tick, "Snapshot updated");
        Ok(TickOutcome::Updated)
    }

    /// Release the camera and detector: any state → Stopped
    pub fn teardown(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            camera.release();
        }
        if let Some(mut detector) = self.detector.take() {
            detector.release();
        }
        if self.state != SessionState::Stopped {
            info!(session_id = %self.id, "Session stopped");
        }
        self.state = SessionState::Stopped;
    }

    fn apply(&mut self, command: SessionCommand) -> Result<(), CoachError> {
        match command {
            SessionCommand::Start => self.start(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::SelectExercise(exercise) => self.select_exercise(exercise),
            SessionCommand::Teardown => {
                self.teardown();
                Ok(())
            }
        }
    }

    /// Drive the session until teardown or until the command channel closes
    ///
    /// Ticks are awaited inline, so a slow detection delays the next tick
    /// instead of overlapping it; ticks missed meanwhile are skipped.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        snapshots: watch::Sender<MetricsSnapshot>,
    ) -> SessionState {
        // tokio rejects a zero period
        let period = self.config.sample_interval().max(Duration::from_millis(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        snapshots.send_replace(self.snapshot.clone());

        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(SessionCommand::Teardown) | None => break,
                    Some(command) => {
                        let was_sampling = self.state == SessionState::Sampling;
                        if let Err(err) = self.apply(command) {
                            warn!(session_id = %self.id, "Ignoring command: {}", err);
                        }
                        if !was_sampling && self.state == SessionState::Sampling {
                            ticker.reset();
                        }
                        snapshots.send_replace(self.snapshot.clone());
                    }
                },

                _ = ticker.tick(), if self.state == SessionState::Sampling => {
                    match self.tick().await {
                        Ok(TickOutcome::Updated) => {
                            snapshots.send_replace(self.snapshot.clone());
                        }
                        Ok(_) => {}
                        Err(err) => warn!(session_id = %self.id, "Tick skipped: {}", err),
                    }
                }
            }
        }

        self.teardown();
        self.state
    }

    /// Spawn the driver onto the current runtime
    pub fn spawn(self) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (snapshot_tx, snapshot_rx) = watch::channel(self.snapshot.clone());
        let task = tokio::spawn(self.run(command_rx, snapshot_tx));

        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            task,
        }
    }
}

/// Handle to a spawned session
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<MetricsSnapshot>,
    task: JoinHandle<SessionState>,
}

impl SessionHandle {
    pub async fn send(&self, command: SessionCommand) -> anyhow::Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| anyhow::anyhow!("coaching session has stopped"))
    }

    /// Receiver for the latest snapshot
    pub fn snapshots(&self) -> watch::Receiver<MetricsSnapshot> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> MetricsSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Tear the session down and wait for the driver to finish
    pub async fn shutdown(self) -> anyhow::Result<SessionState> {
        // The driver also tears down when the channel closes
        let _ = self.commands.send(SessionCommand::Teardown).await;
        Ok(self.task.await?)
    }
}
