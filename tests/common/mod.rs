#![allow(dead_code)]

use async_trait::async_trait;
use form_coach::errors::CoachError;
use form_coach::models::{DetectedPose, Keypoint, VideoFrame};
use form_coach::services::{CameraConstraints, CameraDevice, CameraStream, DetectorLoader, PoseDetector};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Side view of a squat: thighs horizontal, shins and torso vertical
pub fn squat_pose() -> DetectedPose {
    let mut keypoints = Vec::new();
    for side in ["left", "right"] {
        keypoints.push(Keypoint::new(format!("{}_ear", side), 0.0, -30.0, 0.9));
        keypoints.push(Keypoint::new(format!("{}_shoulder", side), 0.0, 0.0, 0.9));
        keypoints.push(Keypoint::new(format!("{}_hip", side), 0.0, 100.0, 0.9));
        keypoints.push(Keypoint::new(format!("{}_knee", side), 100.0, 100.0, 0.9));
        keypoints.push(Keypoint::new(format!("{}_ankle", side), 100.0, 200.0, 0.9));
    }
    DetectedPose::new(keypoints).with_score(0.9)
}

/// Standing straight with arms hanging
pub fn standing_pose() -> DetectedPose {
    let mut keypoints = Vec::new();
    for side in ["left", "right"] {
        keypoints.push(Keypoint::new(format!("{}_shoulder", side), 0.0, 0.0, 0.9));
        keypoints.push(Keypoint::new(format!("{}_elbow", side), 0.0, 50.0, 0.9));
        keypoints.push(Keypoint::new(format!("{}_wrist", side), 0.0, 100.0, 0.9));
        keypoints.push(Keypoint::new(format!("{}_hip", side), 0.0, 100.0, 0.9));
        keypoints.push(Keypoint::new(format!("{}_knee", side), 0.0, 200.0, 0.9));
        keypoints.push(Keypoint::new(format!("{}_ankle", side), 0.0, 300.0, 0.9));
    }
    DetectedPose::new(keypoints).with_score(0.8)
}

/// Counters shared between a fake and the test
#[derive(Debug, Clone, Default)]
pub struct Counters {
    pub loads: Arc<AtomicU32>,
    pub detections: Arc<AtomicU32>,
    pub disposals: Arc<AtomicU32>,
    pub opens: Arc<AtomicU32>,
    pub stops: Arc<AtomicU32>,
    pub in_flight: Arc<AtomicU32>,
    pub max_in_flight: Arc<AtomicU32>,
}

impl Counters {
    pub fn get(counter: &Arc<AtomicU32>) -> u32 {
        counter.load(Ordering::SeqCst)
    }
}

/// Detector replaying scripted results, repeating the last one forever
pub struct ScriptedDetector {
    script: VecDeque<Result<Vec<DetectedPose>, CoachError>>,
    last: Result<Vec<DetectedPose>, CoachError>,
    delay: Option<Duration>,
    counters: Counters,
}

#[async_trait]
impl PoseDetector for ScriptedDetector {
    async fn estimate_poses(&mut self, _frame: &VideoFrame) -> Result<Vec<DetectedPose>, CoachError> {
        self.counters.detections.fetch_add(1, Ordering::SeqCst);
        let running = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last.clone()
    }

    fn dispose(&mut self) {
        self.counters.disposals.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeLoader {
    script: Mutex<Vec<Result<Vec<DetectedPose>, CoachError>>>,
    fail_with: Mutex<Option<CoachError>>,
    delay: Option<Duration>,
    pub counters: Counters,
}

impl FakeLoader {
    pub fn new(script: Vec<Result<Vec<DetectedPose>, CoachError>>) -> Self {
        Self {
            script: Mutex::new(script),
            fail_with: Mutex::new(None),
            delay: None,
            counters: Counters::default(),
        }
    }

    pub fn always(poses: Vec<DetectedPose>) -> Self {
        Self::new(vec![Ok(poses)])
    }

    /// Make every detection take at least `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the next load only
    pub fn fail_once(self, err: CoachError) -> Self {
        *self.fail_with.lock().unwrap() = Some(err);
        self
    }
}

#[async_trait]
impl DetectorLoader for FakeLoader {
    async fn load(&self) -> Result<Box<dyn PoseDetector>, CoachError> {
        self.counters.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_with.lock().unwrap().take() {
            return Err(err);
        }
        Ok(Box::new(ScriptedDetector {
            script: self.script.lock().unwrap().clone().into(),
            last: Ok(Vec::new()),
            delay: self.delay,
            counters: self.counters.clone(),
        }))
    }
}

pub struct FakeStream {
    counters: Counters,
}

impl CameraStream for FakeStream {
    fn capture_frame(&mut self) -> Result<VideoFrame, CoachError> {
        Ok(VideoFrame {
            width: 640,
            height: 480,
            ..Default::default()
        })
    }

    fn stop(&mut self) {
        self.counters.stops.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeCamera {
    deny: Mutex<bool>,
    pub last_constraints: Mutex<Option<CameraConstraints>>,
    pub counters: Counters,
}

impl FakeCamera {
    pub fn new() -> Self {
        Self {
            deny: Mutex::new(false),
            last_constraints: Mutex::new(None),
            counters: Counters::default(),
        }
    }

    pub fn denied() -> Self {
        let camera = Self::new();
        *camera.deny.lock().unwrap() = true;
        camera
    }

    pub fn grant(&self) {
        *self.deny.lock().unwrap() = false;
    }
}

#[async_trait]
impl CameraDevice for FakeCamera {
    async fn open(&self, constraints: &CameraConstraints) -> Result<Box<dyn CameraStream>, CoachError> {
        *self.last_constraints.lock().unwrap() = Some(*constraints);
        if *self.deny.lock().unwrap() {
            return Err(CoachError::CameraPermissionDenied);
        }
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            counters: self.counters.clone(),
        }))
    }
}
