#![forbid(unsafe_code)]

//! Camera state and transition planning.
//!
//! The camera is two nested layers. The outer *zoom* layer (the container)
//! only scales; the inner *pan* layer (the canvas) rotates and translates.
//! Splitting them lets a transition run in two phases: when zooming in the
//! zoom layer moves first and the pan follows after the phase delay, and
//! when zooming out the order flips.

use core::time::Duration;

use sdeck_core::geometry::{Num, Transform3d, camera_pan, camera_zoom};

use crate::config::DeckConfig;

/// Style properties written to one camera layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    pub transform: String,
    pub duration: Duration,
    pub delay: Duration,
}

impl LayerStyle {
    /// `(property, value)` pairs for the document.
    #[must_use]
    pub fn properties(&self) -> [(&'static str, String); 3] {
        [
            ("transform", self.transform.clone()),
            ("transition-duration", css_ms(self.duration)),
            ("transition-delay", css_ms(self.delay)),
        ]
    }
}

/// Format a duration as a CSS time in milliseconds.
#[must_use]
pub fn css_ms(d: Duration) -> String {
    format!("{}ms", d.as_millis())
}

/// Outcome of planning a move to one step.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    /// Camera transform after the move.
    pub camera: Transform3d,
    /// True when the new camera scale is at least the current one.
    pub zooming_in: bool,
    /// Transition duration for both layers.
    pub duration: Duration,
    /// Delay applied to the zoom layer.
    pub zoom_delay: Duration,
    /// Delay applied to the pan layer.
    pub pan_delay: Duration,
    /// Container perspective in pixels, proportional to the step scale.
    pub perspective_px: f64,
}

impl TransitionPlan {
    /// Styles for the zoom layer, perspective included.
    #[must_use]
    pub fn zoom_layer(&self) -> (LayerStyle, String) {
        (
            LayerStyle {
                transform: camera_zoom(&self.camera),
                duration: self.duration,
                delay: self.zoom_delay,
            },
            format!("{}px", Num(self.perspective_px)),
        )
    }

    /// Styles for the pan layer.
    #[must_use]
    pub fn pan_layer(&self) -> LayerStyle {
        LayerStyle {
            transform: camera_pan(&self.camera),
            duration: self.duration,
            delay: self.pan_delay,
        }
    }
}

/// Plan the camera move from `current` to the step placed at `step`.
///
/// `first` marks the initial selection of a session, which jumps without
/// animation.
#[must_use]
pub fn plan_transition(
    current: &Transform3d,
    step: &Transform3d,
    first: bool,
    config: &DeckConfig,
) -> TransitionPlan {
    let camera = step.inverse();
    let zooming_in = camera.scale >= current.scale;
    let phase = config.phase_delay();
    let (zoom_delay, pan_delay) = if zooming_in {
        (Duration::ZERO, phase)
    } else {
        (phase, Duration::ZERO)
    };
    TransitionPlan {
        camera,
        zooming_in,
        duration: if first {
            Duration::ZERO
        } else {
            config.transition()
        },
        zoom_delay,
        pan_delay,
        perspective_px: step.scale * config.base_perspective_px,
    }
}

/// Camera of a running session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraState {
    current: Transform3d,
    active: Option<usize>,
}

impl CameraState {
    /// Identity camera, nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> &Transform3d {
        &self.current
    }

    /// Index of the active step.
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// True until the first selection is committed.
    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.active.is_none()
    }

    /// Record a completed selection.
    pub fn commit(&mut self, camera: Transform3d, active: usize) {
        self.current = camera;
        self.active = Some(active);
    }
}
