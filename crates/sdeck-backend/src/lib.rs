#![forbid(unsafe_code)]
#![doc = "Backend traits for sdeck: platform abstraction for time, location, and presentation."]
#![doc = ""]
#![doc = "This crate defines the boundary between the presentation runtime and the"]
#![doc = "host that owns the real rendering surface (a browser page via `sdeck-web`,"]
#![doc = "or an in-memory fake in tests)."]

use core::time::Duration;

use sdeck_core::capabilities::SurfaceCapabilities;
use sdeck_dom::{Document, DocumentChanges};

/// Monotonic clock abstraction.
///
/// The runtime never reads wall-clock time directly; debounced effects are
/// scheduled and polled against this clock.
pub trait BackendClock {
    /// Returns elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Location abstraction: the URL fragment and the page scroll offset.
pub trait BackendLocation {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Current fragment including the leading `#`, or an empty string.
    fn fragment(&self) -> Result<String, Self::Error>;

    /// Replace the fragment. `fragment` includes the leading `#`.
    ///
    /// Hosts are expected to push a history entry so back/forward work.
    fn set_fragment(&mut self, fragment: &str) -> Result<(), Self::Error>;

    /// Scroll the page back to its origin.
    ///
    /// Focus changes can make the host scroll even with overflow hidden,
    /// which would break the camera's centering.
    fn scroll_to_origin(&mut self) -> Result<(), Self::Error>;
}

/// Presentation abstraction: mirrors document changes onto the real surface.
pub trait BackendPresenter {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Capabilities detected by this backend.
    fn capabilities(&self) -> &SurfaceCapabilities;

    /// Lock (or release) the page viewport: full height, overflow hidden.
    fn set_viewport_locked(&mut self, locked: bool) -> Result<(), Self::Error>;

    /// Apply the changes recorded in `doc` since the previous call.
    ///
    /// `changes` is never empty when the runtime calls this.
    fn present(&mut self, doc: &Document, changes: &DocumentChanges) -> Result<(), Self::Error>;

    /// Write a diagnostic line to the host console.
    fn write_log(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// Unified backend combining clock, location, and presenter.
///
/// The `Presentation` runtime is generic over this trait.
pub trait Backend {
    /// Platform-specific error type shared across sub-traits.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Clock implementation.
    type Clock: BackendClock;

    /// Location implementation.
    type Location: BackendLocation<Error = Self::Error>;

    /// Presenter implementation.
    type Presenter: BackendPresenter<Error = Self::Error>;

    /// Access the monotonic clock.
    fn clock(&self) -> &Self::Clock;

    /// Access the location.
    fn location(&mut self) -> &mut Self::Location;

    /// Access the presenter.
    fn presenter(&mut self) -> &mut Self::Presenter;
}
