#![forbid(unsafe_code)]

//! Rendering-surface capability detection.
//!
//! The engine only runs when the host surface can compose perspective
//! transforms and the platform is not a known touch device. Hosts report what
//! they detected; this module turns that into a single yes/no gate.

/// User-agent fragments that identify touch/mobile platforms.
pub const TOUCH_PLATFORM_MARKERS: [&str; 4] = ["iphone", "ipod", "ipad", "android"];

/// Capabilities of the hosting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceCapabilities {
    /// The surface understands `perspective` and 3-D transforms.
    pub perspective: bool,
    /// The host runs on a touch/mobile platform.
    pub touch_platform: bool,
}

impl Default for SurfaceCapabilities {
    fn default() -> Self {
        Self::modern()
    }
}

impl SurfaceCapabilities {
    /// A desktop surface with full 3-D support.
    #[must_use]
    pub const fn modern() -> Self {
        Self {
            perspective: true,
            touch_platform: false,
        }
    }

    /// A surface with no 3-D support.
    #[must_use]
    pub const fn basic() -> Self {
        Self {
            perspective: false,
            touch_platform: false,
        }
    }

    /// Build from a perspective probe result and a user-agent string.
    #[must_use]
    pub fn detect(perspective: bool, user_agent: &str) -> Self {
        Self {
            perspective,
            touch_platform: is_touch_user_agent(user_agent),
        }
    }

    /// Whether the presentation mode may be entered.
    #[must_use]
    pub const fn supports_presentation(&self) -> bool {
        self.perspective && !self.touch_platform
    }
}

/// Case-insensitive check for a known touch platform.
#[must_use]
pub fn is_touch_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    TOUCH_PLATFORM_MARKERS
        .iter()
        .any(|marker| ua.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn desktop_agent_is_supported() {
        let caps = SurfaceCapabilities::detect(
            true,
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0",
        );
        assert!(caps.supports_presentation());
    }

    #[test]
    fn touch_agents_are_rejected() {
        for ua in [
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)",
            "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X)",
            "Mozilla/5.0 (Linux; Android 14; Pixel 8)",
            "Mozilla/5.0 (iPod touch; CPU iPhone OS 12_0)",
        ] {
            let caps = SurfaceCapabilities::detect(true, ua);
            assert!(caps.touch_platform, "{ua}");
            assert!(!caps.supports_presentation(), "{ua}");
        }
    }

    #[test]
    fn missing_perspective_is_rejected() {
        assert!(!SurfaceCapabilities::basic().supports_presentation());
        assert!(SurfaceCapabilities::default().supports_presentation());
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert_eq!(
            SurfaceCapabilities::detect(true, "MOZILLA/5.0 (LINUX; ANDROID 14)"),
            SurfaceCapabilities {
                perspective: true,
                touch_platform: true,
            }
        );
        assert_eq!(
            SurfaceCapabilities::detect(false, "Mozilla/5.0 (Macintosh)"),
            SurfaceCapabilities::basic()
        );
    }
}
