/// Options for the interactive preview window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOptions {
    pub title: String,
    /// Initial inner size in logical pixels.
    pub size: (u32, u32),
    /// Overrides the monitor's scale factor as the device pixel ratio.
    pub scale_factor: Option<f64>,
    /// Fixes the random time offset; fresh entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "PixelBlast".to_string(),
            size: (1280, 720),
            scale_factor: None,
            seed: None,
        }
    }
}

/// Parameters for rendering a single frame without a window.
#[derive(Debug, Clone, PartialEq)]
pub struct StillRequest {
    /// Container size in logical pixels.
    pub size: (u32, u32),
    pub scale_factor: f64,
    /// Seconds of wall-clock animation to run before capturing.
    pub time: f32,
    /// Clicks in container coordinates (top-left origin), landing at the
    /// start of the animation.
    pub clicks: Vec<(f64, f64)>,
    /// Pointer path in container coordinates fed to the touch trail, one
    /// sample per frame before capture.
    pub drag: Vec<(f64, f64)>,
    pub seed: u64,
}

impl Default for StillRequest {
    fn default() -> Self {
        Self {
            size: (800, 600),
            scale_factor: 1.0,
            time: 1.0,
            clicks: Vec::new(),
            drag: Vec::new(),
            seed: 0,
        }
    }
}
