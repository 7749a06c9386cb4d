use thiserror::Error;

/// Errors raised while configuring or displaying a gauge
#[derive(Error, Debug)]
pub enum GaugeError {
    #[error("Invalid speed range: min {min} must be lower than max {max}")]
    InvalidSpeedRange { min: f32, max: f32 },

    #[error("Invalid degrees: start {start}, end {end} (need 0 <= start < end and end - start <= 360)")]
    InvalidDegrees { start: i32, end: i32 },

    #[error("Invalid sections: offsets add up to {total}, expected 1")]
    InvalidSections { total: f32 },

    #[error("Font error: {0}")]
    Font(String),

    #[error("Attribute parse error: {0}")]
    Attributes(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Window error: {0}")]
    Os(#[from] winit::error::OsError),

    #[error("Surface error: {0}")]
    Pixels(#[from] pixels::Error),
}

pub type Result<T> = std::result::Result<T, GaugeError>;
