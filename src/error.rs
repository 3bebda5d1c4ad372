// A tiny error type so we don't rely on anyhow/thiserror.
// Every variant states *where* things went wrong.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    InvalidGeometry { width: usize, height: usize }, // zero-area lens/buffer
    SizeMismatch { expected: (usize, usize), actual: (usize, usize) }, // two buffers that must agree don't
    InvalidConfig(String), // config parsed but a value is out of range
    Config(String),        // config file could not be parsed
    Io(String),            // reading a config / writing a screenshot failed
    WindowInit(String),    // Creating the window failed
    WindowUpdate(String),  // Updating the window buffer failed
    Image(String),         // Encoding a screenshot failed
}

impl Display for Error {
    // This decides how the error is printed to your console.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidGeometry { width, height } => {
                write!(f, "Invalid geometry: {width}x{height} buffer has no pixels")
            }
            Error::SizeMismatch { expected, actual } => write!(
                f,
                "Size mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            Error::InvalidConfig(s) => write!(f, "Invalid config: {s}"),
            Error::Config(s) => write!(f, "Config parse error: {s}"),
            Error::Io(s) => write!(f, "IO error: {s}"),
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::Image(s) => write!(f, "Image error: {s}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<ron::error::SpannedError> for Error {
    fn from(e: ron::error::SpannedError) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}
