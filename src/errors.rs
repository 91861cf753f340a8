// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera filter application

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Frame conversion errors
    Conversion(ConversionError),
    /// Configuration errors
    Config(String),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// The user or portal refused camera access
    AccessDenied,
    /// The camera portal is not available on this session bus
    PortalUnavailable(String),
    /// Camera pipeline initialization failed
    InitializationFailed(String),
    /// Camera disconnected during operation
    Disconnected,
    /// Backend error (e.g., PipeWire or GStreamer)
    BackendError(String),
}

/// Errors from the CPU color conversion stage
#[derive(Debug, Clone)]
pub enum ConversionError {
    /// A source plane is smaller than its stride and height require
    BufferTooSmall { expected: usize, actual: usize },
    /// Frame arrived in a pixel format the converter does not handle
    UnsupportedFormat(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Conversion(e) => write!(f, "Conversion error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::AccessDenied => write!(f, "Camera access was denied"),
            CameraError::PortalUnavailable(msg) => {
                write!(f, "Camera portal unavailable: {}", msg)
            }
            CameraError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            CameraError::Disconnected => write!(f, "Camera disconnected"),
            CameraError::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::BufferTooSmall { expected, actual } => {
                write!(
                    f,
                    "Source buffer too small: expected at least {} bytes, got {}",
                    expected, actual
                )
            }
            ConversionError::UnsupportedFormat(msg) => write!(f, "Unsupported format: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for ConversionError {}

impl From<CameraError> for AppError {
    fn from(e: CameraError) -> Self {
        AppError::Camera(e)
    }
}

impl From<ConversionError> for AppError {
    fn from(e: ConversionError) -> Self {
        AppError::Conversion(e)
    }
}

impl From<zbus::Error> for CameraError {
    fn from(e: zbus::Error) -> Self {
        CameraError::PortalUnavailable(e.to_string())
    }
}

impl From<gstreamer::glib::Error> for CameraError {
    fn from(e: gstreamer::glib::Error) -> Self {
        CameraError::InitializationFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_error_converts_to_app_error() {
        let err: AppError = CameraError::AccessDenied.into();
        assert!(matches!(err, AppError::Camera(CameraError::AccessDenied)));
    }

    #[test]
    fn conversion_error_display_includes_sizes() {
        let err = ConversionError::BufferTooSmall {
            expected: 640,
            actual: 320,
        };
        let msg = err.to_string();
        assert!(msg.contains("640"));
        assert!(msg.contains("320"));
    }
}
