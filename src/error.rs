//! Error types for the skintone_match library

use thiserror::Error;

/// Result type alias for skintone_match operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error taxonomy for skin tone analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Neither the strict nor the relaxed detector pass found a face
    #[error("No face detected in the image")]
    NoFaceDetected,

    /// A face was found but its cheek crop is empty
    #[error("Could not extract a skin region from face at ({x}, {y}) size {width}x{height}")]
    RegionExtractionFailed {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// Hex color string is not six hexadecimal digits
    #[error("Invalid color format: {value:?}")]
    InvalidColorFormat { value: String },

    /// Image bytes or file could not be decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// EXIF metadata extraction failed
    #[error("EXIF processing error: {message}")]
    ExifError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// OpenCV operation failed
    #[error("OpenCV error: {operation}")]
    OpenCvError {
        operation: String,
        #[source]
        source: Option<opencv::Error>,
    },

    /// Generic processing error
    #[error("Processing error: {message}")]
    ProcessingError { message: String },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// The injected catalog source failed
    #[error("Catalog error: {message}")]
    CatalogError { message: String },

    /// The injected image generator failed
    #[error("Image generation error: {message}")]
    GenerationError { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },
}

impl AnalysisError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an EXIF processing error with context
    pub fn exif<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ExifError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an OpenCV error with context
    pub fn opencv(operation: impl Into<String>, source: opencv::Error) -> Self {
        Self::OpenCvError {
            operation: operation.into(),
            source: Some(source),
        }
    }

    /// Create a processing error from a message
    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    /// True when the caller can fix the problem by sending a different photo
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoFaceDetected
                | AnalysisError::RegionExtractionFailed { .. }
                | AnalysisError::ImageLoadError { .. }
                | AnalysisError::InvalidParameter { .. }
        )
    }

    /// Check if this error indicates a recoverable condition
    ///
    /// Recoverable errors come from optional collaborators or single catalog
    /// rows; the analysis itself can still be reported without them.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidColorFormat { .. }
                | AnalysisError::CatalogError { .. }
                | AnalysisError::GenerationError { .. }
                | AnalysisError::ExifError { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::NoFaceDetected => {
                "No face was detected. Please use a well-lit, front-facing photo.".to_string()
            }
            AnalysisError::RegionExtractionFailed { .. } => {
                "Could not extract the skin region. Please try a closer photo of the face.".to_string()
            }
            AnalysisError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            AnalysisError::InvalidParameter { parameter, .. } => {
                format!("Invalid value for '{}'. Please check the request.", parameter)
            }
            _ => "Skin analysis failed. Please try with a different image.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors() {
        assert!(AnalysisError::NoFaceDetected.is_input_error());
        assert!(AnalysisError::RegionExtractionFailed { x: 0, y: 0, width: 1, height: 1 }
            .is_input_error());
        assert!(!AnalysisError::processing("boom").is_input_error());
    }

    #[test]
    fn test_recoverable_errors() {
        let bad_hex = AnalysisError::InvalidColorFormat { value: "zzzzzz".into() };
        assert!(bad_hex.is_recoverable());
        assert!(!AnalysisError::NoFaceDetected.is_recoverable());
    }

    #[test]
    fn test_display_includes_context() {
        let err = AnalysisError::InvalidColorFormat { value: "#12".into() };
        assert_eq!(err.to_string(), "Invalid color format: \"#12\"");

        let err = AnalysisError::InvalidParameter {
            parameter: "prompt".into(),
            value: "short".into(),
        };
        assert!(err.user_message().contains("prompt"));
    }
}
