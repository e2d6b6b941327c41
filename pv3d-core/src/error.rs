//! Error types for PV3D
//!
//! Geometry errors are per-point and per-frame: the frame orchestrator drops
//! the affected point and carries on. Scene and configuration errors are
//! raised once, at startup.

use std::fmt;

/// Result type for PV3D operations
pub type Pv3dResult<T> = Result<T, Pv3dError>;

/// Numeric singularities hit while projecting a single point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// The camera-to-point ray runs parallel to the view plane
    DegenerateRay,

    /// A direction has no horizontal (x, y) component
    DegenerateHorizon,

    /// An angle was requested against a zero-length vector
    ZeroLengthVector,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::DegenerateRay => write!(f, "Ray is parallel to the view plane"),
            GeometryError::DegenerateHorizon => {
                write!(f, "Direction has no horizontal component")
            }
            GeometryError::ZeroLengthVector => write!(f, "Zero-length vector"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Scene authoring errors, detected when a scene is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// An edge refers to a point index that does not exist
    InvalidEdgeReference {
        edge: usize,
        index: usize,
        point_count: usize,
    },

    /// STL input could not be parsed
    Stl(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::InvalidEdgeReference {
                edge,
                index,
                point_count,
            } => write!(
                f,
                "Edge {} references point {} but the object has {} points",
                edge, index, point_count
            ),
            SceneError::Stl(msg) => write!(f, "Invalid STL: {}", msg),
        }
    }
}

impl std::error::Error for SceneError {}

/// Rejected configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Any PV3D error
#[derive(Debug, Clone, PartialEq)]
pub enum Pv3dError {
    Geometry(GeometryError),
    Scene(SceneError),
    Config(ConfigError),
}

impl fmt::Display for Pv3dError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pv3dError::Geometry(e) => write!(f, "{}", e),
            Pv3dError::Scene(e) => write!(f, "{}", e),
            Pv3dError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Pv3dError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Pv3dError::Geometry(e) => Some(e),
            Pv3dError::Scene(e) => Some(e),
            Pv3dError::Config(e) => Some(e),
        }
    }
}

impl From<GeometryError> for Pv3dError {
    fn from(e: GeometryError) -> Self {
        Pv3dError::Geometry(e)
    }
}

impl From<SceneError> for Pv3dError {
    fn from(e: SceneError) -> Self {
        Pv3dError::Scene(e)
    }
}

impl From<ConfigError> for Pv3dError {
    fn from(e: ConfigError) -> Self {
        Pv3dError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_reference_message() {
        let err = SceneError::InvalidEdgeReference {
            edge: 2,
            index: 7,
            point_count: 4,
        };
        assert_eq!(
            err.to_string(),
            "Edge 2 references point 7 but the object has 4 points"
        );
    }

    #[test]
    fn test_wrapping_keeps_source() {
        use std::error::Error;

        let err: Pv3dError = GeometryError::DegenerateRay.into();
        assert_eq!(err.to_string(), "Ray is parallel to the view plane");
        assert!(err.source().is_some());
    }
}
