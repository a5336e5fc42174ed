//! Crate-level error types.
//!
//! Errors are split into two families: recoverable data errors (the
//! previously displayed scene stays on screen) and device-level failures
//! that end the session and require a fresh [`MolvisEngine`](crate::engine::MolvisEngine).

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Malformed molecular input. Always recoverable.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    /// The input contains no atoms.
    Empty,
    /// The parallel coordinate arrays have different lengths.
    LengthMismatch {
        /// Length of `atomic_num`.
        atoms: usize,
        /// Lengths of the `x`, `y` and `z` arrays.
        coords: [usize; 3],
    },
    /// No element style is registered for this atomic number.
    UnknownElement(i32),
    /// A coordinate is NaN or infinite.
    NonFiniteCoordinate {
        /// Index of the offending atom.
        atom: usize,
    },
    /// An explicit bond references an atom that does not exist.
    BondOutOfRange {
        /// The offending bond as given.
        bond: (usize, usize),
        /// Number of atoms in the input.
        atoms: usize,
    },
    /// More atoms than the 24-bit picking encoding can address.
    TooManyAtoms(usize),
    /// A font atlas whose pixel buffer does not match its size.
    InvalidAtlas(String),
    /// The input could not be deserialized.
    Parse(String),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "molecule has no atoms"),
            Self::LengthMismatch { atoms, coords } => write!(
                f,
                "coordinate arrays disagree: {atoms} atomic numbers, \
                 x/y/z lengths {coords:?}"
            ),
            Self::UnknownElement(n) => {
                write!(f, "no element style for atomic number {n}")
            }
            Self::NonFiniteCoordinate { atom } => {
                write!(f, "atom {atom} has a non-finite coordinate")
            }
            Self::BondOutOfRange { bond, atoms } => write!(
                f,
                "bond {bond:?} references an atom outside 0..{atoms}"
            ),
            Self::TooManyAtoms(n) => write!(
                f,
                "{n} atoms exceed the picking id range (max {})",
                crate::renderer::picking::MAX_PICK_ID
            ),
            Self::InvalidAtlas(msg) => write!(f, "invalid font atlas: {msg}"),
            Self::Parse(msg) => write!(f, "input parse error: {msg}"),
        }
    }
}

impl std::error::Error for DataError {}

/// Errors produced by the molvis crate.
#[derive(Debug)]
pub enum MolvisError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// The logical device was lost (driver reset, adapter removal).
    DeviceLost(String),
    /// The presentation surface failed in a way a resize cannot fix.
    Surface(wgpu::SurfaceError),
    /// A shader failed to compose.
    Shader(String),
    /// Malformed molecular input.
    InvalidData(DataError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl MolvisError {
    /// Whether this error ends the rendering session.
    ///
    /// Fatal errors require dropping the engine and creating a new one;
    /// everything else leaves the engine usable.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Gpu(_) | Self::DeviceLost(_) | Self::Surface(_) | Self::Shader(_)
        )
    }
}

impl fmt::Display for MolvisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::DeviceLost(msg) => write!(f, "device lost: {msg}"),
            Self::Surface(e) => write!(f, "surface error: {e}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::InvalidData(e) => write!(f, "invalid data: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for MolvisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Surface(e) => Some(e),
            Self::InvalidData(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for MolvisError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<DataError> for MolvisError {
    fn from(e: DataError) -> Self {
        Self::InvalidData(e)
    }
}

impl From<std::io::Error> for MolvisError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_errors_are_recoverable() {
        let err = MolvisError::from(DataError::UnknownElement(200));
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("200"));
    }

    #[test]
    fn device_errors_are_fatal() {
        assert!(MolvisError::DeviceLost("reset".into()).is_fatal());
        assert!(MolvisError::Surface(wgpu::SurfaceError::Lost).is_fatal());
        assert!(!MolvisError::OptionsParse("bad".into()).is_fatal());
    }
}
