use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("Plane redshift undetermined: no redshift given and no galaxies supplied")]
    UndeterminedPlaneRedshift,

    #[error("Galaxies disagree on plane redshift: expected z={first}, galaxy {index} at z={found}")]
    InconsistentPlaneRedshift { first: f64, index: usize, found: f64 },

    #[error("Planes not strictly ordered by redshift: plane {index} at z={found} follows z={previous}")]
    UnorderedPlanes {
        index: usize,
        previous: f64,
        found: f64,
    },

    #[error("Plane at z={redshift} has {count} galaxies with a {component}; at most one is allowed")]
    PixelizationConfiguration {
        redshift: f64,
        component: &'static str,
        count: usize,
    },

    #[error("Plane index {index} out of range for tracer with {total_planes} planes")]
    PlaneIndexOutOfRange { index: usize, total_planes: usize },

    #[error("Tracer requires at least one galaxy")]
    EmptyGalaxyList,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Grid shape mismatch: expected {expected:?}, found {found:?}")]
    GridShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LensResult<T> = Result<T, LensError>;
