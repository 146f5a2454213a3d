//! Camera module: spherical orbit camera and projections.
//!
//! The camera owns its view matrices and refreshes them on request.
//! Projections are computed on demand from plain parameters.

mod spherical_camera;
mod projection;

pub use spherical_camera::{SphericalCamera, SphericalCameraDesc, PHI_LIMIT, PHI_MARGIN};
pub use projection::{Projection, PerspectiveProjection};
