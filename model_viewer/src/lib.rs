/*!
# Model Viewer

Core of an interactive viewer for hierarchical mechanical assemblies.

A scene arrives as one binary buffer describing a tree of components
(assemblies and parts). This crate decodes it, keeps a cached list of the
parts that should be drawn, applies path-addressed property patches, and
drives an orbiting camera. Rendering is delegated to a backend through the
`ViewerBackend` trait, so the crate itself never touches a graphics API.

## Architecture

- **scene**: component tree, binary decoder, visibility index, patches
- **camera**: spherical orbit camera and perspective projection
- **Light**: ambient and directional light colors
- **Viewer**: frame loop that batches invalidations and talks to the backend
- **ViewerBackend**: trait implemented by the GPU side
*/

// Internal modules
mod error;
mod light;
mod viewer;
pub mod log;
pub mod scene;
pub mod camera;
pub mod backend;

#[cfg(test)]
mod mock_backend;

// Main mv namespace module
pub mod mv {
    // Error types
    pub use crate::error::{Error, Result};

    // Viewer facade
    pub use crate::viewer::{Viewer, ViewerDesc, FrameInvalidation};

    // Backend trait and uniform packing
    pub use crate::backend::{ViewerBackend, ViewUniforms};

    // Lighting
    pub use crate::light::{Light, unpack_rgb, DEFAULT_AMBIENT, DEFAULT_DIRECTIONAL};

    // Logging sub-module (types and global logger control, macros live at the crate root)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
            log, log_detailed,
        };
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }
}

// Re-export math library at crate root
pub use glam;
