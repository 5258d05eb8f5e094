//! Reconstructed objects: space points, the edges between them, optical flashes and the
//! planes on which tracks are fitted.
mod edge;
mod op_flash;
mod space_point;
mod tracking_plane;

pub use edge::{Edge, EdgeId};
pub use op_flash::{OpFlash, sort_by_time};
pub use space_point::{SpacePoint, SpacePointId, find_by_id};
pub use tracking_plane::{GlobalParameters, LocalParameters, Plane};
