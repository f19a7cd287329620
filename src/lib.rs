pub mod angle;
pub mod config;
pub mod error;
pub mod landmark;
pub mod rig;
pub mod solver;
pub mod vector;

pub use error::{Result, RigError};
pub use landmark::{Landmark, LandmarkIndex, LandmarkPose};
pub use rig::{ArmRig, HipRig, HipsRig, LegRig, PoseRig, Side};
pub use solver::{calc_hips, PoseSolver};
pub use vector::{OrientationModel, PlanarOrientation, Vector3};
