pub mod arms;
pub mod hips;
pub mod legs;
pub mod pose;

pub use arms::{calc_arm, rig_arm, ArmSegments};
pub use hips::{calc_hips, calc_hips_with, rig_hips, solve_normalized, Torso2d};
pub use legs::calc_leg;
pub use pose::PoseSolver;
