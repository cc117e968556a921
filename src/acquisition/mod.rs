pub mod controller;

pub use controller::{Acquisition, AcquisitionController, RevealState, StopReason};
