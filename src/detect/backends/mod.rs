pub mod stub;

#[cfg(feature = "backend-tract")]
pub mod multi;
#[cfg(feature = "backend-tract")]
pub mod single;

pub use stub::StubPoseBackend;

#[cfg(feature = "backend-tract")]
pub use multi::MultiPoseBackend;
#[cfg(feature = "backend-tract")]
pub use single::SinglePoseBackend;
