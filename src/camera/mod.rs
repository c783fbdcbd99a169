pub mod constraints;
pub mod device;
pub mod frame;
pub mod native;

pub use constraints::{CaptureConstraints, FacingMode};
pub use device::{CaptureDevice, MediaStream};
pub use frame::RasterFrame;
pub use native::NativeCamera;
