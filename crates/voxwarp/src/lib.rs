#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use voxwarp_image as image;

#[doc(inline)]
pub use voxwarp_interp as interp;

#[doc(inline)]
pub use voxwarp_transforms as transforms;

#[doc(inline)]
pub use voxwarp_resample as resample;
