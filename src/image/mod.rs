pub mod f32;
pub mod io;
pub mod mask;
pub mod ops;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::io::GrayImageU8;
pub use self::mask::{absdiff_threshold, BinaryMask};
pub use self::ops::{gaussian_blur, resize};
pub use self::u8::ImageU8;
