//! Linux hardware backends - kernel IIO sensors and the LED framebuffer

pub mod framebuffer;
pub mod iio;
