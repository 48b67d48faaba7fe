//! Actuators module - the Sense HAT LED matrix driven as a single dimmable color light

pub mod color;
pub mod leds;
pub mod matrix;
