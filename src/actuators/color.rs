//! HSV to RGB conversion for HomeKit-style color values

use smart_leds::RGB8;

/// Convert hue (degrees), saturation and value (percent) to an 8-bit RGB triple.
///
/// Inputs are not range-checked. Hue wraps around the color wheel and each
/// output channel saturates into `0..=255`.
#[allow(clippy::many_single_char_names)]
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> RGB8 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = saturation / 100.0;
    let v = value / 100.0 * 255.0;

    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u8 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    RGB8::new(channel(r), channel(g), channel(b))
}

// `as` saturates floats into the integer range; NaN becomes 0
fn channel(x: f64) -> u8 {
    x.round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: u8, g: u8, b: u8) -> RGB8 {
        RGB8::new(r, g, b)
    }

    #[test]
    fn test_primary_colors() {
        assert_eq!(hsv_to_rgb(0.0, 100.0, 100.0), rgb(255, 0, 0));
        assert_eq!(hsv_to_rgb(120.0, 100.0, 100.0), rgb(0, 255, 0));
        assert_eq!(hsv_to_rgb(240.0, 100.0, 100.0), rgb(0, 0, 255));
    }

    #[test]
    fn test_secondary_colors() {
        assert_eq!(hsv_to_rgb(60.0, 100.0, 100.0), rgb(255, 255, 0));
        assert_eq!(hsv_to_rgb(180.0, 100.0, 100.0), rgb(0, 255, 255));
        assert_eq!(hsv_to_rgb(300.0, 100.0, 100.0), rgb(255, 0, 255));
    }

    #[test]
    fn test_partial_saturation_and_value() {
        assert_eq!(hsv_to_rgb(120.0, 50.0, 80.0), rgb(102, 204, 102));
        assert_eq!(hsv_to_rgb(30.0, 100.0, 100.0), rgb(255, 128, 0));
        assert_eq!(hsv_to_rgb(210.0, 40.0, 100.0), rgb(153, 204, 255));
    }

    #[test]
    fn test_greys_ignore_hue() {
        assert_eq!(hsv_to_rgb(0.0, 0.0, 0.0), rgb(0, 0, 0));
        assert_eq!(hsv_to_rgb(200.0, 0.0, 100.0), rgb(255, 255, 255));
        assert_eq!(hsv_to_rgb(120.0, 0.0, 50.0), rgb(128, 128, 128));
        assert_eq!(hsv_to_rgb(120.0, 50.0, 0.0), rgb(0, 0, 0));
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(hsv_to_rgb(360.0, 100.0, 100.0), rgb(255, 0, 0));
        assert_eq!(hsv_to_rgb(480.0, 100.0, 100.0), hsv_to_rgb(120.0, 100.0, 100.0));
        assert_eq!(hsv_to_rgb(-120.0, 100.0, 100.0), hsv_to_rgb(240.0, 100.0, 100.0));
    }

    #[test]
    fn test_out_of_range_saturates() {
        assert_eq!(hsv_to_rgb(0.0, 100.0, 200.0), rgb(255, 0, 0));
        assert_eq!(hsv_to_rgb(0.0, 150.0, 100.0), rgb(255, 0, 0));
    }
}
