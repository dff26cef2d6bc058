//! 32-bit RGBA color with HSLuv constructors and SGR truecolor output.
//!
//! HSLuv (<https://www.hsluv.org/>) is a perceptually uniform color space;
//! the map generator picks room palettes in it so random hues keep a
//! consistent perceived lightness. The conversion below follows the
//! reference algorithm.

use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color([u8; 4]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0, 255]);
    pub const WHITE: Color = Color([255, 255, 255, 255]);

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    #[allow(dead_code)]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Packed `0xRRGGBB`.
    pub fn hex(rgb: u32) -> Self {
        assert!(rgb <= 0xFF_FF_FF, "hex color out of range: {rgb:#x}");
        Self([(rgb >> 16) as u8, (rgb >> 8 & 0xFF) as u8, (rgb & 0xFF) as u8, 255])
    }

    /// HSLuv triple: `h` in degrees, `s` and `l` in `[0, 100]`.
    pub fn hsluv(h: f64, s: f64, l: f64) -> Self {
        let (r, g, b) = hsluv_to_rgb(h, s, l);
        Self::rgb(channel(r), channel(g), channel(b))
    }

    #[allow(dead_code)]
    pub fn hsluva(h: f64, s: f64, l: f64, a: u8) -> Self {
        let mut c = Self::hsluv(h, s, l);
        c.0[3] = a;
        c
    }

    pub fn r(self) -> u8 {
        self.0[0]
    }

    pub fn g(self) -> u8 {
        self.0[1]
    }

    pub fn b(self) -> u8 {
        self.0[2]
    }

    #[allow(dead_code)]
    pub fn a(self) -> u8 {
        self.0[3]
    }

    pub fn to_hsluv(self) -> (f64, f64, f64) {
        rgb_to_hsluv(
            self.r() as f64 / 255.0,
            self.g() as f64 / 255.0,
            self.b() as f64 / 255.0,
        )
    }

    /// SGR prefix selecting this color as the foreground.
    pub fn fg(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r(), self.g(), self.b())
    }

    /// SGR prefix selecting this color as the background.
    pub fn bg(self) -> String {
        format!("\x1b[48;2;{};{};{}m", self.r(), self.g(), self.b())
    }
}

impl From<u32> for Color {
    fn from(rgb: u32) -> Self {
        Self::hex(rgb)
    }
}

impl fmt::Display for Color {
    /// HSLuv triple plus an inline swatch of the color itself.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, s, l) = self.to_hsluv();
        write!(
            f,
            "HSLuv({},{},{}){}\u{fe45}\x1b[0m",
            h.round() as i32,
            s.round() as i32,
            l.round() as i32,
            self.fg()
        )
    }
}

fn channel(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

// --- HSLuv reference math ---

const M: [[f64; 3]; 3] = [
    [3.240969941904521, -1.537383177570093, -0.498610760293],
    [-0.96924363628087, 1.87596750150772, 0.041555057407175],
    [0.055630079696993, -0.20397695888897, 1.056971514242878],
];
const M_INV: [[f64; 3]; 3] = [
    [0.41239079926595, 0.35758433938387, 0.18048078840183],
    [0.21263900587151, 0.71516867876775, 0.072192315360733],
    [0.019330818715591, 0.11919477979462, 0.95053215224966],
];
const REF_U: f64 = 0.19783000664283;
const REF_V: f64 = 0.46831999493879;
const KAPPA: f64 = 903.2962962;
const EPSILON: f64 = 0.0088564516;

/// Bounding lines (slope, intercept) of the sRGB gamut in LUV chroma
/// space for a given lightness.
fn get_bounds(l: f64) -> [(f64, f64); 6] {
    let mut bounds = [(0.0, 0.0); 6];
    let sub1 = (l + 16.0).powi(3) / 1_560_896.0;
    let sub2 = if sub1 > EPSILON { sub1 } else { l / KAPPA };

    for (c, row) in M.iter().enumerate() {
        let [m1, m2, m3] = *row;
        for t in 0..2 {
            let tf = t as f64;
            let top1 = (284_517.0 * m1 - 94_839.0 * m3) * sub2;
            let top2 =
                (838_422.0 * m3 + 769_860.0 * m2 + 731_718.0 * m1) * l * sub2 - 769_860.0 * tf * l;
            let bottom = (632_260.0 * m3 - 126_452.0 * m2) * sub2 + 126_452.0 * tf;
            bounds[c * 2 + t] = (top1 / bottom, top2 / bottom);
        }
    }
    bounds
}

fn ray_length_until_intersect(theta: f64, line: (f64, f64)) -> f64 {
    line.1 / (theta.sin() - line.0 * theta.cos())
}

/// Furthest chroma the sRGB gamut allows at this lightness and hue.
fn max_chroma_for_lh(l: f64, h: f64) -> f64 {
    let hrad = h.to_radians();
    get_bounds(l)
        .iter()
        .map(|&line| ray_length_until_intersect(hrad, line))
        .filter(|&len| len >= 0.0)
        .fold(f64::MAX, f64::min)
}

fn dot(row: [f64; 3], v: (f64, f64, f64)) -> f64 {
    row[0] * v.0 + row[1] * v.1 + row[2] * v.2
}

fn from_linear(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn to_linear(c: f64) -> f64 {
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

fn xyz_to_rgb(xyz: (f64, f64, f64)) -> (f64, f64, f64) {
    (
        from_linear(dot(M[0], xyz)),
        from_linear(dot(M[1], xyz)),
        from_linear(dot(M[2], xyz)),
    )
}

fn rgb_to_xyz(rgb: (f64, f64, f64)) -> (f64, f64, f64) {
    let lin = (to_linear(rgb.0), to_linear(rgb.1), to_linear(rgb.2));
    (dot(M_INV[0], lin), dot(M_INV[1], lin), dot(M_INV[2], lin))
}

fn y_to_l(y: f64) -> f64 {
    if y <= EPSILON {
        y * KAPPA
    } else {
        116.0 * y.cbrt() - 16.0
    }
}

fn l_to_y(l: f64) -> f64 {
    if l <= 8.0 {
        l / KAPPA
    } else {
        ((l + 16.0) / 116.0).powi(3)
    }
}

fn xyz_to_luv(xyz: (f64, f64, f64)) -> (f64, f64, f64) {
    let (x, y, z) = xyz;
    let divider = x + 15.0 * y + 3.0 * z;
    let (var_u, var_v) = if divider == 0.0 {
        (0.0, 0.0)
    } else {
        (4.0 * x / divider, 9.0 * y / divider)
    };
    let l = y_to_l(y);
    if l == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    (l, 13.0 * l * (var_u - REF_U), 13.0 * l * (var_v - REF_V))
}

fn luv_to_xyz(luv: (f64, f64, f64)) -> (f64, f64, f64) {
    let (l, u, v) = luv;
    if l <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let var_u = u / (13.0 * l) + REF_U;
    let var_v = v / (13.0 * l) + REF_V;
    let y = l_to_y(l);
    let x = -(9.0 * y * var_u) / ((var_u - 4.0) * var_v - var_u * var_v);
    let z = (9.0 * y - 15.0 * var_v * y - var_v * x) / (3.0 * var_v);
    (x, y, z)
}

fn luv_to_lch(luv: (f64, f64, f64)) -> (f64, f64, f64) {
    let (l, u, v) = luv;
    let c = u.hypot(v);
    let h = if c < 1e-8 {
        0.0
    } else {
        let h = v.atan2(u).to_degrees();
        if h < 0.0 {
            h + 360.0
        } else {
            h
        }
    };
    (l, c, h)
}

fn lch_to_luv(lch: (f64, f64, f64)) -> (f64, f64, f64) {
    let (l, c, h) = lch;
    let hrad = h.to_radians();
    (l, hrad.cos() * c, hrad.sin() * c)
}

fn hsluv_to_lch(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if l > 99.999_999_9 {
        (100.0, 0.0, h)
    } else if l < 1e-8 {
        (0.0, 0.0, h)
    } else {
        (l, max_chroma_for_lh(l, h) / 100.0 * s, h)
    }
}

fn lch_to_hsluv(lch: (f64, f64, f64)) -> (f64, f64, f64) {
    let (l, c, h) = lch;
    if l > 99.999_999_9 {
        (h, 0.0, 100.0)
    } else if l < 1e-8 {
        (h, 0.0, 0.0)
    } else {
        (h, c / max_chroma_for_lh(l, h) * 100.0, l)
    }
}

pub fn hsluv_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    xyz_to_rgb(luv_to_xyz(lch_to_luv(hsluv_to_lch(h, s, l))))
}

pub fn rgb_to_hsluv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    lch_to_hsluv(luv_to_lch(xyz_to_luv(rgb_to_xyz((r, g, b)))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_unpacks_channels() {
        let c = Color::hex(0xDDA24E);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (0xDD, 0xA2, 0x4E, 255));
    }

    #[test]
    #[should_panic(expected = "hex color out of range")]
    fn test_hex_rejects_alpha_bits() {
        Color::hex(0x01_00_00_00);
    }

    #[test]
    fn test_hsluv_extremes() {
        assert_eq!(Color::hsluv(0.0, 0.0, 0.0), Color::BLACK);
        assert_eq!(Color::hsluv(0.0, 0.0, 100.0), Color::WHITE);
        // Hue is irrelevant at zero saturation.
        assert_eq!(Color::hsluv(217.0, 0.0, 100.0), Color::WHITE);
    }

    #[test]
    fn test_hsluv_primaries() {
        // Reference values from the hsluv.org snapshot.
        assert_eq!(
            Color::hsluv(12.177050630061776, 100.0, 53.23711559542933),
            Color::rgb(255, 0, 0)
        );
        assert_eq!(
            Color::hsluv(127.71501294924047, 100.0, 87.73551910966002),
            Color::rgb(0, 255, 0)
        );
        assert_eq!(
            Color::hsluv(265.87432021817473, 100.0, 32.30086989259995),
            Color::rgb(0, 0, 255)
        );
    }

    #[test]
    fn test_hsluv_round_trip() {
        for &(h, s, l) in &[(30.0, 80.0, 50.0), (200.0, 40.0, 70.0), (340.0, 95.0, 25.0)] {
            let (r, g, b) = hsluv_to_rgb(h, s, l);
            let (h2, s2, l2) = rgb_to_hsluv(r, g, b);
            assert!((h - h2).abs() < 1e-6, "hue {h} → {h2}");
            assert!((s - s2).abs() < 1e-6, "sat {s} → {s2}");
            assert!((l - l2).abs() < 1e-6, "light {l} → {l2}");
        }
    }

    #[test]
    fn test_sgr_prefixes() {
        let c = Color::rgb(217, 62, 60);
        assert_eq!(c.fg(), "\x1b[38;2;217;62;60m");
        assert_eq!(c.bg(), "\x1b[48;2;217;62;60m");
    }

    #[test]
    fn test_display_shows_hsluv_triple() {
        let shown = format!("{}", Color::WHITE);
        assert!(shown.starts_with("HSLuv("), "got: {shown}");
        assert!(shown.contains(",100)"), "got: {shown}");
    }
}
