//! Pointer-follow ("magnetic") transforms for interactive elements.

/// Elements that react to the pointer.
pub const MAGNETIC_SELECTOR: &str = ".btn, .logo, .social-link, .card";
pub const CARD_CLASS: &str = "card";

/// How an element leans toward the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnet {
    /// Small controls: strong pull, no tilt.
    Control,
    /// Cards: gentle pull plus a 3D tilt.
    Card,
}

impl Magnet {
    fn strength(self) -> f64 {
        match self {
            Magnet::Control => 25.0,
            Magnet::Card => 10.0,
        }
    }
}

/// CSS transform for a pointer at (`dx`, `dy`) px from the element center.
pub fn magnetic_transform(dx: f64, dy: f64, magnet: Magnet) -> String {
    let s = magnet.strength();
    let mut t = format!("translate({}px, {}px) scale(1.02)", dx / s, dy / s);
    if magnet == Magnet::Card {
        t.push_str(&format!(" rotateX({}deg) rotateY({}deg)", -dy / 15.0, dx / 15.0));
    }
    t
}

/// Offset of a client point from the center of a rect.
pub fn center_offset(client: (f64, f64), left: f64, top: f64, width: f64, height: f64) -> (f64, f64) {
    (client.0 - left - width / 2.0, client.1 - top - height / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_translate_only() {
        assert_eq!(magnetic_transform(50.0, -25.0, Magnet::Control), "translate(2px, -1px) scale(1.02)");
    }

    #[test]
    fn cards_also_tilt() {
        assert_eq!(
            magnetic_transform(30.0, 15.0, Magnet::Card),
            "translate(3px, 1.5px) scale(1.02) rotateX(-1deg) rotateY(2deg)"
        );
    }

    #[test]
    fn offset_is_relative_to_center() {
        assert_eq!(center_offset((60.0, 40.0), 10.0, 20.0, 100.0, 40.0), (0.0, 0.0));
    }
}
