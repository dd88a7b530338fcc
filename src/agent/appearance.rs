//! Cosmetic appearance record
//!
//! Purely visual: the overlay/renderer reads it, the simulation never does,
//! with one exception - `size` scales the skeleton at creation.

use rand::Rng;
use serde::{Deserialize, Serialize};

const SKIN_TONES: [&str; 5] = ["#ffdbac", "#f1c27d", "#e0ac69", "#c68642", "#8d5524"];
const SHIRT_COLORS: [&str; 6] = [
    "#4a90e2", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c",
];
const PANT_COLORS: [&str; 5] = ["#2c3e50", "#34495e", "#7f8c8d", "#95a5a6", "#16a085"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appearance {
    pub skin_tone: String,
    pub shirt_color: String,
    pub pant_color: String,
    /// Skeleton scale factor, 0.9 to 1.1
    pub size: f32,
}

impl Appearance {
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            skin_tone: SKIN_TONES[rng.gen_range(0..SKIN_TONES.len())].to_string(),
            shirt_color: SHIRT_COLORS[rng.gen_range(0..SHIRT_COLORS.len())].to_string(),
            pant_color: PANT_COLORS[rng.gen_range(0..PANT_COLORS.len())].to_string(),
            size: 0.9 + rng.gen::<f32>() * 0.2,
        }
    }
}
