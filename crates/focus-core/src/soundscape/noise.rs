use crate::constants::{NOISE_LEAK, NOISE_PEAK};
use rand::prelude::*;

/// Brown (leaky-integrated white) noise, normalised to `NOISE_PEAK`.
///
/// Generated once per bed and looped, so the tail converges onto the first
/// sample to keep the loop seam silent.
pub fn brown_noise<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<f32> {
    let mut out = Vec::with_capacity(len);
    let mut last = 0.0_f32;
    for _ in 0..len {
        let white: f32 = rng.gen_range(-1.0..1.0);
        last = (last + NOISE_LEAK * white) / (1.0 + NOISE_LEAK);
        out.push(last);
    }

    let fade = len / 50;
    if let Some(&head) = out.first() {
        for i in 0..fade {
            let w = (i + 1) as f32 / fade as f32;
            let tail = len - fade + i;
            out[tail] = out[tail] * (1.0 - w) + head * w;
        }
    }

    let peak = out.iter().fold(0.0_f32, |m, v| m.max(v.abs()));
    if peak > 0.0 {
        let gain = NOISE_PEAK / peak;
        for v in &mut out {
            *v *= gain;
        }
    }
    out
}
