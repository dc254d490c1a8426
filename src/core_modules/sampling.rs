// Uniform draws over closed intervals. Degenerate intervals (min == max) return
// the bound without touching the generator, so fixed-parameter interferences are
// deterministic regardless of the random source.

use rand::Rng;

pub fn uniform_f64<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

pub fn uniform_u32<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

pub fn uniform_i64<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}
