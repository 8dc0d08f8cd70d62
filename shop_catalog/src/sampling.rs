//! Random home-screen sections drawn from the aggregated product pool
//!
//! Each section is an independent shuffle of the whole pool, so the same
//! product may show up in more than one section.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use shop_common::ProductRecord;

/// Maximum number of products in each section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSizes {
    pub random: usize,
    pub exclusive_offers: usize,
    pub popular_picks: usize,
}

impl Default for SampleSizes {
    fn default() -> Self {
        Self {
            random: 10,
            exclusive_offers: 5,
            popular_picks: 5,
        }
    }
}

/// Product sections shown on the home screen
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeSections {
    pub random: Vec<ProductRecord>,
    pub exclusive_offers: Vec<ProductRecord>,
    pub popular_picks: Vec<ProductRecord>,
}

impl HomeSections {
    /// Draw all three sections using the thread-local RNG
    pub fn sample(pool: &[ProductRecord], sizes: &SampleSizes) -> Self {
        Self::sample_with(pool, sizes, &mut rand::rng())
    }

    /// Draw all three sections from a caller-supplied RNG
    pub fn sample_with<R: Rng + ?Sized>(
        pool: &[ProductRecord],
        sizes: &SampleSizes,
        rng: &mut R,
    ) -> Self {
        Self {
            random: shuffled_prefix(pool, sizes.random, rng),
            exclusive_offers: shuffled_prefix(pool, sizes.exclusive_offers, rng),
            popular_picks: shuffled_prefix(pool, sizes.popular_picks, rng),
        }
    }
}

/// Up to `count` products from a fresh shuffle of `pool`
fn shuffled_prefix<R: Rng + ?Sized>(
    pool: &[ProductRecord],
    count: usize,
    rng: &mut R,
) -> Vec<ProductRecord> {
    let mut picks = pool.to_vec();
    picks.shuffle(rng);
    picks.truncate(count);
    picks
}
