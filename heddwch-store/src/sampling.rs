//! Claim sampling
//!
//! A quiz is built from two ordered buckets of claims. For every slot `i`
//! an independent fair coin picks `credible[i]` or `not_credible[i]`. This is
//! deliberately not a shuffle: the output stays correlated with source order.

use heddwch_common::claims::ClaimReview;
use heddwch_common::{Error, Result};
use rand::Rng;

/// Number of claims in one quiz
pub const QUIZ_LENGTH: usize = 11;

/// Draw `QUIZ_LENGTH` claims, slot by slot
///
/// Fails with [`Error::InsufficientData`] if either bucket holds fewer than
/// `QUIZ_LENGTH` claims; no coin is flipped in that case.
pub fn sample_claims<R: Rng + ?Sized>(
    credible: &[ClaimReview],
    not_credible: &[ClaimReview],
    rng: &mut R,
) -> Result<Vec<ClaimReview>> {
    if credible.len() < QUIZ_LENGTH || not_credible.len() < QUIZ_LENGTH {
        return Err(Error::InsufficientData {
            needed: QUIZ_LENGTH,
            credible: credible.len(),
            not_credible: not_credible.len(),
        });
    }

    let claims = credible
        .iter()
        .zip(not_credible)
        .take(QUIZ_LENGTH)
        .map(|(credible, not_credible)| {
            if rng.gen_bool(0.5) {
                credible.clone()
            } else {
                not_credible.clone()
            }
        })
        .collect();

    Ok(claims)
}
