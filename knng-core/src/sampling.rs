//! Uniform sampling of node identifiers.

use rand::{Rng, seq::index};

/// Draws up to `amount` distinct node identifiers from `[0, node_count)`,
/// never returning `exclude`.
///
/// Indices are drawn from the `node_count - 1` remaining slots and shifted
/// past `exclude`, so every other node is equally likely.
pub(crate) fn sample_other_nodes<R: Rng + ?Sized>(
    rng: &mut R,
    node_count: usize,
    exclude: usize,
    amount: usize,
) -> impl Iterator<Item = usize> {
    let available = node_count.saturating_sub(1);
    let amount = amount.min(available);
    index::sample(rng, available, amount)
        .into_iter()
        .map(move |slot| if slot >= exclude { slot + 1 } else { slot })
}

/// Draws up to `amount` entries of `items` without replacement.
pub(crate) fn sample_slice<R: Rng + ?Sized>(rng: &mut R, items: &[usize], amount: usize) -> Vec<usize> {
    if amount >= items.len() {
        return items.to_vec();
    }
    index::sample(rng, items.len(), amount)
        .into_iter()
        .map(|slot| items[slot])
        .collect()
}
