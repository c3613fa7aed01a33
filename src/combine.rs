use tracing::debug;

use crate::Node;

/// Fold trees into one with left-associative `AND`.
///
/// `[t1, t2, t3]` becomes `(t1 AND t2) AND t3`. Each input is moved into the
/// result unchanged. An empty input yields `None`: there is nothing to
/// evaluate.
#[must_use]
pub fn combine(trees: impl IntoIterator<Item = Node>) -> Option<Node> {
    let mut count = 0_usize;
    let combined = trees.into_iter().reduce(|acc, next| {
        count += 1;
        acc.and(next)
    });
    if combined.is_some() {
        debug!(trees = count + 1, "combined rule trees");
    }
    combined
}
