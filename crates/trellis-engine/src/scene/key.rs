use std::cmp::Ordering;

/// Stable paint-order key for scene entries.
///
/// Ordering rules:
/// 1) entries with a depth key come first, ascending (`f32::total_cmp`)
/// 2) entries without a depth key come after all keyed entries
/// 3) `order`: ascending (insertion order breaks every tie)
#[derive(Debug, Copy, Clone)]
pub struct SortKey {
    /// Depth key. Lower values are drawn first.
    pub depth: Option<f32>,
    /// Insertion index, ensuring stable ordering.
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(depth: Option<f32>, order: u32) -> Self {
        Self { depth, order }
    }
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        let depth = match (self.depth, other.depth) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        depth.then(self.order.cmp(&other.order))
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_before_unkeyed() {
        let keyed = SortKey::new(Some(10.0), 5);
        let unkeyed = SortKey::new(None, 0);
        assert!(keyed < unkeyed);
    }

    #[test]
    fn ties_fall_back_to_insertion_order() {
        assert!(SortKey::new(Some(0.0), 1) < SortKey::new(Some(0.0), 2));
        assert!(SortKey::new(None, 1) < SortKey::new(None, 2));
    }

    #[test]
    fn negative_zero_sorts_before_zero() {
        assert!(SortKey::new(Some(-0.0), 9) < SortKey::new(Some(0.0), 0));
    }
}
