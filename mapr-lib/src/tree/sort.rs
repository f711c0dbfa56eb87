//! Sibling ordering

use std::cmp::Ordering;

use crate::model::NodeKind;
use crate::model::ObjectId;
use crate::model::TreeNode;

/// Orders sibling nodes.
///
/// Rules, first decisive one wins:
/// 1. between two experimenters, the active user comes first;
/// 2. when both carry an activity counter, the higher counter comes first;
/// 3. labels, case-insensitive, ascending;
/// 4. ids ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparator {
    active_user: Option<ObjectId>,
}

impl Comparator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the experimenter with this id to the top of its siblings.
    pub fn with_active_user(mut self, id: impl Into<ObjectId>) -> Self {
        self.active_user = Some(id.into());
        self
    }

    pub fn active_user(&self) -> Option<&ObjectId> {
        self.active_user.as_ref()
    }

    /// Total order over siblings. Only indistinguishable nodes compare equal.
    pub fn compare(&self, a: &TreeNode, b: &TreeNode) -> Ordering {
        self.pin_active_user(a, b)
            .then_with(|| match (a.counter(), b.counter()) {
                (Some(ca), Some(cb)) => cb.cmp(&ca),
                _ => Ordering::Equal,
            })
            .then_with(|| a.label.to_lowercase().cmp(&b.label.to_lowercase()))
            .then_with(|| a.id.cmp(&b.id))
            .then_with(|| a.kind.wire_name().cmp(b.kind.wire_name()))
    }

    /// The widget's sort contract: `-1` or `1`, with a tie reported as `1`.
    pub fn widget_order(&self, a: &TreeNode, b: &TreeNode) -> i8 {
        match self.compare(a, b) {
            Ordering::Less => -1,
            Ordering::Equal | Ordering::Greater => 1,
        }
    }

    /// Sorts siblings in place. The sort is stable.
    pub fn sort_siblings(&self, nodes: &mut [TreeNode]) {
        nodes.sort_by(|a, b| self.compare(a, b));
    }

    fn pin_active_user(&self, a: &TreeNode, b: &TreeNode) -> Ordering {
        let Some(active) = &self.active_user else {
            return Ordering::Equal;
        };
        if a.kind != NodeKind::Experimenter || b.kind != NodeKind::Experimenter {
            return Ordering::Equal;
        }
        match (&a.id == active, &b.id == active) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::Payload;

    fn node(id: i64, kind: NodeKind, label: &str) -> TreeNode {
        TreeNode::new(id, kind, label).with_payload(Payload::with_id(id))
    }

    fn counted(id: i64, label: &str, counter: i64) -> TreeNode {
        let payload: Payload =
            serde_json::from_value(json!({"id": id, "extra": {"counter": counter}})).unwrap();
        TreeNode::new(id, NodeKind::MapAnnotation, label).with_payload(payload)
    }

    #[test]
    fn test_active_user_pinned_first() {
        let comparator = Comparator::new().with_active_user(9_i64);
        let me = node(9, NodeKind::Experimenter, "zed");
        let other = node(1, NodeKind::Experimenter, "alice");
        assert_eq!(comparator.compare(&me, &other), Ordering::Less);
        assert_eq!(comparator.compare(&other, &me), Ordering::Greater);
    }

    #[test]
    fn test_pin_ignores_non_experimenters() {
        let comparator = Comparator::new().with_active_user(9_i64);
        let project = node(9, NodeKind::Project, "zed");
        let other = node(1, NodeKind::Project, "alice");
        assert_eq!(comparator.compare(&project, &other), Ordering::Greater);
    }

    #[test]
    fn test_higher_counter_first() {
        let comparator = Comparator::new();
        let busy = counted(1, "zzz", 40);
        let quiet = counted(2, "aaa", 3);
        assert_eq!(comparator.compare(&busy, &quiet), Ordering::Less);
    }

    #[test]
    fn test_equal_counters_fall_through_to_label() {
        let comparator = Comparator::new();
        let a = counted(5, "Beta", 3);
        let b = counted(1, "alpha", 3);
        assert_eq!(comparator.compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_counter_only_when_both_have_one() {
        let comparator = Comparator::new();
        let a = counted(1, "zzz", 40);
        let b = node(2, NodeKind::MapAnnotation, "aaa");
        assert_eq!(comparator.compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_label_case_insensitive() {
        let comparator = Comparator::new();
        let a = node(1, NodeKind::Dataset, "beta");
        let b = node(2, NodeKind::Dataset, "Alpha");
        assert_eq!(comparator.compare(&b, &a), Ordering::Less);
    }

    #[test]
    fn test_id_tie_break() {
        let comparator = Comparator::new();
        let a = node(10, NodeKind::Dataset, "Same");
        let b = node(2, NodeKind::Dataset, "same");
        assert_eq!(comparator.compare(&b, &a), Ordering::Less);
        assert_eq!(comparator.widget_order(&b, &a), -1);
        assert_eq!(comparator.widget_order(&a, &b), 1);
    }

    #[test]
    fn test_widget_order_never_zero() {
        let comparator = Comparator::new();
        let a = node(1, NodeKind::Dataset, "x");
        assert_eq!(comparator.widget_order(&a, &a.clone()), 1);
    }

    #[test]
    fn test_sort_siblings() {
        let comparator = Comparator::new().with_active_user(3_i64);
        let mut nodes = vec![
            node(1, NodeKind::Experimenter, "Bob"),
            node(3, NodeKind::Experimenter, "Zoe"),
            node(2, NodeKind::Experimenter, "amy"),
        ];
        comparator.sort_siblings(&mut nodes);
        let ids: Vec<ObjectId> = nodes.into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![ObjectId::Int(3), ObjectId::Int(2), ObjectId::Int(1)]);
    }
}
