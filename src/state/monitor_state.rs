use crate::stock::{Fingerprint, StockSnapshot};

/// Last-seen fingerprint, owned by the monitor loop.
///
/// Lives only for the process; a fresh state treats its first snapshot as a
/// change.
#[derive(Debug, Default, Clone)]
pub struct MonitorState {
    last_fingerprint: Option<Fingerprint>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fingerprint(&self) -> Option<Fingerprint> {
        self.last_fingerprint
    }

    /// Records `snapshot` and returns true if it differs from the previous
    /// one, or if nothing has been seen yet. Unchanged and empty snapshots
    /// leave the state alone.
    pub fn has_changed(&mut self, snapshot: &StockSnapshot) -> bool {
        if snapshot.is_empty() {
            return false;
        }

        let current = Fingerprint::of(snapshot);
        if self.last_fingerprint == Some(current) {
            return false;
        }

        self.last_fingerprint = Some(current);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn dragon_fruit(usd: &str) -> StockSnapshot {
        StockSnapshot::new(json!({
            "normal_stock": { "items": [
                { "name": "Dragon Fruit", "usd_price": usd, "robux_price": "2400" }
            ]}
        }))
    }

    #[test]
    fn first_snapshot_is_always_a_change() {
        let mut state = MonitorState::new();
        assert!(state.last_fingerprint().is_none());

        assert!(state.has_changed(&dragon_fruit("20")));
        assert_eq!(
            state.last_fingerprint(),
            Some(Fingerprint::of(&dragon_fruit("20")))
        );
    }

    #[test]
    fn repeats_only_report_the_first_occurrence() {
        let mut state = MonitorState::new();
        let results: Vec<bool> = (0..4).map(|_| state.has_changed(&dragon_fruit("20"))).collect();

        assert_eq!(results, [true, false, false, false]);
    }

    #[test]
    fn difference_is_recorded_then_stable() {
        let mut state = MonitorState::new();
        assert!(state.has_changed(&dragon_fruit("20")));
        assert!(state.has_changed(&dragon_fruit("25")));
        assert!(!state.has_changed(&dragon_fruit("25")));
        assert!(state.has_changed(&dragon_fruit("20")));
    }

    #[test]
    fn restart_forgets_history() {
        let mut before = MonitorState::new();
        assert!(before.has_changed(&dragon_fruit("20")));
        drop(before);

        let mut after = MonitorState::new();
        assert!(after.has_changed(&dragon_fruit("20")));
    }

    #[test]
    fn empty_snapshots_neither_change_nor_mutate() {
        for empty in [Value::Null, json!({}), json!([])] {
            let mut state = MonitorState::new();
            assert!(!state.has_changed(&StockSnapshot::new(empty.clone())), "{empty}");
            assert!(state.last_fingerprint().is_none(), "{empty}");

            assert!(state.has_changed(&dragon_fruit("20")));
            let stored = state.last_fingerprint();
            assert!(!state.has_changed(&StockSnapshot::new(empty.clone())), "{empty}");
            assert_eq!(state.last_fingerprint(), stored);
        }
    }

    #[test]
    fn key_order_alone_is_not_a_change() {
        let mut state = MonitorState::new();
        let a: Value = serde_json::from_str(r#"{"a":{"x":1,"y":2},"b":[]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"b":[],"a":{"y":2,"x":1}}"#).unwrap();

        assert!(state.has_changed(&StockSnapshot::new(a)));
        assert!(!state.has_changed(&StockSnapshot::new(b)));
    }
}
