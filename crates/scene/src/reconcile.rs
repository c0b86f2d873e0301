//! Keyed enter/update/exit reconciliation, independent of any render target.

use std::collections::HashSet;
use std::hash::Hash;

/// Result of comparing a previously rendered key sequence with a new one.
///
/// Ordering contract:
/// - `entered` and `updated` follow the order of the new sequence.
/// - `exited` follows the order of the old sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedDiff<K> {
    pub entered: Vec<K>,
    pub updated: Vec<K>,
    pub exited: Vec<K>,
}

impl<K> Default for KeyedDiff<K> {
    fn default() -> Self {
        Self {
            entered: Vec::new(),
            updated: Vec::new(),
            exited: Vec::new(),
        }
    }
}

impl<K> KeyedDiff<K> {
    pub fn is_noop(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }
}

/// Component-specific reaction to a [`KeyedDiff`].
pub trait KeyedCallbacks<K> {
    fn exit(&mut self, key: &K);
    fn enter(&mut self, key: &K);
    fn update(&mut self, key: &K);
}

/// Computes the keyed diff between `old` and `new`.
///
/// Repeated keys in `new` are collapsed onto their first occurrence.
pub fn diff_keyed<K>(old: &[K], new: &[K]) -> KeyedDiff<K>
where
    K: Eq + Hash + Clone,
{
    let old_set: HashSet<&K> = old.iter().collect();
    let mut seen: HashSet<&K> = HashSet::with_capacity(new.len());
    let mut out = KeyedDiff::default();

    for key in new {
        if !seen.insert(key) {
            continue;
        }
        if old_set.contains(key) {
            out.updated.push(key.clone());
        } else {
            out.entered.push(key.clone());
        }
    }

    for key in old {
        if !seen.contains(key) {
            out.exited.push(key.clone());
        }
    }

    out
}

/// Drives `callbacks` through a diff: every exit first, then enters, then updates.
pub fn apply_keyed<K, C>(diff: &KeyedDiff<K>, callbacks: &mut C)
where
    C: KeyedCallbacks<K> + ?Sized,
{
    for key in &diff.exited {
        callbacks.exit(key);
    }
    for key in &diff.entered {
        callbacks.enter(key);
    }
    for key in &diff.updated {
        callbacks.update(key);
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyedCallbacks, apply_keyed, diff_keyed};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl KeyedCallbacks<u32> for Log {
        fn exit(&mut self, key: &u32) {
            self.0.push(format!("exit {key}"));
        }
        fn enter(&mut self, key: &u32) {
            self.0.push(format!("enter {key}"));
        }
        fn update(&mut self, key: &u32) {
            self.0.push(format!("update {key}"));
        }
    }

    #[test]
    fn splits_keys_into_enter_update_exit() {
        let diff = diff_keyed(&[1, 2, 3], &[4, 3, 1]);
        assert_eq!(diff.entered, vec![4]);
        assert_eq!(diff.updated, vec![3, 1]);
        assert_eq!(diff.exited, vec![2]);
    }

    #[test]
    fn identical_sequences_only_update() {
        let diff = diff_keyed(&[1, 2], &[1, 2]);
        assert!(diff.is_noop());
        assert_eq!(diff.updated, vec![1, 2]);
    }

    #[test]
    fn duplicates_in_new_collapse() {
        let diff = diff_keyed::<u32>(&[], &[7, 7, 8]);
        assert_eq!(diff.entered, vec![7, 8]);
    }

    #[test]
    fn callbacks_run_exit_enter_update() {
        let diff = diff_keyed(&[1, 2], &[2, 3]);
        let mut log = Log::default();
        apply_keyed(&diff, &mut log);
        assert_eq!(log.0, vec!["exit 1", "enter 3", "update 2"]);
    }
}
