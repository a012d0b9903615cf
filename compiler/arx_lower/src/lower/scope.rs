//! Name bindings during lowering.
//!
//! Every Arx local is assignable, and assignment is SSA rebinding: `x = e`
//! lowers `e` and points `x` at the new value. A [`LowerScope`] is a plain
//! map that is cloned at each control-flow split; comparing the clones at a
//! merge point tells which names need a block parameter.

use arx_ir::Name;
use rustc_hash::FxHashMap;

use crate::ir::ValueId;

#[derive(Clone, Debug, Default)]
pub(crate) struct LowerScope {
    bindings: FxHashMap<Name, ValueId>,
}

impl LowerScope {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Bind or rebind a name.
    pub(crate) fn bind(&mut self, name: Name, value: ValueId) {
        self.bindings.insert(name, value);
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<ValueId> {
        self.bindings.get(name).copied()
    }

    /// Names bound here whose value differs in at least one of `branches`,
    /// sorted so block parameters come out in a stable order.
    pub(crate) fn changed_in(&self, branches: &[&LowerScope]) -> Vec<(Name, ValueId)> {
        let mut changed: Vec<_> = self
            .bindings
            .iter()
            .filter(|(name, value)| {
                branches
                    .iter()
                    .any(|branch| branch.lookup(name.as_str()) != Some(**value))
            })
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        changed.sort_by(|a, b| a.0.cmp(&b.0));
        changed
    }

    /// Bindings whose names satisfy `filter`, sorted by name.
    pub(crate) fn select(&self, filter: impl Fn(&Name) -> bool) -> Vec<(Name, ValueId)> {
        let mut selected: Vec<_> = self
            .bindings
            .iter()
            .filter(|(name, _)| filter(name))
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        selected.sort_by(|a, b| a.0.cmp(&b.0));
        selected
    }

    /// Bind a name introduced by a nested construct, returning what it
    /// shadowed so [`unshadow`](Self::unshadow) can put it back.
    pub(crate) fn shadow(&mut self, name: Name, value: ValueId) -> Shadowed {
        let previous = self.bindings.insert(name.clone(), value);
        Shadowed { name, previous }
    }

    /// Leave a construct: drop the names it introduced, newest first. Outer
    /// names it assigned keep their new values.
    pub(crate) fn unshadow(&mut self, shadowed: Vec<Shadowed>) {
        for Shadowed { name, previous } in shadowed.into_iter().rev() {
            match previous {
                Some(value) => {
                    self.bindings.insert(name, value);
                }
                None => {
                    self.bindings.remove(&name);
                }
            }
        }
    }
}

/// A binding displaced by [`LowerScope::shadow`].
#[must_use]
pub(crate) struct Shadowed {
    name: Name,
    previous: Option<ValueId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v(n: u32) -> ValueId {
        ValueId::new(n)
    }

    #[test]
    fn test_rebinding_replaces() {
        let mut scope = LowerScope::new();
        scope.bind(Name::new("x"), v(0));
        scope.bind(Name::new("x"), v(5));
        assert_eq!(scope.lookup("x"), Some(v(5)));
        assert_eq!(scope.lookup("y"), None);
    }

    #[test]
    fn test_changed_in_is_sorted() {
        let mut pre = LowerScope::new();
        for (i, name) in ["c", "a", "b"].into_iter().enumerate() {
            pre.bind(Name::new(name), v(u32::try_from(i).unwrap_or(0)));
        }
        let mut then_scope = pre.clone();
        then_scope.bind(Name::new("c"), v(10));
        let mut else_scope = pre.clone();
        else_scope.bind(Name::new("a"), v(11));

        let changed: Vec<_> = pre
            .changed_in(&[&then_scope, &else_scope])
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(changed, vec![Name::new("a"), Name::new("c")]);
    }

    #[test]
    fn test_unshadow_keeps_outer_updates() {
        let mut scope = LowerScope::new();
        scope.bind(Name::new("x"), v(0));
        scope.bind(Name::new("y"), v(1));

        // var x = (y = ...), z = ... in ...
        scope.bind(Name::new("y"), v(2));
        let shadowed = vec![
            scope.shadow(Name::new("x"), v(3)),
            scope.shadow(Name::new("z"), v(4)),
        ];
        scope.bind(Name::new("x"), v(5));
        scope.unshadow(shadowed);

        assert_eq!(scope.lookup("x"), Some(v(0)));
        assert_eq!(scope.lookup("y"), Some(v(2)));
        assert_eq!(scope.lookup("z"), None);
    }
}
