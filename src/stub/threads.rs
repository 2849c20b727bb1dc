use std::collections::BTreeMap;

use crate::common::ContextId;

/// Registry of the thread contexts under this session's control.
///
/// Exactly one registered context is *current* at any time; only before the
/// first context is added is there none. Ids are assigned here — the first
/// unused id starting at 0 — so duplicates cannot occur, and stay stable for
/// the lifetime of the session even across `replace` swaps.
pub(crate) struct ThreadRegistry<Tc> {
    threads: BTreeMap<ContextId, Tc>,
    cur: Option<ContextId>,
}

impl<Tc> ThreadRegistry<Tc> {
    pub fn new() -> ThreadRegistry<Tc> {
        ThreadRegistry {
            threads: BTreeMap::new(),
            cur: None,
        }
    }

    /// Register a context and return its assigned id. The first context
    /// added becomes current.
    pub fn add(&mut self, tc: Tc) -> ContextId {
        let id = (0..)
            .find(|id| !self.threads.contains_key(id))
            .unwrap_or(self.threads.len());
        self.threads.insert(id, tc);
        if self.cur.is_none() {
            self.cur = Some(id);
        }
        id
    }

    /// Swap the context registered under `id` in place (CPU migration).
    /// Returns false if `id` is not registered.
    pub fn replace(&mut self, id: ContextId, tc: Tc) -> bool {
        match self.threads.get_mut(&id) {
            Some(slot) => {
                *slot = tc;
                true
            }
            None => false,
        }
    }

    /// Make `id` the current context. Returns false if it is not registered.
    pub fn select(&mut self, id: ContextId) -> bool {
        if self.threads.contains_key(&id) {
            self.cur = Some(id);
            true
        } else {
            false
        }
    }

    pub fn current_id(&self) -> Option<ContextId> {
        self.cur
    }

    pub fn current(&mut self) -> Option<(ContextId, &mut Tc)> {
        let id = self.cur?;
        self.threads.get_mut(&id).map(|tc| (id, tc))
    }

    pub fn get(&self, id: ContextId) -> Option<&Tc> {
        self.threads.get(&id)
    }

    pub fn get_mut(&mut self, id: ContextId) -> Option<&mut Tc> {
        self.threads.get_mut(&id)
    }

    /// Registered ids, ascending.
    pub fn ids(&self) -> impl Iterator<Item = ContextId> + '_ {
        self.threads.keys().copied()
    }
}
