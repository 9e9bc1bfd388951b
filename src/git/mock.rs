use crate::domain::Branch;
use crate::error::{ReleaseFlowError, Result};
use crate::git::{HistoryMode, Repository};
use git2::Oid;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// In-memory commit graph for testing the version engine without git
///
/// Commits are identified by synthetic OIDs handed out by [MockRepository::add_commit].
pub struct MockRepository {
    parents: HashMap<Oid, Vec<Oid>>,
    branches: BTreeMap<String, (Branch, Oid)>,
    head: Option<String>,
    history_mode: HistoryMode,
    next_id: u32,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            parents: HashMap::new(),
            branches: BTreeMap::new(),
            head: None,
            history_mode: HistoryMode::default(),
            next_id: 1,
        }
    }

    pub fn with_history_mode(mut self, history_mode: HistoryMode) -> Self {
        self.history_mode = history_mode;
        self
    }

    /// Add a commit with the given parents and return its OID
    pub fn add_commit(&mut self, parents: &[Oid]) -> Oid {
        let mut bytes = [0u8; 20];
        bytes[16..].copy_from_slice(&self.next_id.to_be_bytes());
        self.next_id += 1;

        let oid = Oid::from_bytes(&bytes).expect("20 bytes form a valid oid");
        self.parents.insert(oid, parents.to_vec());
        oid
    }

    /// Add `count` commits on top of `parent` and return the last one
    pub fn add_commits(&mut self, parent: Option<Oid>, count: usize) -> Option<Oid> {
        let mut tip = parent;
        for _ in 0..count {
            let parents: Vec<Oid> = tip.into_iter().collect();
            tip = Some(self.add_commit(&parents));
        }
        tip
    }

    /// Point a branch at a commit
    pub fn set_branch(&mut self, branch: Branch, oid: Oid) {
        self.branches
            .insert(branch.raw_name().to_string(), (branch, oid));
    }

    /// Make HEAD point at the branch with the given raw name
    pub fn checkout(&mut self, raw_name: impl Into<String>) {
        self.head = Some(raw_name.into());
    }

    /// Detach HEAD
    pub fn detach(&mut self) {
        self.head = None;
    }

    fn resolve(&self, reference: &str) -> Result<Oid> {
        self.branches
            .get(reference)
            .map(|(_, oid)| *oid)
            .ok_or_else(|| ReleaseFlowError::unknown_reference(reference))
    }

    fn ancestors(&self, tip: Oid) -> HashSet<Oid> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([tip]);
        while let Some(oid) = queue.pop_front() {
            if !seen.insert(oid) {
                continue;
            }
            if let Some(parents) = self.parents.get(&oid) {
                queue.extend(parents.iter().copied());
            }
        }
        seen
    }

    fn first_parent_chain(&self, tip: Oid) -> Vec<Oid> {
        let mut chain = vec![tip];
        let mut current = tip;
        while let Some(&parent) = self.parents.get(&current).and_then(|p| p.first()) {
            chain.push(parent);
            current = parent;
        }
        chain
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<Branch> {
        let head = self
            .head
            .as_ref()
            .ok_or_else(|| ReleaseFlowError::DetachedOrUnresolvable("HEAD".to_string()))?;

        self.branches
            .get(head)
            .map(|(branch, _)| branch.clone())
            .ok_or_else(|| ReleaseFlowError::DetachedOrUnresolvable(head.clone()))
    }

    fn all_branches(&self) -> Result<Vec<Branch>> {
        Ok(self.branches.values().map(|(b, _)| b.clone()).collect())
    }

    fn merge_base(&self, left: &str, right: &str) -> Result<Oid> {
        let left_ancestors = self.ancestors(self.resolve(left)?);
        let right_ancestors = self.ancestors(self.resolve(right)?);

        let common: HashSet<Oid> = left_ancestors
            .intersection(&right_ancestors)
            .copied()
            .collect();

        // The best common ancestor is not a proper ancestor of another common one.
        common
            .iter()
            .copied()
            .filter(|candidate| {
                !common
                    .iter()
                    .any(|other| other != candidate && self.ancestors(*other).contains(candidate))
            })
            .min()
            .ok_or_else(|| ReleaseFlowError::no_common_ancestor(left, right))
    }

    fn commits_since(&self, base: Oid, tip: &str) -> Result<usize> {
        let tip_oid = self.resolve(tip)?;

        let reachable = self.ancestors(tip_oid);
        if !reachable.contains(&base) {
            return Err(ReleaseFlowError::history_traversal(base, tip));
        }
        let excluded = self.ancestors(base);

        Ok(match self.history_mode {
            HistoryMode::FullAncestry => reachable.difference(&excluded).count(),
            HistoryMode::FirstParent => self
                .first_parent_chain(tip_oid)
                .iter()
                .take_while(|oid| !excluded.contains(*oid))
                .count(),
        })
    }

    fn commit_count_from_root(&self, tip: &str) -> Result<usize> {
        let tip_oid = self.resolve(tip)?;
        Ok(match self.history_mode {
            HistoryMode::FullAncestry => self.ancestors(tip_oid).len(),
            HistoryMode::FirstParent => self.first_parent_chain(tip_oid).len(),
        })
    }
}
