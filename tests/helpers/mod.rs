#![allow(dead_code)]

use std::cell::Cell;
use std::path::Path;

use git2::{Oid, Repository, Signature};
use release_flow_version::git::Git2Repository;
use tempfile::TempDir;

/// A throwaway git repository whose history is built commit by commit
pub struct TestRepo {
    dir: TempDir,
    pub repo: Repository,
    counter: Cell<usize>,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        TestRepo {
            dir,
            repo,
            counter: Cell::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a commit with an empty tree and the given parents
    pub fn commit(&self, parents: &[Oid]) -> Oid {
        let n = self.counter.get() + 1;
        self.counter.set(n);

        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let tree_id = self.repo.treebuilder(None).unwrap().write().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

        self.repo
            .commit(None, &sig, &sig, &format!("commit {}", n), &tree, &parent_refs)
            .unwrap()
    }

    /// Create `count` linear commits on top of `parent` and return the tip
    pub fn commits(&self, parent: Option<Oid>, count: usize) -> Oid {
        let mut tip = parent;
        for _ in 0..count {
            let parents: Vec<Oid> = tip.into_iter().collect();
            tip = Some(self.commit(&parents));
        }
        tip.expect("at least one commit")
    }

    pub fn branch(&self, name: &str, oid: Oid) {
        self.repo
            .reference(&format!("refs/heads/{}", name), oid, true, "test branch")
            .unwrap();
    }

    pub fn remote_branch(&self, remote: &str, name: &str, oid: Oid) {
        self.repo
            .reference(
                &format!("refs/remotes/{}/{}", remote, name),
                oid,
                true,
                "test remote branch",
            )
            .unwrap();
    }

    pub fn checkout(&self, name: &str) {
        self.repo.set_head(&format!("refs/heads/{}", name)).unwrap();
    }

    pub fn detach(&self, oid: Oid) {
        self.repo.set_head_detached(oid).unwrap();
    }

    pub fn open(&self) -> Git2Repository {
        Git2Repository::open(self.path(), "origin").unwrap()
    }
}
