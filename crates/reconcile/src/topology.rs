//! The topology model: an arena of OU nodes plus account placements.
//!
//! Two topologies exist during a planning cycle: the *live* one projected
//! from the directory service and the *desired* one loaded from
//! configuration. Both share this representation; live nodes carry the
//! directory-assigned [`OuId`], desired nodes do not.
//!
//! Nodes are addressed by arena index with parent/child relations stored as
//! index lookups, so there are no ownership cycles and parent and child
//! lookup are O(1).

use crate::error::ValidationError;
use crate::path::OuPath;
use orgkit::{AccountId, AccountRecord, AccountStatus, OuId, OuRecord};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// Arena index of an OU node. Index 0 is always the root.
pub type NodeId = usize;

/// An OU node in a topology.
#[derive(Debug, Clone)]
pub struct OuNode {
    /// Directory-assigned identifier; `None` for desired-state nodes
    pub id: Option<OuId>,
    /// Name, unique among siblings
    pub name: String,
    /// Full path from the root
    pub path: OuPath,
    /// Parent node; `None` only for the root
    pub parent: Option<NodeId>,
    children: Vec<NodeId>,
    accounts: BTreeSet<AccountId>,
}

impl OuNode {
    /// Child nodes, in name order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Accounts placed directly under this node.
    pub fn accounts(&self) -> &BTreeSet<AccountId> {
        &self.accounts
    }
}

/// An account placed in a topology. Exactly one parent at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    /// Contact email; desired-state declarations may omit it
    pub email: Option<String>,
    pub status: AccountStatus,
    /// Arena index of the parent OU
    pub parent: NodeId,
}

/// A full tree of OUs and account placements at a point in time.
///
/// Constructed fresh for each planning cycle and discarded after; all
/// persistence lives in the directory service.
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: Vec<OuNode>,
    accounts: BTreeMap<AccountId, Account>,
    by_path: BTreeMap<OuPath, NodeId>,
    by_id: HashMap<OuId, NodeId>,
}

impl Topology {
    /// Create a topology holding only a root.
    pub fn new(root_id: Option<OuId>) -> Self {
        let root = OuNode {
            id: root_id.clone(),
            name: String::new(),
            path: OuPath::root(),
            parent: None,
            children: Vec::new(),
            accounts: BTreeSet::new(),
        };
        let mut by_path = BTreeMap::new();
        by_path.insert(OuPath::root(), 0);
        let mut by_id = HashMap::new();
        if let Some(id) = root_id {
            by_id.insert(id, 0);
        }
        Self {
            nodes: vec![root],
            accounts: BTreeMap::new(),
            by_path,
            by_id,
        }
    }

    /// Assemble a topology from flat directory records.
    ///
    /// `ous` excludes the root (the root is not an OU record); every record
    /// must be reachable from `root` through parent references. Orphans,
    /// cycles, and the usual invariants are rejected.
    pub fn from_records(
        root: OuId,
        ous: Vec<OuRecord>,
        mut accounts: Vec<AccountRecord>,
    ) -> Result<Self, ValidationError> {
        let mut topo = Self::new(Some(root.clone()));

        let mut by_parent: BTreeMap<OuId, Vec<&OuRecord>> = BTreeMap::new();
        for ou in &ous {
            match &ou.parent {
                Some(parent) => by_parent.entry(parent.clone()).or_default().push(ou),
                None => {
                    return Err(ValidationError::OrphanOu {
                        ou: format!("{} ({})", ou.name, ou.id),
                    });
                }
            }
        }

        // Breadth-first attach; removing each parent's bucket as it is
        // visited means cyclic records are simply never attached.
        let mut queue = VecDeque::from([(root, 0usize)]);
        while let Some((ou_id, node)) = queue.pop_front() {
            if let Some(mut children) = by_parent.remove(&ou_id) {
                children.sort_by(|a, b| a.name.cmp(&b.name));
                for child in children {
                    let n = topo.add_ou(node, &child.name, Some(child.id.clone()))?;
                    queue.push_back((child.id.clone(), n));
                }
            }
        }

        if let Some(children) = by_parent.values().next() {
            let child = children[0];
            let parent_is_known = ous
                .iter()
                .any(|ou| Some(&ou.id) == child.parent.as_ref());
            return Err(if parent_is_known {
                ValidationError::Cycle {
                    ou: format!("{} ({})", child.name, child.id),
                }
            } else {
                ValidationError::OrphanOu {
                    ou: format!("{} ({})", child.name, child.id),
                }
            });
        }

        accounts.sort_by(|a, b| a.id.cmp(&b.id));
        for rec in accounts {
            let parent = match topo.node_by_ou_id(&rec.parent) {
                Some(n) => n,
                None => {
                    return Err(ValidationError::MissingAccountParent {
                        account: rec.id,
                        parent: rec.parent.to_string(),
                    });
                }
            };
            topo.add_account(Account {
                id: rec.id,
                name: rec.name,
                email: Some(rec.email),
                status: rec.status,
                parent,
            })?;
        }

        topo.validate()?;
        Ok(topo)
    }

    /// Add an OU under `parent`. Fails on a sibling name collision.
    pub fn add_ou(
        &mut self,
        parent: NodeId,
        name: &str,
        id: Option<OuId>,
    ) -> Result<NodeId, ValidationError> {
        if self.child_named(parent, name).is_some() {
            return Err(ValidationError::DuplicateSiblingName {
                parent: self.nodes[parent].path.clone(),
                name: name.to_string(),
            });
        }
        let path = self.nodes[parent].path.child(name);
        let node_id = self.nodes.len();
        self.nodes.push(OuNode {
            id: id.clone(),
            name: name.to_string(),
            path: path.clone(),
            parent: Some(parent),
            children: Vec::new(),
            accounts: BTreeSet::new(),
        });
        self.nodes[parent].children.push(node_id);
        let mut kids = std::mem::take(&mut self.nodes[parent].children);
        kids.sort_by(|a, b| self.nodes[*a].name.cmp(&self.nodes[*b].name));
        self.nodes[parent].children = kids;
        self.by_path.insert(path, node_id);
        if let Some(id) = id {
            self.by_id.insert(id, node_id);
        }
        Ok(node_id)
    }

    /// Walk `path` from the root, creating missing (identifier-less) nodes.
    pub fn ensure_path(&mut self, path: &OuPath) -> Result<NodeId, ValidationError> {
        let mut node = self.root();
        let mut walked = OuPath::root();
        for segment in path.segments() {
            walked = walked.child(segment);
            node = match self.by_path.get(&walked) {
                Some(&existing) => existing,
                None => self.add_ou(node, segment, None)?,
            };
        }
        Ok(node)
    }

    /// Place an account. Fails on a duplicate account id.
    pub fn add_account(&mut self, account: Account) -> Result<(), ValidationError> {
        if self.accounts.contains_key(&account.id) {
            return Err(ValidationError::DuplicateAccount {
                account: account.id,
            });
        }
        self.nodes[account.parent].accounts.insert(account.id.clone());
        self.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    /// The root node (always index 0).
    pub fn root(&self) -> NodeId {
        0
    }

    /// Directory identifier of the root, if known.
    pub fn root_ou_id(&self) -> Option<&OuId> {
        self.nodes[0].id.as_ref()
    }

    /// Access a node by arena index.
    pub fn node(&self, id: NodeId) -> &OuNode {
        &self.nodes[id]
    }

    /// Full path of a node.
    pub fn path_of(&self, id: NodeId) -> &OuPath {
        &self.nodes[id].path
    }

    /// Look up a node by path.
    pub fn lookup(&self, path: &OuPath) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// Look up a node by directory identifier (live topologies only).
    pub fn node_by_ou_id(&self, id: &OuId) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    /// Child of `parent` carrying `name`, if any.
    pub fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].name == name)
    }

    /// All OU paths except the root, in path order (parents first).
    pub fn ou_paths(&self) -> impl Iterator<Item = (&OuPath, NodeId)> {
        self.by_path
            .iter()
            .filter(|(path, _)| !path.is_root())
            .map(|(path, &node)| (path, node))
    }

    /// All accounts, in id order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Look up an account by id.
    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// All account ids in the subtree rooted at `node`, sorted.
    pub fn subtree_accounts(&self, node: NodeId) -> Vec<AccountId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            out.extend(self.nodes[n].accounts.iter().cloned());
            stack.extend_from_slice(&self.nodes[n].children);
        }
        out.sort();
        out
    }

    /// Number of OUs, excluding the root.
    pub fn ou_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Number of accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Re-check every structural invariant.
    ///
    /// Construction already rejects most violations; this is the single
    /// gate both the live and the desired topology pass before the diff
    /// engine may assume a valid tree.
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Single root
        for node in self.nodes.iter().skip(1) {
            if node.parent.is_none() {
                return Err(ValidationError::OrphanOu {
                    ou: node.path.to_string(),
                });
            }
        }

        // Reachability and acyclicity from the root
        let mut seen = vec![false; self.nodes.len()];
        seen[0] = true;
        let mut stack = vec![0];
        while let Some(n) = stack.pop() {
            for &child in &self.nodes[n].children {
                if seen[child] || self.nodes[child].parent != Some(n) {
                    return Err(ValidationError::Cycle {
                        ou: self.nodes[child].path.to_string(),
                    });
                }
                seen[child] = true;
                stack.push(child);
            }
        }
        if let Some(orphan) = seen.iter().position(|s| !s) {
            return Err(ValidationError::OrphanOu {
                ou: self.nodes[orphan].path.to_string(),
            });
        }

        // Sibling name uniqueness
        for node in &self.nodes {
            let mut names = BTreeSet::new();
            for &child in &node.children {
                if !names.insert(self.nodes[child].name.as_str()) {
                    return Err(ValidationError::DuplicateSiblingName {
                        parent: node.path.clone(),
                        name: self.nodes[child].name.clone(),
                    });
                }
            }
        }

        // Account placements and email uniqueness
        let mut emails: BTreeMap<&str, &AccountId> = BTreeMap::new();
        for (id, account) in &self.accounts {
            if account.parent >= self.nodes.len()
                || !self.nodes[account.parent].accounts.contains(id)
            {
                return Err(ValidationError::MissingAccountParent {
                    account: id.clone(),
                    parent: format!("#{}", account.parent),
                });
            }
            if let Some(email) = account.email.as_deref()
                && let Some(first) = emails.insert(email, id)
            {
                return Err(ValidationError::DuplicateEmail {
                    email: email.to_string(),
                    first: first.clone(),
                    second: id.clone(),
                });
            }
        }

        Ok(())
    }
}
