//! Region boundaries and their pairing
//!
//! A region is a [`BlockStart`] and a [`BlockEnd`] that share a [`GroupId`].
//! The two are independent list members; neither owns the other. Pairing is
//! recomputed on every query by a two-phase search:
//!
//! 1. **Local**: scan the member list of the boundary's own container.
//! 2. **Fallback**: scan every node under the root of the boundary's tree.
//!
//! Callers that query many regions of a tree that is not changing can build
//! a [`GroupIndex`] once instead.

use std::fmt;

use indexmap::IndexMap;
use uuid::Uuid;

use super::tree::{Dom, NodeData, NodeId};
use crate::error::DomError;
use crate::result::Result;

/// Opaque token linking one region start to one region end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(Uuid);

impl GroupId {
    /// Mint a fresh, unique group id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The first block is enough to tell groups apart in messages
        let text = self.0.simple().to_string();
        f.write_str(&text[..8])
    }
}

/// Pairing state of one boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pairing {
    Paired(GroupId),
    /// Copied without its partner; must be resolved before emission
    Unresolved { original: GroupId },
}

impl Pairing {
    /// The group id, if the boundary is paired
    pub fn group(&self) -> Option<GroupId> {
        match self {
            Pairing::Paired(group) => Some(*group),
            Pairing::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Pairing::Paired(_))
    }
}

/// `#region text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStart {
    pub pairing: Pairing,
    pub text: String,
}

impl BlockStart {
    pub fn new(group: GroupId, text: impl Into<String>) -> Self {
        Self {
            pairing: Pairing::Paired(group),
            text: text.into(),
        }
    }
}

/// `#endregion`, optionally with trailing text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEnd {
    pub pairing: Pairing,
    pub text: String,
}

impl BlockEnd {
    pub fn new(group: GroupId) -> Self {
        Self {
            pairing: Pairing::Paired(group),
            text: String::new(),
        }
    }
}

/// Outcome of a partner search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMatch {
    Matched(NodeId),
    Unmatched,
}

impl BlockMatch {
    pub fn node(self) -> Option<NodeId> {
        match self {
            BlockMatch::Matched(node) => Some(node),
            BlockMatch::Unmatched => None,
        }
    }
}

/// Members enclosed by a region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContents {
    /// Members strictly between start and end, in list order
    Members(Vec<NodeId>),
    /// Start and end live in different containers; not supported
    CrossContainer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

impl Side {
    fn name(self) -> &'static str {
        match self {
            Side::Start => "region start",
            Side::End => "region end",
        }
    }

    fn opposite(self) -> Side {
        match self {
            Side::Start => Side::End,
            Side::End => Side::Start,
        }
    }
}

/// Side and pairing of a boundary node
fn boundary(data: &NodeData) -> Option<(Side, Pairing)> {
    match data {
        NodeData::BlockStart(start) => Some((Side::Start, start.pairing)),
        NodeData::BlockEnd(end) => Some((Side::End, end.pairing)),
        _ => None,
    }
}

/// Group of a boundary of the expected side, failing on anything else
fn paired_group(dom: &Dom, node: NodeId, side: Side) -> Result<GroupId> {
    match boundary(dom.data(node)?) {
        Some((found, Pairing::Paired(group))) if found == side => Ok(group),
        Some((found, Pairing::Unresolved { original })) if found == side => {
            Err(DomError::PartialClonePairingUnresolved { node, original })
        }
        _ => Err(DomError::NotABlockBoundary {
            node,
            expected: side.name(),
        }),
    }
}

fn is_partner(dom: &Dom, candidate: NodeId, side: Side, group: GroupId) -> bool {
    dom.data(candidate)
        .ok()
        .and_then(boundary)
        .is_some_and(|(found, pairing)| found == side && pairing == Pairing::Paired(group))
}

fn find_partner(dom: &Dom, node: NodeId, side: Side, group: GroupId) -> Result<BlockMatch> {
    let wanted = side.opposite();

    if let Some(parent) = dom.parent(node)? {
        tracing::trace!("Local search for {} of group {} in {}", wanted.name(), group, parent);
        if let Some(found) = dom
            .members(parent)?
            .iter()
            .copied()
            .find(|&m| is_partner(dom, m, wanted, group))
        {
            return Ok(BlockMatch::Matched(found));
        }
    }

    let root = dom.root_of(node)?;
    tracing::trace!("Fallback search for {} of group {} under {}", wanted.name(), group, root);
    let found = std::iter::once(root)
        .chain(dom.descendants(root)?)
        .find(|&n| is_partner(dom, n, wanted, group));

    Ok(found.map_or(BlockMatch::Unmatched, BlockMatch::Matched))
}

/// Find the end that closes `start`
pub fn match_block_end(dom: &Dom, start: NodeId) -> Result<BlockMatch> {
    let group = paired_group(dom, start, Side::Start)?;
    find_partner(dom, start, Side::Start, group)
}

/// Find the start that `end` closes
pub fn match_block_start(dom: &Dom, end: NodeId) -> Result<BlockMatch> {
    let group = paired_group(dom, end, Side::End)?;
    find_partner(dom, end, Side::End, group)
}

/// Like [`match_block_end`], with `Unmatched` turned into an error
pub fn block_end(dom: &Dom, start: NodeId) -> Result<NodeId> {
    let group = paired_group(dom, start, Side::Start)?;
    find_partner(dom, start, Side::Start, group)?
        .node()
        .ok_or(DomError::UnmatchedBlockBoundary { node: start, group })
}

/// Like [`match_block_start`], with `Unmatched` turned into an error
pub fn block_start(dom: &Dom, end: NodeId) -> Result<NodeId> {
    let group = paired_group(dom, end, Side::End)?;
    find_partner(dom, end, Side::End, group)?
        .node()
        .ok_or(DomError::UnmatchedBlockBoundary { node: end, group })
}

/// Whether the region's start and end share a container
///
/// Fails with `UnmatchedBlockBoundary` when there is no end at all, so an
/// unmatched region is never reported as merely invalid.
pub fn semantically_valid(dom: &Dom, start: NodeId) -> Result<bool> {
    let end = block_end(dom, start)?;
    Ok(dom.parent(start)? == dom.parent(end)?)
}

/// Members enclosed by the region opened at `start`
///
/// An end placed before its start encloses nothing.
pub fn block_contents(dom: &Dom, start: NodeId) -> Result<BlockContents> {
    let end = block_end(dom, start)?;
    let (Some(parent), Some(end_parent)) = (dom.parent(start)?, dom.parent(end)?) else {
        return Ok(BlockContents::CrossContainer);
    };
    if parent != end_parent {
        return Ok(BlockContents::CrossContainer);
    }

    let members = dom.members(parent)?;
    let position = |id: NodeId| members.iter().position(|&m| m == id);
    let contents = match (position(start), position(end)) {
        (Some(s), Some(e)) if s < e => members[s + 1..e].to_vec(),
        _ => Vec::new(),
    };
    Ok(BlockContents::Members(contents))
}

/// Both ends of one group, as found by a [`GroupIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupEntry {
    pub start: Option<NodeId>,
    pub end: Option<NodeId>,
}

impl GroupEntry {
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// One-pass index from group id to boundaries
///
/// A snapshot: it does not follow later edits to the tree.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    groups: IndexMap<GroupId, GroupEntry>,
}

impl GroupIndex {
    /// Index every paired boundary at or under `root`, in document order
    ///
    /// When a group has more than one start (or end), the first one wins,
    /// which is what the fallback search would find.
    pub fn build(dom: &Dom, root: NodeId) -> Result<Self> {
        let mut groups: IndexMap<GroupId, GroupEntry> = IndexMap::new();
        for node in std::iter::once(root).chain(dom.descendants(root)?) {
            let Some((side, Pairing::Paired(group))) = boundary(dom.data(node)?) else {
                continue;
            };
            let entry = groups.entry(group).or_default();
            let slot = match side {
                Side::Start => &mut entry.start,
                Side::End => &mut entry.end,
            };
            slot.get_or_insert(node);
        }
        tracing::debug!("Indexed {} region groups under {}", groups.len(), root);
        Ok(Self { groups })
    }

    pub fn get(&self, group: GroupId) -> Option<&GroupEntry> {
        self.groups.get(&group)
    }

    pub fn end_for(&self, group: GroupId) -> Option<NodeId> {
        self.groups.get(&group).and_then(|e| e.end)
    }

    pub fn start_for(&self, group: GroupId) -> Option<NodeId> {
        self.groups.get(&group).and_then(|e| e.start)
    }

    /// All groups in document order of their first boundary
    pub fn regions(&self) -> impl Iterator<Item = (GroupId, GroupEntry)> + '_ {
        self.groups.iter().map(|(group, entry)| (*group, *entry))
    }

    /// Groups missing a start or an end
    pub fn unmatched(&self) -> impl Iterator<Item = (GroupId, GroupEntry)> + '_ {
        self.regions().filter(|(_, entry)| !entry.is_complete())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::tree::{Field, NodeData};

    fn field(name: &str) -> NodeData {
        NodeData::Field(Field::new("int", name))
    }

    #[test]
    fn test_pairing_in_either_order() {
        let mut dom = Dom::new();
        let root = dom.root();
        let group = GroupId::new();

        let end = dom
            .append_member(root, NodeData::BlockEnd(BlockEnd::new(group)))
            .unwrap();
        let start = dom
            .append_member(root, NodeData::BlockStart(BlockStart::new(group, "R")))
            .unwrap();

        assert_eq!(match_block_end(&dom, start).unwrap(), BlockMatch::Matched(end));
        assert_eq!(match_block_start(&dom, end).unwrap(), BlockMatch::Matched(start));
        assert!(semantically_valid(&dom, start).unwrap());
        assert_eq!(
            block_contents(&dom, start).unwrap(),
            BlockContents::Members(Vec::new())
        );
    }

    #[test]
    fn test_contents_between_boundaries() {
        let mut dom = Dom::new();
        let root = dom.root();
        dom.append_member(root, field("a")).unwrap();
        let (start, end) = dom.new_region(root, "Fields").unwrap();
        let inside = dom.append_member(root, field("b")).unwrap();
        dom.add_or_move_member(root, end).unwrap();

        assert_eq!(
            block_contents(&dom, start).unwrap(),
            BlockContents::Members(vec![inside])
        );
    }

    #[test]
    fn test_unmatched_start_is_an_error() {
        let mut dom = Dom::new();
        let root = dom.root();
        let group = GroupId::new();
        let start = dom
            .append_member(root, NodeData::BlockStart(BlockStart::new(group, "Lonely")))
            .unwrap();

        assert_eq!(match_block_end(&dom, start).unwrap(), BlockMatch::Unmatched);
        let err = block_end(&dom, start).unwrap_err();
        assert!(matches!(err, DomError::UnmatchedBlockBoundary { node, group: g } if node == start && g == group));
        assert!(matches!(
            semantically_valid(&dom, start),
            Err(DomError::UnmatchedBlockBoundary { .. })
        ));
    }

    #[test]
    fn test_fallback_finds_end_in_other_container() {
        let mut dom = Dom::new();
        let root = dom.root();
        let group = GroupId::new();
        let start = dom
            .append_member(root, NodeData::BlockStart(BlockStart::new(group, "Split")))
            .unwrap();
        let ty = dom
            .append_member(root, NodeData::Type(crate::dom::tree::TypeDecl::class("C")))
            .unwrap();
        let end = dom
            .append_member(ty, NodeData::BlockEnd(BlockEnd::new(group)))
            .unwrap();

        assert_eq!(block_end(&dom, start).unwrap(), end);
        assert_eq!(block_start(&dom, end).unwrap(), start);
        assert!(!semantically_valid(&dom, start).unwrap());
        assert_eq!(
            block_contents(&dom, start).unwrap(),
            BlockContents::CrossContainer
        );
    }

    #[test]
    fn test_wrong_node_kind() {
        let mut dom = Dom::new();
        let root = dom.root();
        let node = dom.append_member(root, field("x")).unwrap();
        let (_, end) = dom.new_region(root, "R").unwrap();

        assert!(matches!(
            match_block_end(&dom, node),
            Err(DomError::NotABlockBoundary { expected: "region start", .. })
        ));
        assert!(matches!(
            match_block_end(&dom, end),
            Err(DomError::NotABlockBoundary { .. })
        ));
    }

    #[test]
    fn test_group_index() {
        let mut dom = Dom::new();
        let root = dom.root();
        let (start, end) = dom.new_region(root, "A").unwrap();
        let orphan = GroupId::new();
        dom.append_member(root, NodeData::BlockStart(BlockStart::new(orphan, "B")))
            .unwrap();

        let index = GroupIndex::build(&dom, root).unwrap();
        assert_eq!(index.len(), 2);

        let (group, entry) = index.regions().next().expect("first region");
        assert_eq!(entry, GroupEntry { start: Some(start), end: Some(end) });
        assert_eq!(index.end_for(group), Some(end));
        assert_eq!(index.start_for(group), Some(start));

        let unmatched: Vec<GroupId> = index.unmatched().map(|(g, _)| g).collect();
        assert_eq!(unmatched, vec![orphan]);
    }

    #[test]
    fn test_group_ids_are_unique() {
        assert_ne!(GroupId::new(), GroupId::new());
        assert_eq!(GroupId::new().to_string().len(), 8);
    }
}
