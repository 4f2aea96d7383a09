//! The mutable model tree
//!
//! Nodes live in an arena owned by [`Dom`] and are addressed by [`NodeId`].
//! Every container node holds a [`MemberList`]: the ordered, exclusively
//! owned sequence of its children. List order is emission order and is only
//! ever changed by an explicit append, insert, move or detach.
//!
//! Detached nodes and clones stay in the arena as roots of their own
//! subtrees until they are attached somewhere.

use std::fmt;

use indexmap::IndexMap;

use super::attribute::AttributeList;
use super::block::{BlockEnd, BlockStart, GroupId, Pairing};
use super::comment_white::{Comment, CommentWhite, VerticalWhitespace};
use crate::error::DomError;
use crate::result::Result;

/// Handle to a node in a [`Dom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered children of a container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberList(Vec<NodeId>);

impl MemberList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.0.iter().position(|&m| m == id)
    }

    fn push(&mut self, id: NodeId) {
        self.0.push(id);
    }

    fn insert(&mut self, index: usize, id: NodeId) {
        let index = index.min(self.0.len());
        self.0.insert(index, id);
    }

    fn remove(&mut self, id: NodeId) -> Option<usize> {
        let index = self.position(id)?;
        self.0.remove(index);
        Some(index)
    }
}


/// `class`, `struct` or `interface`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(TypeKind::Class),
            "struct" => Some(TypeKind::Struct),
            "interface" => Some(TypeKind::Interface),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Namespace {
    pub name: String,
    pub members: MemberList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    pub modifiers: Vec<String>,
    pub attributes: Vec<AttributeList>,
    /// Base types as written after the colon
    pub base_list: Option<String>,
    pub members: MemberList,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            modifiers: Vec::new(),
            attributes: Vec::new(),
            base_list: None,
            members: MemberList::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class, name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub modifiers: Vec<String>,
    pub attributes: Vec<AttributeList>,
    pub type_name: String,
    pub name: String,
    pub initializer: Option<String>,
}

impl Field {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            modifiers: Vec::new(),
            attributes: Vec::new(),
            type_name: type_name.into(),
            name: name.into(),
            initializer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub modifiers: Vec<String>,
    pub attributes: Vec<AttributeList>,
    /// `None` for a constructor
    pub return_type: Option<String>,
    pub name: String,
    /// Parameter list including its parentheses
    pub parameters: String,
    /// Statements of the body; `None` when the method ends in `;`
    pub body: Option<MemberList>,
}

impl Method {
    pub fn new(return_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            modifiers: Vec::new(),
            attributes: Vec::new(),
            return_type: Some(return_type.into()),
            name: name.into(),
            parameters: "()".to_string(),
            body: Some(MemberList::new()),
        }
    }
}

/// Opaque statement, kept as its source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub text: String,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    CompilationUnit(MemberList),
    UsingDirective(UsingDirective),
    Namespace(Namespace),
    Type(TypeDecl),
    Field(Field),
    Method(Method),
    /// Nested `{ }` in a statement list
    Block(MemberList),
    Statement(Statement),
    Comment(Comment),
    VerticalWhitespace(VerticalWhitespace),
    BlockStart(BlockStart),
    BlockEnd(BlockEnd),
}

impl NodeData {
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeData::CompilationUnit(_) => "CompilationUnit",
            NodeData::UsingDirective(_) => "UsingDirective",
            NodeData::Namespace(_) => "Namespace",
            NodeData::Type(_) => "Type",
            NodeData::Field(_) => "Field",
            NodeData::Method(_) => "Method",
            NodeData::Block(_) => "Block",
            NodeData::Statement(_) => "Statement",
            NodeData::Comment(_) => "Comment",
            NodeData::VerticalWhitespace(_) => "VerticalWhitespace",
            NodeData::BlockStart(_) => "BlockStart",
            NodeData::BlockEnd(_) => "BlockEnd",
        }
    }

    /// Member list, for container nodes
    pub fn members(&self) -> Option<&MemberList> {
        match self {
            NodeData::CompilationUnit(members) | NodeData::Block(members) => Some(members),
            NodeData::Namespace(ns) => Some(&ns.members),
            NodeData::Type(ty) => Some(&ty.members),
            NodeData::Method(method) => method.body.as_ref(),
            _ => None,
        }
    }

    fn members_mut(&mut self) -> Option<&mut MemberList> {
        match self {
            NodeData::CompilationUnit(members) | NodeData::Block(members) => Some(members),
            NodeData::Namespace(ns) => Some(&mut ns.members),
            NodeData::Type(ty) => Some(&mut ty.members),
            NodeData::Method(method) => method.body.as_mut(),
            _ => None,
        }
    }

    /// Pairing of a region boundary
    pub fn pairing(&self) -> Option<Pairing> {
        match self {
            NodeData::BlockStart(start) => Some(start.pairing),
            NodeData::BlockEnd(end) => Some(end.pairing),
            _ => None,
        }
    }

    fn pairing_mut(&mut self) -> Option<&mut Pairing> {
        match self {
            NodeData::BlockStart(start) => Some(&mut start.pairing),
            NodeData::BlockEnd(end) => Some(&mut end.pairing),
            _ => None,
        }
    }

    pub fn as_comment_white(&self) -> Option<CommentWhite> {
        match self {
            NodeData::Comment(comment) => Some(CommentWhite::Comment(comment.clone())),
            NodeData::VerticalWhitespace(white) => Some(CommentWhite::VerticalWhitespace(*white)),
            _ => None,
        }
    }

    /// Equal up to group ids, naming style and member lists
    fn same_intent(&self, other: &NodeData) -> bool {
        fn same_attributes(a: &[AttributeList], b: &[AttributeList]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_intent(y))
        }

        match (self, other) {
            (NodeData::CompilationUnit(_), NodeData::CompilationUnit(_)) => true,
            (NodeData::Block(_), NodeData::Block(_)) => true,
            (NodeData::UsingDirective(a), NodeData::UsingDirective(b)) => a == b,
            (NodeData::Namespace(a), NodeData::Namespace(b)) => a.name == b.name,
            (NodeData::Type(a), NodeData::Type(b)) => {
                a.kind == b.kind
                    && a.name == b.name
                    && a.modifiers == b.modifiers
                    && a.base_list == b.base_list
                    && same_attributes(&a.attributes, &b.attributes)
            }
            (NodeData::Field(a), NodeData::Field(b)) => {
                a.modifiers == b.modifiers
                    && a.type_name == b.type_name
                    && a.name == b.name
                    && a.initializer == b.initializer
                    && same_attributes(&a.attributes, &b.attributes)
            }
            (NodeData::Method(a), NodeData::Method(b)) => {
                a.modifiers == b.modifiers
                    && a.return_type == b.return_type
                    && a.name == b.name
                    && a.parameters == b.parameters
                    && a.body.is_some() == b.body.is_some()
                    && same_attributes(&a.attributes, &b.attributes)
            }
            (NodeData::Statement(a), NodeData::Statement(b)) => a == b,
            (NodeData::Comment(a), NodeData::Comment(b)) => a == b,
            (NodeData::VerticalWhitespace(a), NodeData::VerticalWhitespace(b)) => a == b,
            (NodeData::BlockStart(a), NodeData::BlockStart(b)) => a.text == b.text,
            (NodeData::BlockEnd(a), NodeData::BlockEnd(b)) => a.text == b.text,
            _ => false,
        }
    }
}

impl From<CommentWhite> for NodeData {
    fn from(member: CommentWhite) -> Self {
        match member {
            CommentWhite::Comment(comment) => NodeData::Comment(comment),
            CommentWhite::VerticalWhitespace(white) => NodeData::VerticalWhitespace(white),
        }
    }
}

/// One arena slot
#[derive(Debug, Clone, PartialEq)]
pub struct DomNode {
    parent: Option<NodeId>,
    data: NodeData,
}

impl DomNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }
}

/// Arena of model nodes with one compilation unit root
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<DomNode>,
    root: NodeId,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// An empty compilation unit
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        dom.root = dom.alloc(NodeData::CompilationUnit(MemberList::new()));
        dom
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node; containers must start out empty
    pub fn new_node(&mut self, data: NodeData) -> Result<NodeId> {
        if data.members().is_some_and(|m| !m.is_empty()) {
            let node = NodeId(self.nodes.len() as u32);
            return Err(DomError::MemberListEdit { node });
        }
        Ok(self.alloc(data))
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(DomNode { parent: None, data });
        id
    }

    pub fn node(&self, id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(id.index())
            .ok_or(DomError::UnknownNode { node: id })
    }

    pub fn data(&self, id: NodeId) -> Result<&NodeData> {
        self.node(id).map(|n| &n.data)
    }

    /// Change a node's own fields
    ///
    /// The member list must come out of `f` as it went in; append, insert,
    /// move and detach are the only ways to change it. Otherwise the node
    /// is restored and `MemberListEdit` returned.
    pub fn edit<R>(&mut self, id: NodeId, f: impl FnOnce(&mut NodeData) -> R) -> Result<R> {
        let data = self.data_mut(id)?;
        let before = data.clone();
        let out = f(&mut *data);
        if data.members() != before.members() {
            *data = before;
            return Err(DomError::MemberListEdit { node: id });
        }
        Ok(out)
    }

    fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes
            .get_mut(id.index())
            .map(|n| &mut n.data)
            .ok_or(DomError::UnknownNode { node: id })
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.node(id).map(|n| n.parent)
    }

    /// Parent, grandparent, ... up to the root of the subtree holding `id`
    pub fn ancestors(&self, id: NodeId) -> Result<impl Iterator<Item = NodeId> + '_> {
        let first = self.parent(id)?;
        Ok(std::iter::successors(first, |&n| {
            self.nodes.get(n.index()).and_then(|node| node.parent)
        }))
    }

    /// Outermost ancestor, or `id` itself when it has no parent
    pub fn root_of(&self, id: NodeId) -> Result<NodeId> {
        Ok(self.ancestors(id)?.last().unwrap_or(id))
    }

    /// Every node below `id` in document order, `id` excluded
    pub fn descendants(&self, id: NodeId) -> Result<Descendants<'_>> {
        let mut stack = self.members(id).map(|m| m.to_vec()).unwrap_or_default();
        self.node(id)?;
        stack.reverse();
        Ok(Descendants { dom: self, stack })
    }

    pub fn members(&self, container: NodeId) -> Result<&[NodeId]> {
        self.data(container)?
            .members()
            .map(MemberList::as_slice)
            .ok_or(DomError::NotAContainer { node: container })
    }

    pub fn is_container(&self, id: NodeId) -> bool {
        self.data(id).is_ok_and(|d| d.members().is_some())
    }

    fn member_list_mut(&mut self, container: NodeId) -> Result<&mut MemberList> {
        self.data_mut(container)?
            .members_mut()
            .ok_or(DomError::NotAContainer { node: container })
    }

    /// Create a node and append it to `container`
    pub fn append_member(&mut self, container: NodeId, data: NodeData) -> Result<NodeId> {
        self.members(container)?;
        let id = self.new_node(data)?;
        self.attach(container, None, id)?;
        Ok(id)
    }

    /// Append `node` to `container`, detaching it from its current parent
    pub fn add_or_move_member(&mut self, container: NodeId, node: NodeId) -> Result<()> {
        self.attach(container, None, node)
    }

    /// Place `node` at `index` of `container` (clamped to the list length),
    /// detaching it from its current parent
    pub fn insert_member(&mut self, container: NodeId, index: usize, node: NodeId) -> Result<()> {
        self.attach(container, Some(index), node)
    }

    fn attach(&mut self, container: NodeId, index: Option<usize>, node: NodeId) -> Result<()> {
        self.node(node)?;
        self.members(container)?;
        if container == node || self.ancestors(container)?.any(|a| a == node) {
            return Err(DomError::InvalidMove {
                node,
                target: container,
            });
        }

        self.detach(node)?;
        let members = self.member_list_mut(container)?;
        match index {
            Some(index) => members.insert(index, node),
            None => members.push(node),
        }
        self.nodes[node.index()].parent = Some(container);
        Ok(())
    }

    /// Remove `node` from its parent's member list; a no-op for roots
    pub fn detach(&mut self, node: NodeId) -> Result<()> {
        let Some(parent) = self.parent(node)? else {
            return Ok(());
        };
        self.member_list_mut(parent)?.remove(node);
        self.nodes[node.index()].parent = None;
        Ok(())
    }

    /// Append a fresh region start and end, adjacent, to `container`
    pub fn new_region(&mut self, container: NodeId, text: impl Into<String>) -> Result<(NodeId, NodeId)> {
        let group = GroupId::new();
        let start = self.append_member(container, NodeData::BlockStart(BlockStart::new(group, text)))?;
        let end = self.append_member(container, NodeData::BlockEnd(BlockEnd::new(group)))?;
        Ok((start, end))
    }

    /// Deep copy of `id` and its members as a new detached subtree
    ///
    /// Regions fully inside the copy get a fresh group id shared by both
    /// copied boundaries. A boundary whose partner was left behind comes out
    /// as [`Pairing::Unresolved`].
    pub fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId> {
        let remap = self.pair_remap(&[id])?;
        let copy = self.copy_node(id, &remap);
        tracing::debug!("Cloned {} as {} ({} regions remapped)", id, copy, remap.len());
        Ok(copy)
    }

    /// Copies of every member of `container`, in order, as detached roots
    ///
    /// Regions are remapped over the whole list, so a region spanning
    /// several members stays paired in the copy.
    pub fn clone_members(&mut self, container: NodeId) -> Result<Vec<NodeId>> {
        let members = self.members(container)?.to_vec();
        let remap = self.pair_remap(&members)?;
        let copies = members
            .into_iter()
            .map(|member| self.copy_node(member, &remap))
            .collect();
        Ok(copies)
    }

    /// Fresh group ids for groups with both ends inside `scope`
    fn pair_remap(&self, scope: &[NodeId]) -> Result<IndexMap<GroupId, GroupId>> {
        let mut seen: IndexMap<GroupId, (bool, bool)> = IndexMap::new();
        for &top in scope {
            for node in std::iter::once(top).chain(self.descendants(top)?) {
                match self.data(node)? {
                    NodeData::BlockStart(BlockStart {
                        pairing: Pairing::Paired(group),
                        ..
                    }) => seen.entry(*group).or_default().0 = true,
                    NodeData::BlockEnd(BlockEnd {
                        pairing: Pairing::Paired(group),
                        ..
                    }) => seen.entry(*group).or_default().1 = true,
                    _ => {}
                }
            }
        }

        Ok(seen
            .into_iter()
            .filter(|(_, (start, end))| *start && *end)
            .map(|(group, _)| (group, GroupId::new()))
            .collect())
    }

    fn copy_node(&mut self, id: NodeId, remap: &IndexMap<GroupId, GroupId>) -> NodeId {
        let mut data = self.nodes[id.index()].data.clone();
        let children: Vec<NodeId> = data.members().map(|m| m.as_slice().to_vec()).unwrap_or_default();

        if let Some(pairing) = data.pairing_mut() {
            if let Pairing::Paired(group) = *pairing {
                *pairing = match remap.get(&group) {
                    Some(fresh) => Pairing::Paired(*fresh),
                    None => {
                        tracing::warn!("Region boundary {} cloned without its partner", id);
                        Pairing::Unresolved { original: group }
                    }
                };
            }
        }

        if let Some(members) = data.members_mut() {
            *members = MemberList::new();
        }
        let copy = self.alloc(data);
        let copies: Vec<NodeId> = children
            .into_iter()
            .map(|child| {
                let child_copy = self.copy_node(child, remap);
                self.nodes[child_copy.index()].parent = Some(copy);
                child_copy
            })
            .collect();
        if let Some(members) = self.nodes[copy.index()].data.members_mut() {
            *members = MemberList(copies);
        }
        copy
    }

    /// Boundaries at or under `root` whose pairing is unresolved
    pub fn unresolved_boundaries(&self, root: NodeId) -> Result<Vec<NodeId>> {
        let mut unresolved = Vec::new();
        for node in std::iter::once(root).chain(self.descendants(root)?) {
            if matches!(self.data(node)?.pairing(), Some(Pairing::Unresolved { .. })) {
                unresolved.push(node);
            }
        }
        Ok(unresolved)
    }

    /// Set the group of a boundary, resolving a half-cloned region
    pub fn resolve_pairing(&mut self, node: NodeId, group: GroupId) -> Result<()> {
        let pairing = self
            .data_mut(node)?
            .pairing_mut()
            .ok_or(DomError::NotABlockBoundary {
                node,
                expected: "region boundary",
            })?;
        *pairing = Pairing::Paired(group);
        Ok(())
    }

    /// Whether two subtrees describe the same program, ignoring group ids
    /// and how attribute arguments were named
    pub fn same_intent(&self, a: NodeId, other: &Dom, b: NodeId) -> bool {
        let (Ok(left), Ok(right)) = (self.data(a), other.data(b)) else {
            return false;
        };
        if !left.same_intent(right) {
            return false;
        }
        match (left.members(), right.members()) {
            (Some(l), Some(r)) => {
                l.len() == r.len()
                    && l
                        .iter()
                        .zip(r.iter())
                        .all(|(x, y)| self.same_intent(x, other, y))
            }
            (None, None) => true,
            _ => false,
        }
    }
}

/// Pre-order walk below a node
pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.stack.pop()?;
        if let Some(members) = self.dom.nodes.get(next.index()).and_then(|n| n.data.members()) {
            self.stack.extend(members.as_slice().iter().rev());
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::block::{BlockMatch, block_end, match_block_end};

    fn field(name: &str) -> NodeData {
        NodeData::Field(Field::new("int", name))
    }

    fn names(dom: &Dom, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| match dom.data(id).unwrap() {
                NodeData::Field(f) => f.name.clone(),
                other => other.kind_name().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_append_and_navigate() {
        let mut dom = Dom::new();
        let root = dom.root();
        let ty = dom
            .append_member(root, NodeData::Type(TypeDecl::class("C")))
            .unwrap();
        let a = dom.append_member(ty, field("a")).unwrap();

        assert_eq!(dom.parent(a).unwrap(), Some(ty));
        assert_eq!(dom.ancestors(a).unwrap().collect::<Vec<_>>(), vec![ty, root]);
        assert_eq!(dom.root_of(a).unwrap(), root);
        assert_eq!(dom.descendants(root).unwrap().collect::<Vec<_>>(), vec![ty, a]);
    }

    #[test]
    fn test_insert_move_and_detach() {
        let mut dom = Dom::new();
        let root = dom.root();
        let a = dom.append_member(root, field("a")).unwrap();
        let b = dom.append_member(root, field("b")).unwrap();
        let c = dom.append_member(root, field("c")).unwrap();

        dom.insert_member(root, 0, c).unwrap();
        assert_eq!(names(&dom, dom.members(root).unwrap()), vec!["c", "a", "b"]);

        let ty = dom
            .append_member(root, NodeData::Type(TypeDecl::class("T")))
            .unwrap();
        dom.add_or_move_member(ty, a).unwrap();
        assert_eq!(dom.parent(a).unwrap(), Some(ty));
        assert_eq!(names(&dom, dom.members(root).unwrap()), vec!["c", "b", "Type"]);

        dom.detach(b).unwrap();
        assert_eq!(dom.parent(b).unwrap(), None);
        assert_eq!(dom.root_of(b).unwrap(), b);
        assert_eq!(dom.members(root).unwrap().len(), 2);
    }

    #[test]
    fn test_move_into_own_subtree_is_rejected() {
        let mut dom = Dom::new();
        let root = dom.root();
        let outer = dom
            .append_member(root, NodeData::Type(TypeDecl::class("Outer")))
            .unwrap();
        let inner = dom
            .append_member(outer, NodeData::Type(TypeDecl::class("Inner")))
            .unwrap();

        assert!(matches!(
            dom.add_or_move_member(inner, outer),
            Err(DomError::InvalidMove { .. })
        ));
        assert!(matches!(
            dom.add_or_move_member(outer, outer),
            Err(DomError::InvalidMove { .. })
        ));
        // Nothing moved
        assert_eq!(dom.parent(outer).unwrap(), Some(root));
    }

    #[test]
    fn test_leaf_is_not_a_container() {
        let mut dom = Dom::new();
        let root = dom.root();
        let leaf = dom.append_member(root, field("x")).unwrap();
        assert!(matches!(
            dom.append_member(leaf, field("y")),
            Err(DomError::NotAContainer { .. })
        ));
        assert!(!dom.is_container(leaf));
        assert!(matches!(
            dom.data(NodeId::from_raw(999)),
            Err(DomError::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_clone_remaps_enclosed_region() {
        let mut dom = Dom::new();
        let root = dom.root();
        let ty = dom
            .append_member(root, NodeData::Type(TypeDecl::class("C")))
            .unwrap();
        let (start, end) = dom.new_region(ty, "Fields").unwrap();
        dom.append_member(ty, field("x")).unwrap();
        dom.add_or_move_member(ty, end).unwrap();
        let original_group = dom.data(start).unwrap().pairing().and_then(|p| p.group());

        let copy = dom.clone_subtree(ty).unwrap();
        dom.add_or_move_member(root, copy).unwrap();

        let copied = dom.members(copy).unwrap().to_vec();
        let copied_group = dom.data(copied[0]).unwrap().pairing().and_then(|p| p.group());
        assert_ne!(copied_group, original_group);
        assert_eq!(names(&dom, &copied), vec!["BlockStart", "x", "BlockEnd"]);
        assert_eq!(block_end(&dom, copied[0]).unwrap(), copied[2]);
        assert_eq!(block_end(&dom, start).unwrap(), end);
        assert!(dom.same_intent(ty, &dom, copy));
    }

    #[test]
    fn test_partial_clone_is_unresolved() {
        let mut dom = Dom::new();
        let root = dom.root();
        let (start, _) = dom.new_region(root, "R").unwrap();
        let group = dom.data(start).unwrap().pairing().and_then(|p| p.group()).unwrap();

        let copy = dom.clone_subtree(start).unwrap();
        assert_eq!(
            dom.data(copy).unwrap().pairing(),
            Some(Pairing::Unresolved { original: group })
        );
        assert_eq!(dom.unresolved_boundaries(copy).unwrap(), vec![copy]);
        assert!(matches!(
            match_block_end(&dom, copy),
            Err(DomError::PartialClonePairingUnresolved { .. })
        ));

        let fresh = GroupId::new();
        dom.resolve_pairing(copy, fresh).unwrap();
        assert!(dom.unresolved_boundaries(copy).unwrap().is_empty());
        assert_eq!(match_block_end(&dom, copy).unwrap(), BlockMatch::Unmatched);
    }

    #[test]
    fn test_clone_members_keeps_spanning_region_paired() {
        let mut dom = Dom::new();
        let root = dom.root();
        let (start, end) = dom.new_region(root, "R").unwrap();
        let inside = dom.append_member(root, field("x")).unwrap();
        dom.add_or_move_member(root, end).unwrap();

        let copies = dom.clone_members(root).unwrap();
        assert_eq!(copies.len(), 3);
        let host = dom.new_node(NodeData::Block(MemberList::new())).unwrap();
        for &copy in &copies {
            dom.add_or_move_member(host, copy).unwrap();
        }

        assert_eq!(block_end(&dom, copies[0]).unwrap(), copies[2]);
        assert_ne!(
            dom.data(copies[0]).unwrap().pairing(),
            dom.data(start).unwrap().pairing()
        );
        assert_eq!(dom.parent(inside).unwrap(), Some(root));
    }

    #[test]
    fn test_edit_keeps_member_lists_intact() {
        let mut dom = Dom::new();
        let class = dom
            .append_member(dom.root(), NodeData::Type(TypeDecl::class("C")))
            .unwrap();
        let (start, _) = dom.new_region(class, "R").unwrap();

        dom.edit(class, |data| {
            if let NodeData::Type(ty) = data {
                ty.name = "D".to_string();
            }
        })
        .unwrap();
        assert!(matches!(dom.data(class).unwrap(), NodeData::Type(ty) if ty.name == "D"));

        let cleared = dom.edit(class, |data| {
            if let NodeData::Type(ty) = data {
                ty.name = "E".to_string();
                ty.members = MemberList::new();
            }
        });
        assert!(matches!(cleared, Err(DomError::MemberListEdit { node }) if node == class));
        assert!(matches!(dom.data(class).unwrap(), NodeData::Type(ty) if ty.name == "D"));
        assert_eq!(dom.members(class).unwrap().len(), 2);
        assert_eq!(dom.parent(start).unwrap(), Some(class));
        assert!(block_end(&dom, start).is_ok());

        let mut method = Method::new("void", "Run");
        method.body = None;
        let run = dom.append_member(class, NodeData::Method(method)).unwrap();
        let opened = dom.edit(run, |data| {
            if let NodeData::Method(m) = data {
                m.body = Some(MemberList::new());
            }
        });
        assert!(opened.is_err());
        assert!(!dom.is_container(run));
    }

    #[test]
    fn test_new_node_rejects_borrowed_member_list() {
        let mut dom = Dom::new();
        let root = dom.root();
        dom.append_member(root, field("a")).unwrap();

        let NodeData::CompilationUnit(list) = dom.data(root).unwrap().clone() else {
            unreachable!();
        };
        assert!(matches!(
            dom.new_node(NodeData::Block(list)),
            Err(DomError::MemberListEdit { .. })
        ));
        assert!(
            dom.append_member(root, NodeData::Block(MemberList::new()))
                .is_ok()
        );
    }

    #[test]
    fn test_same_intent_sees_member_differences() {
        let mut left = Dom::new();
        let mut right = Dom::new();
        left.append_member(left.root(), field("a")).unwrap();
        right.append_member(right.root(), field("a")).unwrap();
        assert!(left.same_intent(left.root(), &right, right.root()));

        right.append_member(right.root(), field("b")).unwrap();
        assert!(!left.same_intent(left.root(), &right, right.root()));
    }
}
