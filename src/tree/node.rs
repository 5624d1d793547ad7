use crate::errors::IntegrityError;
use crate::geometry::{Affine, Outline, Point};
use crate::kicad::syntax::SyntaxItem;
use crate::nodes::Group;
use crate::tree::element::NodeKind;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Handle to a node of a footprint tree.
///
/// Cloning the handle does not copy the node; use [`Node::copy`] for a detached duplicate.
/// A node owns its children and holds a weak reference to its single parent.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeInner>>);

struct NodeInner {
    parent: Weak<RefCell<NodeInner>>,
    children: Vec<Node>,
    kind: NodeKind,
}

/// Identity-keyed visited set guarding every traversal.
///
/// Synthesized children only live for the duration of one traversal step, so every entered
/// node is held until the traversal ends. Otherwise a freed address could be handed out again
/// and mistaken for a revisit.
struct Visited(HashMap<*const RefCell<NodeInner>, Node>);

impl Visited {
    fn new() -> Self {
        Visited(HashMap::new())
    }

    fn enter(&mut self, node: &Node) -> Result<(), IntegrityError> {
        match self.0.insert(Rc::as_ptr(&node.0), node.clone()) {
            None => Ok(()),
            Some(_) => Err(IntegrityError::Recursion(node.kind_name().to_string())),
        }
    }
}

impl Node {
    pub fn new(kind: impl Into<NodeKind>) -> Node {
        Node(Rc::new(RefCell::new(NodeInner {
            parent: Weak::new(),
            children: Vec::new(),
            kind: kind.into(),
        })))
    }

    pub fn group() -> Node {
        Node::new(Group)
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn kind(&self) -> Ref<'_, NodeKind> {
        Ref::map(self.0.borrow(), |inner| &inner.kind)
    }

    pub fn kind_mut(&self) -> RefMut<'_, NodeKind> {
        RefMut::map(self.0.borrow_mut(), |inner| &mut inner.kind)
    }

    pub fn kind_name(&self) -> &'static str {
        self.0.borrow().kind.as_element().kind_name()
    }

    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }

    /// Literal children, in insertion order.
    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    /// Children used for traversal, outline and rendering: nodes synthesized from this node's
    /// attributes followed by the literal children. Synthesized nodes point back to this node
    /// but are not stored in it, so every call returns a fresh view.
    pub fn virtual_children(&self) -> Vec<Node> {
        let inner = self.0.borrow();
        let mut children = inner
            .kind
            .as_element()
            .synthesize_children()
            .into_iter()
            .map(|kind| {
                let node = Node::new(kind);
                node.0.borrow_mut().parent = Rc::downgrade(&self.0);
                node
            })
            .collect::<Vec<_>>();
        children.extend(inner.children.iter().cloned());
        children
    }

    pub fn append(&self, child: &Node) -> Result<(), IntegrityError> {
        self.check_attachable(child)?;
        self.0.borrow_mut().children.push(child.clone());
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        Ok(())
    }

    /// Appends in order. Earlier appends stay in place when a later one fails.
    pub fn extend<I>(&self, children: I) -> Result<(), IntegrityError>
    where
        I: IntoIterator<Item = Node>,
    {
        for child in children {
            self.append(&child)?;
        }
        Ok(())
    }

    /// Removes every occurrence of `child`. Removing a node that is not a child is a no-op.
    pub fn remove(&self, child: &Node) {
        self.0.borrow_mut().children.retain(|c| !c.ptr_eq(child));
        let owned_by_self = child.0.borrow().parent.upgrade().is_some_and(|p| Rc::ptr_eq(&p, &self.0));
        if owned_by_self {
            child.0.borrow_mut().parent = Weak::new();
        }
    }

    /// Moves all children of this node into `node`, then appends `node` as the only child.
    pub fn insert(&self, node: &Node) -> Result<(), IntegrityError> {
        self.check_attachable(node)?;
        let children = std::mem::take(&mut self.0.borrow_mut().children);
        for child in &children {
            child.0.borrow_mut().parent = Weak::new();
            node.append(child)?;
        }
        self.append(node)
    }

    /// Deep copy of the subtree rooted here, detached from any parent.
    pub fn copy(&self) -> Node {
        let inner = self.0.borrow();
        let copy = Node::new(inner.kind.clone());
        for child in &inner.children {
            let child_copy = child.copy();
            child_copy.0.borrow_mut().parent = Rc::downgrade(&copy.0);
            copy.0.borrow_mut().children.push(child_copy);
        }
        copy
    }

    /// Same kinds and attributes, same shape of literal descendants.
    pub fn structurally_eq(&self, other: &Node) -> bool {
        let a = self.0.borrow();
        let b = other.0.borrow();
        a.kind == b.kind
            && a.children.len() == b.children.len()
            && a.children.iter().zip(b.children.iter()).all(|(x, y)| x.structurally_eq(y))
    }

    pub fn root_node(&self) -> Result<Node, IntegrityError> {
        let mut visited = Visited::new();
        let mut current = self.clone();
        visited.enter(&current)?;
        while let Some(parent) = current.parent() {
            visited.enter(&parent)?;
            current = parent;
        }
        Ok(current)
    }

    /// Mapping from this node's local frame to the root frame. Each ancestor, this node
    /// included, contributes its own step.
    pub fn transform_to_root(&self) -> Result<Affine, IntegrityError> {
        let mut visited = Visited::new();
        let mut transform = Affine::IDENTITY;
        let mut current = Some(self.clone());
        while let Some(node) = current {
            visited.enter(&node)?;
            transform = transform.then(&node.0.borrow().kind.as_element().local_transform());
            current = node.parent();
        }
        Ok(transform)
    }

    /// Resolves a point given in this node's local frame into root coordinates.
    pub fn real_position(&self, point: Point) -> Result<Point, IntegrityError> {
        Ok(self.transform_to_root()?.apply(point))
    }

    /// Bounding box of this node and all virtual descendants in the local frame.
    ///
    /// The fold starts from `outline` when given and from [`Outline::ORIGIN`] otherwise, so an
    /// unseeded outline always covers the local origin. A subtree without any geometry yields
    /// exactly [`Outline::ORIGIN`].
    pub fn calculate_outline(&self, outline: Option<Outline>) -> Result<Outline, IntegrityError> {
        self.outline_with(outline, &mut Visited::new())
    }

    fn outline_with(&self, seed: Option<Outline>, visited: &mut Visited) -> Result<Outline, IntegrityError> {
        visited.enter(self)?;
        let mut outline = seed.unwrap_or(Outline::ORIGIN);
        if let Some(own) = self.0.borrow().kind.as_element().own_outline() {
            outline = outline.union(&own);
        }
        for child in self.virtual_children() {
            let child_outline = child.outline_with(None, visited)?;
            let step = child.0.borrow().kind.as_element().local_transform();
            let mapped = if step.is_identity() { child_outline } else { child_outline.transformed(&step) };
            outline = outline.union(&mapped);
        }
        Ok(outline)
    }

    fn tree_symbol(&self) -> &'static str {
        if self.has_parent() { "*" } else { "+" }
    }

    /// Indented diagnostic dump over the literal children.
    pub fn render_tree(&self) -> Result<String, IntegrityError> {
        self.tree_with(&mut Visited::new(), &|node: &Node| node.children())
    }

    /// Indented diagnostic dump over the virtual children.
    pub fn virtual_render_tree(&self) -> Result<String, IntegrityError> {
        self.tree_with(&mut Visited::new(), &|node: &Node| node.virtual_children())
    }

    fn tree_with(&self, visited: &mut Visited, children_of: &dyn Fn(&Node) -> Vec<Node>) -> Result<String, IntegrityError> {
        visited.enter(self)?;
        let mut tree_str = format!("{} {}", self.tree_symbol(), self.0.borrow().kind.as_element().tree_text());
        for child in children_of(self) {
            for line in child.tree_with(visited, children_of)?.lines() {
                tree_str.push_str("\n  ");
                tree_str.push_str(line);
            }
        }
        Ok(tree_str)
    }

    /// Items contributed by this node and its virtual descendants, depth first, in root
    /// coordinates.
    pub fn render_items(&self) -> Result<Vec<SyntaxItem>, IntegrityError> {
        let outer = match self.parent() {
            Some(parent) => parent.transform_to_root()?,
            None => Affine::IDENTITY,
        };
        let mut items = Vec::new();
        self.items_with(&outer, &mut Visited::new(), &mut items)?;
        Ok(items)
    }

    fn items_with(&self, outer: &Affine, visited: &mut Visited, items: &mut Vec<SyntaxItem>) -> Result<(), IntegrityError> {
        visited.enter(self)?;
        let inner_frame = {
            let inner = self.0.borrow();
            let element = inner.kind.as_element();
            items.extend(element.render(outer));
            element.local_transform().then(outer)
        };
        for child in self.virtual_children() {
            child.items_with(&inner_frame, visited, items)?;
        }
        Ok(())
    }

    /// One single-line fragment per rendered item; empty fragments are dropped.
    pub fn render_list(&self) -> Result<Vec<String>, IntegrityError> {
        Ok(self
            .render_items()?
            .iter()
            .map(|item| item.to_inline_string())
            .filter(|fragment| !fragment.is_empty())
            .collect())
    }

    fn check_attachable(&self, child: &Node) -> Result<(), IntegrityError> {
        if child.has_parent() {
            return Err(IntegrityError::AlreadyParented(child.kind_name().to_string()));
        }
        let mut visited = Visited::new();
        let mut current = Some(self.clone());
        while let Some(node) = current {
            visited.enter(&node)?;
            if node.ptr_eq(child) {
                return Err(IntegrityError::WouldCycle(child.kind_name().to_string()));
            }
            current = node.parent();
        }
        Ok(())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Node")
            .field("kind", &inner.kind.as_element().kind_name())
            .field("children", &inner.children.len())
            .finish()
    }
}
