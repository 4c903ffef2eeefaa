use std::collections::HashMap;
use std::path::{Component, Path};

use snafu::prelude::*;

use crate::fs::error::{NotADirectorySnafu, NotAFileSnafu, NotFoundSnafu};
use crate::fs::{DirEntry, FsError};

/// Index of a node in the tree's arena.
///
/// There is no delete operation, so an id stays valid for the tree's
/// lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

/// A node is exactly one of: a file owning its content, or a directory
/// owning its uniquely-named children. The kind never changes after
/// creation.
#[derive(Debug, Clone)]
enum NodeKind {
    File { content: Vec<u8> },
    Directory { children: HashMap<String, NodeId> },
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    /// Upward link for `..` and path reconstruction. Ownership flows
    /// downward only; this is a plain index, not an owning edge.
    parent: Option<NodeId>,
    kind: NodeKind,
}

/// The path tree backing the in-memory filesystem.
///
/// Nodes live in an arena so that parent back-references are indices rather
/// than a true reference cycle. The root always exists, is a directory, has
/// no parent and the empty name.
#[derive(Debug)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    const ROOT: NodeId = NodeId(0);

    pub(crate) fn new() -> Self {
        Tree {
            nodes: vec![Node {
                name: String::new(),
                parent: None,
                kind: NodeKind::Directory {
                    children: HashMap::new(),
                },
            }],
        }
    }

    /// Resolves `path` from the root without creating anything.
    ///
    /// A `.` segment stays at the current node, `..` moves to its parent
    /// (which does not exist at the root), and any other segment looks up a
    /// same-named child. Any miss makes the whole resolution `None`.
    pub(crate) fn resolve(&self, path: &Path) -> Option<NodeId> {
        let mut current = Self::ROOT;
        for component in path.components() {
            current = match component {
                Component::RootDir | Component::CurDir => current,
                Component::ParentDir => self.nodes[current.0].parent?,
                Component::Prefix(_) => return None,
                Component::Normal(name) => match &self.nodes[current.0].kind {
                    NodeKind::Directory { children } => {
                        *children.get(name.to_string_lossy().as_ref())?
                    }
                    NodeKind::File { .. } => return None,
                },
            };
        }
        Some(current)
    }

    /// Descends `path`, creating an empty directory for every missing
    /// intermediate segment and an empty file for a missing final segment.
    /// An existing file at the final segment is returned with its content
    /// untouched.
    pub(crate) fn get_or_create_file(&mut self, path: &Path) -> Result<NodeId, FsError> {
        let mut components = path.components().peekable();
        let mut current = Self::ROOT;

        while let Some(component) = components.next() {
            let is_last = components.peek().is_none();
            match component {
                Component::RootDir | Component::CurDir => {}
                Component::Prefix(_) => {
                    return NotFoundSnafu {
                        path: display(path),
                    }
                    .fail();
                }
                Component::ParentDir => {
                    current = self.nodes[current.0].parent.context(NotFoundSnafu {
                        path: display(path),
                    })?;
                }
                Component::Normal(name) => {
                    let name = name.to_string_lossy().into_owned();
                    let existing = match &self.nodes[current.0].kind {
                        NodeKind::Directory { children } => children.get(&name).copied(),
                        // Descending through a file can never succeed; the
                        // kind is fixed for the node's lifetime.
                        NodeKind::File { .. } => {
                            return NotADirectorySnafu {
                                path: display(path),
                            }
                            .fail();
                        }
                    };
                    current = match existing {
                        Some(child) => child,
                        None => {
                            let kind = if is_last {
                                NodeKind::File {
                                    content: Vec::new(),
                                }
                            } else {
                                NodeKind::Directory {
                                    children: HashMap::new(),
                                }
                            };
                            self.add_child(current, name, kind)
                        }
                    };
                }
            }
        }

        match self.nodes[current.0].kind {
            NodeKind::File { .. } => Ok(current),
            NodeKind::Directory { .. } => NotAFileSnafu {
                path: display(path),
            }
            .fail(),
        }
    }

    /// Content bytes if `id` is a file, `None` for a directory.
    pub(crate) fn content(&self, id: NodeId) -> Option<&[u8]> {
        match &self.nodes[id.0].kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Directory { .. } => None,
        }
    }

    /// Replaces a file node's content wholesale.
    pub(crate) fn set_content(&mut self, id: NodeId, bytes: Vec<u8>) {
        if let NodeKind::File { content } = &mut self.nodes[id.0].kind {
            *content = bytes;
        }
    }

    /// Detached snapshots of a directory's direct children, sorted ascending
    /// by name. Sorting happens here, at read time; insertion order is
    /// irrelevant. `None` if `id` is a file.
    pub(crate) fn entries(&self, id: NodeId) -> Option<Vec<DirEntry>> {
        match &self.nodes[id.0].kind {
            NodeKind::File { .. } => None,
            NodeKind::Directory { children } => {
                let mut entries: Vec<DirEntry> = children
                    .iter()
                    .map(|(name, child)| DirEntry {
                        name: name.clone(),
                        is_dir: self.content(*child).is_none(),
                    })
                    .collect();
                entries.sort_unstable_by(|a, b| a.name.cmp(&b.name));
                Some(entries)
            }
        }
    }

    /// Every file in the tree with its content, in no particular order.
    pub(crate) fn files(&self) -> impl Iterator<Item = (NodeId, &[u8])> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| match &node.kind {
                NodeKind::File { content } => Some((NodeId(i), content.as_slice())),
                NodeKind::Directory { .. } => None,
            })
    }

    /// Reconstructs the full path of `id` by walking the parent links up to
    /// the root.
    pub(crate) fn full_path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            if node.parent.is_some() {
                segments.push(node.name.as_str());
            }
            current = node.parent;
        }
        segments.reverse();
        segments.join("/")
    }

    fn add_child(&mut self, parent: NodeId, name: String, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.clone(),
            parent: Some(parent),
            kind,
        });
        // Callers only pass directory parents; child names stay unique
        // because the map insert replaces nothing (the name was a miss).
        if let NodeKind::Directory { children } = &mut self.nodes[parent.0].kind {
            children.insert(name, id);
        }
        id
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_resolves_only_the_root() {
        let tree = Tree::new();
        let root = tree.resolve(Path::new("")).unwrap();
        assert!(tree.content(root).is_none());
        assert_eq!(tree.entries(root).unwrap(), vec![]);
        assert!(tree.resolve(Path::new("missing")).is_none());
    }

    #[test]
    fn get_or_create_builds_intermediate_directories() {
        let mut tree = Tree::new();
        let file = tree.get_or_create_file(Path::new("a/b/c")).unwrap();
        assert_eq!(tree.content(file), Some(&[][..]));

        let a = tree.resolve(Path::new("a")).unwrap();
        let b = tree.resolve(Path::new("a/b")).unwrap();
        assert!(tree.content(a).is_none());
        assert!(tree.content(b).is_none());
    }

    #[test]
    fn get_or_create_returns_an_existing_file_untouched() {
        let mut tree = Tree::new();
        let file = tree.get_or_create_file(Path::new("dir/file")).unwrap();
        tree.set_content(file, vec![1, 2, 3]);

        let again = tree.get_or_create_file(Path::new("dir/file")).unwrap();
        assert_eq!(again, file);
        assert_eq!(tree.content(again), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn resolution_never_creates_nodes() {
        let tree = Tree::new();
        assert!(tree.resolve(Path::new("a/b/c")).is_none());
        assert!(tree.resolve(Path::new("a")).is_none());
    }

    #[test]
    fn dot_segments_stay_at_the_current_node() {
        let mut tree = Tree::new();
        let file = tree.get_or_create_file(Path::new("dir/file")).unwrap();
        assert_eq!(tree.resolve(Path::new("dir/./file")), Some(file));
        assert_eq!(tree.resolve(Path::new("./dir/file")), Some(file));
    }

    #[test]
    fn dotdot_segments_move_to_the_parent() {
        let mut tree = Tree::new();
        let file = tree.get_or_create_file(Path::new("dir1/file")).unwrap();
        tree.get_or_create_file(Path::new("dir2/other")).unwrap();

        assert_eq!(tree.resolve(Path::new("dir2/../dir1/file")), Some(file));
        assert!(tree.resolve(Path::new("..")).is_none());
        assert!(tree.resolve(Path::new("dir1/../../x")).is_none());
    }

    #[test]
    fn descending_through_a_file_resolves_to_nothing() {
        let mut tree = Tree::new();
        tree.get_or_create_file(Path::new("file")).unwrap();
        assert!(tree.resolve(Path::new("file/below")).is_none());
    }

    #[test]
    fn creating_below_a_file_fails_not_a_directory() {
        let mut tree = Tree::new();
        tree.get_or_create_file(Path::new("file")).unwrap();
        let result = tree.get_or_create_file(Path::new("file/below"));
        assert!(matches!(result, Err(FsError::NotADirectory { .. })));
    }

    #[test]
    fn creating_over_a_directory_fails_not_a_file() {
        let mut tree = Tree::new();
        tree.get_or_create_file(Path::new("dir/file")).unwrap();
        let result = tree.get_or_create_file(Path::new("dir"));
        assert!(matches!(result, Err(FsError::NotAFile { .. })));
    }

    #[test]
    fn entries_are_sorted_by_name_regardless_of_insertion_order() {
        let mut tree = Tree::new();
        tree.get_or_create_file(Path::new("dir/zeta")).unwrap();
        tree.get_or_create_file(Path::new("dir/alpha")).unwrap();
        tree.get_or_create_file(Path::new("dir/sub/nested")).unwrap();

        let dir = tree.resolve(Path::new("dir")).unwrap();
        assert_eq!(
            tree.entries(dir).unwrap(),
            vec![
                DirEntry::file("alpha"),
                DirEntry::dir("sub"),
                DirEntry::file("zeta"),
            ]
        );
    }

    #[test]
    fn full_path_walks_parent_links_back_to_the_root() {
        let mut tree = Tree::new();
        let file = tree.get_or_create_file(Path::new("a/b/c")).unwrap();
        assert_eq!(tree.full_path(file), "a/b/c");

        let root = tree.resolve(Path::new("")).unwrap();
        assert_eq!(tree.full_path(root), "");
    }
}
