use crate::error::{Result, ShellError};
use std::collections::BTreeMap;
use std::rc::Rc;

pub type Children = BTreeMap<String, Rc<FsNode>>;

/// A node of the persistent filesystem tree. Children are shared behind `Rc`,
/// so an edit only copies the directories on the path to the edited node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsNode {
    File { content: String },
    Directory { children: Children },
}

impl FsNode {
    pub fn dir() -> Self {
        FsNode::Directory {
            children: BTreeMap::new(),
        }
    }
    pub fn file(content: &str) -> Self {
        FsNode::File {
            content: content.into(),
        }
    }
    /// Whether this node is a directory
    pub fn is_dir(&self) -> bool {
        matches!(self, FsNode::Directory { .. })
    }
    pub fn children(&self) -> Option<&Children> {
        match self {
            FsNode::Directory { children } => Some(children),
            FsNode::File { .. } => None,
        }
    }
    pub fn content(&self) -> Option<&str> {
        match self {
            FsNode::File { content } => Some(content),
            FsNode::Directory { .. } => None,
        }
    }

    /// Builder used by the seed layout.
    pub fn with(mut self, name: &str, child: FsNode) -> Self {
        if let FsNode::Directory { children } = &mut self {
            children.insert(name.into(), Rc::new(child));
        }
        self
    }
}

/// Walks `segments` from `root`. Fails on a missing name or when an
/// intermediate node is a file.
pub fn lookup<'a>(root: &'a FsNode, segments: &[String]) -> Option<&'a FsNode> {
    let mut node = root;
    for seg in segments {
        node = node.children()?.get(seg)?;
    }
    Some(node)
}

pub fn display_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

/// The session's filesystem. Every successful mutation swaps in a new root;
/// a failed one leaves the current root untouched.
#[derive(Debug, Clone)]
pub struct Vfs {
    root: Rc<FsNode>,
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new(FsNode::dir())
    }
}

impl Vfs {
    pub fn new(root: FsNode) -> Self {
        Vfs {
            root: Rc::new(root),
        }
    }

    /// The current tree. Holding on to it keeps that version alive and
    /// unchanged regardless of later edits.
    pub fn snapshot(&self) -> Rc<FsNode> {
        Rc::clone(&self.root)
    }

    /// Node at `segments`, or `NotFound`
    pub fn get(&self, segments: &[String]) -> Result<&FsNode> {
        lookup(&self.root, segments).ok_or_else(|| ShellError::NotFound {
            path: display_path(segments),
        })
    }

    /// Whether anything lives at `segments`
    pub fn exists(&self, segments: &[String]) -> bool {
        lookup(&self.root, segments).is_some()
    }

    /// File content; a directory is `IsADirectory`
    pub fn read(&self, segments: &[String]) -> Result<&str> {
        match self.get(segments)? {
            FsNode::File { content } => Ok(content),
            FsNode::Directory { .. } => Err(ShellError::IsADirectory {
                path: display_path(segments),
            }),
        }
    }

    /// Entry names of a directory, directories suffixed with `/`.
    pub fn list(&self, segments: &[String]) -> Result<Vec<String>> {
        match self.get(segments)? {
            FsNode::Directory { children } => Ok(children
                .iter()
                .map(|(name, node)| {
                    if node.is_dir() {
                        format!("{}/", name)
                    } else {
                        name.clone()
                    }
                })
                .collect()),
            FsNode::File { .. } => Err(ShellError::NotADirectory {
                path: display_path(segments),
            }),
        }
    }

    /// Creates or overwrites a file. The parent chain must already exist.
    pub fn write(&mut self, segments: &[String], content: &str) -> Result<()> {
        let (parent, name) = split_leaf(segments)?;
        self.edit_dir(parent, |children| {
            if children.get(name).is_some_and(|n| n.is_dir()) {
                return Err(ShellError::IsADirectory {
                    path: display_path(segments),
                });
            }
            children.insert(name.to_string(), Rc::new(FsNode::file(content)));
            Ok(())
        })
    }

    /// Creates an empty directory; an existing entry is `AlreadyExists`
    pub fn mkdir(&mut self, segments: &[String]) -> Result<()> {
        let (parent, name) = split_leaf(segments)?;
        self.edit_dir(parent, |children| {
            if children.contains_key(name) {
                return Err(ShellError::AlreadyExists {
                    path: display_path(segments),
                });
            }
            children.insert(name.to_string(), Rc::new(FsNode::dir()));
            Ok(())
        })
    }

    /// Removes a file or a whole directory subtree.
    pub fn delete(&mut self, segments: &[String]) -> Result<()> {
        let (parent, name) = split_leaf(segments)?;
        self.edit_dir(parent, |children| match children.remove(name) {
            Some(_) => Ok(()),
            None => Err(ShellError::NotFound {
                path: display_path(segments),
            }),
        })
    }

    fn edit_dir<F>(&mut self, parent: &[String], edit: F) -> Result<()>
    where
        F: FnOnce(&mut Children) -> Result<()>,
    {
        let new_root = rebuild(&self.root, parent, parent, edit)?;
        self.root = Rc::new(new_root);
        Ok(())
    }
}

fn split_leaf(segments: &[String]) -> Result<(&[String], &str)> {
    match segments.split_last() {
        Some((name, parent)) if !name.is_empty() => Ok((parent, name.as_str())),
        _ => Err(ShellError::InvalidPath),
    }
}

// Copies the directories along `rest`, sharing every untouched sibling.
fn rebuild<F>(node: &FsNode, full: &[String], rest: &[String], edit: F) -> Result<FsNode>
where
    F: FnOnce(&mut Children) -> Result<()>,
{
    let children = match node {
        FsNode::Directory { children } => children,
        FsNode::File { .. } => {
            let depth = full.len() - rest.len();
            return Err(ShellError::NotADirectory {
                path: display_path(&full[..depth]),
            });
        }
    };
    let mut children = children.clone();
    match rest.split_first() {
        None => edit(&mut children)?,
        Some((seg, tail)) => {
            let child = children.get(seg).ok_or_else(|| ShellError::NotFound {
                path: display_path(&full[..full.len() - tail.len()]),
            })?;
            let new_child = rebuild(child, full, tail, edit)?;
            children.insert(seg.clone(), Rc::new(new_child));
        }
    }
    Ok(FsNode::Directory { children })
}
