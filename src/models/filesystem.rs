use std::collections::BTreeMap;

// =============================================================================
// Nodes
// =============================================================================

/// A regular file in the virtual filesystem.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct File {
    /// Inline body. Stored raw; newlines are converted only for display.
    pub content: String,
    /// Path of an externally stored body, fetched through the host.
    pub source: Option<String>,
    /// Last modification time as Unix timestamp (seconds).
    pub modified: u64,
}

impl File {
    /// Create a file with inline content.
    pub fn new(content: impl Into<String>, modified: u64) -> Self {
        Self {
            content: content.into(),
            source: None,
            modified,
        }
    }

    /// Create a file whose body lives at an external source path.
    pub fn external(source: impl Into<String>, modified: u64) -> Self {
        Self {
            content: String::new(),
            source: Some(source.into()),
            modified,
        }
    }

    /// Size of the inline body in bytes (`None` for external bodies).
    pub fn size(&self) -> Option<u64> {
        match self.source {
            Some(_) => None,
            None => Some(self.content.len() as u64),
        }
    }
}

/// A directory. Children are keyed by name, iterated in name order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directory {
    pub children: BTreeMap<String, Node>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used when assembling fixed trees.
    pub fn with(mut self, name: &str, node: impl Into<Node>) -> Self {
        self.children.insert(name.to_string(), node.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// An entry in the virtual filesystem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    File(File),
    Directory(Directory),
}

impl Node {
    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }
}

impl From<File> for Node {
    fn from(file: File) -> Self {
        Node::File(file)
    }
}

impl From<Directory> for Node {
    fn from(dir: Directory) -> Self {
        Node::Directory(dir)
    }
}

// =============================================================================
// Listing
// =============================================================================

/// Directory entry returned by `VirtualFs::list`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    /// Inline size in bytes (`None` for directories and external files).
    pub size: Option<u64>,
    /// Modification time (`None` for directories).
    pub modified: Option<u64>,
}

impl DirEntry {
    pub(crate) fn from_node(name: &str, node: &Node) -> Self {
        match node {
            Node::Directory(_) => Self {
                name: name.to_string(),
                is_dir: true,
                size: None,
                modified: None,
            },
            Node::File(file) => Self {
                name: name.to_string(),
                is_dir: false,
                size: file.size(),
                modified: Some(file.modified),
            },
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}
