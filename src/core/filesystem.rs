use crate::core::error::FsError;
use crate::core::fuzzy::prefix_match;
use crate::core::path::{display_path, split_last};
use crate::models::{DirEntry, Directory, File, Node};

/// Timestamp given to every node of the initial tree.
const INITIAL_TIMESTAMP: u64 = 1_735_689_600;

/// Outcome of creating a file that may already exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Touched {
    Created,
    Updated,
}

/// In-memory filesystem tree.
///
/// All operations take normalized segment lists (see [`crate::core::path`]).
/// The root is a directory with no name; each directory owns its children.
///
/// Mutations are all-or-nothing: every check runs before the tree changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VirtualFs {
    root: Node,
}

impl VirtualFs {
    /// Create a filesystem from a root directory.
    pub fn new(root: Directory) -> Self {
        Self {
            root: Node::Directory(root),
        }
    }

    /// The fixed tree every session starts with and `reset` restores.
    pub fn initial() -> Self {
        let ts = INITIAL_TIMESTAMP;
        let documents = Directory::new()
            .with(
                "notes.txt",
                File::new("Shopping list:\n- coffee\n- bread\n- more coffee", ts),
            )
            .with(
                "todo.txt",
                File::new("1. Finish the tutorial\n2. Check the weather", ts),
            );
        let projects = Directory::new()
            .with("README.md", File::external("projects/README.md", ts))
            .with(
                "webterm",
                Directory::new().with(
                    "roadmap.txt",
                    File::new("- tab completion\n- guided tour\n- themes", ts),
                ),
            );
        let user = Directory::new()
            .with(".profile", File::new("export THEME=dark", ts))
            .with("about.md", File::external("about.md", ts))
            .with("documents", documents)
            .with("projects", projects);
        let etc = Directory::new().with(
            "motd",
            File::new(
                "Welcome to webterm.\nType 'help' to get started, or 'demo' for a guided tour.",
                ts,
            ),
        );

        Self::new(
            Directory::new()
                .with("etc", etc)
                .with("home", Directory::new().with("user", user))
                .with("tmp", Directory::new()),
        )
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Get the node at `segments`. The empty list is the root.
    ///
    /// A missing segment yields `NotFound` with a sibling suggestion; a file in
    /// the middle of the path yields `NotADirectory`.
    pub fn lookup(&self, segments: &[String]) -> Result<&Node, FsError> {
        let mut current = &self.root;

        for (i, segment) in segments.iter().enumerate() {
            let dir = match current {
                Node::Directory(dir) => dir,
                Node::File(_) => {
                    return Err(FsError::NotADirectory {
                        path: display_path(&segments[..i]),
                    });
                }
            };
            current = match dir.children.get(segment) {
                Some(node) => node,
                None => {
                    let suggestion =
                        prefix_match(segment, dir.children.keys().map(String::as_str))
                            .map(str::to_string);
                    return Err(FsError::NotFound {
                        path: display_path(&segments[..=i]),
                        suggestion,
                    });
                }
            };
        }

        Ok(current)
    }

    /// Get the directory at `segments`.
    pub fn lookup_dir(&self, segments: &[String]) -> Result<&Directory, FsError> {
        match self.lookup(segments)? {
            Node::Directory(dir) => Ok(dir),
            Node::File(_) => Err(FsError::NotADirectory {
                path: display_path(segments),
            }),
        }
    }

    /// Get the file at `segments`.
    pub fn lookup_file(&self, segments: &[String]) -> Result<&File, FsError> {
        match self.lookup(segments)? {
            Node::File(file) => Ok(file),
            Node::Directory(_) => Err(FsError::IsADirectory {
                path: display_path(segments),
            }),
        }
    }

    pub fn is_directory(&self, segments: &[String]) -> bool {
        self.lookup_dir(segments).is_ok()
    }

    /// List a directory in name order.
    pub fn list(&self, segments: &[String]) -> Result<Vec<DirEntry>, FsError> {
        let dir = self.lookup_dir(segments)?;
        Ok(dir
            .children
            .iter()
            .map(|(name, node)| DirEntry::from_node(name, node))
            .collect())
    }

    /// List a directory, treating any failure as empty.
    pub fn entries(&self, segments: &[String]) -> Vec<DirEntry> {
        self.list(segments).unwrap_or_default()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Create an empty file, or update the timestamp of an existing one.
    pub fn create_file(&mut self, segments: &[String], now: u64) -> Result<Touched, FsError> {
        let (parent, name) = split_last(segments).ok_or_else(|| FsError::IsADirectory {
            path: display_path(segments),
        })?;
        let dir = self.dir_mut(parent)?;

        match dir.children.get_mut(name) {
            Some(Node::File(file)) => {
                file.modified = now;
                Ok(Touched::Updated)
            }
            Some(Node::Directory(_)) => Err(FsError::IsADirectory {
                path: display_path(segments),
            }),
            None => {
                dir.children
                    .insert(name.to_string(), Node::File(File::new("", now)));
                Ok(Touched::Created)
            }
        }
    }

    /// Create a directory. Fails if anything already exists at the path.
    pub fn create_dir(&mut self, segments: &[String]) -> Result<(), FsError> {
        let (parent, name) = split_last(segments).ok_or_else(|| FsError::FileExists {
            path: display_path(segments),
        })?;
        let dir = self.dir_mut(parent)?;

        if dir.children.contains_key(name) {
            return Err(FsError::FileExists {
                path: display_path(segments),
            });
        }
        dir.children
            .insert(name.to_string(), Node::Directory(Directory::new()));
        Ok(())
    }

    /// Create a directory and any missing parents. Existing directories are fine.
    pub fn create_dir_all(&mut self, segments: &[String]) -> Result<(), FsError> {
        for depth in 1..=segments.len() {
            match self.lookup(&segments[..depth]) {
                Ok(Node::Directory(_)) => {}
                Ok(Node::File(_)) => {
                    return Err(FsError::FileExists {
                        path: display_path(&segments[..depth]),
                    });
                }
                Err(_) => self.create_dir(&segments[..depth])?,
            }
        }
        Ok(())
    }

    /// Write text to a file, creating it when missing.
    ///
    /// Content is stored raw. Appending separates from existing content with a
    /// newline. A write replaces any external body with inline content.
    pub fn write_file(
        &mut self,
        segments: &[String],
        text: &str,
        append: bool,
        now: u64,
    ) -> Result<(), FsError> {
        let (parent, name) = split_last(segments).ok_or_else(|| FsError::IsADirectory {
            path: display_path(segments),
        })?;
        let dir = self.dir_mut(parent)?;

        match dir.children.get_mut(name) {
            Some(Node::File(file)) => {
                if append && !file.content.is_empty() {
                    file.content.push('\n');
                    file.content.push_str(text);
                } else {
                    file.content = text.to_string();
                }
                file.source = None;
                file.modified = now;
                Ok(())
            }
            Some(Node::Directory(_)) => Err(FsError::IsADirectory {
                path: display_path(segments),
            }),
            None => {
                dir.children
                    .insert(name.to_string(), Node::File(File::new(text, now)));
                Ok(())
            }
        }
    }

    /// Remove the node at `segments` and return it.
    ///
    /// Non-empty directories require `recursive`; the root cannot be removed.
    pub fn remove(&mut self, segments: &[String], recursive: bool) -> Result<Node, FsError> {
        let (parent, name) = split_last(segments).ok_or_else(|| FsError::InvalidTarget {
            path: display_path(segments),
        })?;

        if let Node::Directory(dir) = self.lookup(segments)?
            && !dir.is_empty()
            && !recursive
        {
            return Err(FsError::DirectoryNotEmpty {
                path: display_path(segments),
            });
        }

        self.dir_mut(parent)?
            .children
            .remove(name)
            .ok_or_else(|| FsError::NotFound {
                path: display_path(segments),
                suggestion: None,
            })
    }

    /// Mutable access to the directory at `segments`, with lookup errors.
    fn dir_mut(&mut self, segments: &[String]) -> Result<&mut Directory, FsError> {
        self.lookup_dir(segments)?;
        match self.walk_mut(segments) {
            Some(Node::Directory(dir)) => Ok(dir),
            _ => Err(FsError::NotADirectory {
                path: display_path(segments),
            }),
        }
    }

    fn walk_mut(&mut self, segments: &[String]) -> Option<&mut Node> {
        let mut current = &mut self.root;
        for segment in segments {
            current = match current {
                Node::Directory(dir) => dir.children.get_mut(segment)?,
                Node::File(_) => return None,
            };
        }
        Some(current)
    }
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::path::resolve_path;

    fn segs(path: &str) -> Vec<String> {
        resolve_path(path, &[])
    }

    #[test]
    fn test_initial_tree() {
        let fs = VirtualFs::initial();
        assert!(fs.is_directory(&[]));
        assert!(fs.is_directory(&segs("/home/user/documents")));
        assert!(fs.lookup_file(&segs("/etc/motd")).is_ok());
        assert_eq!(
            fs.lookup_file(&segs("/home/user/about.md"))
                .unwrap()
                .source
                .as_deref(),
            Some("about.md")
        );
    }

    #[test]
    fn test_lookup_missing_with_suggestion() {
        let fs = VirtualFs::initial();
        let err = fs.lookup(&segs("/home/user/Documents")).unwrap_err();
        assert_eq!(
            err,
            FsError::NotFound {
                path: "/home/user/Documents".to_string(),
                suggestion: Some("documents".to_string()),
            }
        );

        let err = fs.lookup(&segs("/home/user/documentsx")).unwrap_err();
        assert!(matches!(err, FsError::NotFound { suggestion: Some(ref s), .. } if s == "documents"));

        let err = fs.lookup(&segs("/home/user/doc")).unwrap_err();
        assert!(matches!(err, FsError::NotFound { suggestion: None, .. }));

        let err = fs.lookup(&segs("/home/user/zzz")).unwrap_err();
        assert!(matches!(err, FsError::NotFound { suggestion: None, .. }));
    }

    #[test]
    fn test_lookup_through_file() {
        let fs = VirtualFs::initial();
        let err = fs.lookup(&segs("/etc/motd/more")).unwrap_err();
        assert_eq!(
            err,
            FsError::NotADirectory {
                path: "/etc/motd".to_string()
            }
        );
    }

    #[test]
    fn test_list_is_name_ordered() {
        let fs = VirtualFs::initial();
        let names: Vec<_> = fs
            .list(&segs("/home/user"))
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec![".profile", "about.md", "documents", "projects"]);
        assert!(matches!(
            fs.list(&segs("/etc/motd")),
            Err(FsError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_touch_is_idempotent() {
        let mut fs = VirtualFs::initial();
        let path = segs("/tmp/a.txt");
        assert_eq!(fs.create_file(&path, 10), Ok(Touched::Created));
        assert_eq!(fs.create_file(&path, 20), Ok(Touched::Updated));
        let file = fs.lookup_file(&path).unwrap();
        assert_eq!(file.content, "");
        assert_eq!(file.modified, 20);
    }

    #[test]
    fn test_touch_directory_is_error() {
        let mut fs = VirtualFs::initial();
        let before = fs.clone();
        assert!(matches!(
            fs.create_file(&segs("/tmp"), 0),
            Err(FsError::IsADirectory { .. })
        ));
        assert!(matches!(
            fs.create_file(&segs("/missing/a.txt"), 0),
            Err(FsError::NotFound { .. })
        ));
        assert_eq!(fs, before);
    }

    #[test]
    fn test_mkdir_conflicts() {
        let mut fs = VirtualFs::initial();
        assert!(fs.create_dir(&segs("/tmp/new")).is_ok());
        assert!(fs.is_directory(&segs("/tmp/new")));
        assert!(matches!(
            fs.create_dir(&segs("/tmp/new")),
            Err(FsError::FileExists { .. })
        ));
        assert!(matches!(
            fs.create_dir(&segs("/etc/motd")),
            Err(FsError::FileExists { .. })
        ));
        assert!(matches!(
            fs.create_dir(&segs("/etc/motd/x")),
            Err(FsError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_mkdir_all() {
        let mut fs = VirtualFs::initial();
        fs.create_dir_all(&segs("/tmp/a/b/c")).unwrap();
        assert!(fs.is_directory(&segs("/tmp/a/b/c")));
        fs.create_dir_all(&segs("/tmp/a/b")).unwrap();
        assert!(fs.create_dir_all(&segs("/etc/motd/x")).is_err());
    }

    #[test]
    fn test_write_and_append() {
        let mut fs = VirtualFs::initial();
        let path = segs("/tmp/log.txt");
        fs.write_file(&path, "one", true, 1).unwrap();
        fs.write_file(&path, "two", true, 2).unwrap();
        assert_eq!(fs.lookup_file(&path).unwrap().content, "one\ntwo");
        fs.write_file(&path, "three", false, 3).unwrap();
        assert_eq!(fs.lookup_file(&path).unwrap().content, "three");
        assert!(matches!(
            fs.write_file(&segs("/tmp"), "x", false, 4),
            Err(FsError::IsADirectory { .. })
        ));
    }

    #[test]
    fn test_write_detaches_external_body() {
        let mut fs = VirtualFs::initial();
        let path = segs("/home/user/about.md");
        fs.write_file(&path, "local", false, 1).unwrap();
        let file = fs.lookup_file(&path).unwrap();
        assert_eq!(file.source, None);
        assert_eq!(file.content, "local");
    }

    #[test]
    fn test_remove_requires_recursive_for_non_empty() {
        let mut fs = VirtualFs::initial();
        let before = fs.clone();
        let docs = segs("/home/user/documents");
        assert!(matches!(
            fs.remove(&docs, false),
            Err(FsError::DirectoryNotEmpty { .. })
        ));
        assert_eq!(fs, before);

        let removed = fs.remove(&docs, true).unwrap();
        assert!(removed.is_directory());
        assert!(fs.lookup(&docs).is_err());
    }

    #[test]
    fn test_remove_empty_dir_and_file() {
        let mut fs = VirtualFs::initial();
        assert!(fs.remove(&segs("/tmp"), false).is_ok());
        assert!(fs.remove(&segs("/etc/motd"), false).is_ok());
        assert!(matches!(
            fs.remove(&segs("/etc/motd"), false),
            Err(FsError::NotFound { .. })
        ));
    }

    #[test]
    fn test_remove_root_is_rejected() {
        let mut fs = VirtualFs::initial();
        assert!(matches!(
            fs.remove(&[], true),
            Err(FsError::InvalidTarget { .. })
        ));
    }
}
