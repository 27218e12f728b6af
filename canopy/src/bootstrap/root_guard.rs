// This file is part of the product Canopy.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{BootstrapError, log_action};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
}

impl EntryKind {
    fn label(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Dir => "directory",
        }
    }
}

/// Entries the runtime owns at the root, with the kind each one must have.
const RUNTIME_ENTRIES: [(&str, EntryKind); 2] =
    [("config.yaml", EntryKind::File), ("state", EntryKind::Dir)];

/// Creates the root when missing and refuses roots holding anything but runtime files.
/// Dot entries (editor swap files, `.DS_Store`) are ignored.
pub fn ensure_root_is_clean(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root_path = normalize_root(root)?;
    let problems = inspect_root(&root_path)?;
    if problems.is_empty() {
        return Ok(root_path);
    }
    Err(BootstrapError::DirtyRoot {
        root: root_path,
        problems,
    })
}

fn normalize_root(root: &Path) -> Result<PathBuf, BootstrapError> {
    let root_path = if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.to_path_buf()
    };

    if !root_path.exists() {
        fs::create_dir_all(&root_path)?;
        log_action(format!(
            "created runtime root directory {}",
            root_path.display()
        ));
    } else if !root_path.is_dir() {
        return Err(BootstrapError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Runtime root is not a directory: {}", root_path.display()),
        )));
    }
    Ok(root_path)
}

/// One line per offending entry, sorted by name.
fn inspect_root(root: &Path) -> Result<Vec<String>, BootstrapError> {
    let mut problems = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let actual = if entry.file_type()?.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        match RUNTIME_ENTRIES.iter().find(|(expected, _)| *expected == name) {
            Some((_, kind)) if *kind == actual => {}
            Some((_, kind)) => problems.push(format!(
                "{} (expected a {}, found a {})",
                name,
                kind.label(),
                actual.label()
            )),
            None => problems.push(name),
        }
    }
    problems.sort();
    Ok(problems)
}

pub(super) fn runtime_entry_names() -> String {
    RUNTIME_ENTRIES
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;

    #[test]
    fn missing_root_is_created() {
        let fixture = TestFixtureRoot::new_unique("guard-missing").unwrap();
        let root = fixture.path().join("nested").join("runtime");
        let clean = ensure_root_is_clean(&root).unwrap();
        assert!(clean.is_dir());
    }

    #[test]
    fn runtime_entries_and_dot_files_are_accepted() {
        let fixture = TestFixtureRoot::new_unique("guard-clean").unwrap();
        fs::write(fixture.path().join("config.yaml"), "server: {}\n").unwrap();
        fs::create_dir(fixture.path().join("state")).unwrap();
        fs::write(fixture.path().join(".DS_Store"), "").unwrap();
        assert!(ensure_root_is_clean(fixture.path()).is_ok());
    }

    #[test]
    fn foreign_and_misshapen_entries_are_reported_together() {
        let fixture = TestFixtureRoot::new_unique("guard-dirty").unwrap();
        fs::write(fixture.path().join("state"), "not a directory").unwrap();
        fs::write(fixture.path().join("notes.txt"), "hello").unwrap();
        match ensure_root_is_clean(fixture.path()) {
            Err(BootstrapError::DirtyRoot { problems, .. }) => assert_eq!(
                problems,
                vec![
                    "notes.txt".to_string(),
                    "state (expected a directory, found a file)".to_string()
                ]
            ),
            other => panic!("expected dirty root error, got {:?}", other),
        }
    }

    #[test]
    fn root_that_is_a_file_is_rejected() {
        let fixture = TestFixtureRoot::new_unique("guard-file").unwrap();
        let root = fixture.path().join("runtime");
        fs::write(&root, "").unwrap();
        assert!(matches!(
            ensure_root_is_clean(&root),
            Err(BootstrapError::Io(_))
        ));
    }
}
