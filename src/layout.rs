//! Nested tree description a filesystem is built from.
//!
//! The JSON shape is the one the browser page ships:
//!
//! ```json
//! [{ "name": "readme.txt", "type": "file", "permissions": {"r": true, "w": true, "x": false}, "content": "hi" },
//!  { "name": "Projects", "type": "directory", "content": [] }]
//! ```

use serde::{Deserialize, Serialize};

use crate::vfs::Permissions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntrySpec {
    File {
        name: String,
        #[serde(default)]
        permissions: Permissions,
        #[serde(default)]
        content: String,
    },
    Directory {
        name: String,
        #[serde(default)]
        permissions: Permissions,
        #[serde(default)]
        content: Vec<EntrySpec>,
    },
}

impl EntrySpec {
    pub fn file(name: &str, content: &str) -> Self {
        EntrySpec::File {
            name: name.to_string(),
            permissions: Permissions::default(),
            content: content.to_string(),
        }
    }

    pub fn dir(name: &str, content: Vec<EntrySpec>) -> Self {
        EntrySpec::Directory { name: name.to_string(), permissions: Permissions::default(), content }
    }

    pub fn name(&self) -> &str {
        match self {
            EntrySpec::File { name, .. } | EntrySpec::Directory { name, .. } => name,
        }
    }
}

const README: &str = "Welcome to ktshell, a small terminal running on an in-memory file system.\n\
Type `cat instructions.txt` to see what it can do.";

const INSTRUCTIONS: &str = "The following commands are available:\n\
cat <file>...\n\
ls [<directory>]\n\
cd <directory>\n\
clear\n\
wget <url>\n\
echo [<text>]\n\
kttext <file>";

const PROJECTS_README: &str = "Projects live here. Use `kttext <file>` to add notes of your own.";

/// The demo tree the terminal boots with when no description is given.
pub fn default_tree() -> Vec<EntrySpec> {
    vec![
        EntrySpec::file("readme.txt", README),
        EntrySpec::file("instructions.txt", INSTRUCTIONS),
        EntrySpec::dir("Projects", vec![EntrySpec::file("readme.txt", PROJECTS_README)]),
    ]
}
