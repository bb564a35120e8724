//! On-disk fixtures for the mock sandbox to search and list.

use std::fs;
use std::io;
use std::path::Path;
use tempfile::TempDir;

/// A small project tree:
///
/// ```text
/// app/page.tsx            "export default function Page"
/// app/layout.tsx          "use client"
/// components/Button.tsx   "export function Button"
/// server/router.ts        "createRouter()"
/// README.md               "router and app docs"
/// node_modules/app-lib/index.js
/// ```
pub fn project_tree() -> io::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    let files = [
        ("app/page.tsx", "export default function Page() {}\n"),
        ("app/layout.tsx", "'use client'\nexport default function Layout() {}\n"),
        ("components/Button.tsx", "export function Button() {}\n"),
        ("server/router.ts", "export const router = createRouter()\n"),
        ("README.md", "router and app docs\n"),
        ("node_modules/app-lib/index.js", "module.exports = {}\n"),
    ];
    for (rel, content) in files {
        write_file(dir.path(), rel, content)?;
    }
    Ok(dir)
}

pub fn write_file(root: &Path, rel: &str, content: &str) -> io::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

pub fn path_str(dir: &TempDir) -> String {
    dir.path().display().to_string()
}
