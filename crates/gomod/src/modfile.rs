//! Lossless `go.mod` reader and `replace`-directive editor.
//!
//! Only the directives crosslink cares about are interpreted (`module`, `go`,
//! `require`, `replace`); everything else is carried through untouched. Edits
//! are tracked against the original lines so that [`GoMod::render`] changes
//! nothing but the directives that were edited.

use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A `require` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Require {
    /// Required module path.
    pub path: String,
    /// Required version.
    pub version: String,
    /// Whether the entry carries an `// indirect` comment.
    pub indirect: bool,
}

/// A `replace` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace {
    /// Module path being replaced.
    pub old_path: String,
    /// Version being replaced, if the directive is version-specific.
    pub old_version: Option<String>,
    /// Replacement module path or directory.
    pub new_path: String,
    /// Replacement version, absent for directory replacements.
    pub new_version: Option<String>,
    line: Option<usize>,
    in_block: bool,
}

impl Replace {
    fn unversioned(old_path: &str, new_path: &str) -> Self {
        Self {
            old_path: old_path.to_string(),
            old_version: None,
            new_path: new_path.to_string(),
            new_version: None,
            line: None,
            in_block: false,
        }
    }

    fn directive(&self) -> String {
        let old = match &self.old_version {
            Some(version) => format!("{} {version}", self.old_path),
            None => self.old_path.clone(),
        };
        let new = match &self.new_version {
            Some(version) => format!("{} {version}", self.new_path),
            None => self.new_path.clone(),
        };
        format!("{old} => {new}")
    }
}

/// What [`GoMod::set_replace`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// A new directive was added.
    Added,
    /// The same directive already existed.
    Unchanged,
    /// An existing directive pointed elsewhere and was rewritten.
    Overwritten {
        /// The replacement it used to point to.
        previous: String,
    },
    /// An existing directive points elsewhere and was left alone.
    Kept {
        /// The replacement it points to.
        existing: String,
    },
}

#[derive(Clone, Copy)]
enum Block {
    Require,
    Replace(usize),
    Other,
}

/// A parsed `go.mod` file.
#[derive(Debug, Clone)]
pub struct GoMod {
    lines: Vec<String>,
    removed: BTreeSet<usize>,
    module: String,
    go_version: Option<String>,
    requires: Vec<Require>,
    replaces: Vec<Replace>,
    replace_blocks: Vec<(usize, usize)>,
    modified: bool,
}

impl GoMod {
    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(e, path, "read go.mod"))?;
        Self::parse(path, &text)
    }

    /// Parse manifest text; `path` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed directives or unterminated
    /// blocks and [`Error::MissingModule`] if there is no `module` directive.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let lines: Vec<String> = text.lines().map(String::from).collect();
        let mut module = None;
        let mut go_version = None;
        let mut requires = Vec::new();
        let mut replaces = Vec::new();
        let mut replace_blocks = Vec::new();
        let mut block: Option<Block> = None;

        for (i, raw) in lines.iter().enumerate() {
            let (code, comment) = split_comment(raw);
            let tokens: Vec<&str> = code.split_whitespace().map(unquote).collect();
            let Some((&verb, rest)) = tokens.split_first() else {
                continue;
            };

            if let Some(current) = block {
                if verb == ")" {
                    if let Block::Replace(start) = current {
                        replace_blocks.push((start, i));
                    }
                    block = None;
                    continue;
                }
                match current {
                    Block::Require => requires.push(parse_require(&tokens, comment, path, i)?),
                    Block::Replace(_) => replaces.push(parse_replace(&tokens, path, i, true)?),
                    Block::Other => {}
                }
                continue;
            }

            let opens_block = rest == ["("];
            match verb {
                "module" => {
                    let name = rest
                        .first()
                        .ok_or_else(|| Error::parse(path, i + 1, "module directive needs a path"))?;
                    module = Some((*name).to_string());
                }
                "go" => go_version = rest.first().map(|v| (*v).to_string()),
                "require" if opens_block => block = Some(Block::Require),
                "require" => requires.push(parse_require(rest, comment, path, i)?),
                "replace" if opens_block => block = Some(Block::Replace(i)),
                "replace" => replaces.push(parse_replace(rest, path, i, false)?),
                _ if opens_block => block = Some(Block::Other),
                _ => {}
            }
        }

        if block.is_some() {
            return Err(Error::parse(path, lines.len(), "unterminated block"));
        }
        let module = module.ok_or_else(|| Error::MissingModule {
            path: path.to_path_buf(),
        })?;

        Ok(Self {
            lines,
            removed: BTreeSet::new(),
            module,
            go_version,
            requires,
            replaces,
            replace_blocks,
            modified: false,
        })
    }

    /// The declared module path.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The `go` directive, if any.
    #[must_use]
    pub fn go_version(&self) -> Option<&str> {
        self.go_version.as_deref()
    }

    /// All `require` entries in file order.
    #[must_use]
    pub fn requires(&self) -> &[Require] {
        &self.requires
    }

    /// Required module paths in file order.
    #[must_use]
    pub fn require_paths(&self) -> Vec<String> {
        self.requires.iter().map(|r| r.path.clone()).collect()
    }

    /// Current `replace` directives, including ones added by edits.
    #[must_use]
    pub fn replaces(&self) -> &[Replace] {
        &self.replaces
    }

    /// The first directive replacing `old_path`.
    #[must_use]
    pub fn replace_for(&self, old_path: &str) -> Option<&Replace> {
        self.replaces.iter().find(|r| r.old_path == old_path)
    }

    /// Returns `true` if any edit changed the manifest.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Point `old_path` at `new_path`.
    ///
    /// An existing directive for `old_path` that points elsewhere is only
    /// rewritten when `overwrite` is set.
    pub fn set_replace(&mut self, old_path: &str, new_path: &str, overwrite: bool) -> ReplaceOutcome {
        let Some(position) = self.replaces.iter().position(|r| r.old_path == old_path) else {
            self.replaces.push(Replace::unversioned(old_path, new_path));
            self.modified = true;
            return ReplaceOutcome::Added;
        };

        let existing = &mut self.replaces[position];
        if existing.new_path == new_path && existing.new_version.is_none() {
            return ReplaceOutcome::Unchanged;
        }
        if !overwrite {
            return ReplaceOutcome::Kept {
                existing: existing.new_path.clone(),
            };
        }

        let previous = std::mem::replace(&mut existing.new_path, new_path.to_string());
        existing.old_version = None;
        existing.new_version = None;
        if let Some(line) = existing.line {
            self.lines[line] = if existing.in_block {
                format!("\t{}", existing.directive())
            } else {
                format!("replace {}", existing.directive())
            };
        }
        self.modified = true;
        ReplaceOutcome::Overwritten { previous }
    }

    /// Remove every directive for which `should_remove` returns `true`.
    ///
    /// Returns the removed directives.
    pub fn remove_replaces<F>(&mut self, mut should_remove: F) -> Vec<Replace>
    where
        F: FnMut(&Replace) -> bool,
    {
        let (removed, kept): (Vec<Replace>, Vec<Replace>) =
            std::mem::take(&mut self.replaces)
                .into_iter()
                .partition(|r| should_remove(r));
        self.replaces = kept;

        for replace in &removed {
            if let Some(line) = replace.line {
                self.removed.insert(line);
            }
        }
        if !removed.is_empty() {
            self.modified = true;
        }
        removed
    }

    /// Render the manifest with all edits applied.
    ///
    /// Replace blocks left empty are dropped; new directives are appended at
    /// the end of the file, sorted by module path.
    #[must_use]
    pub fn render(&self) -> String {
        let dropped_blocks: Vec<(usize, usize)> = self
            .replace_blocks
            .iter()
            .copied()
            .filter(|&(start, end)| {
                (start + 1..end).all(|i| self.removed.contains(&i) || self.lines[i].trim().is_empty())
            })
            .collect();
        let in_dropped_block =
            |i: usize| dropped_blocks.iter().any(|&(start, end)| (start..=end).contains(&i));

        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if self.removed.contains(&i) || in_dropped_block(i) {
                continue;
            }
            out.push_str(line);
            out.push('\n');
        }

        let mut pending: Vec<&Replace> = self.replaces.iter().filter(|r| r.line.is_none()).collect();
        pending.sort_by(|a, b| a.old_path.cmp(&b.old_path));

        if pending.is_empty() {
            return out;
        }
        if !out.is_empty() && !out.ends_with("\n\n") {
            out.push('\n');
        }
        if let [single] = pending.as_slice() {
            out.push_str(&format!("replace {}\n", single.directive()));
        } else {
            out.push_str("replace (\n");
            for replace in pending {
                out.push_str(&format!("\t{}\n", replace.directive()));
            }
            out.push_str(")\n");
        }
        out
    }

    /// Write the rendered manifest to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|e| Error::io(e, PathBuf::from(path), "write go.mod"))
    }
}

fn split_comment(line: &str) -> (&str, &str) {
    match line.find("//") {
        Some(at) => (&line[..at], line[at + 2..].trim()),
        None => (line, ""),
    }
}

fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .or_else(|| token.strip_prefix('`').and_then(|t| t.strip_suffix('`')))
        .unwrap_or(token)
}

fn parse_require(tokens: &[&str], comment: &str, path: &Path, line: usize) -> Result<Require> {
    match tokens {
        [module, version, ..] => Ok(Require {
            path: (*module).to_string(),
            version: (*version).to_string(),
            indirect: comment == "indirect" || comment.starts_with("indirect;"),
        }),
        _ => Err(Error::parse(path, line + 1, "require needs a module path and version")),
    }
}

fn parse_replace(tokens: &[&str], path: &Path, line: usize, in_block: bool) -> Result<Replace> {
    let arrow = tokens
        .iter()
        .position(|t| *t == "=>")
        .ok_or_else(|| Error::parse(path, line + 1, "replace is missing '=>'"))?;
    let (old, new) = (&tokens[..arrow], &tokens[arrow + 1..]);

    let (old_path, old_version) = match old {
        [p] => (*p, None),
        [p, v] => (*p, Some((*v).to_string())),
        _ => return Err(Error::parse(path, line + 1, "malformed replace source")),
    };
    let (new_path, new_version) = match new {
        [p] => (*p, None),
        [p, v] => (*p, Some((*v).to_string())),
        _ => return Err(Error::parse(path, line + 1, "malformed replace target")),
    };

    Ok(Replace {
        old_path: old_path.to_string(),
        old_version,
        new_path: new_path.to_string(),
        new_version,
        line: Some(line),
        in_block,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "module example.com/repo/a

go 1.22

require (
\texample.com/repo/b v0.1.0
\tgolang.org/x/sys v0.20.0 // indirect
)

require example.com/repo/c v0.1.0

replace example.com/repo/b => ../b

replace (
\texample.com/repo/gone => ../gone
\tgolang.org/x/net v0.1.0 => golang.org/x/net v0.2.0
)
";

    fn parse(text: &str) -> GoMod {
        GoMod::parse(Path::new("go.mod"), text).unwrap()
    }

    #[test]
    fn test_parse_directives() {
        let gomod = parse(SAMPLE);
        assert_eq!(gomod.module(), "example.com/repo/a");
        assert_eq!(gomod.go_version(), Some("1.22"));
        assert_eq!(
            gomod.require_paths(),
            vec!["example.com/repo/b", "golang.org/x/sys", "example.com/repo/c"]
        );
        assert!(gomod.requires()[1].indirect);
        assert!(!gomod.requires()[0].indirect);
        assert_eq!(gomod.replaces().len(), 3);
        let net = gomod.replace_for("golang.org/x/net").unwrap();
        assert_eq!(net.old_version.as_deref(), Some("v0.1.0"));
        assert_eq!(net.new_version.as_deref(), Some("v0.2.0"));
    }

    #[test]
    fn test_render_without_edits_is_lossless() {
        let gomod = parse(SAMPLE);
        assert_eq!(gomod.render(), SAMPLE);
        assert!(!gomod.is_modified());
    }

    #[test]
    fn test_quoted_module_path() {
        let gomod = parse("module \"example.com/quoted\"\n");
        assert_eq!(gomod.module(), "example.com/quoted");
    }

    #[test]
    fn test_missing_module_is_an_error() {
        let err = GoMod::parse(Path::new("x/go.mod"), "go 1.22\n").unwrap_err();
        assert!(matches!(err, Error::MissingModule { .. }));
    }

    #[test]
    fn test_unterminated_block_is_an_error() {
        let err = GoMod::parse(Path::new("go.mod"), "module m\nrequire (\n\tm/a v1\n").unwrap_err();
        assert!(err.to_string().contains("unterminated block"));
    }

    #[test]
    fn test_malformed_replace_is_an_error() {
        let err = GoMod::parse(Path::new("go.mod"), "module m\nreplace m/a ../a\n").unwrap_err();
        assert!(err.to_string().contains("go.mod:2"));
    }

    #[test]
    fn test_other_blocks_are_ignored() {
        let gomod = parse("module m\n\nexclude (\n\tm/x v1.0.0\n)\n\ntoolchain go1.22.1\n");
        assert!(gomod.requires().is_empty());
        assert!(gomod.replaces().is_empty());
    }

    #[test]
    fn test_set_replace_adds_single_directive() {
        let mut gomod = parse("module m/a\n\nrequire m/b v0.1.0\n");
        assert_eq!(gomod.set_replace("m/b", "../b", false), ReplaceOutcome::Added);
        assert!(gomod.is_modified());
        assert_eq!(
            gomod.render(),
            "module m/a\n\nrequire m/b v0.1.0\n\nreplace m/b => ../b\n"
        );
    }

    #[test]
    fn test_set_replace_adds_sorted_block() {
        let mut gomod = parse("module m/a\n");
        gomod.set_replace("m/c", "../c", false);
        gomod.set_replace("m/b", "../b", false);
        assert_eq!(
            gomod.render(),
            "module m/a\n\nreplace (\n\tm/b => ../b\n\tm/c => ../c\n)\n"
        );
    }

    #[test]
    fn test_set_replace_unchanged() {
        let mut gomod = parse(SAMPLE);
        assert_eq!(
            gomod.set_replace("example.com/repo/b", "../b", false),
            ReplaceOutcome::Unchanged
        );
        assert!(!gomod.is_modified());
    }

    #[test]
    fn test_set_replace_keeps_conflict_without_overwrite() {
        let mut gomod = parse(SAMPLE);
        assert_eq!(
            gomod.set_replace("example.com/repo/b", "../elsewhere", false),
            ReplaceOutcome::Kept {
                existing: "../b".to_string()
            }
        );
        assert_eq!(gomod.render(), SAMPLE);
    }

    #[test]
    fn test_set_replace_overwrites_in_place() {
        let mut gomod = parse(SAMPLE);
        assert_eq!(
            gomod.set_replace("golang.org/x/net", "../net", true),
            ReplaceOutcome::Overwritten {
                previous: "golang.org/x/net".to_string()
            }
        );
        let rendered = gomod.render();
        assert!(rendered.contains("\tgolang.org/x/net => ../net\n"));
        assert!(!rendered.contains("v0.2.0"));

        gomod.set_replace("example.com/repo/b", "../bb", true);
        assert!(gomod.render().contains("\nreplace example.com/repo/b => ../bb\n"));
    }

    #[test]
    fn test_remove_replaces_drops_lines() {
        let mut gomod = parse(SAMPLE);
        let removed = gomod.remove_replaces(|r| r.old_path == "example.com/repo/gone");
        assert_eq!(removed.len(), 1);
        let rendered = gomod.render();
        assert!(!rendered.contains("gone"));
        assert!(rendered.contains("replace (\n\tgolang.org/x/net"));
    }

    #[test]
    fn test_remove_all_block_entries_drops_block() {
        let mut gomod = parse(SAMPLE);
        gomod.remove_replaces(|r| r.old_path != "example.com/repo/b");
        let rendered = gomod.render();
        assert!(!rendered.contains("replace ("));
        assert!(rendered.contains("replace example.com/repo/b => ../b"));
        assert_eq!(gomod.replaces().len(), 1);
    }

    #[test]
    fn test_remove_nothing_is_not_a_modification() {
        let mut gomod = parse(SAMPLE);
        assert!(gomod.remove_replaces(|_| false).is_empty());
        assert!(!gomod.is_modified());
    }
}
