// =============================================================================
// TEMPLATE.RS — Scene template files
//
// A scene template is a small text file in two sections:
//
//     title: "Short Range Scan"
//     width = 40
//     # comment
//     ---
//     [0, 0] parts/header.txt
//     [2, 4] parts/grid.txt
//
// The front matter above the `---` divider is a list of typed key/value
// settings.  Each line below it places a sub-layout file at a grid cell; the
// referenced file is read verbatim, one layout row per line.
// =============================================================================

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("cannot open scene template {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("cannot read scene template {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
}

// ── SceneValue ───────────────────────────────────────────────────────────────

/// A typed front-matter value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SceneValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    List(Vec<SceneValue>),
}

impl SceneValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SceneValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            SceneValue::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// Floats, and integers widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            SceneValue::Float(f) => Some(f),
            SceneValue::Integer(n) => Some(n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            SceneValue::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[SceneValue]> {
        match self {
            SceneValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SceneValue::Null)
    }
}

/// Turn the raw text of a front-matter value into a [`SceneValue`].
///
/// Rules, first match wins:
/// 1. wrapped in matching `"…"` or `'…'` → the text between the quotes
/// 2. contains a comma → list, each comma-separated part cast by these rules
/// 3. `true`/`yes`/`on`, `false`/`no`/`off`, `none`/`null` (any case)
/// 4. integer, or float if the text has a `.` or an `e`/`E`
/// 5. the trimmed text as a string
pub fn cast_value(raw: &str) -> SceneValue {
    let s = raw.trim();

    if let Some(inner) = unquote(s) {
        return SceneValue::String(inner.to_string());
    }

    if s.contains(',') {
        return SceneValue::List(s.split(',').map(cast_value).collect());
    }

    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => return SceneValue::Boolean(true),
        "false" | "no" | "off" => return SceneValue::Boolean(false),
        "none" | "null" => return SceneValue::Null,
        _ => {}
    }

    let numeric = if s.contains(['.', 'e', 'E']) {
        s.parse::<f64>().ok().map(SceneValue::Float)
    } else {
        s.parse::<i64>().ok().map(SceneValue::Integer)
    };
    numeric.unwrap_or_else(|| SceneValue::String(s.to_string()))
}

fn unquote(s: &str) -> Option<&str> {
    ['"', '\''].into_iter().find_map(|q| {
        if s.starts_with(q) && s.ends_with(q) {
            Some(s.get(1..s.len().saturating_sub(1)).unwrap_or(""))
        } else {
            None
        }
    })
}

// ── Scene template ───────────────────────────────────────────────────────────

/// One sub-layout placed on the grid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenePlacement {
    pub x: u32,
    pub y: u32,
    /// The path exactly as written in the template.
    pub source_path: String,
    /// Contents of the part file, one entry per line.  Empty if the file could
    /// not be read.
    pub lines: Vec<String>,
}

/// Result of parsing a scene template.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SceneTemplate {
    pub front_matter: HashMap<String, SceneValue>,
    pub placements: Vec<ScenePlacement>,
}

impl SceneTemplate {
    pub fn get(&self, key: &str) -> Option<&SceneValue> {
        self.front_matter.get(key)
    }
}

// ── Line grammar ─────────────────────────────────────────────────────────────

fn is_comment(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with('#') || t.starts_with(';') || t.starts_with("//")
}

/// `key : value` or `key = value`.  Keys contain no whitespace, `:`, `#` or `=`.
/// Something must follow the separator, but whitespace alone gives an empty
/// value.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let t = line.trim_start();
    let key_end = t
        .find(|c: char| c.is_whitespace() || matches!(c, ':' | '#' | '='))
        .unwrap_or(t.len());
    let (key, rest) = t.split_at(key_end);
    if key.is_empty() {
        return None;
    }
    let after = rest.trim_start().strip_prefix([':', '='])?;
    if after.is_empty() {
        return None;
    }
    Some((key, after.trim()))
}

/// `[x, y] path`.  Must start at column 0, and the closing bracket must be
/// followed by whitespace plus at least one more character.  The path is the
/// trimmed remainder and may end up empty.
fn split_placement(line: &str) -> Option<(u32, u32, &str)> {
    let inner_and_rest = line.strip_prefix('[')?;
    let close = inner_and_rest.find(']')?;
    let (inner, rest) = inner_and_rest.split_at(close);
    let rest = &rest[1..];

    let (x, y) = inner.split_once(',')?;
    let x = parse_coord(x)?;
    let y = parse_coord(y)?;

    let mut chars = rest.chars();
    if !chars.next().is_some_and(char::is_whitespace) || chars.next().is_none() {
        return None;
    }
    Some((x, y, rest.trim()))
}

fn parse_coord(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// ── TemplateParser ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Section {
    FrontMatter,
    Layout,
}

/// Where relative part paths are looked up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum PartRoot {
    /// The process working directory.
    #[default]
    WorkingDir,
    /// The directory holding the template being parsed.
    TemplateDir,
    Fixed(PathBuf),
}

/// Scene template parser.
///
/// ```no_run
/// use asciirend::template::TemplateParser;
/// let scene = TemplateParser::new()
///     .relative_to_template()
///     .parse_file("screens/status.txt")?;
/// # Ok::<(), asciirend::template::TemplateError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct TemplateParser {
    part_root: PartRoot,
}

impl TemplateParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative part paths against `dir`.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.part_root = PartRoot::Fixed(dir.into());
        self
    }

    /// Resolve relative part paths against the directory of the template file.
    pub fn relative_to_template(mut self) -> Self {
        self.part_root = PartRoot::TemplateDir;
        self
    }

    /// Parse the template at `path`.  Only a missing or unreadable template is
    /// an error; problems with individual lines or part files are not.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<SceneTemplate, TemplateError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::InvalidData => TemplateError::Read { path: path.to_path_buf(), source },
            _ => TemplateError::Open { path: path.to_path_buf(), source },
        })?;

        let base = match &self.part_root {
            PartRoot::WorkingDir => None,
            PartRoot::TemplateDir => path.parent().map(Path::to_path_buf),
            PartRoot::Fixed(dir) => Some(dir.clone()),
        };
        let scene = parse_lines(&text, base.as_deref());
        info!(
            "scene template {}: {} settings, {} placements",
            path.display(),
            scene.front_matter.len(),
            scene.placements.len()
        );
        Ok(scene)
    }

    /// Parse template text already in memory.  Part files are still read from
    /// disk; with [`relative_to_template`](Self::relative_to_template) they
    /// resolve against the working directory.
    pub fn parse_str(&self, text: &str) -> SceneTemplate {
        let base = match &self.part_root {
            PartRoot::Fixed(dir) => Some(dir.as_path()),
            PartRoot::WorkingDir | PartRoot::TemplateDir => None,
        };
        parse_lines(text, base)
    }
}

/// Parse the template at `path`, resolving part paths against the working
/// directory.
pub fn parse_scene_template(path: impl AsRef<Path>) -> Result<SceneTemplate, TemplateError> {
    TemplateParser::new().parse_file(path)
}

fn parse_lines(text: &str, base: Option<&Path>) -> SceneTemplate {
    let mut scene = SceneTemplate::default();
    let mut section = Section::FrontMatter;

    for (n, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match section {
            Section::FrontMatter => {
                if line.trim().starts_with("---") {
                    section = Section::Layout;
                } else if is_comment(line) {
                    continue;
                } else if let Some((key, value)) = split_key_value(line) {
                    scene.front_matter.insert(key.to_string(), cast_value(value));
                } else {
                    debug!("front matter line {}: not a setting, skipped", n + 1);
                }
            }
            Section::Layout => match split_placement(line) {
                Some((x, y, path)) => {
                    let lines = read_part(path, base);
                    scene.placements.push(ScenePlacement {
                        x,
                        y,
                        source_path: path.to_string(),
                        lines,
                    });
                }
                None => debug!("layout line {}: not a placement, skipped", n + 1),
            },
        }
    }
    scene
}

fn read_part(path: &str, base: Option<&Path>) -> Vec<String> {
    let resolved = match base {
        Some(dir) => dir.join(path),
        None => PathBuf::from(path),
    };
    match fs::read_to_string(&resolved) {
        Ok(text) => text.lines().map(str::to_string).collect(),
        Err(e) => {
            warn!("scene part {}: {e}", resolved.display());
            Vec::new()
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> SceneValue {
        SceneValue::String(v.to_string())
    }

    // ── cast_value ────────────────────────────────────────────────────────────

    #[test]
    fn quoted_text_is_a_literal_string() {
        assert_eq!(cast_value("\"red\""), s("red"));
        assert_eq!(cast_value("'yes'"), s("yes"));
        assert_eq!(cast_value("\"12\""), s("12"));
    }

    #[test]
    fn quoted_comma_stays_a_single_string() {
        assert_eq!(cast_value("\"a, b\""), s("a, b"));
    }

    #[test]
    fn lone_quote_casts_to_empty_string() {
        assert_eq!(cast_value("\""), s(""));
        assert_eq!(cast_value("'"), s(""));
        assert_eq!(cast_value("\"\""), s(""));
    }

    #[test]
    fn mismatched_quotes_are_kept() {
        assert_eq!(cast_value("\"red'"), s("\"red'"));
    }

    #[test]
    fn comma_makes_a_list_with_recursive_casting() {
        assert_eq!(
            cast_value("1, two, 3.5, off"),
            SceneValue::List(vec![
                SceneValue::Integer(1),
                s("two"),
                SceneValue::Float(3.5),
                SceneValue::Boolean(false),
            ])
        );
    }

    #[test]
    fn list_parts_may_be_quoted() {
        assert_eq!(cast_value("'a', \"b\""), SceneValue::List(vec![s("a"), s("b")]));
    }

    #[test]
    fn empty_list_parts_become_empty_strings() {
        assert_eq!(cast_value("a,,b"), SceneValue::List(vec![s("a"), s(""), s("b")]));
    }

    #[test]
    fn booleans_and_null_ignore_case() {
        assert_eq!(cast_value("YES"), SceneValue::Boolean(true));
        assert_eq!(cast_value("On"), SceneValue::Boolean(true));
        assert_eq!(cast_value("FALSE"), SceneValue::Boolean(false));
        assert_eq!(cast_value("no"), SceneValue::Boolean(false));
        assert_eq!(cast_value("None"), SceneValue::Null);
        assert_eq!(cast_value("null"), SceneValue::Null);
    }

    #[test]
    fn numbers() {
        assert_eq!(cast_value("12"), SceneValue::Integer(12));
        assert_eq!(cast_value("-3"), SceneValue::Integer(-3));
        assert_eq!(cast_value("1.5"), SceneValue::Float(1.5));
        assert_eq!(cast_value("2e3"), SceneValue::Float(2000.0));
        assert_eq!(cast_value("1E-2"), SceneValue::Float(0.01));
    }

    #[test]
    fn non_numbers_stay_strings() {
        assert_eq!(cast_value("hello"), s("hello"));
        assert_eq!(cast_value("1.2.3"), s("1.2.3"));
        assert_eq!(cast_value("12abc"), s("12abc"));
    }

    #[test]
    fn integer_overflow_stays_a_string() {
        assert_eq!(cast_value("99999999999999999999"), s("99999999999999999999"));
    }

    #[test]
    fn value_is_trimmed() {
        assert_eq!(cast_value("   42  "), SceneValue::Integer(42));
    }

    // ── line grammar ──────────────────────────────────────────────────────────

    #[test]
    fn key_value_with_either_separator() {
        assert_eq!(split_key_value("w: 4"), Some(("w", "4")));
        assert_eq!(split_key_value("  name =  Enterprise  "), Some(("name", "Enterprise")));
        assert_eq!(split_key_value("k:v"), Some(("k", "v")));
    }

    #[test]
    fn key_value_rejects_bad_keys_and_missing_values() {
        assert_eq!(split_key_value("two words: x"), None);
        assert_eq!(split_key_value(": x"), None);
        assert_eq!(split_key_value("key:"), None);
        assert_eq!(split_key_value("just text"), None);
    }

    #[test]
    fn blank_value_after_separator_is_empty() {
        assert_eq!(split_key_value("key:    "), Some(("key", "")));
        assert_eq!(split_key_value("key = \t"), Some(("key", "")));
        assert_eq!(cast_value(""), s(""));
    }

    #[test]
    fn value_may_contain_separators() {
        assert_eq!(split_key_value("url: a=b:c"), Some(("url", "a=b:c")));
    }

    #[test]
    fn placement_grammar() {
        assert_eq!(split_placement("[2, 3] parts/x.txt"), Some((2, 3, "parts/x.txt")));
        assert_eq!(split_placement("[ 10 ,0 ]\tdir/a b.txt  "), Some((10, 0, "dir/a b.txt")));
    }

    #[test]
    fn placement_with_blank_path() {
        assert_eq!(split_placement("[1, 2]  "), Some((1, 2, "")));
        assert_eq!(split_placement("[0, 0] \t "), Some((0, 0, "")));
    }

    #[test]
    fn placement_rejects_malformed_lines() {
        assert_eq!(split_placement(" [1, 2] x.txt"), None);
        assert_eq!(split_placement("[1, 2]x.txt"), None);
        assert_eq!(split_placement("[1, 2] "), None);
        assert_eq!(split_placement("[-1, 2] x.txt"), None);
        assert_eq!(split_placement("[1 2] x.txt"), None);
        assert_eq!(split_placement("[a, 2] x.txt"), None);
        assert_eq!(split_placement("(1, 2) x.txt"), None);
    }

    #[test]
    fn comments() {
        assert!(is_comment("# c"));
        assert!(is_comment("   ; c"));
        assert!(is_comment("// c"));
        assert!(!is_comment("/ c"));
    }

    // ── parse_str ─────────────────────────────────────────────────────────────

    #[test]
    fn front_matter_last_write_wins() {
        let scene = TemplateParser::new().parse_str("a: 1\na = 2\n");
        assert_eq!(scene.get("a"), Some(&SceneValue::Integer(2)));
    }

    #[test]
    fn divider_switches_to_layout_for_good() {
        let scene = TemplateParser::new().parse_str("a: 1\n  --- end\nb: 2\n---\n");
        assert_eq!(scene.front_matter.len(), 1);
        assert!(scene.get("b").is_none());
        assert!(scene.placements.is_empty());
    }

    #[test]
    fn junk_lines_are_skipped() {
        let scene = TemplateParser::new().parse_str("this is not a setting\n# x: 1\nok: yes\n");
        assert_eq!(scene.front_matter.len(), 1);
        assert_eq!(scene.get("ok"), Some(&SceneValue::Boolean(true)));
    }

    #[test]
    fn missing_part_gives_empty_lines() {
        let scene = TemplateParser::new()
            .parse_str("---\n[0, 1] /definitely/not/here/part.txt\nnot a placement\n");
        assert_eq!(scene.placements.len(), 1);
        let p = &scene.placements[0];
        assert_eq!((p.x, p.y), (0, 1));
        assert_eq!(p.source_path, "/definitely/not/here/part.txt");
        assert!(p.lines.is_empty());
    }

    #[test]
    fn front_matter_serializes_untagged() {
        let v = SceneValue::List(vec![SceneValue::Integer(1), SceneValue::Null, s("x")]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"[1,null,"x"]"#);
    }
}
