//! Document traversal: find groups, collect their shapes.
//!
//! The walk starts below the root element. Every `<g>` whose id matches the
//! filter (or every `<g>` when there is no filter) becomes a group, keyed by
//! its sanitized id, and owns every shape in its subtree. Groups that do not
//! match are searched for matching descendants instead. The cut-line layer is
//! never measured.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::LazyLock;

use regex_lite::Regex;
use roxmltree::{Document, Node, ParsingOptions};

use crate::defaults::CUT_LAYER_ID;
use crate::errors::MeasureError;
use crate::log::debug;
use crate::path::PathLexer;
use crate::shapes::Shape;

/// Sanitized group id to the shapes it holds, in document order.
pub type Groups = BTreeMap<String, Vec<Shape>>;

/// `_x38_` style escapes, as written by vector editors for characters that
/// are not allowed at the start of an XML id.
static HEX_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_[xX]([0-9a-fA-F]+)_").expect("hex escape pattern compiles")
});

/// Decode every `_x<hex>_` escape in `id`.
///
/// Decoding repeats from the start until nothing matches, so escapes that
/// only appear after an earlier decode are resolved too. Bytes that do not
/// form UTF-8 are taken as Latin-1 characters, so `Lumi_xE8_re` is
/// `Lumière`. Only an odd digit count is an error.
pub fn sanitize_group_id(id: &str) -> Result<String, MeasureError> {
    let mut id = id.to_string();
    while let Some((range, hex)) = next_escape(&id) {
        let Some(bytes) = decode_hex(&hex) else {
            return Err(MeasureError::InvalidGroupId {
                escape: id[range].to_string(),
                id,
            });
        };
        let decoded = String::from_utf8(bytes)
            .unwrap_or_else(|e| e.into_bytes().into_iter().map(char::from).collect());
        id.replace_range(range, &decoded);
    }
    Ok(id)
}

/// Byte range of the first escape and its hex digits.
fn next_escape(id: &str) -> Option<(Range<usize>, String)> {
    let caps = HEX_ESCAPE.captures(id)?;
    Some((caps.get(0)?.range(), caps.get(1)?.as_str().to_string()))
}

/// Pairs of hex digits to bytes; `None` on an odd digit count.
fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

/// Parse `source` and collect its groups, restricted to `filter` when given.
pub fn parse_document(source: &str, filter: Option<&str>) -> Result<Groups, MeasureError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(source, options)?;
    let walker = Walker {
        filter,
        lexer: PathLexer::new(),
    };
    let mut groups = Groups::new();
    walker.search(document.root_element(), &mut groups)?;
    Ok(groups)
}

struct Walker<'f> {
    filter: Option<&'f str>,
    lexer: PathLexer,
}

fn is_group(node: &Node) -> bool {
    node.tag_name().name() == "g"
}

fn is_cut_layer(node: &Node) -> bool {
    is_group(node) && node.attribute("id") == Some(CUT_LAYER_ID)
}

impl Walker<'_> {
    /// The sanitized key of a group the filter selects, `None` otherwise.
    ///
    /// A selected group must have a valid id. An id that cannot be decoded
    /// simply does not match a filter.
    fn matching_id(&self, raw: &str) -> Result<Option<String>, MeasureError> {
        match self.filter {
            None => sanitize_group_id(raw).map(Some),
            Some(wanted) if wanted == raw => sanitize_group_id(raw).map(Some),
            Some(wanted) => Ok(sanitize_group_id(raw).ok().filter(|id| id == wanted)),
        }
    }

    /// Look for groups among the descendants of `node`.
    fn search(&self, node: Node, groups: &mut Groups) -> Result<(), MeasureError> {
        for child in node.children().filter(Node::is_element) {
            if is_cut_layer(&child) {
                debug!("skipping cut layer");
                continue;
            }
            if !is_group(&child) {
                self.search(child, groups)?;
                continue;
            }

            let raw = child.attribute("id").unwrap_or_default();
            let Some(id) = self.matching_id(raw)? else {
                self.search(child, groups)?;
                continue;
            };

            let shapes = groups.entry(id).or_default();
            self.collect(child, raw, shapes)?;
            debug!(group = raw, shapes = shapes.len(), "collected group");
        }
        Ok(())
    }

    /// Every shape below `node`, depth first.
    fn collect(&self, node: Node, group: &str, shapes: &mut Vec<Shape>) -> Result<(), MeasureError> {
        for child in node.children().filter(Node::is_element) {
            if is_cut_layer(&child) {
                continue;
            }
            let tag = child.tag_name().name();
            let shape = Shape::from_element(tag, &child, &self.lexer).map_err(|e| {
                e.within(format!("<{tag}> #{} in group {group:?}", shapes.len() + 1))
            })?;
            shapes.extend(shape);
            self.collect(child, group, shapes)?;
        }
        Ok(())
    }
}
