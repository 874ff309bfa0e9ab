//! Parsed markdown token trees.
//!
//! Markdown parsers in the marked family emit a JSON tree of typed tokens.
//! [`ContentToken`] mirrors that shape closely enough to walk it: a `type`
//! discriminant, an optional child list, and the handful of inline attributes
//! the conversion pipeline reads (`href`, `text`, `title`, `depth`, `align`).
//! Unknown fields are ignored; `null` entries in a child array are dropped at
//! deserialization so the tree never contains holes.

use serde::{Deserialize, Deserializer};

/// Discriminant tag of a [`ContentToken`].
///
/// Covers the block and inline token types the conversion pipeline treats
/// specially; any other tag deserializes to [`TokenKind::Other`] and is
/// walked but not otherwise interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum TokenKind {
    Blockquote,
    Br,
    Code,
    Codespan,
    Del,
    Em,
    Escape,
    Heading,
    Hr,
    Html,
    Image,
    Link,
    List,
    ListItem,
    Paragraph,
    Space,
    Strong,
    Table,
    Text,
    Other,
}

impl TokenKind {
    /// Look up a parser tag (`"paragraph"`, `"list_item"`, ...).
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "blockquote" => TokenKind::Blockquote,
            "br" => TokenKind::Br,
            "code" => TokenKind::Code,
            "codespan" => TokenKind::Codespan,
            "del" => TokenKind::Del,
            "em" => TokenKind::Em,
            "escape" => TokenKind::Escape,
            "heading" => TokenKind::Heading,
            "hr" => TokenKind::Hr,
            "html" => TokenKind::Html,
            "image" => TokenKind::Image,
            "link" => TokenKind::Link,
            "list" => TokenKind::List,
            "list_item" => TokenKind::ListItem,
            "paragraph" => TokenKind::Paragraph,
            "space" => TokenKind::Space,
            "strong" => TokenKind::Strong,
            "table" => TokenKind::Table,
            "text" => TokenKind::Text,
            _ => TokenKind::Other,
        }
    }
}

impl From<String> for TokenKind {
    fn from(tag: String) -> Self {
        TokenKind::from_tag(&tag)
    }
}

impl Default for TokenKind {
    fn default() -> Self {
        TokenKind::Other
    }
}

/// A node in a parsed markdown token tree.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentToken {
    /// Discriminant tag (`"paragraph"`, `"image"`, ...).
    #[serde(rename = "type", default)]
    pub kind: TokenKind,

    /// Child tokens, for nodes with inline or block children.
    #[serde(default, deserialize_with = "tokens_without_holes")]
    pub tokens: Vec<ContentToken>,

    /// Source URL, for links and images.
    #[serde(default)]
    pub href: Option<String>,

    /// Raw text for text runs; alt text for images.
    #[serde(default)]
    pub text: Option<String>,

    /// Title attribute, for links and images.
    #[serde(default)]
    pub title: Option<String>,

    /// Heading depth, for heading tokens.
    #[serde(default)]
    pub depth: Option<u32>,

    /// Alignment keyword, for table cell tokens.
    #[serde(default)]
    pub align: Option<String>,
}

impl ContentToken {
    /// Whether this node is an image leaf.
    pub fn is_image(&self) -> bool {
        self.kind == TokenKind::Image
    }
}

/// Deserialize a child array, dropping `null` entries (and tolerating a
/// `null` array). Parsers emit holes in token lists; they carry no content.
fn tokens_without_holes<'de, D>(deserializer: D) -> Result<Vec<ContentToken>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<ContentToken>>>::deserialize(deserializer)?;
    Ok(raw.into_iter().flatten().flatten().collect())
}

/// Collect every image token in the tree, in document reading order.
///
/// Performs a pre-order depth-first walk: image nodes are appended as they
/// are first encountered and are not descended into; every other node
/// recurses into its children before moving to the next sibling.
///
/// # Examples
///
/// ```
/// use mdocx::{ContentToken, collect_image_tokens};
///
/// let tokens: Vec<ContentToken> = serde_json::from_str(
///     r#"[{"type": "paragraph", "tokens": [{"type": "image", "href": "a.png"}]}]"#,
/// )
/// .unwrap();
/// let images = collect_image_tokens(&tokens);
/// assert_eq!(images[0].href.as_deref(), Some("a.png"));
/// ```
pub fn collect_image_tokens(tokens: &[ContentToken]) -> Vec<&ContentToken> {
    let mut images = Vec::new();
    collect_image_tokens_into(tokens, &mut images);
    images
}

/// Append every image token in `tokens` to `images`, depth-first.
///
/// The accumulating form of [`collect_image_tokens`], for gathering images
/// across several token lists (e.g. one list per chapter) into one sequence.
pub fn collect_image_tokens_into<'a>(
    tokens: &'a [ContentToken],
    images: &mut Vec<&'a ContentToken>,
) {
    for token in tokens {
        if token.is_image() {
            images.push(token);
        } else if !token.tokens.is_empty() {
            collect_image_tokens_into(&token.tokens, images);
        }
    }
}
