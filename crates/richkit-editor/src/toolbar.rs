//! Toolbar model
//!
//! Buttons are configured by id. The default toolbar reads the document and
//! selection to decide which buttons are active; custom renderers get a
//! fixed-shape [`ToolbarConfig`] and answer with [`ToolbarCommand`]s that the
//! controller applies.

use std::fmt;
use std::str::FromStr;

use richkit_core::{BlockType, Document, InlineStyle, Selection, TextAlign};
use richkit_settings::DEFAULT_TOOLBAR_BUTTONS;

use crate::actions::{current_block_type, current_inline_style, is_link_active, BlockState};

/// Toolbar button id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Heading,
    Bold,
    Italic,
    Underline,
    Link,
    Left,
    Center,
    Right,
    ExportWord,
    Image,
    UnorderedList,
    OrderedList,
    Fullscreen,
    Print,
}

impl ButtonId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heading => "HEADING",
            Self::Bold => "BOLD",
            Self::Italic => "ITALIC",
            Self::Underline => "UNDERLINE",
            Self::Link => "LINK",
            Self::Left => "LEFT",
            Self::Center => "CENTER",
            Self::Right => "RIGHT",
            Self::ExportWord => "EXPORT_WORD",
            Self::Image => "IMAGE",
            Self::UnorderedList => "UNORDERED_LIST",
            Self::OrderedList => "ORDERED_LIST",
            Self::Fullscreen => "FULLSCREEN",
            Self::Print => "PRINT",
        }
    }

    /// Look up an id, accepting the list aliases
    pub fn parse(id: &str) -> Option<Self> {
        let button = match id {
            "HEADING" => Self::Heading,
            "BOLD" => Self::Bold,
            "ITALIC" => Self::Italic,
            "UNDERLINE" => Self::Underline,
            "LINK" => Self::Link,
            "LEFT" => Self::Left,
            "CENTER" => Self::Center,
            "RIGHT" => Self::Right,
            "EXPORT_WORD" => Self::ExportWord,
            "IMAGE" => Self::Image,
            "UNORDERED_LIST" | "ORDERED_LIST_DOT" => Self::UnorderedList,
            "ORDERED_LIST" | "ORDERED_LIST_NUM" => Self::OrderedList,
            "FULLSCREEN" => Self::Fullscreen,
            "PRINT" => Self::Print,
            _ => return None,
        };
        Some(button)
    }

    /// Accessible label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Heading => "Heading",
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Underline => "Underline",
            Self::Link => "Link",
            Self::Left => "Left Align",
            Self::Center => "Center Align",
            Self::Right => "Right Align",
            Self::ExportWord => "Export to Word",
            Self::Image => "Image",
            Self::UnorderedList => "Unordered List",
            Self::OrderedList => "Ordered List",
            Self::Fullscreen => "Fullscreen",
            Self::Print => "Print",
        }
    }

    /// Inline style the button toggles
    pub fn inline_style(&self) -> Option<InlineStyle> {
        match self {
            Self::Bold => Some(InlineStyle::Bold),
            Self::Italic => Some(InlineStyle::Italic),
            Self::Underline => Some(InlineStyle::Underline),
            _ => None,
        }
    }

    /// Alignment the button applies
    pub fn text_align(&self) -> Option<TextAlign> {
        match self {
            Self::Left => Some(TextAlign::Left),
            Self::Center => Some(TextAlign::Center),
            Self::Right => Some(TextAlign::Right),
            _ => None,
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ButtonId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown toolbar button: {s}"))
    }
}

/// Parse button ids in order, skipping unknown ones
pub fn parse_toolbar<I, S>(ids: I) -> Vec<ButtonId>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .filter_map(|id| {
            let id = id.as_ref();
            let button = ButtonId::parse(id);
            if button.is_none() {
                tracing::debug!(id, "skipping unknown toolbar button");
            }
            button
        })
        .collect()
}

pub fn default_toolbar() -> Vec<ButtonId> {
    parse_toolbar(DEFAULT_TOOLBAR_BUTTONS)
}

/// Entry of the heading picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingOption {
    pub value: BlockType,
    pub label: &'static str,
}

pub fn heading_options() -> Vec<HeadingOption> {
    const LABELS: [&str; 7] = ["h", "h1", "h2", "h3", "h4", "h5", "h6"];
    BlockType::heading_options()
        .into_iter()
        .zip(LABELS)
        .map(|(value, label)| HeadingOption { value, label })
        .collect()
}

/// One rendered button of the default toolbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarItem {
    pub id: ButtonId,
    pub label: &'static str,
    pub active: bool,
}

/// Button states for the default toolbar
pub fn toolbar_items(
    doc: &Document,
    selection: &Selection,
    buttons: &[ButtonId],
    fullscreen: bool,
) -> Vec<ToolbarItem> {
    let styles = current_inline_style(doc, selection);
    let block = current_block_type(doc, selection);

    buttons
        .iter()
        .map(|&id| {
            let active = match id {
                ButtonId::Bold | ButtonId::Italic | ButtonId::Underline => id
                    .inline_style()
                    .is_some_and(|style| styles.contains(&style)),
                ButtonId::Link => is_link_active(doc, selection),
                ButtonId::Left | ButtonId::Center | ButtonId::Right => {
                    id.text_align().map(BlockState::Align) == Some(block)
                }
                ButtonId::UnorderedList => {
                    block == BlockState::Type(BlockType::UnorderedListItem)
                }
                ButtonId::OrderedList => block == BlockState::Type(BlockType::OrderedListItem),
                ButtonId::Fullscreen => fullscreen,
                ButtonId::Heading | ButtonId::ExportWord | ButtonId::Image | ButtonId::Print => {
                    false
                }
            };
            let label = if id == ButtonId::Fullscreen && fullscreen {
                "Exit Fullscreen"
            } else {
                id.label()
            };
            ToolbarItem { id, label, active }
        })
        .collect()
}

/// Plain toolbar action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub label: &'static str,
    pub is_active: bool,
}

impl ActionDescriptor {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            is_active: false,
        }
    }
}

/// Link action with its input state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDescriptor {
    pub label: &'static str,
    pub show_input: bool,
    pub url: String,
    pub is_active: bool,
}

/// Heading picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingDescriptor {
    pub label: &'static str,
    pub options: Vec<HeadingOption>,
    pub current: BlockState,
}

/// Everything a custom toolbar renderer needs, one field per action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolbarConfig {
    pub print: ActionDescriptor,
    pub export: ActionDescriptor,
    pub image: ActionDescriptor,
    pub link: LinkDescriptor,
    pub heading: HeadingDescriptor,
    pub ordered_list_dot: ActionDescriptor,
    pub ordered_list_num: ActionDescriptor,
    pub fullscreen: ActionDescriptor,
}

/// Toolbar state owned by the controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolbarState {
    pub fullscreen: bool,
    pub show_link_input: bool,
    pub link_url: String,
}

impl ToolbarConfig {
    pub fn build(doc: &Document, selection: &Selection, state: &ToolbarState) -> Self {
        let block = current_block_type(doc, selection);
        Self {
            print: ActionDescriptor::new(ButtonId::Print.label()),
            export: ActionDescriptor::new(ButtonId::ExportWord.label()),
            image: ActionDescriptor::new(ButtonId::Image.label()),
            link: LinkDescriptor {
                label: ButtonId::Link.label(),
                show_input: state.show_link_input,
                url: state.link_url.clone(),
                is_active: is_link_active(doc, selection),
            },
            heading: HeadingDescriptor {
                label: ButtonId::Heading.label(),
                options: heading_options(),
                current: block,
            },
            ordered_list_dot: ActionDescriptor {
                label: ButtonId::UnorderedList.label(),
                is_active: block == BlockState::Type(BlockType::UnorderedListItem),
            },
            ordered_list_num: ActionDescriptor {
                label: ButtonId::OrderedList.label(),
                is_active: block == BlockState::Type(BlockType::OrderedListItem),
            },
            fullscreen: ActionDescriptor {
                label: if state.fullscreen {
                    "Exit Fullscreen"
                } else {
                    ButtonId::Fullscreen.label()
                },
                is_active: state.fullscreen,
            },
        }
    }
}

/// Request from a toolbar to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarCommand {
    ToggleInlineStyle(InlineStyle),
    SetTextAlign(TextAlign),
    SetHeading(BlockType),
    ToggleUnorderedList,
    ToggleOrderedList,
    ShowLinkInput(bool),
    SetLinkUrl(String),
    SubmitLink,
    RemoveLink,
    /// Insert an image from an already-read data URI
    InsertImage(String),
    ToggleFullscreen,
    Print,
    Export,
    /// Replace the document wholesale
    SetDocument(Document),
}

/// Custom toolbar
///
/// Called with the current document and the toolbar configuration; the
/// returned commands are dispatched in order.
pub trait ToolbarRenderer: Send {
    fn render(&mut self, doc: &Document, config: &ToolbarConfig) -> Vec<ToolbarCommand>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::toggle_unordered_list;
    use richkit_core::Block;

    #[test]
    fn test_parse_preserves_order_and_skips_unknown() {
        let buttons = parse_toolbar(["PRINT", "SPARKLES", "ORDERED_LIST_DOT", "BOLD"]);
        assert_eq!(
            buttons,
            vec![ButtonId::Print, ButtonId::UnorderedList, ButtonId::Bold]
        );
    }

    #[test]
    fn test_aliases() {
        assert_eq!(ButtonId::parse("ORDERED_LIST_NUM"), Some(ButtonId::OrderedList));
        assert_eq!("UNORDERED_LIST".parse::<ButtonId>(), Ok(ButtonId::UnorderedList));
        assert!("bold".parse::<ButtonId>().is_err());
    }

    #[test]
    fn test_default_toolbar() {
        let buttons = default_toolbar();
        assert_eq!(buttons.len(), 14);
        assert_eq!(buttons.first(), Some(&ButtonId::Heading));
        assert_eq!(buttons.last(), Some(&ButtonId::Print));
    }

    #[test]
    fn test_heading_options() {
        let options = heading_options();
        assert_eq!(options.len(), 7);
        assert_eq!(options[0].value, BlockType::Unstyled);
        assert_eq!(options[0].label, "h");
        assert_eq!(options[6].label, "h6");
    }

    #[test]
    fn test_item_states() {
        let doc = Document::from_blocks(vec![Block::new("a", BlockType::Unstyled, "item")]);
        let cursor = Selection::collapsed("a", 0);
        let doc = toggle_unordered_list(&doc, &cursor);
        let items = toolbar_items(&doc, &cursor, &default_toolbar(), true);
        let active: Vec<_> = items.iter().filter(|i| i.active).map(|i| i.id).collect();
        assert_eq!(active, vec![ButtonId::UnorderedList, ButtonId::Fullscreen]);
        let fullscreen = items.iter().find(|i| i.id == ButtonId::Fullscreen).unwrap();
        assert_eq!(fullscreen.label, "Exit Fullscreen");
    }

    #[test]
    fn test_config_reflects_state() {
        let doc = Document::create_empty();
        let cursor = Selection::at_start(&doc);
        let state = ToolbarState {
            fullscreen: false,
            show_link_input: true,
            link_url: "https://x.example".to_string(),
        };
        let config = ToolbarConfig::build(&doc, &cursor, &state);
        assert!(config.link.show_input);
        assert_eq!(config.link.url, "https://x.example");
        assert_eq!(config.heading.current, BlockState::Type(BlockType::Unstyled));
        assert!(!config.fullscreen.is_active);
    }
}
