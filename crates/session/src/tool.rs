//! Drawing tools

/// The closed set of annotation tools. At most one is active at a time;
/// selecting a tool deselects the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Highlighter,
    Redact,
    Rectangle,
    Arrow,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Highlighter, Tool::Redact, Tool::Rectangle, Tool::Arrow];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Highlighter => "Hilight",
            Tool::Redact => "Redact",
            Tool::Rectangle => "Box",
            Tool::Arrow => "Arrow",
        }
    }

    /// Rectangle and arrow strokes are redrawn from the committed top frame
    /// on every pointer move; highlighter and redact accumulate on the
    /// scratch instead.
    pub fn redraws_from_committed(&self) -> bool {
        matches!(self, Tool::Rectangle | Tool::Arrow)
    }
}
