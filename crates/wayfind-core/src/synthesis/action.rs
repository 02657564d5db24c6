use std::fmt;

/// Recorded action types, after alias resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Navigate,
    Input,
    Click,
    SendKeys,
    Extract,
    Scroll,
    SelectDropdownOption,
    GoBack,
    GoForward,
    /// Recognized, but never produces a step (task completion, tab and file handling).
    Ignored,
    Unknown,
}

impl ActionKind {
    /// Parse an action type. Matching is case-insensitive and treats `-` as `_`.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "navigate" | "go_to_url" => ActionKind::Navigate,
            "input" | "input_text" => ActionKind::Input,
            "click" | "click_element" => ActionKind::Click,
            "send_keys" => ActionKind::SendKeys,
            "extract" | "extract_content" | "extract_page_content" => ActionKind::Extract,
            "scroll" => ActionKind::Scroll,
            "select_dropdown_option" => ActionKind::SelectDropdownOption,
            "go_back" => ActionKind::GoBack,
            "go_forward" => ActionKind::GoForward,
            "done" | "switch_tab" | "close_tab" | "read_file" | "write_file" | "replace_file"
            | "search_google" => ActionKind::Ignored,
            _ => ActionKind::Unknown,
        }
    }

    /// Whether the action targets an indexed page element.
    pub fn targets_element(self) -> bool {
        matches!(
            self,
            ActionKind::Input
                | ActionKind::Click
                | ActionKind::SendKeys
                | ActionKind::SelectDropdownOption
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Navigate => "navigate",
            ActionKind::Input => "input",
            ActionKind::Click => "click",
            ActionKind::SendKeys => "send_keys",
            ActionKind::Extract => "extract",
            ActionKind::Scroll => "scroll",
            ActionKind::SelectDropdownOption => "select_dropdown_option",
            ActionKind::GoBack => "go_back",
            ActionKind::GoForward => "go_forward",
            ActionKind::Ignored => "ignored",
            ActionKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
