use serde::Deserialize;
use std::collections::HashMap;

/// What a single probe sees of an element.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ElementSnapshot {
    pub tag: String,
    pub text_content: String,
    pub inner_text: String,
    pub visible: bool,
    pub checked: bool,
    pub value: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

pub(super) const SNAPSHOT_JS: &str = r#"
    if (!el) return { element: null };
    const style = getComputedStyle(el);
    const rect = el.getBoundingClientRect();
    const attributes = {};
    for (const attr of el.attributes || []) {
        attributes[attr.name] = attr.value;
    }
    return {
        element: {
            tag: el.tagName.toLowerCase(),
            text_content: el.textContent || '',
            inner_text: el.innerText || '',
            visible: style.display !== 'none'
                && style.visibility !== 'hidden'
                && parseFloat(style.opacity) > 0
                && rect.width > 0
                && rect.height > 0,
            checked: !!el.checked,
            value: typeof el.value === 'string' ? el.value : null,
            attributes: attributes
        }
    };
"#;

/// Element states a locator can wait for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ElementState {
    Attached,
    Detached,
    #[default]
    Visible,
    Hidden,
}

impl ElementState {
    /// Whether a probe result (`None` = no element) is in this state.
    pub fn is_satisfied_by(&self, snapshot: Option<&ElementSnapshot>) -> bool {
        match (self, snapshot) {
            (Self::Attached, found) => found.is_some(),
            (Self::Detached, found) => found.is_none(),
            (Self::Visible, Some(s)) => s.visible,
            (Self::Visible, None) => false,
            (Self::Hidden, Some(s)) => !s.visible,
            (Self::Hidden, None) => true,
        }
    }
}

impl std::fmt::Display for ElementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Attached => "attached",
            Self::Detached => "detached",
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        };
        f.write_str(name)
    }
}
