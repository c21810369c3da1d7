pub mod xpath;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One hop of a scoped element query: an XPath evaluated relative to the
/// first match of the previous hop, optionally narrowed to a single match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub xpath: String,
    pub nth: Option<usize>,
}

impl Step {
    pub fn new(xpath: &str) -> Self {
        Self {
            xpath: xpath::normalize(xpath),
            nth: None,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.nth {
            Some(n) => write!(f, "xpath={} >> nth={}", self.xpath, n),
            None => write!(f, "xpath={}", self.xpath),
        }
    }
}

/// Page-side resolver. Returns every element matched by the last step; an
/// empty array when some hop matched nothing. Malformed XPath throws.
const RESOLVE_JS: &str = r#"(steps) => {
    let ctx = document;
    let matches = [];
    for (const step of steps) {
        if (!ctx) return [];
        const snapshot = document.evaluate(
            step.xpath,
            ctx,
            null,
            XPathResult.ORDERED_NODE_SNAPSHOT_TYPE,
            null
        );
        matches = [];
        for (let i = 0; i < snapshot.snapshotLength; i++) {
            const node = snapshot.snapshotItem(i);
            if (node.nodeType === Node.ELEMENT_NODE) matches.push(node);
        }
        if (step.nth !== null && step.nth !== undefined) {
            matches = step.nth < matches.length ? [matches[step.nth]] : [];
        }
        ctx = matches.length ? matches[0] : null;
    }
    return matches;
}"#;

/// Wrap `body` in an IIFE where `matches` holds the resolved elements and `el`
/// the first of them (or `null`).
pub fn chain_script(steps: &[Step], body: &str) -> Result<String> {
    let steps_json = serde_json::to_string(steps)?;
    Ok(format!(
        r#"(() => {{
            const matches = ({resolve})({steps_json});
            const el = matches.length ? matches[0] : null;
            {body}
        }})()"#,
        resolve = RESOLVE_JS,
        steps_json = steps_json,
        body = body
    ))
}

/// Human-readable form of a step chain, used in errors and logs.
pub fn describe(steps: &[Step]) -> String {
    steps
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" >> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_strips_engine_prefix() {
        let step = Step::new("xpath=.//li");
        assert_eq!(step.xpath, ".//li");
        assert_eq!(step.nth, None);
    }

    #[test]
    fn test_chain_script_embeds_steps_as_json() {
        let steps = vec![
            Step::new("//body"),
            Step {
                xpath: ".//li[contains(., \"a'b\")]".into(),
                nth: Some(2),
            },
        ];
        let js = chain_script(&steps, "return el !== null;").unwrap();
        assert!(js.contains(r#"{"xpath":"//body","nth":null}"#));
        assert!(js.contains(r#"{"xpath":".//li[contains(., \"a'b\")]","nth":2}"#));
        assert!(js.contains("return el !== null;"));
        assert!(js.contains("ORDERED_NODE_SNAPSHOT_TYPE"));
    }

    #[test]
    fn test_describe_joins_steps() {
        let steps = vec![
            Step::new("//body"),
            Step {
                xpath: ".//ul".into(),
                nth: None,
            },
            Step {
                xpath: ".//li".into(),
                nth: Some(0),
            },
        ];
        assert_eq!(
            describe(&steps),
            "xpath=//body >> xpath=.//ul >> xpath=.//li >> nth=0"
        );
    }
}
