use anyhow::Result;
use serde::Deserialize;

use super::{ElementState, Locator};

#[derive(Debug, Deserialize)]
struct ActionReport {
    error: Option<String>,
    method: Option<String>,
}

impl Locator {
    async fn act(&self, body: &str, what: &str) -> Result<Option<String>> {
        self.wait_for(ElementState::Visible).await?;
        let report: ActionReport = self.evaluate(body, what).await?;
        if let Some(error) = report.error {
            anyhow::bail!("{}: {}", error, self.description());
        }
        tracing::debug!("{} {} ({:?})", what, self.description(), report.method);
        Ok(report.method)
    }

    /// Scroll into view and click. Obscured elements get a direct
    /// `HTMLElement.click()` instead of a mouse event sequence.
    pub async fn click(&self) -> Result<()> {
        self.act(CLICK_JS, "click").await?;
        Ok(())
    }

    /// Replace the element's value with `text`, firing `input` and `change`.
    pub async fn fill(&self, text: &str) -> Result<()> {
        let body = format!(
            r#"
            if (!el) return {{ error: 'Element not found' }};
            el.scrollIntoView({{ block: 'center', behavior: 'instant' }});
            el.focus();
            const text = {text};
            if (el.tagName === 'INPUT' || el.tagName === 'TEXTAREA') {{
                const proto = el.tagName === 'INPUT'
                    ? window.HTMLInputElement.prototype
                    : window.HTMLTextAreaElement.prototype;
                const setter = Object.getOwnPropertyDescriptor(proto, 'value')?.set;
                if (setter) {{
                    setter.call(el, text);
                }} else {{
                    el.value = text;
                }}
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return {{ method: 'value_setter' }};
            }}
            if (el.isContentEditable) {{
                el.textContent = '';
                document.execCommand('insertText', false, text);
                return {{ method: 'insert_text' }};
            }}
            return {{ error: 'Element is not fillable' }};
            "#,
            text = serde_json::to_string(text)?
        );
        self.act(&body, "fill").await?;
        Ok(())
    }

    pub async fn check(&self) -> Result<()> {
        self.set_checked(true).await
    }

    pub async fn uncheck(&self) -> Result<()> {
        self.set_checked(false).await
    }

    /// Click a checkbox or radio until its state matches `checked`.
    pub async fn set_checked(&self, checked: bool) -> Result<()> {
        let body = format!(
            r#"
            if (!el) return {{ error: 'Element not found' }};
            if (!('checked' in el)) return {{ error: 'Element is not checkable' }};
            if (el.checked === {checked}) return {{ method: 'unchanged' }};
            el.scrollIntoView({{ block: 'center', behavior: 'instant' }});
            el.click();
            if (el.checked !== {checked}) return {{ error: 'Click did not change checked state' }};
            return {{ method: 'click' }};
            "#,
            checked = checked
        );
        self.act(&body, "set checked").await?;
        Ok(())
    }

    /// Select `value` on a `<select>`.
    pub async fn select_option(&self, value: &str) -> Result<()> {
        let body = format!(
            r#"
            if (!el) return {{ error: 'Element not found' }};
            if (el.tagName !== 'SELECT') return {{ error: 'Element is not a <select>' }};
            const value = {value};
            if (!Array.from(el.options).some(o => o.value === value)) {{
                return {{ error: 'No option with value ' + value }};
            }}
            el.value = value;
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return {{ method: 'value' }};
            "#,
            value = serde_json::to_string(value)?
        );
        self.act(&body, "select option").await?;
        Ok(())
    }
}

const CLICK_JS: &str = r#"
    if (!el) return { error: 'Element not found' };
    el.scrollIntoView({ block: 'center', inline: 'center', behavior: 'instant' });
    const rect = el.getBoundingClientRect();
    if (rect.width === 0 && rect.height === 0) {
        return { error: 'Element has zero size' };
    }
    const x = rect.left + rect.width / 2;
    const y = rect.top + rect.height / 2;
    const top = document.elementFromPoint(x, y);
    const unobscured = top && (el === top || el.contains(top) || top.contains(el));
    if (!unobscured) {
        el.click();
        return { method: 'js_click' };
    }
    const opts = { bubbles: true, cancelable: true, clientX: x, clientY: y, button: 0 };
    el.dispatchEvent(new MouseEvent('mousemove', opts));
    el.dispatchEvent(new MouseEvent('mousedown', opts));
    el.dispatchEvent(new MouseEvent('mouseup', opts));
    el.dispatchEvent(new MouseEvent('click', opts));
    return { method: 'mouse_event' };
"#;
