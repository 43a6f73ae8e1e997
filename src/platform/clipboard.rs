//! Clipboard writes
//!
//! Tries the async Clipboard API first and falls back to selecting an
//! off-screen textarea and running the legacy copy command.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlDocument, HtmlTextAreaElement};

use crate::clipboard::{CopyMethod, resolve_copy};
use crate::error::{Error, Result};

pub async fn copy_text(text: &str) -> Result<CopyMethod> {
    let primary = write_with_clipboard_api(text).await;
    resolve_copy(primary, || copy_via_selection(text))
}

async fn write_with_clipboard_api(text: &str) -> Result<()> {
    let window = web_sys::window().ok_or_else(|| Error::ClipboardDenied("no window".into()))?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| Error::ClipboardDenied(describe(&e)))
}

fn copy_via_selection(text: &str) -> Result<()> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| Error::CopyFailed("no document".into()))?;
    let body = document
        .body()
        .ok_or_else(|| Error::CopyFailed("no body".into()))?;

    let textarea: HtmlTextAreaElement = document
        .create_element("textarea")
        .map_err(|e| Error::CopyFailed(describe(&e)))?
        .dyn_into()
        .map_err(|_| Error::CopyFailed("textarea cast".into()))?;
    textarea.set_value(text);
    let _ = textarea.set_attribute("style", "position:fixed;left:-9999px;top:-9999px");
    body.append_child(&textarea)
        .map_err(|e| Error::CopyFailed(describe(&e)))?;
    textarea.select();

    let copied = document
        .dyn_ref::<HtmlDocument>()
        .ok_or_else(|| Error::CopyFailed("not an HTML document".into()))
        .and_then(|doc| {
            doc.exec_command("copy")
                .map_err(|e| Error::CopyFailed(describe(&e)))
        });
    textarea.remove();

    match copied? {
        true => Ok(()),
        false => Err(Error::CopyFailed("copy command refused".into())),
    }
}

fn describe(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}
