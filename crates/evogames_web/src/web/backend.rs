//! Requests to the simulation backend from the page.

use evogames::form::{simulate_form_fields, CONFIG_PATH, SIMULATE_PATH};
use evogames::model::SimulationConfig;
use evogames::notice::Notice;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, HtmlFormElement, HtmlInputElement, Request, RequestInit, Response};

use crate::ui_model::save_notice;

/// POST the config as JSON and turn the reply into a toast.
pub(super) async fn save_config(config: &SimulationConfig) -> Notice {
    match post_json(CONFIG_PATH, config).await {
        Ok(body) => save_notice(&body),
        Err(e) => {
            web_sys::console::error_2(&JsValue::from_str("save failed"), &e);
            Notice::save_failed()
        }
    }
}

async fn post_json(path: &str, config: &SimulationConfig) -> Result<String, JsValue> {
    let body = config
        .to_json()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let headers = Headers::new()?;
    headers.set("Content-Type", "application/json")?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(path, &init)?;
    let window = web_sys::window().ok_or("no window")?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    let text = JsFuture::from(response.text()?).await?;
    Ok(text.as_string().unwrap_or_default())
}

/// Submit the config through a regular form post so the browser follows the
/// backend's redirect to the results page.
pub(super) fn submit_simulation(config: &SimulationConfig) -> Result<(), String> {
    let fields = simulate_form_fields(config).map_err(|e| e.to_string())?;
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let body = document.body().ok_or("no body")?;

    let form = document
        .create_element("form")
        .map_err(|_| "create form failed")?
        .dyn_into::<HtmlFormElement>()
        .map_err(|_| "form cast failed")?;
    form.set_method("POST");
    form.set_action(SIMULATE_PATH);
    let _ = form.set_attribute("style", "display: none");

    for (name, value) in fields {
        let input = document
            .create_element("input")
            .map_err(|_| "create input failed")?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| "input cast failed")?;
        input.set_type("hidden");
        input.set_name(name);
        input.set_value(&value);
        form.append_child(&input).map_err(|_| "append input failed")?;
    }

    body.append_child(&form).map_err(|_| "append form failed")?;
    form.submit().map_err(|_| "form submit failed".to_string())
}
