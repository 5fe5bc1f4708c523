//! File Input Component
//!
//! Reads the picked file into memory so it can ride in a multipart upload.

use js_sys::Uint8Array;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wastewise_client::UploadFile;

/// Bytes, name and MIME type of a browser `File`
pub async fn read_file(file: web_sys::File) -> Result<UploadFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("read {}: {:?}", file.name(), e))?;
    let bytes = Uint8Array::new(&buffer).to_vec();
    let mime = match file.type_() {
        t if t.is_empty() => "application/octet-stream".to_string(),
        t => t,
    };
    Ok(UploadFile { file_name: file.name(), mime, bytes })
}

#[component]
pub fn FileInput(
    #[prop(into)] on_file: Callback<Option<UploadFile>>,
    #[prop(optional)] accept: Option<&'static str>,
) -> impl IntoView {
    let on_change = move |ev: web_sys::Event| {
        let file = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let Some(file) = file else {
            on_file.run(None);
            return;
        };
        spawn_local(async move {
            match read_file(file).await {
                Ok(upload) => on_file.run(Some(upload)),
                Err(e) => {
                    tracing::warn!(error = %e, "file read failed");
                    on_file.run(None);
                }
            }
        });
    };

    view! {
        <input type="file" class="file-input" accept=accept.unwrap_or("image/*") on:change=on_change />
    }
}
