use wasm_bindgen::JsCast;

use crate::api::FileUpload;

/// Pull the first file out of an input's change event.
pub(crate) fn file_from_input(ev: &web_sys::Event) -> Option<web_sys::File> {
    let input = ev
        .target()?
        .dyn_into::<web_sys::HtmlInputElement>()
        .ok()?;
    input.files()?.get(0)
}

/// Reject files whose name does not end in one of `extensions` (matched
/// case-insensitively, dot included, e.g. `".xlsx"`).
pub(crate) fn check_extension(name: &str, extensions: &[&str]) -> Result<(), String> {
    let lower = name.to_lowercase();
    if extensions.iter().any(|ext| lower.ends_with(ext)) {
        return Ok(());
    }
    Err(format!(
        "Nepodprta datoteka. Dovoljeno: {}",
        extensions.join(", ")
    ))
}

/// Read a browser file into the base64 upload payload the API expects.
/// Single-shot; a failed read is surfaced inline and the user re-triggers.
pub(crate) async fn read_upload(file: web_sys::File) -> Result<FileUpload, String> {
    let name = file.name();
    let data_url = gloo_file::futures::read_as_data_url(&gloo_file::File::from(file))
        .await
        .map_err(|e| format!("branje datoteke ni uspelo: {e}"))?;
    // data URL format: data:<mime>;base64,<payload>
    let content_base64 = data_url
        .split_once(',')
        .map(|(_, payload)| payload.to_string())
        .ok_or_else(|| "branje datoteke ni uspelo: prazna vsebina".to_string())?;
    Ok(FileUpload {
        file_name: name,
        content_base64,
    })
}

/// Offer `bytes` to the user as a download with the given file name.
pub(crate) fn download_bytes(name: &str, mime: &str, bytes: &[u8]) -> Result<(), String> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_buffer_source_sequence_and_options(&parts, &options)
        .map_err(|_| "priprava datoteke ni uspela".to_string())?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|_| "priprava datoteke ni uspela".to_string())?;

    let result = (|| {
        let document = web_sys::window()?.document()?;
        let anchor = document
            .create_element("a")
            .ok()?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .ok()?;
        anchor.set_href(&url);
        anchor.set_download(name);
        anchor.click();
        Some(())
    })();

    let _ = web_sys::Url::revoke_object_url(&url);
    result.ok_or_else(|| "prenos ni uspel".to_string())
}
