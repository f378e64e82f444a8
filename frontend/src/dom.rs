use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlVideoElement};

/// Pins the transcript container to its bottom edge.
pub fn scroll_to_bottom(container: &Element) {
    container.set_scroll_top(container.scroll_height());
}

/// Enforces the fixed display style on every `<video>` under `root`:
/// playback controls on, full-width, rounded corners, top margin.
pub fn fix_video_elements(root: &Element) {
    let videos = root.get_elements_by_tag_name("video");
    for i in 0..videos.length() {
        let Some(el) = videos.item(i) else { continue };
        let Ok(video) = el.dyn_into::<HtmlVideoElement>() else { continue };
        video.set_controls(true);
        let style = video.style();
        let _ = style.set_property("max-width", "100%");
        let _ = style.set_property("border-radius", "10px");
        let _ = style.set_property("margin-top", "10px");
    }
}
