use crate::ui_model::{parse_speed, SPEED_STORAGE_KEY};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub(super) fn local_storage_get_string(key: &str) -> Option<String> {
    local_storage().and_then(|s| s.get_item(key).ok().flatten())
}

pub(super) fn local_storage_set_string(key: &str, value: &str) {
    if let Some(s) = local_storage() {
        let _ = s.set_item(key, value);
    }
}

/// Playback interval chosen last time, in milliseconds.
pub(super) fn load_speed() -> u32 {
    parse_speed(local_storage_get_string(SPEED_STORAGE_KEY).as_deref())
}

pub(super) fn save_speed(ms: u32) {
    local_storage_set_string(SPEED_STORAGE_KEY, &ms.to_string());
}
