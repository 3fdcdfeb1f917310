//! WebAssembly bindings for asciify

use crate::export::{self, ExportedAsset};
use crate::preferences::{PreferenceStore, Preferences, Theme, ThemeSettings, THEME_KEY};
use crate::{AsciiError, BitmapFont, Mode, Session, Viewport};
use wasm_bindgen::prelude::*;

fn to_js(err: AsciiError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_mode(mode: &str) -> Result<Mode, JsValue> {
    mode.parse().map_err(|e: String| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
}

#[wasm_bindgen]
impl WasmSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmSession {
        WasmSession { session: Session::new() }
    }

    /// Decode an image file's bytes and make it the current image.
    ///
    /// Returns `[width, height]`, the default grid size. The page is expected
    /// to fill its dimension fields with these and call `convert`.
    #[wasm_bindgen]
    pub fn load(&mut self, bytes: &[u8]) -> Result<Vec<u32>, JsValue> {
        let (w, h) = self.session.load_bytes(bytes).map_err(to_js)?;
        Ok(vec![w, h])
    }

    /// Convert with dimensions as typed into the page. Returns the text or
    /// markup to display.
    #[wasm_bindgen]
    pub fn convert(&mut self, width: &str, height: &str, mode: &str) -> Result<String, JsValue> {
        let mode = parse_mode(mode)?;
        let output = self.session.convert_input(width, height, mode).map_err(to_js)?;
        Ok(output.as_str().to_string())
    }

    /// PNG bytes of the current output sized for a window of the given size.
    #[wasm_bindgen]
    pub fn export_png(&self, window_width: u32, window_height: u32) -> Result<ExportedFile, JsValue> {
        let viewport = Viewport::from_window(window_width, window_height);
        self.session
            .export_png(viewport, &BitmapFont, export::now_millis())
            .map(ExportedFile::from)
            .map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn export_text(&self) -> Result<ExportedFile, JsValue> {
        self.session
            .export_text(export::now_millis())
            .map(ExportedFile::from)
            .map_err(to_js)
    }
}

impl Default for WasmSession {
    fn default() -> Self {
        Self::new()
    }
}

/// A file ready to be offered as a download.
#[wasm_bindgen]
pub struct ExportedFile {
    asset: ExportedAsset,
}

#[wasm_bindgen]
impl ExportedFile {
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.asset.file_name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.asset.mime.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.asset.bytes.clone()
    }
}

impl From<ExportedAsset> for ExportedFile {
    fn from(asset: ExportedAsset) -> Self {
        Self { asset }
    }
}

/// `window.localStorage` as a preference store.
struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl PreferenceStore for LocalStorage {
    fn load(&self) -> crate::Result<Preferences> {
        let stored = self
            .storage
            .get_item(THEME_KEY)
            .map_err(|e| AsciiError::Preferences(format!("{e:?}")))?;
        let theme = stored.and_then(|value| match value.parse::<Theme>() {
            Ok(theme) => Some(theme),
            Err(e) => {
                log::warn!("ignoring stored theme: {e}");
                None
            }
        });
        Ok(Preferences { theme })
    }

    fn save(&mut self, prefs: &Preferences) -> crate::Result<()> {
        let result = match prefs.theme {
            Some(theme) => self.storage.set_item(THEME_KEY, theme.as_str()),
            None => self.storage.remove_item(THEME_KEY),
        };
        result.map_err(|e| AsciiError::Preferences(format!("{e:?}")))
    }
}

fn system_prefers_dark() -> Option<bool> {
    let query = web_sys::window()?
        .match_media("(prefers-color-scheme: dark)")
        .ok()??;
    Some(query.matches())
}

fn theme_settings() -> Result<ThemeSettings<LocalStorage>, JsValue> {
    let store = LocalStorage::open().ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;
    Ok(ThemeSettings::new(store, system_prefers_dark()))
}

/// Theme to apply at startup: `"dark"` or `"light"`.
#[wasm_bindgen]
pub fn initial_theme() -> String {
    match theme_settings() {
        Ok(settings) => settings.theme().to_string(),
        Err(_) => Theme::default().to_string(),
    }
}

/// Flip and persist the theme. Returns the new theme.
#[wasm_bindgen]
pub fn toggle_theme() -> Result<String, JsValue> {
    let mut settings = theme_settings()?;
    settings.toggle().map(|t| t.to_string()).map_err(to_js)
}
