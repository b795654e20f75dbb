use gpui::*;

#[cfg(target_os = "macos")]
use objc2::rc::Retained;
#[cfg(target_os = "macos")]
use objc2_app_kit::NSColor;

pub struct Theme {
    pub background: Rgba,
    pub grid_line: Rgba,
    pub text: Rgba,
    pub label_text: Rgba,
    pub edit_background: Rgba,
    pub accent: Rgba,
}

impl Global for Theme {}

/// Get the system accent color on macOS
#[cfg(target_os = "macos")]
fn get_system_accent_color() -> Rgba {
    let accent_color: Retained<NSColor> = NSColor::controlAccentColor();
    // Convert to sRGB color space
    if let Some(rgb_color) = accent_color.colorUsingColorSpace(objc2_app_kit::NSColorSpace::sRGBColorSpace().as_ref()) {
        let r = rgb_color.redComponent() as f32;
        let g = rgb_color.greenComponent() as f32;
        let b = rgb_color.blueComponent() as f32;
        return rgba(
            ((r * 255.0) as u32) << 24 | ((g * 255.0) as u32) << 16 | ((b * 255.0) as u32) << 8 | 0xff,
        );
    }
    gpui::blue().into()
}

#[cfg(not(target_os = "macos"))]
fn get_system_accent_color() -> Rgba {
    gpui::blue().into()
}

impl Theme {
    pub fn init(app: &mut App) {
        app.set_global(Theme::light());
    }

    // Black grid and text on white, like a paper ledger.
    pub fn light() -> Theme {
        Theme {
            background: rgb(0xffffff),
            grid_line: rgb(0x000000),
            text: rgb(0x000000),
            label_text: rgb(0x000000),
            edit_background: rgb(0xeef3ff),
            accent: get_system_accent_color(),
        }
    }
}
