//! The populated configuration value an external parser is assumed to
//! produce (parsing itself is out of scope; see `src/bin/fensterchef.rs`'s
//! `ConfigSource` trait for the seam).
use crate::bindings::BindingTable;
use crate::geometry::Extents;

/// `notification.*` options.
#[derive(Debug, Clone, Copy)]
pub struct NotificationConfig {
    pub border_size: u32,
    pub border_color: u32,
    pub background: u32,
    pub foreground: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            border_size: 1,
            border_color: 0x3c3836,
            background: 0x282828,
            foreground: 0xebdbb2,
        }
    }
}

/// `tiling.*` options governing what happens to a frame whose window vanished.
#[derive(Debug, Clone, Copy, Default)]
pub struct TilingConfig {
    pub auto_fill_void: bool,
    pub auto_remove_void: bool,
}

/// The populated configuration value, mirroring spec's recognized option
/// categories exactly: `font.name`, `border.size`, `gaps.inner`/`gaps.outer`,
/// `notification.*`, `tiling.*`, and the binding table (which itself carries
/// `mouse.ignore_modifiers`/`keyboard.ignore_modifiers`/`mouse.buttons[]`/
/// `keyboard.keys[]`).
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    pub font_name: Option<String>,
    pub border_size: u32,
    pub gaps_inner: Extents,
    pub gaps_outer: Extents,
    pub notification: NotificationConfig,
    pub tiling: TilingConfig,
    pub bindings: BindingTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_has_no_gaps_and_a_visible_border() {
        let c = Configuration::default();
        assert_eq!(c.gaps_inner, Extents::default());
        assert_eq!(c.border_size, 0);
    }
}
