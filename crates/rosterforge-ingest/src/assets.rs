//! Asset path resolution.
//!
//! The export references icons by in-game texture paths
//! (`ASSETS/.../Icon.TFT_Something.tex`). The public asset mirror serves the
//! same tree lowercased with `.png` extensions.

const ASSET_BASE: &str = "https://raw.communitydragon.org/latest/game/";

/// Resolve a raw icon reference to an absolute asset URL. Already-absolute
/// references and empty strings pass through unchanged.
pub fn asset_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with("http://") || raw.starts_with("https://") {
        return raw.to_string();
    }
    let mut path = raw.to_ascii_lowercase().replace('\\', "/");
    for ext in [".tex", ".dds"] {
        if let Some(stripped) = path.strip_suffix(ext) {
            path = format!("{stripped}.png");
            break;
        }
    }
    format!("{ASSET_BASE}{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_paths_become_cdn_png_urls() {
        let url = asset_url("ASSETS/Maps/Icons/Icon_BFSword.TFT_Set15.tex");
        assert_eq!(
            url,
            "https://raw.communitydragon.org/latest/game/assets/maps/icons/icon_bfsword.tft_set15.png"
        );
    }

    #[test]
    fn dds_and_backslashes_are_normalized() {
        let url = asset_url(r"ASSETS\Augments\Mind.DDS");
        assert!(url.ends_with("assets/augments/mind.png"));
    }

    #[test]
    fn absolute_and_empty_pass_through() {
        assert_eq!(asset_url("https://example.com/x.png"), "https://example.com/x.png");
        assert_eq!(asset_url(""), "");
    }
}
