use crate::config::VariantConfig;

/// Embedded badge document; palette and label slots are filled per variant.
const BADGE_TEMPLATE: &str = include_str!("../../assets/badge.html");

/// The badge element whose bounds drive the capture clip.
pub(crate) const BADGE_SELECTOR: &str = ".lozenge";

/// The element frame state custom properties are applied to. Children
/// inherit them, so one assignment drives the whole document.
pub(crate) const STYLE_ROOT_SELECTOR: &str = ".stage";

/// Substitute the variant palette and label into the badge document.
pub(crate) fn badge_document(variant: &VariantConfig) -> String {
    BADGE_TEMPLATE
        .replace("{{background_mid}}", &variant.palette.background_mid)
        .replace("{{background}}", &variant.palette.background)
        .replace("{{text}}", &variant.palette.text)
        .replace("{{shimmer}}", &variant.palette.shimmer)
        .replace("{{label}}", &variant.label)
}
