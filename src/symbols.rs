// ABOUTME: Icon identifier catalog offered by the service form
// ABOUTME: Identifiers are opaque; unknown ones are accepted and blank ones fall back to "globe"

/// Icon shown when a service has no usable symbol
pub const DEFAULT_SYMBOL: &str = "globe";

pub const POPULAR_SYMBOLS: &[&str] = &[
    "globe",
    "bolt.fill",
    "server.rack",
    "cloud.fill",
    "lock.fill",
    "key.fill",
    "antenna.radiowaves.left.and.right",
    "network",
    "wifi",
    "wifi.router.fill",
    "laptopcomputer",
    "desktopcomputer",
    "display",
    "terminal.fill",
    "link",
    "cube.box.fill",
    "shippingbox.fill",
    "tray.full.fill",
    "circle.grid.2x2.fill",
    "square.grid.2x2.fill",
    "rectangle.stack.fill",
    "gearshape.fill",
    "wrench.and.screwdriver.fill",
    "hammer.fill",
    "paperplane.fill",
    "bookmark.fill",
    "doc.text.fill",
    "folder.fill",
    "shield.lefthalf.fill",
    "checkmark.seal.fill",
    "exclamationmark.triangle.fill",
    "power",
    "play.circle.fill",
    "pause.circle.fill",
    "stop.circle.fill",
    "bell.fill",
    "bell.badge.fill",
    "clock.fill",
];

/// The symbol to render for a stored (possibly absent) identifier
pub fn symbol_or_default(symbol: Option<&str>) -> &str {
    match symbol.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => DEFAULT_SYMBOL,
    }
}

/// Popular symbols containing `query` (caseless); all of them for a blank query
pub fn search_symbols(query: &str) -> Vec<&'static str> {
    let query = query.trim();
    if query.is_empty() {
        return POPULAR_SYMBOLS.to_vec();
    }
    let needle: String = query.to_lowercase();
    POPULAR_SYMBOLS
        .iter()
        .copied()
        .filter(|symbol| symbol.to_lowercase().contains(&needle))
        .collect()
}
