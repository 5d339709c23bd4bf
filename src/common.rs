//! Common functionality and types.

use console::Emoji;
use percent_encoding::percent_decode_str;

pub static SUCCESS: Emoji = Emoji("✅ ", "");
pub static ERROR: Emoji = Emoji("❌ ", "");
pub static SERVER: Emoji = Emoji("📡 ", "");
pub static STARTING: Emoji = Emoji("🚀 ", "");
pub static TABLES: Emoji = Emoji("📦 ", "");

/// Clean up an HTTP path into a query string.
///
/// Strips the leading slash and reverses any percent-encoding applied when
/// the query was stuffed into the request path.
pub fn sanitise(path: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}
