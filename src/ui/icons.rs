//! Shared icons for terminal output.

use console::Emoji;

pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static LOCK: Emoji<'_, '_> = Emoji("🔒 ", "[LOCKED]");
pub static PENCIL: Emoji<'_, '_> = Emoji("📝 ", ">");
pub static BULB: Emoji<'_, '_> = Emoji("💡 ", "[HINT]");
pub static STAR: Emoji<'_, '_> = Emoji("⭐ ", "*");
pub static QUESTION: Emoji<'_, '_> = Emoji("❓ ", "[Q]");
