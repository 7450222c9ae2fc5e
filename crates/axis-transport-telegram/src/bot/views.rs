//! View layer for bot UI components
//!
//! HTML message texts and keyboards. Anything derived from user input is
//! escaped before it is embedded.

// Allow non_std_lazy_statics because we use lazy_regex! macro which uses once_cell internally
#![allow(clippy::non_std_lazy_statics)]

use axis_core::angle::AngleUnit;
use axis_core::diagram::DiagramError;
use axis_core::service::TrigReport;
use axis_core::trig::NumericValue;
use html_escape::encode_text;
use lazy_regex::lazy_regex;
use std::time::Duration;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Callback data for switching to degrees
pub const MODE_CALLBACK_DEGREES: &str = "mode:degrees";
/// Callback data for switching to radians
pub const MODE_CALLBACK_RADIANS: &str = "mode:radians";

/// Match `code` spans in plain-text messages
static RE_CODE_SPAN: lazy_regex::Lazy<regex::Regex> = lazy_regex!(r"`([^`]+)`");

/// Escape plain text and turn backtick spans into `<code>` tags.
#[must_use]
pub fn plain_to_html(text: &str) -> String {
    let escaped = encode_text(text);
    RE_CODE_SPAN
        .replace_all(&escaped, "<code>$1</code>")
        .into_owned()
}

/// Unit selected by a mode keyboard callback.
#[must_use]
pub fn mode_from_callback(data: &str) -> Option<AngleUnit> {
    match data {
        MODE_CALLBACK_DEGREES => Some(AngleUnit::Degrees),
        MODE_CALLBACK_RADIANS => Some(AngleUnit::Radians),
        _ => None,
    }
}

/// Inline keyboard offering both units, the current one ticked.
#[must_use]
pub fn mode_keyboard(current: AngleUnit) -> InlineKeyboardMarkup {
    let label = |unit: AngleUnit, text: &str| {
        if unit == current {
            format!("✅ {text}")
        } else {
            text.to_string()
        }
    };
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(label(AngleUnit::Degrees, "Degrees"), MODE_CALLBACK_DEGREES),
        InlineKeyboardButton::callback(label(AngleUnit::Radians, "Radians"), MODE_CALLBACK_RADIANS),
    ]])
}

/// Welcome text for `/start`.
#[must_use]
pub fn welcome_message(prefix: &str) -> String {
    format!(
        "📐 <b>Hi! I am a trigonometry bot.</b>\n\n\
         Send me an angle and I will tell you its sine, cosine and tangent, \
         exact values included for the standard angles.\n\n\
         Try <code>/trig 30</code>, <code>/sin pi/6</code> or <code>/circle 135</code>.\n\n\
         {}",
        help_message(prefix)
    )
}

/// Command overview for `/help`.
#[must_use]
pub fn help_message(prefix: &str) -> String {
    let prefix = encode_text(prefix);
    format!(
        "<b>Commands</b>\n\
         • /sin, /cos, /tan <i>angle</i>: one function\n\
         • /trig <i>angle</i>: all three at once\n\
         • /mode <i>degrees|radians</i>: how plain numbers are read\n\
         • /circle <i>[angle]</i>: unit circle diagram\n\n\
         <b>Angles</b>\n\
         <code>30</code>, <code>-45.5</code>, <code>1/2</code>, <code>pi/6</code>, \
         <code>3π/4</code>, <code>(1+2)*pi/12</code>\n\
         Anything with π is radians; plain numbers follow your /mode.\n\n\
         <i>Text commands work too: <code>{prefix}sin 30</code></i>"
    )
}

/// HTML rendering of a trig answer.
#[must_use]
pub fn render_report(report: &TrigReport) -> String {
    let mut lines = vec![format!("<b>{}</b>", encode_text(&report.title))];
    for row in &report.rows {
        let function = row.function.short_name();
        let line = match (row.exact, row.numeric) {
            (_, NumericValue::Undefined) => format!("{function} = <b>undefined</b>"),
            (_, NumericValue::Error) => format!("{function} = <i>error</i>"),
            (Some(exact), numeric) => {
                format!("{function} = <b>{exact}</b> ≈ <code>{numeric}</code>")
            }
            (None, numeric) => format!("{function} ≈ <code>{numeric}</code>"),
        };
        lines.push(line);
    }
    lines.push(String::new());
    lines.push(format!(
        "<i>Angle {} · Quadrant {} · reference angle {} · normalized {}</i>",
        report.angle.degrees_label(),
        report.angle.quadrant.number(),
        report.angle.reference_label(),
        report.angle.normalized_label()
    ));
    lines.join("\n")
}

/// Prompt shown by `/mode` without an argument.
#[must_use]
pub fn mode_prompt(current: AngleUnit) -> String {
    format!("Plain numbers are currently read as <b>{current}</b>. Choose a unit:")
}

/// Confirmation after a unit change.
#[must_use]
pub fn mode_changed(unit: AngleUnit) -> String {
    format!("✅ Plain numbers will now be read as <b>{unit}</b>.")
}

/// Caption for a rendered diagram.
#[must_use]
pub fn circle_caption(highlight: Option<&str>) -> String {
    match highlight {
        Some(angle) => format!(
            "Unit circle with <b>{}</b> highlighted in red",
            encode_text(angle.trim())
        ),
        None => "Unit circle".to_string(),
    }
}

/// Reply when no renderer could be set up.
#[must_use]
pub fn renderer_unavailable() -> String {
    plain_to_html(DiagramError::Unavailable(String::new()).user_message())
}

/// Reply while a user is in render cooldown.
#[must_use]
pub fn circle_cooldown(remaining: Duration) -> String {
    let secs = remaining.as_secs().max(1);
    format!("⏳ Please wait {secs}s before requesting another diagram.")
}

/// Statistics for `/stats`.
#[must_use]
pub fn stats_message(
    users_with_preference: usize,
    renderer_available: bool,
    cooldown: Duration,
    cooldown_entries: u64,
    throttled: u64,
) -> String {
    let renderer = if renderer_available {
        "available"
    } else {
        "unavailable (no label font)"
    };
    format!(
        "<b>📊 Bot Statistics</b>\n\n\
         • Users with a unit preference: {users_with_preference}\n\
         • Diagram renderer: {renderer}\n\n\
         <b>Diagram throttling:</b>\n\
         • Cooldown: {} s\n\
         • Tracked users: {cooldown_entries}\n\
         • Throttled requests: {throttled}",
        cooldown.as_secs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_to_html_escapes_and_marks_code() {
        assert_eq!(
            plain_to_html("I couldn't understand the angle `<b>x</b>`."),
            "I couldn't understand the angle <code>&lt;b&gt;x&lt;/b&gt;</code>."
        );
    }

    #[test]
    fn test_mode_callbacks_round_trip() {
        assert_eq!(mode_from_callback(MODE_CALLBACK_DEGREES), Some(AngleUnit::Degrees));
        assert_eq!(mode_from_callback(MODE_CALLBACK_RADIANS), Some(AngleUnit::Radians));
        assert_eq!(mode_from_callback("mode:gradians"), None);
    }

    #[test]
    fn test_mode_keyboard_ticks_current_unit() {
        let keyboard = mode_keyboard(AngleUnit::Radians);
        let labels: Vec<&str> = keyboard.inline_keyboard[0]
            .iter()
            .map(|button| button.text.as_str())
            .collect();
        assert_eq!(labels, ["Degrees", "✅ Radians"]);
    }

    #[test]
    fn test_caption_escapes_input() {
        assert_eq!(
            circle_caption(Some(" 1<2 ")),
            "Unit circle with <b>1&lt;2</b> highlighted in red"
        );
        assert_eq!(circle_caption(None), "Unit circle");
    }

    #[test]
    fn test_cooldown_never_shows_zero() {
        assert_eq!(
            circle_cooldown(Duration::from_millis(300)),
            "⏳ Please wait 1s before requesting another diagram."
        );
    }

    #[test]
    fn test_help_escapes_prefix() {
        assert!(help_message("<").contains("<code>&lt;sin 30</code>"));
    }
}
