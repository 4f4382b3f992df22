//! Text and markup for markers and list items.

use crate::workouts::{Activity, Workout};

/// Popup text of a freshly placed marker.
pub fn popup_text(workout: &Workout) -> String {
    format!("{} {}", workout.kind().icon(), workout.description())
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn detail(icon: &str, value: &str, unit: &str) -> String {
    format!(
        "<div class=\"workout__details\"><span class=\"workout__icon\">{}</span>\
         <span class=\"workout__value\">{}</span>\
         <span class=\"workout__unit\">{}</span></div>",
        icon, value, unit
    )
}

/// Markup of one list entry.
///
/// Raw inputs are shown as integers, the derived metric with one decimal.
pub fn list_item_html(workout: &Workout) -> String {
    let kind = workout.kind();
    let mut html = format!(
        "<li class=\"workout workout--{}\" data-id=\"{}\">\
         <h2 class=\"workout__title\"><span class=\"title\">{}</span> \
         <span class=\"edit__button\">Edit</span> \
         <span class=\"delete__button\">Delete</span></h2>",
        kind.as_str(),
        escape_html(workout.id().as_str()),
        escape_html(workout.description()),
    );

    html.push_str(&detail(kind.icon(), &format!("{:.0}", workout.distance_km()), "km"));
    html.push_str(&detail("⏱", &format!("{:.0}", workout.duration_min()), "min"));

    match workout.activity() {
        Activity::Running { cadence_spm } => {
            html.push_str(&detail("⚡️", &format!("{:.1}", workout.derived_metric()), "min/km"));
            html.push_str(&detail("🦶🏼", &format!("{:.0}", cadence_spm), "spm"));
        }
        Activity::Cycling { elevation_gain_m } => {
            html.push_str(&detail("⚡️", &format!("{:.1}", workout.derived_metric()), "km/h"));
            html.push_str(&detail("⛰", &format!("{:.0}", elevation_gain_m), "m"));
        }
    }

    html.push_str("</li>");
    html
}
