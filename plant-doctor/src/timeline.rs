//! Renders the progression timeline card for a disease.

use crate::knowledge;

/// Builds the full timeline text for `label`.
///
/// The layout is stable because the web client renders it verbatim: stage
/// blocks in fixed order, one `- Accelerated by:` / `- Slowed by:` line per
/// factor, then the expert notes. Labels without authored data get the
/// generic fallback timeline under their own heading.
pub fn render_timeline(label: &str) -> String {
    let t = knowledge::timeline_for(label);

    let mut out = String::new();
    out.push_str(&format!("\n⏳ **{label} Progression Timeline**\n\n"));
    out.push_str(&format!(
        "🌱 Early Stage:\n- {}\n- First visible signs appear\n\n",
        t.early
    ));
    out.push_str(&format!(
        "🔄 Middle Stage:\n- {}\n- Disease becomes well-established\n\n",
        t.middle
    ));
    out.push_str(&format!(
        "⚠️ Late Stage:\n- {}\n- Plant health severely compromised\n\n",
        t.late
    ));
    out.push_str(&format!(
        "🛑 Critical Point:\n- {}\n- Beyond this point, recovery is unlikely\n\n",
        t.critical
    ));
    out.push_str("⚡ Progression Factors:\n");
    for factor in t.speed_factors {
        out.push_str(&format!("- Accelerated by: {factor}\n"));
    }
    out.push('\n');
    for factor in t.slow_factors {
        out.push_str(&format!("- Slowed by: {factor}\n"));
    }
    out.push_str("\n\n💡 Expert Notes:\n");
    for note in t.special_notes {
        out.push_str(note);
        out.push('\n');
    }
    out.push('\n');
    out
}
