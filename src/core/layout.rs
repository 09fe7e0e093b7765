//! Layout-template transform
//!
//! Translates layouts written with named placeholders into positional
//! `%index:widths` directives. Two indexing modes: named (each field keeps
//! its fixed identity index) and zero-based incremental (placeholders are
//! numbered in order of appearance).

/// Known placeholders with their fixed identity index (array position) and
/// field width. Empty width means unpadded.
const FIELDS: [(&str, &str); 5] = [
    ("timestamp", ""),
    ("threadid", "8"),
    ("loglevel", "-7"),
    ("message", ""),
    ("tag", ""),
];

/// Rewrite `{timestamp} {threadid} {loglevel} {message} {tag}` placeholders
/// into positional directives, e.g. `{loglevel}` becomes `%2:-7s`.
///
/// Inputs already containing `%s` or `%d` are returned unchanged, so the
/// transform can be applied to layouts of either style. Unknown placeholders
/// pass through verbatim.
pub fn to_positional_layout(layout: &str, zero_based_incremental: bool) -> String {
    if layout.contains("%s") || layout.contains("%d") {
        return layout.to_owned();
    }

    let mut out = String::with_capacity(layout.len() + 16);
    let mut rest = layout;
    let mut next_index = 0usize;

    'scan: while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let body = &rest[pos + 1..];
        for (field_index, (name, width)) in FIELDS.iter().enumerate() {
            if let Some(after) = body.strip_prefix(name).and_then(|r| r.strip_prefix('}')) {
                let index = if zero_based_incremental {
                    let index = next_index;
                    next_index += 1;
                    index
                } else {
                    field_index
                };
                out.push('%');
                out.push_str(&index.to_string());
                out.push(':');
                out.push_str(width);
                out.push('s');
                rest = after;
                continue 'scan;
            }
        }
        out.push('{');
        rest = body;
    }
    out.push_str(rest);
    out
}
