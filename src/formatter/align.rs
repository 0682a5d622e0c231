//! Alignment helpers
//!
//! Both alignment features are two-pass: measure the anchor column across
//! a list first, then pad every item to that width.

/// Right-pad a string with spaces to the given width (in characters).
pub fn pad_to(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        let mut out = String::with_capacity(width);
        out.push_str(text);
        out.extend(std::iter::repeat(' ').take(width - len));
        out
    }
}

/// Width of the trailing line of a rendered item, normalized by the clause
/// indent so multi-line and single-line items compare on equal footing.
pub fn trailing_line_width(rendered: &str, indent_chars: usize) -> usize {
    match rendered.rsplit_once('\n') {
        Some((_, last)) => last.chars().count().saturating_sub(indent_chars),
        None => rendered.chars().count(),
    }
}

/// Pad the trailing line of a possibly multi-line rendered item.
pub fn pad_trailing_line(rendered: &str, width: usize, indent_chars: usize) -> String {
    match rendered.rsplit_once('\n') {
        Some((head, last)) => {
            let padded = pad_to(last, width + indent_chars);
            format!("{head}\n{padded}")
        }
        None => pad_to(rendered, width),
    }
}
