use annotate_snippets::{
    AnnotationKind, Level, Renderer, Snippet as AnnotateSnippet, renderer::DecorStyle,
};

use crate::location::Location;

/// Render a rustc-like snippet of `text` around `location`.
///
/// The window covers two lines before and after the reported line, clipped to the
/// input. The primary annotation spans from the reported column to the end of the
/// line. Returns `None` when the location does not fall inside `text`.
#[cold]
#[inline(never)]
pub(crate) fn render(text: &str, path: &str, location: Location, msg: &str) -> Option<String> {
    if !location.is_known() || text.is_empty() {
        return None;
    }
    let row = location.line as usize;
    let col = (location.column as usize).max(1);

    let starts = line_starts(text);
    if row == 0 || row > starts.len() {
        return None;
    }

    let total_lines = starts.len();
    let window_start_row = row.saturating_sub(2).max(1);
    let window_end_row = row.saturating_add(2).min(total_lines);

    let window_start = starts[window_start_row - 1];
    let window_end = if window_end_row < total_lines {
        starts[window_end_row]
    } else {
        text.len()
    };
    let window_text = &text[window_start..window_end];

    let line_start = starts[row - 1];
    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |i| line_start + i);
    let line = text[line_start..line_end].trim_end_matches('\r');
    let line_end = line_start + line.len();

    // Columns are character based; the annotation needs byte offsets.
    let start = line
        .char_indices()
        .nth(col - 1)
        .map_or(line_end, |(i, _)| line_start + i);

    let local_start = start - window_start;
    let local_end = line_end.max(start) - window_start;

    let report = &[Level::ERROR
        .primary_title(format!("line {row} column {col}: {msg}"))
        .element(
            AnnotateSnippet::source(window_text)
                .line_start(window_start_row)
                .path(path)
                .fold(false)
                .annotation(
                    AnnotationKind::Primary
                        .span(local_start..local_end)
                        .label(msg),
                ),
        )];

    // Plain ASCII output keeps error strings stable and free of escape sequences.
    let renderer = Renderer::plain().decor_style(DecorStyle::Ascii);
    Some(renderer.render(report).to_string())
}

/// Byte offsets at which each line of `text` starts.
fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        text.char_indices()
            .filter(|(_, c)| *c == '\n')
            .map(|(i, _)| i + 1)
            .filter(|i| *i < text.len()),
    );
    starts
}
