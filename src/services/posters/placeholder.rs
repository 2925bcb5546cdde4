use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::models::{truncate, MovieRecord};

/// Gradient stops, picked by `movie_id % len`
const GRADIENTS: [(&str, &str); 8] = [
    ("#667eea", "#764ba2"),
    ("#f093fb", "#f5576c"),
    ("#4facfe", "#00f2fe"),
    ("#43e97b", "#38f9d7"),
    ("#fa709a", "#fee140"),
    ("#a8edea", "#fed6e3"),
    ("#ffecd2", "#fcb69f"),
    ("#ff9a9e", "#fecfef"),
];

const TITLE_CHARS: usize = 25;

/// Renders a 200x300 poster card for `movie`
///
/// Output depends only on the movie id and title.
pub fn placeholder_svg(movie: &MovieRecord) -> String {
    let id = movie.id.0;
    let (from, to) = GRADIENTS[(id % GRADIENTS.len() as u64) as usize];
    let title = escape_xml(&truncate(&movie.title, TITLE_CHARS));

    format!(
        r##"<svg width="200" height="300" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="grad{id}" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:{from};stop-opacity:1"/>
      <stop offset="100%" style="stop-color:{to};stop-opacity:1"/>
    </linearGradient>
  </defs>
  <rect width="200" height="300" fill="url(#grad{id})" rx="15" ry="15"/>
  <circle cx="100" cy="120" r="25" fill="rgba(255,255,255,0.2)"/>
  <text x="100" y="130" font-family="Arial, sans-serif" font-size="20" fill="white" text-anchor="middle">&#127916;</text>
  <text x="100" y="180" font-family="Arial, sans-serif" font-size="12" font-weight="bold" fill="white" text-anchor="middle">{title}</text>
  <text x="100" y="200" font-family="Arial, sans-serif" font-size="10" fill="rgba(255,255,255,0.8)" text-anchor="middle">ID: {id}</text>
  <rect x="0" y="0" width="200" height="300" fill="none" stroke="rgba(255,255,255,0.3)" stroke-width="1" rx="15" ry="15"/>
</svg>"##
    )
}

/// The placeholder as an inline `data:` URI usable directly in an `<img src>`
pub fn placeholder_data_uri(movie: &MovieRecord) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(placeholder_svg(movie))
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
