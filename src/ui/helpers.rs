//! Display formatters shared by the view models.

/// Two-decimal dollar price.
///
/// ```
/// use storefront::ui::helpers::format_price;
///
/// assert_eq!(format_price(12.5), "$12.50");
/// assert_eq!(format_price(109.949), "$109.95");
/// ```
#[must_use]
pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

/// Star-prefixed rating with one decimal.
#[must_use]
pub fn format_rating(rate: f64) -> String {
    format!("⭐ {rate:.1}")
}

/// Rating with its review count, as shown on the detail screen.
#[must_use]
pub fn format_reviews(rate: f64, count: u64) -> String {
    let noun = if count == 1 { "review" } else { "reviews" };
    format!("{} ({count} {noun})", format_rating(rate))
}

/// "N item(s) available".
#[must_use]
pub fn format_item_count(count: usize) -> String {
    let noun = if count == 1 { "item" } else { "items" };
    format!("{count} {noun} available")
}

/// Upper-cases the first character of each space-separated word and
/// lower-cases the rest.
///
/// ```
/// use storefront::ui::helpers::capitalize_words;
///
/// assert_eq!(capitalize_words("men's CLOTHING"), "Men's Clothing");
/// ```
#[must_use]
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shortens `text` to at most `max` characters, ending in "...".
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
