///! HTML page renderer
///!
///! Pages are built from embedded templates by placeholder replacement.
///! Everything coming from upstream data or the query string is escaped,
///! and substituted values are never scanned for placeholders again.
use groupie_common::{Filters, MergedArtist, SearchType};

const LAYOUT_TEMPLATE: &str = include_str!("../../resources/templates/layout.html");
const WELCOME_TEMPLATE: &str = include_str!("../../resources/templates/welcome.html");
const HOME_TEMPLATE: &str = include_str!("../../resources/templates/home.html");
const ARTIST_TEMPLATE: &str = include_str!("../../resources/templates/artist.html");
const ERROR_TEMPLATE: &str = include_str!("../../resources/templates/error.html");

const SITE_NAME: &str = "Groupie Tracker";
const MEMBER_COUNT_CHOICES: std::ops::RangeInclusive<usize> = 1..=8;
const SEARCH_TYPES: [(SearchType, &str); 5] = [
    (SearchType::General, "General Search"),
    (SearchType::Name, "Artist / Member"),
    (SearchType::Location, "Location"),
    (SearchType::Date, "Concert Date"),
    (SearchType::Other, "Artist Name"),
];

/// Escape text for HTML element content and quoted attribute values
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Human-readable location key: `north_carolina-usa` → `North Carolina Usa`
pub fn display_location(key: &str) -> String {
    key.replace(['_', '-'], " ")
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace every `{{KEY}}` in one pass over `template`. Unknown keys are
/// kept as they are.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        filled.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            filled.push_str(&rest[start..]);
            return filled;
        };

        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => filled.push_str(value),
            None => filled.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }

    filled.push_str(rest);
    filled
}

fn render_layout(title: &str, content: &str) -> String {
    fill_template(
        LAYOUT_TEMPLATE,
        &[("TITLE", escape_html(title).as_str()), ("CONTENT", content)],
    )
}

pub fn render_welcome() -> String {
    render_layout(SITE_NAME, WELCOME_TEMPLATE)
}

pub fn render_error(title: &str, message: &str) -> String {
    let content = fill_template(
        ERROR_TEMPLATE,
        &[
            ("HEADING", escape_html(title).as_str()),
            ("MESSAGE", escape_html(message).as_str()),
        ],
    );
    render_layout(&format!("{} - {}", title, SITE_NAME), &content)
}

/// Artist grid with the search bar and the filter form reflecting `filters`
pub fn render_home(artists: &[&MergedArtist], filters: &Filters) -> String {
    let content = fill_template(
        HOME_TEMPLATE,
        &[
            ("SEARCH_QUERY", escape_html(&filters.search_query).as_str()),
            ("SEARCH_TYPE", filters.search_type.as_str()),
            ("SEARCH_TYPE_OPTIONS", search_type_options(filters.search_type).as_str()),
            ("CREATION_MIN", filters.creation_min.to_string().as_str()),
            ("CREATION_MAX", filters.creation_max.to_string().as_str()),
            ("ALBUM_MIN", filters.album_min.to_string().as_str()),
            ("ALBUM_MAX", filters.album_max.to_string().as_str()),
            ("MEMBER_CHECKBOXES", member_checkboxes(&filters.band_members).as_str()),
            ("LOCATION_INPUTS", location_inputs(&filters.locations).as_str()),
            ("RESULT_COUNT", artists.len().to_string().as_str()),
            ("ARTIST_CARDS", artist_cards(artists).as_str()),
        ],
    );

    render_layout(&format!("Home - {}", SITE_NAME), &content)
}

pub fn render_artist(entry: &MergedArtist) -> String {
    let artist = &entry.artist;

    let members: String = artist
        .members
        .iter()
        .map(|m| format!("<li>{}</li>", escape_html(m)))
        .collect();

    let concerts = if entry.relations.dates_locations.is_empty() {
        r#"<p class="empty">No concerts recorded.</p>"#.to_string()
    } else {
        entry
            .relations
            .dates_locations
            .iter()
            .map(|(location, dates)| {
                let dates: String = dates
                    .iter()
                    .map(|d| format!(r#"<p class="date">{}</p>"#, escape_html(d)))
                    .collect();
                format!(
                    r#"<div class="location-card"><h3 class="location-name" data-location="{}">{}</h3><div class="concert-dates">{}</div></div>"#,
                    escape_html(location),
                    escape_html(&display_location(location)),
                    dates
                )
            })
            .collect()
    };

    let content = fill_template(
        ARTIST_TEMPLATE,
        &[
            ("IMAGE", escape_html(&artist.image).as_str()),
            ("NAME", escape_html(&artist.name).as_str()),
            ("CREATION_DATE", artist.creation_date.to_string().as_str()),
            ("FIRST_ALBUM", escape_html(&artist.first_album).as_str()),
            ("MEMBERS", members.as_str()),
            ("CONCERTS", concerts.as_str()),
        ],
    );

    render_layout(&format!("{} - {}", artist.name, SITE_NAME), &content)
}

fn search_type_options(selected: SearchType) -> String {
    SEARCH_TYPES
        .iter()
        .map(|(search_type, label)| {
            let marker = if *search_type == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, search_type.as_str(), marker, label)
        })
        .collect()
}

fn member_checkboxes(checked: &[String]) -> String {
    MEMBER_COUNT_CHOICES
        .map(|count| {
            let value = count.to_string();
            let marker = if checked.contains(&value) { " checked" } else { "" };
            format!(
                r#"<label><input type="checkbox" name="bandMembers" value="{0}"{1}> {0}</label>"#,
                value, marker
            )
        })
        .collect()
}

/// One input per selected location plus an empty one for adding another
fn location_inputs(locations: &[String]) -> String {
    locations
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(""))
        .map(|location| {
            format!(
                r#"<input type="text" name="locations" value="{}" placeholder="e.g. Texas, USA">"#,
                escape_html(location)
            )
        })
        .collect()
}

fn artist_cards(artists: &[&MergedArtist]) -> String {
    if artists.is_empty() {
        return r#"<p class="empty">No artists match these filters.</p>"#.to_string();
    }

    artists
        .iter()
        .map(|entry| {
            format!(
                r#"<a class="artist-card" href="/artist/{}"><img src="{}" alt="{}" loading="lazy"><h2>{}</h2><p>{} &middot; {} members</p></a>"#,
                entry.id(),
                escape_html(&entry.artist.image),
                escape_html(&entry.artist.name),
                escape_html(&entry.artist.name),
                entry.artist.creation_date,
                entry.member_count()
            )
        })
        .collect()
}
