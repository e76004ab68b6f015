use crate::models::{ContentItem, MediaKind, TrendingKind};

/// Navigation targets. Detail routes carry the title only to build a
/// readable slug; the id is what the server resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home { filter: TrendingKind },
    Search { query: Option<String> },
    Movie { id: i64, title: String },
    Tv { id: i64, title: String },
    Season { show_id: i64, season_number: u32 },
}

impl Route {
    pub fn for_item(item: &ContentItem) -> Self {
        Self::detail(item.kind(), item.id(), item.title())
    }

    pub fn detail(kind: MediaKind, id: i64, title: &str) -> Self {
        match kind {
            MediaKind::Movie => Route::Movie {
                id,
                title: title.to_string(),
            },
            MediaKind::Tv => Route::Tv {
                id,
                title: title.to_string(),
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home {
                filter: TrendingKind::All,
            } => "/".to_string(),
            Route::Home { filter } => format!("/?filter={}", filter.as_path()),
            Route::Search { query: None } => "/search".to_string(),
            Route::Search { query: Some(q) } => format!("/search?q={}", urlencoding::encode(q)),
            Route::Movie { id, title } => format!("/movies/{}", item_slug(*id, title)),
            Route::Tv { id, title } => format!("/tv/{}", item_slug(*id, title)),
            Route::Season {
                show_id,
                season_number,
            } => format!("/tv/{show_id}/season/{season_number}"),
        }
    }
}

/// Id from a `<id>-<title>` slug: the leading run of ASCII digits.
pub fn parse_slug_id(slug: &str) -> Option<i64> {
    let digits: String = slug.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_dash = true;
    for ch in title.chars() {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_end_matches('-').to_string()
}

pub fn item_slug(id: i64, title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        id.to_string()
    } else {
        format!("{id}-{slug}")
    }
}
