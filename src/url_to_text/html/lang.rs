use log::debug;
use scraper::{Html, Selector};
use url::Url;

/// Picks the ingredient rule language for a page: `"sv"` or `"en"`.
///
/// Checked in order: the `<html lang>` attribute, the `og:locale` meta tag,
/// then a `.se` domain in the URL. Defaults to `"en"`.
pub fn detect_lang(markup: &str, url: &str) -> &'static str {
    lang_of_document(&Html::parse_document(markup), url)
}

pub fn lang_of_document(document: &Html, url: &str) -> &'static str {
    let html_lang = Selector::parse("html[lang]")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .and_then(|el| el.value().attr("lang"));
    if let Some(lang) = html_lang.and_then(known_lang) {
        debug!("Language {lang} from <html lang>");
        return lang;
    }

    let og_locale = Selector::parse("meta[property='og:locale']")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .and_then(|el| el.value().attr("content"));
    if let Some(lang) = og_locale.and_then(known_lang) {
        debug!("Language {lang} from og:locale");
        return lang;
    }

    if is_swedish_url(url) {
        debug!("Language sv from URL {url}");
        return "sv";
    }
    "en"
}

fn known_lang(tag: &str) -> Option<&'static str> {
    let tag = tag.trim().to_lowercase();
    if tag.starts_with("sv") {
        Some("sv")
    } else if tag.starts_with("en") {
        Some("en")
    } else {
        None
    }
}

fn is_swedish_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    if lower.ends_with(".se") || lower.contains(".se/") {
        return true;
    }
    Url::parse(&lower)
        .ok()
        .and_then(|u| u.host_str().map(|host| host.ends_with(".se")))
        .unwrap_or(false)
}
