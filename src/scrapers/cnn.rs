//! CNN (edition.cnn.com) selectors.
//!
//! The front page groups headlines in a `div.stack__items`. Each headline is
//! a `span.container__headline-text` nested inside the `<a>` that links to
//! the article, so the link is read from the title's nearest enclosing anchor.
//!
//! Article pages keep their body in `div.article__content`.

use super::{SiteAdapter, element_text};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static HEADLINE_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.stack__items").unwrap());
static HEADLINE_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.container__headline-text").unwrap());
static BODY_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.article__content").unwrap());
static BODY_PARAGRAPH: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("p.paragraph.inline-placeholder.vossi-paragraph-primary-core-light").unwrap()
});

#[derive(Debug, Clone, Copy)]
pub struct CnnAdapter;

impl SiteAdapter for CnnAdapter {
    fn base_url(&self) -> &'static str {
        "https://edition.cnn.com"
    }

    fn locate_headline_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&HEADLINE_CONTAINER).next()
    }

    fn extract_title_link_pairs(&self, container: ElementRef<'_>) -> Vec<(String, String)> {
        container
            .select(&HEADLINE_TEXT)
            .filter_map(|title| match enclosing_href(title) {
                Some(href) => Some((element_text(title), href.to_string())),
                None => {
                    debug!(title = %element_text(title), "CNN headline has no enclosing link");
                    None
                }
            })
            .collect()
    }

    fn locate_body_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&BODY_CONTAINER).next()
    }

    fn extract_paragraphs<'a>(&self, container: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        container.select(&BODY_PARAGRAPH).collect()
    }
}

/// `href` of the closest `<a>` ancestor.
fn enclosing_href<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "a")
        .and_then(|anchor| anchor.value().attr("href"))
}
