//! BBC (www.bbc.com) selectors.
//!
//! The homepage lays out titles (`h2`) and links (`a`) as two separate lists
//! inside one styled container; they are paired by position. When one list
//! is longer than the other, the unmatched tail is dropped.
//!
//! The class names are generated by the BBC's CSS-in-JS build and change
//! whenever the site is redeployed.

use super::{SiteAdapter, element_text};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static HEADLINE_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.sc-5b94fa74-0.sc-e70150c3-3.jbFGkZ.kdbokE").unwrap());
static HEADLINE_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2.sc-4fedabc7-3.zTZri").unwrap());
static HEADLINE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.sc-2e6baa30-0.gILusN").unwrap());
static BODY_CONTAINER: Lazy<Selector> = Lazy::new(|| Selector::parse("div.app").unwrap());
static BODY_PARAGRAPH: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.sc-eb7bd5f6-0.fYAfXe").unwrap());

#[derive(Debug, Clone, Copy)]
pub struct BbcAdapter;

impl SiteAdapter for BbcAdapter {
    fn base_url(&self) -> &'static str {
        "https://www.bbc.com"
    }

    fn locate_headline_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&HEADLINE_CONTAINER).next()
    }

    fn extract_title_link_pairs(&self, container: ElementRef<'_>) -> Vec<(String, String)> {
        let titles = container.select(&HEADLINE_TITLE).map(element_text);
        // Anchors without href still occupy a slot so the pairing stays aligned.
        let links = container
            .select(&HEADLINE_LINK)
            .map(|link| link.value().attr("href").unwrap_or_default().to_string());

        titles
            .zip(links)
            .filter(|(_, href)| !href.is_empty())
            .collect()
    }

    fn locate_body_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&BODY_CONTAINER).next()
    }

    fn extract_paragraphs<'a>(&self, container: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        container.select(&BODY_PARAGRAPH).collect()
    }
}
