use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;
use crate::record::{ExerciseRecord, NOT_AVAILABLE, NOT_SPECIFIED, UNKNOWN_NAME};

/// Label the site puts in front of the comma-separated muscle list.
pub const MUSCLE_LABEL: &str = "Primary Muscles:";

const CONTAINER_CSS: &str = "section.exercise_list";
const ENTRY_CSS: &str = "article.entry";
const TITLE_LINK_CSS: &str = "h2.title a";
const MUSCLES_CSS: &str = "div.exercise_meta.primary_muscles";
const THUMBNAIL_IMAGE_CSS: &str = "div.thumbnails img";

/// A piece of data read from one listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    DetailLink,
    /// Raw muscle metadata text, label included.
    PrimaryMuscles,
    ImageLink,
}

/// Structural lookups on a listing page.
///
/// [`extract`] is written against this trait rather than a concrete HTML
/// parser.
pub trait ListingDocument {
    type Node<'a>: Copy
    where
        Self: 'a;

    /// The node holding every entry, or `None` when the page has no listing.
    fn find_container(&self) -> Option<Self::Node<'_>>;

    /// Entries inside `container`, in document order.
    fn find_entries<'a>(&'a self, container: Self::Node<'a>) -> Vec<Self::Node<'a>>;

    fn find_field<'a>(&'a self, entry: Self::Node<'a>, field: Field) -> Option<String>;
}

/// Compiled CSS selectors for the exercise listing markup.
#[derive(Debug, Clone)]
pub struct PageSelectors {
    container: Selector,
    entry: Selector,
    title_link: Selector,
    muscles: Selector,
    thumbnail_image: Selector,
}

impl PageSelectors {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            container: parse_selector(CONTAINER_CSS)?,
            entry: parse_selector(ENTRY_CSS)?,
            title_link: parse_selector(TITLE_LINK_CSS)?,
            muscles: parse_selector(MUSCLES_CSS)?,
            thumbnail_image: parse_selector(THUMBNAIL_IMAGE_CSS)?,
        })
    }
}

fn parse_selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::InvalidSelector(format!("{}: {}", css, e)))
}

/// A parsed listing page.
pub struct HtmlPage<'s> {
    document: Html,
    selectors: &'s PageSelectors,
}

impl<'s> HtmlPage<'s> {
    pub fn parse(html: &str, selectors: &'s PageSelectors) -> Self {
        Self {
            document: Html::parse_document(html),
            selectors,
        }
    }
}

impl ListingDocument for HtmlPage<'_> {
    type Node<'a>
        = ElementRef<'a>
    where
        Self: 'a;

    fn find_container(&self) -> Option<ElementRef<'_>> {
        self.document.select(&self.selectors.container).next()
    }

    fn find_entries<'a>(&'a self, container: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        container.select(&self.selectors.entry).collect()
    }

    fn find_field<'a>(&'a self, entry: ElementRef<'a>, field: Field) -> Option<String> {
        let s = self.selectors;
        match field {
            Field::Name => entry
                .select(&s.title_link)
                .next()
                .map(|a| a.text().collect::<String>().trim().to_string()),
            Field::DetailLink => entry
                .select(&s.title_link)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
            Field::PrimaryMuscles => entry
                .select(&s.muscles)
                .next()
                .map(|div| div.text().collect::<String>()),
            Field::ImageLink => entry
                .select(&s.thumbnail_image)
                .next()
                .and_then(|img| img.value().attr("src"))
                .map(str::to_string),
        }
    }
}

/// Extract every record on the page.
///
/// Each entry expands into one record per listed muscle. Missing markup falls
/// back to placeholder values; a page without a listing yields nothing.
pub fn extract<D: ListingDocument>(doc: &D) -> Vec<ExerciseRecord> {
    let Some(container) = doc.find_container() else {
        return Vec::new();
    };

    doc.find_entries(container)
        .into_iter()
        .flat_map(|entry| expand_entry(doc, entry))
        .collect()
}

/// Parse `html` and extract its records.
pub fn extract_html(html: &str, selectors: &PageSelectors) -> Vec<ExerciseRecord> {
    extract(&HtmlPage::parse(html, selectors))
}

fn expand_entry<'a, D: ListingDocument>(doc: &'a D, entry: D::Node<'a>) -> Vec<ExerciseRecord> {
    let name = doc
        .find_field(entry, Field::Name)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let detail_link = doc
        .find_field(entry, Field::DetailLink)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let image_link = doc
        .find_field(entry, Field::ImageLink)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    split_muscles(doc.find_field(entry, Field::PrimaryMuscles).as_deref())
        .into_iter()
        .map(|primary_muscle| ExerciseRecord {
            name: name.clone(),
            primary_muscle,
            detail_link: detail_link.clone(),
            image_link: image_link.clone(),
        })
        .collect()
}

/// Turn "Primary Muscles: Lats, Biceps" into `["Lats", "Biceps"]`.
fn split_muscles(text: Option<&str>) -> Vec<String> {
    match text {
        Some(text) => text
            .replace(MUSCLE_LABEL, "")
            .trim()
            .split(',')
            .map(|muscle| muscle.trim().to_string())
            .collect(),
        None => vec![NOT_SPECIFIED.to_string()],
    }
}
