//! Fixed-position layout of a request onto A4 pages.
//!
//! All coordinates are millimetres measured from the top-left corner of the
//! page; `y` of a text element is its baseline.

use chrono::NaiveDate;

use super::metrics::{ELLIPSIS, MM_PER_PT, ellipsize, wrap};
use crate::domain::{Issue, OverflowPolicy, Priority, RequestRecord, Requester};

/// Page width (A4).
pub const PAGE_WIDTH: f32 = 210.0;
/// Page height (A4).
pub const PAGE_HEIGHT: f32 = 297.0;

const MARGIN_X: f32 = 20.0;
const BOX_WIDTH: f32 = 170.0;
const TEXT_X: f32 = 25.0;
const BOX_PADDING: f32 = 4.0;

const TITLE_Y: f32 = 30.0;
const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 16.0;
const REFERENCE_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;
const BADGE_TEXT_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 9.0;

const REFERENCE_Y: f32 = 45.0;
const DATE_Y: f32 = 52.0;

const BADGE_X: f32 = 150.0;
const BADGE_Y: f32 = 43.0;
const BADGE_WIDTH: f32 = 40.0;
const BADGE_HEIGHT: f32 = 12.0;
const BADGE_RADIUS: f32 = 2.0;
const BADGE_TEXT_Y: f32 = 50.0;

const REQUESTER_HEADING_Y: f32 = 70.0;
const REQUESTER_BOX_Y: f32 = 75.0;
const REQUESTER_BOX_HEIGHT: f32 = 45.0;
const REQUESTER_TEXT_Y: f32 = 84.0;
const FIELD_STEP: f32 = 8.0;

const ISSUE_HEADING_Y: f32 = 135.0;
const ISSUE_BOX_Y: f32 = 140.0;
const ISSUE_BOX_HEIGHT: f32 = 25.0;
const ISSUE_TEXT_Y: f32 = 150.0;

const DESCRIPTION_HEADING_Y: f32 = 195.0;
const DESCRIPTION_BOX_Y: f32 = 200.0;
const DESCRIPTION_BOX_HEIGHT: f32 = 50.0;
const DESCRIPTION_TEXT_Y: f32 = 210.0;
const DESCRIPTION_WIDTH: f32 = 160.0;

const CONTINUATION_HEADING_Y: f32 = 30.0;
const CONTINUATION_BOX_Y: f32 = 35.0;
const CONTINUATION_BOX_HEIGHT: f32 = 242.0;
const CONTINUATION_TEXT_Y: f32 = 45.0;

const FOOTER_Y: f32 = 287.0;

/// Distance between description baselines: the body size at 1.15 line
/// spacing.
const LINE_HEIGHT: f32 = BODY_SIZE * 1.15 * MM_PER_PT;

const HEADING_COLOR: Rgb = Rgb(31, 41, 55);
const MUTED_COLOR: Rgb = Rgb(107, 114, 128);
const BODY_COLOR: Rgb = Rgb(55, 65, 81);
const BORDER_COLOR: Rgb = Rgb(229, 231, 235);
const WHITE: Rgb = Rgb(255, 255, 255);

/// A colour with 8-bit red, green and blue channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Fill colour of the priority badge.
#[must_use]
pub const fn badge_color(priority: Priority) -> Rgb {
    match priority {
        Priority::Low => Rgb(59, 130, 246),
        Priority::Medium => Rgb(245, 158, 11),
        Priority::High => Rgb(249, 115, 22),
        Priority::Critical => Rgb(239, 68, 68),
    }
}

/// Label printed inside the priority badge.
#[must_use]
pub const fn badge_label(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "BASSE",
        Priority::Medium => "MOYENNE",
        Priority::High => "HAUTE",
        Priority::Critical => "CRITIQUE",
    }
}

/// Horizontal anchoring of a text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `x` is the left edge of the text.
    Left,
    /// `x` is the horizontal centre of the text.
    Center,
}

/// Something drawn on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A single line of Helvetica text.
    Text {
        /// Anchor position, see [`Align`].
        x: f32,
        /// Baseline.
        y: f32,
        /// Font size in points.
        size: f32,
        /// Text colour.
        color: Rgb,
        /// Horizontal anchoring.
        align: Align,
        /// The text.
        text: String,
    },
    /// A stroked rectangle.
    Frame {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
        /// Stroke colour.
        color: Rgb,
    },
    /// A filled rectangle with rounded corners.
    Badge {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
        /// Corner radius.
        radius: f32,
        /// Fill colour.
        color: Rgb,
    },
}

/// The elements of one page, in drawing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    elements: Vec<Element>,
}

impl Page {
    /// The elements in drawing order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The text of every text element, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|element| match element {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn text(&mut self, x: f32, y: f32, size: f32, color: Rgb, text: impl Into<String>) {
        self.elements.push(Element::Text {
            x,
            y,
            size,
            color,
            align: Align::Left,
            text: text.into(),
        });
    }

    fn centered(&mut self, x: f32, y: f32, size: f32, color: Rgb, text: impl Into<String>) {
        self.elements.push(Element::Text {
            x,
            y,
            size,
            color,
            align: Align::Center,
            text: text.into(),
        });
    }

    fn frame(&mut self, y: f32, height: f32) {
        self.elements.push(Element::Frame {
            x: MARGIN_X,
            y,
            width: BOX_WIDTH,
            height,
            color: BORDER_COLOR,
        });
    }

    fn heading(&mut self, y: f32, text: &str) {
        self.text(MARGIN_X, y, HEADING_SIZE, HEADING_COLOR, text);
    }

    fn body_lines<'a>(&mut self, first_baseline: f32, lines: impl IntoIterator<Item = &'a str>) {
        for (line, index) in lines.into_iter().zip(0u16..) {
            let y = LINE_HEIGHT.mul_add(f32::from(index), first_baseline);
            self.text(TEXT_X, y, BODY_SIZE, BODY_COLOR, line);
        }
    }

    /// Title, reference, date and priority badge.
    fn header(&mut self, record: &RequestRecord) {
        let priority = record.issue().priority;

        self.centered(
            PAGE_WIDTH / 2.0,
            TITLE_Y,
            TITLE_SIZE,
            HEADING_COLOR,
            "DEMANDE D'INTERVENTION IT",
        );
        self.text(
            MARGIN_X,
            REFERENCE_Y,
            REFERENCE_SIZE,
            MUTED_COLOR,
            format!("Référence: #{}", record.id().prefix()),
        );
        self.text(
            MARGIN_X,
            DATE_Y,
            REFERENCE_SIZE,
            MUTED_COLOR,
            format!("Date de la demande: {}", record.request_date().format("%Y-%m-%d")),
        );

        self.elements.push(Element::Badge {
            x: BADGE_X,
            y: BADGE_Y,
            width: BADGE_WIDTH,
            height: BADGE_HEIGHT,
            radius: BADGE_RADIUS,
            color: badge_color(priority),
        });
        self.centered(
            BADGE_X + BADGE_WIDTH / 2.0,
            BADGE_TEXT_Y,
            BADGE_TEXT_SIZE,
            WHITE,
            badge_label(priority),
        );
    }

    fn requester_block(&mut self, requester: &Requester) {
        self.heading(REQUESTER_HEADING_Y, "Informations du demandeur");
        self.frame(REQUESTER_BOX_Y, REQUESTER_BOX_HEIGHT);
        let lines = [
            format!("Nom: {}", requester.name),
            format!("ID Employé: {}", requester.employee_id),
            format!("Email: {}", requester.email),
            format!("Département: {}", requester.department),
            format!("Téléphone: {}", requester.phone),
        ];
        let mut y = REQUESTER_TEXT_Y;
        for line in lines {
            self.text(TEXT_X, y, BODY_SIZE, BODY_COLOR, line);
            y += FIELD_STEP;
        }
    }

    /// Category and location, followed by the empty description frame.
    fn issue_block(&mut self, issue: &Issue) {
        self.heading(ISSUE_HEADING_Y, "Détails de l'incident");
        self.frame(ISSUE_BOX_Y, ISSUE_BOX_HEIGHT);
        self.text(
            TEXT_X,
            ISSUE_TEXT_Y,
            BODY_SIZE,
            BODY_COLOR,
            format!("Catégorie: {}", issue.category),
        );
        self.text(
            TEXT_X,
            ISSUE_TEXT_Y + FIELD_STEP,
            BODY_SIZE,
            BODY_COLOR,
            format!(
                "Localisation: Étage {}, Bureau {}",
                issue.location.floor, issue.location.office_number
            ),
        );

        self.heading(DESCRIPTION_HEADING_Y, "Description du problème");
        self.frame(DESCRIPTION_BOX_Y, DESCRIPTION_BOX_HEIGHT);
    }

    fn continuation(lines: &[String]) -> Self {
        let mut page = Self::default();
        page.heading(CONTINUATION_HEADING_Y, "Description du problème (suite)");
        page.frame(CONTINUATION_BOX_Y, CONTINUATION_BOX_HEIGHT);
        page.body_lines(CONTINUATION_TEXT_Y, lines.iter().map(String::as_str));
        page
    }
}

/// Document properties written alongside the pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Document title.
    pub title: String,
    /// Document subject.
    pub subject: String,
    /// Author; the requester's name.
    pub author: String,
    /// Search keywords.
    pub keywords: String,
    /// Producing application.
    pub creator: String,
    /// Creation date; the request date, never the clock.
    pub created: NaiveDate,
}

impl DocumentInfo {
    fn for_record(record: &RequestRecord) -> Self {
        Self {
            title: format!("Demande d'intervention IT - {}", record.id().prefix()),
            subject: "Demande de support IT".to_string(),
            author: record.requester().name.clone(),
            keywords: "IT, Support, Demande".to_string(),
            creator: "Portail Support IT".to_string(),
            created: record.request_date(),
        }
    }
}

/// A request laid out onto one or more pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pages: Vec<Page>,
    info: DocumentInfo,
}

impl Layout {
    /// Lay out `record`.
    ///
    /// The output depends only on the record and the overflow policy.
    #[must_use]
    pub fn new(record: &RequestRecord, overflow: OverflowPolicy) -> Self {
        let mut first = Page::default();
        first.header(record);
        first.requester_block(record.requester());
        first.issue_block(record.issue());

        let lines = wrap(&record.issue().description, DESCRIPTION_WIDTH, BODY_SIZE);
        let mut pages = description_pages(first, lines, overflow);
        number_pages(&mut pages);

        Self {
            pages,
            info: DocumentInfo::for_record(record),
        }
    }

    /// The pages, first to last.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// The document properties.
    #[must_use]
    pub const fn info(&self) -> &DocumentInfo {
        &self.info
    }

    /// The text of every text element on every page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }
}

/// Place the description `lines` on `first` and, when paginating, on as
/// many continuation pages as they need.
fn description_pages(mut first: Page, lines: Vec<String>, overflow: OverflowPolicy) -> Vec<Page> {
    let first_capacity = capacity(
        DESCRIPTION_TEXT_Y,
        DESCRIPTION_BOX_Y + DESCRIPTION_BOX_HEIGHT - BOX_PADDING,
    );

    match overflow {
        OverflowPolicy::Truncate => {
            let visible = truncate(lines, first_capacity);
            first.body_lines(DESCRIPTION_TEXT_Y, visible.iter().map(String::as_str));
            vec![first]
        }
        OverflowPolicy::Paginate => {
            let (head, rest) = lines.split_at(first_capacity.min(lines.len()));
            first.body_lines(DESCRIPTION_TEXT_Y, head.iter().map(String::as_str));

            let continuation_capacity = capacity(
                CONTINUATION_TEXT_Y,
                CONTINUATION_BOX_Y + CONTINUATION_BOX_HEIGHT - BOX_PADDING,
            );
            std::iter::once(first)
                .chain(rest.chunks(continuation_capacity).map(Page::continuation))
                .collect()
        }
    }
}

/// Add a "Page i / n" footer to every page of a multi-page document.
fn number_pages(pages: &mut [Page]) {
    let count = pages.len();
    if count < 2 {
        return;
    }
    for (number, page) in (1..).zip(pages.iter_mut()) {
        page.centered(
            PAGE_WIDTH / 2.0,
            FOOTER_Y,
            FOOTER_SIZE,
            MUTED_COLOR,
            format!("Page {number} / {count}"),
        );
    }
}

/// How many lines fit between `first_baseline` and `last_baseline`.
fn capacity(first_baseline: f32, last_baseline: f32) -> usize {
    (0..=u16::MAX)
        .take_while(|&index| LINE_HEIGHT.mul_add(f32::from(index), first_baseline) <= last_baseline)
        .count()
}

/// Keep the first `capacity` lines, marking the cut with an ellipsis.
fn truncate(mut lines: Vec<String>, capacity: usize) -> Vec<String> {
    if lines.len() <= capacity {
        return lines;
    }
    lines.truncate(capacity);
    if let Some(last) = lines.last_mut() {
        *last = ellipsize(last, DESCRIPTION_WIDTH, BODY_SIZE);
        debug_assert!(last.ends_with(ELLIPSIS));
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::record::tests::complete_record;

    fn with_description(description: &str) -> RequestRecord {
        let mut record = complete_record();
        let issue = Issue {
            description: description.to_string(),
            ..record.issue().clone()
        };
        record.merge(issue.into());
        record
    }

    fn long_description() -> String {
        "Every morning the shared printer on the third floor reports a paper jam although \
         the tray is empty and the rollers look clean. "
            .repeat(12)
    }

    #[test]
    fn badge_colors_are_defined_and_distinct() {
        let colors: HashSet<Rgb> = Priority::ALL.into_iter().map(badge_color).collect();
        assert_eq!(colors.len(), Priority::ALL.len());
    }

    #[test]
    fn badge_labels_are_translated() {
        assert_eq!(badge_label(Priority::Low), "BASSE");
        assert_eq!(badge_label(Priority::Medium), "MOYENNE");
        assert_eq!(badge_label(Priority::High), "HAUTE");
        assert_eq!(badge_label(Priority::Critical), "CRITIQUE");
    }

    #[test]
    fn short_request_fits_on_one_page() {
        let layout = Layout::new(&complete_record(), OverflowPolicy::Paginate);
        assert_eq!(layout.pages().len(), 1);

        let texts: Vec<&str> = layout.texts().collect();
        assert_eq!(texts[0], "DEMANDE D'INTERVENTION IT");
        assert!(texts.contains(&"Référence: #3f2b8c1d"));
        assert!(texts.contains(&"Date de la demande: 2026-10-19"));
        assert!(texts.contains(&"HAUTE"));
        assert!(texts.contains(&"Localisation: Étage 3, Bureau 312"));
        assert!(!texts.iter().any(|text| text.starts_with("Page ")));
    }

    #[test]
    fn badge_sits_in_the_top_right_with_priority_color() {
        let layout = Layout::new(&complete_record(), OverflowPolicy::Paginate);
        let badge = layout.pages()[0]
            .elements()
            .iter()
            .find(|element| matches!(element, Element::Badge { .. }))
            .unwrap();
        assert_eq!(
            badge,
            &Element::Badge {
                x: 150.0,
                y: 43.0,
                width: 40.0,
                height: 12.0,
                radius: 2.0,
                color: Rgb(249, 115, 22),
            }
        );
    }

    #[test]
    fn requester_lines_are_evenly_spaced_inside_their_frame() {
        let layout = Layout::new(&complete_record(), OverflowPolicy::Paginate);
        let baselines: Vec<f32> = layout.pages()[0]
            .elements()
            .iter()
            .filter_map(|element| match element {
                Element::Text { y, .. }
                    if (REQUESTER_BOX_Y..REQUESTER_BOX_Y + REQUESTER_BOX_HEIGHT).contains(y) =>
                {
                    Some(*y)
                }
                _ => None,
            })
            .collect();
        assert_eq!(baselines, vec![84.0, 92.0, 100.0, 108.0, 116.0]);
    }

    #[test]
    fn layout_is_deterministic() {
        let record = with_description(&long_description());
        assert_eq!(
            Layout::new(&record, OverflowPolicy::Paginate),
            Layout::new(&record, OverflowPolicy::Paginate)
        );
    }

    #[test]
    fn long_description_continues_on_a_new_page() {
        let record = with_description(&long_description());
        let layout = Layout::new(&record, OverflowPolicy::Paginate);
        assert_eq!(layout.pages().len(), 2);

        let continuation: Vec<&str> = layout.pages()[1].texts().collect();
        assert_eq!(continuation[0], "Description du problème (suite)");
        assert_eq!(continuation.last(), Some(&"Page 2 / 2"));

        let wrapped = wrap(&long_description(), DESCRIPTION_WIDTH, BODY_SIZE);
        let placed = layout
            .texts()
            .filter(|text| wrapped.iter().any(|line| line == text))
            .count();
        assert_eq!(placed, wrapped.len());
    }

    #[test]
    fn description_lines_stay_inside_the_block() {
        let record = with_description(&long_description());
        let layout = Layout::new(&record, OverflowPolicy::Paginate);
        let bottom = DESCRIPTION_BOX_Y + DESCRIPTION_BOX_HEIGHT;
        for element in layout.pages()[0].elements() {
            if let Element::Text { y, size, .. } = element {
                if *y > DESCRIPTION_BOX_Y && (*size - BODY_SIZE).abs() < f32::EPSILON {
                    assert!(*y < bottom, "baseline {y} overflows the description block");
                }
            }
        }
    }

    #[test]
    fn truncation_keeps_a_single_page() {
        let record = with_description(&long_description());
        let layout = Layout::new(&record, OverflowPolicy::Truncate);
        assert_eq!(layout.pages().len(), 1);

        let last = layout.texts().last().unwrap();
        assert!(last.ends_with(ELLIPSIS));

        let first_capacity = capacity(
            DESCRIPTION_TEXT_Y,
            DESCRIPTION_BOX_Y + DESCRIPTION_BOX_HEIGHT - BOX_PADDING,
        );
        let fixed_elements = complete_record_element_count();
        assert_eq!(
            layout.pages()[0].elements().len(),
            fixed_elements + first_capacity
        );
    }

    fn complete_record_element_count() -> usize {
        // one description line for the fixture record
        Layout::new(&complete_record(), OverflowPolicy::Truncate).pages()[0]
            .elements()
            .len()
            - 1
    }

    #[test]
    fn first_page_holds_nine_description_lines() {
        assert_eq!(
            capacity(
                DESCRIPTION_TEXT_Y,
                DESCRIPTION_BOX_Y + DESCRIPTION_BOX_HEIGHT - BOX_PADDING
            ),
            9
        );
    }

    #[test]
    fn info_uses_request_date_and_requester() {
        let layout = Layout::new(&complete_record(), OverflowPolicy::Paginate);
        assert_eq!(layout.info().author, "Amina Benali");
        assert_eq!(layout.info().title, "Demande d'intervention IT - 3f2b8c1d");
        assert_eq!(
            layout.info().created,
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
    }
}
