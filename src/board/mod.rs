//! Terminal status board.
//!
//! [`TerminalBoard`] is an in-memory [`Surface`] laid out like the status
//! page: one card per configured service (card, link, status text and chart
//! canvas) plus the shared "last updated" line. [`TerminalBoard::draw`]
//! prints it as a table, pulling chart output from [`TerminalCharts`].

mod canvas;

pub use canvas::*;

use crate::render::Surface;
use crate::status::{Bucket, ServiceKey, LAST_UPDATED_ID};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::collections::HashMap;

/// Status text shown before the first report arrives.
pub const INITIAL_STATUS_TEXT: &str = "Checking";
/// Indicator text shown before the first report arrives.
pub const INITIAL_UPDATED_TEXT: &str = "Waiting for first update";

/// A service card to lay out on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardService {
    pub key: ServiceKey,
    pub name: String,
}

impl BoardService {
    pub fn new(key: ServiceKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
        }
    }
}

/// Handle to one element of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Default)]
struct Element {
    class: Option<String>,
    text: String,
    link: Option<String>,
}

#[derive(Debug)]
struct Card {
    service: BoardService,
    card: ElementId,
    link: ElementId,
    status_text: ElementId,
}

/// Element store for the terminal status page.
#[derive(Debug)]
pub struct TerminalBoard {
    ids: HashMap<String, ElementId>,
    elements: Vec<Element>,
    cards: Vec<Card>,
    last_updated: ElementId,
}

impl TerminalBoard {
    /// Lay out a card for every service, in order. Duplicate keys keep the
    /// first card.
    pub fn new(services: impl IntoIterator<Item = BoardService>) -> Self {
        let mut board = Self {
            ids: HashMap::new(),
            elements: Vec::new(),
            cards: Vec::new(),
            last_updated: ElementId(0),
        };
        board.last_updated = board.add_element(LAST_UPDATED_ID);
        board.elements[board.last_updated.0].text = INITIAL_UPDATED_TEXT.to_string();

        for service in services {
            if board.ids.contains_key(&service.key.card_id()) {
                tracing::warn!(service = %service.key, "Duplicate service key on board, skipping");
                continue;
            }
            let card = board.add_element(&service.key.card_id());
            let link = board.add_element(&service.key.link_id());
            let status_text = board.add_element(&service.key.status_text_id());
            board.add_element(&service.key.chart_id());

            board.elements[card.0].class = Some(Bucket::Checking.class_name().to_string());
            board.elements[status_text.0].text = INITIAL_STATUS_TEXT.to_string();

            board.cards.push(Card {
                service,
                card,
                link,
                status_text,
            });
        }
        board
    }

    fn add_element(&mut self, id: &str) -> ElementId {
        let element = ElementId(self.elements.len());
        self.elements.push(Element::default());
        self.ids.insert(id.to_string(), element);
        element
    }

    fn get(&self, id: &str) -> Option<&Element> {
        self.ids.get(id).map(|e| &self.elements[e.0])
    }

    /// Services on the board, in layout order.
    pub fn services(&self) -> impl Iterator<Item = &BoardService> {
        self.cards.iter().map(|c| &c.service)
    }

    pub fn class_of(&self, id: &str) -> Option<&str> {
        self.get(id)?.class.as_deref()
    }

    pub fn text_of(&self, id: &str) -> Option<&str> {
        self.get(id).map(|e| e.text.as_str())
    }

    pub fn link_of(&self, id: &str) -> Option<&str> {
        self.get(id)?.link.as_deref()
    }

    /// Bucket currently shown on the card for `key`.
    pub fn bucket_of(&self, key: &ServiceKey) -> Option<Bucket> {
        self.class_of(&key.card_id()).and_then(Bucket::from_class_name)
    }

    /// Render the board as a table followed by the last-updated line.
    pub fn draw(&self, charts: &TerminalCharts) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Service", "Status", "Link", "History"]);

        for card in &self.cards {
            let element = |id: ElementId| &self.elements[id.0];
            let bucket = element(card.card)
                .class
                .as_deref()
                .and_then(Bucket::from_class_name)
                .unwrap_or(Bucket::Checking);
            let history = charts
                .output(&card.service.key.chart_id())
                .map(|lines| lines.join("\n"))
                .unwrap_or_else(|| "no history".dimmed().to_string());

            table.add_row(vec![
                Cell::new(format!(
                    "{}\n{}",
                    card.service.name,
                    card.service.key.as_str().dimmed()
                )),
                Cell::new(paint_status(bucket, &element(card.status_text).text)),
                Cell::new(element(card.link).link.as_deref().unwrap_or("-")),
                Cell::new(history),
            ]);
        }

        format!("{}\n{}", table, self.elements[self.last_updated.0].text)
    }
}

fn paint_status(bucket: Bucket, text: &str) -> String {
    match bucket {
        Bucket::Online => text.green().to_string(),
        Bucket::Offline => text.red().to_string(),
        Bucket::Error => text.yellow().to_string(),
        Bucket::Checking => text.dimmed().to_string(),
    }
}

impl Surface for TerminalBoard {
    type Element = ElementId;

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.ids.get(id).copied()
    }

    fn set_class_exclusive(&mut self, element: ElementId, tag: &str) {
        self.elements[element.0].class = Some(tag.to_string());
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.elements[element.0].text = text.to_string();
    }

    fn set_link_target(&mut self, element: ElementId, url: &str) {
        self.elements[element.0].link = Some(url.to_string());
    }
}
