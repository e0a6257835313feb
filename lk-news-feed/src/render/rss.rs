use crate::config::FeedMetadata;
use crate::edition::Edition;
use crate::summary::summarize;
use crate::traits::FeedRenderer;
use crate::types::{FeedError, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

pub const CONTENT_NS: &str = "http://purl.org/rss/1.0/modules/content/";
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// Minutes readers may cache the channel.
const TTL_MINUTES: &str = "60";

/// RSS 2.0 with `content:encoded` bodies and an `atom:link rel="self"`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RssRenderer;

impl FeedRenderer for RssRenderer {
    fn format_name(&self) -> &'static str {
        "rss"
    }

    fn render(&self, editions: &[Edition], metadata: &FeedMetadata) -> Result<String> {
        let mut xml = XmlWriter::new();

        xml.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        rss.push_attribute(("xmlns:content", CONTENT_NS));
        rss.push_attribute(("xmlns:atom", ATOM_NS));
        xml.event(Event::Start(rss))?;
        xml.start("channel")?;

        xml.text_element("title", &metadata.title)?;
        xml.text_element("link", &metadata.home_page_url)?;
        xml.text_element("description", &metadata.description)?;
        xml.text_element("language", &metadata.language)?;
        // Newest edition rather than wall-clock time, so unchanged input
        // renders to unchanged bytes.
        if let Some(newest) = editions.first() {
            xml.text_element("lastBuildDate", &newest.pub_date_rfc822())?;
        }
        xml.text_element("generator", &metadata.generator)?;
        xml.text_element("ttl", TTL_MINUTES)?;

        let mut self_link = BytesStart::new("atom:link");
        self_link.push_attribute(("rel", "self"));
        self_link.push_attribute(("type", "application/rss+xml"));
        self_link.push_attribute(("href", metadata.rss_url.as_str()));
        xml.event(Event::Empty(self_link))?;

        for edition in editions {
            write_item(&mut xml, edition, metadata)?;
        }

        xml.end("channel")?;
        xml.end("rss")?;

        xml.finish()
    }
}

fn write_item(xml: &mut XmlWriter, edition: &Edition, metadata: &FeedMetadata) -> Result<()> {
    xml.start("item")?;
    xml.text_element("title", &edition.title(&metadata.title))?;
    xml.text_element("link", edition.url())?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "false"));
    xml.event(Event::Start(guid))?;
    xml.event(Event::Text(BytesText::new(&edition.guid(&metadata.guid_prefix))))?;
    xml.end("guid")?;

    xml.text_element("pubDate", &edition.pub_date_rfc822())?;
    xml.text_element("description", &summarize(edition.content_html(), &metadata.title))?;

    xml.start("content:encoded")?;
    for chunk in cdata_chunks(edition.content_html()) {
        xml.event(Event::CData(BytesCData::new(chunk)))?;
    }
    xml.end("content:encoded")?;

    xml.end("item")
}

/// Split `text` so that no chunk contains `]]>`; each chunk can then be
/// emitted as its own CDATA section and the concatenation is `text` again.
pub fn cdata_chunks(text: &str) -> Vec<String> {
    let parts: Vec<&str> = text.split("]]>").collect();
    let last = parts.len() - 1;

    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let mut chunk = String::with_capacity(part.len() + 3);
            if i > 0 {
                chunk.push('>');
            }
            chunk.push_str(part);
            if i < last {
                chunk.push_str("]]");
            }
            chunk
        })
        .collect()
}

struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| FeedError::Render(format!("RSS write failed: {}", e)))
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.event(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(self) -> Result<String> {
        let bytes = self.writer.into_inner().into_inner();
        let mut document = String::from_utf8(bytes)
            .map_err(|e| FeedError::Render(format!("RSS output is not UTF-8: {}", e)))?;
        document.push('\n');
        Ok(document)
    }
}
