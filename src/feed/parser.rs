//! RSS 2.0 document decoding.
//!
//! The wire format is the classic `channel { title, link, description,
//! item[] }` shape. Unknown elements and attributes are ignored, missing
//! ones default to empty strings, and text fields are HTML-entity
//! unescaped exactly once after the structural decode.

use serde::Deserialize;

/// Top-level RSS document: `<rss><channel>...</channel></rss>`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RssDocument {
    #[serde(default)]
    pub channel: RssChannel,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RssChannel {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "item")]
    pub items: Vec<RssItem>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct RssItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "pubDate")]
    pub pub_date: String,
}

/// Decode raw bytes into a channel, unescaping text fields.
///
/// Links and dates are left untouched: URLs must stay byte-exact because
/// they are the dedup key, and date strings go to the normalizer verbatim.
pub fn parse_channel(bytes: &[u8]) -> Result<RssChannel, quick_xml::DeError> {
    let document: RssDocument = quick_xml::de::from_reader(bytes)?;
    let mut channel = document.channel;

    channel.title = unescape(&channel.title);
    channel.description = unescape(&channel.description);
    for item in &mut channel.items {
        item.title = unescape(&item.title);
        item.description = unescape(&item.description);
    }

    Ok(channel)
}

fn unescape(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
