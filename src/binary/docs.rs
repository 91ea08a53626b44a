// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document metadata section.
//!
//! ```text
//! count: varint
//! for each document:
//!   title:        [len: varint][utf8]
//!   href_prefix:  varint   (0 = none, else 1-based into the href-prefix dictionary)
//!   href_rest:    [len: varint][utf8]
//!   category:     varint   (0 = none, else 1-based into the category dictionary)
//!   heading_count: varint
//!   headings:     heading_count x ([section_id][text], both length-prefixed)
//! ```

use super::dict_table::DictTables;
use super::encoding::{encode_string, encode_varint, ByteReader};
use crate::docs::{Document, Heading};
use crate::error::Result;

/// Split an href at its last '/', keeping the slash in the prefix.
fn split_href(href: &str) -> (&str, &str) {
    match href.rfind('/') {
        Some(i) if i > 0 => href.split_at(i + 1),
        _ => ("", href),
    }
}

/// Encode documents, registering categories and href prefixes in `dicts`.
pub fn encode_docs(docs: &[Document], dicts: &mut DictTables, buf: &mut Vec<u8>) {
    encode_varint(docs.len() as u64, buf);
    for doc in docs {
        encode_string(&doc.title, buf);

        let (prefix, rest) = split_href(&doc.href);
        let prefix_ref = if prefix.is_empty() {
            0
        } else {
            dicts.href_prefix.insert(prefix) + 1
        };
        encode_varint(u64::from(prefix_ref), buf);
        encode_string(rest, buf);

        let category_ref = doc
            .category
            .as_deref()
            .map_or(0, |c| dicts.category.insert(c) + 1);
        encode_varint(u64::from(category_ref), buf);

        encode_varint(doc.headings.len() as u64, buf);
        for heading in &doc.headings {
            encode_string(&heading.section_id, buf);
            encode_string(&heading.text, buf);
        }
    }
}

/// Decode the docs section. An empty section is an empty store.
pub fn decode_docs(bytes: &[u8], dicts: &DictTables) -> Result<Vec<Document>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = ByteReader::new(bytes, "docs");
    // title len + prefix + rest len + category + heading count
    let count = reader.count(5)?;
    let mut docs = Vec::with_capacity(count);

    for _ in 0..count {
        let title = reader.string()?;
        let prefix = dicts
            .href_prefix
            .resolve(reader.varint_u32()?, "href prefix")?
            .unwrap_or_default();
        let href = format!("{}{}", prefix, reader.string()?);
        let category = dicts
            .category
            .resolve(reader.varint_u32()?, "category")?
            .map(str::to_string);

        let heading_count = reader.count(2)?;
        let mut headings = Vec::with_capacity(heading_count);
        for _ in 0..heading_count {
            headings.push(Heading {
                section_id: reader.string()?,
                text: reader.string()?,
            });
        }

        docs.push(Document {
            title,
            href,
            category,
            headings,
        });
    }

    if !reader.is_empty() {
        return Err(reader.corrupt("trailing bytes after last document"));
    }
    Ok(docs)
}
