//! Minimal XLSX worksheet reader.
//!
//! Walks the zip central directory, inflates members with `flate2`, resolves
//! shared strings, and extracts the first worksheet as a string grid. Only
//! the subset of OOXML that spreadsheet writers actually emit for plain
//! tabular data is handled: `<row>`/`<c>`/`<v>` cells, shared strings, and
//! inline strings. Cell values are kept as the stored text — no coercion.

use flate2::read::DeflateDecoder;
use std::fs;
use std::io::{self, ErrorKind, Read};
use std::path::Path;

struct ZipEntry {
    method: u16,
    csize: usize,
    header_offset: usize,
}

/// Read the first worksheet of an XLSX file as rows of string cells.
pub(crate) fn read_grid(path: &Path) -> io::Result<Vec<Vec<String>>> {
    let bytes = fs::read(path)?;
    let entries = central_directory(&bytes)?;

    let shared: Vec<String> = match entries.iter().find(|(n, _)| n == "xl/sharedStrings.xml") {
        Some((_, e)) => {
            let xml = member_bytes(&bytes, e)?;
            parse_shared_strings(&String::from_utf8_lossy(&xml))
        }
        None => Vec::new(),
    };

    let sheet = entries
        .iter()
        .find(|(n, _)| n == "xl/worksheets/sheet1.xml")
        .or_else(|| {
            entries
                .iter()
                .filter(|(n, _)| n.starts_with("xl/worksheets/") && n.ends_with(".xml"))
                .min_by(|a, b| a.0.cmp(&b.0))
        })
        .ok_or_else(|| bad("no worksheet found in workbook"))?;

    let xml = member_bytes(&bytes, &sheet.1)?;
    Ok(parse_sheet(&String::from_utf8_lossy(&xml), &shared))
}

// ---------------------------------------------------------------------------
// Zip container
// ---------------------------------------------------------------------------

fn bad(msg: impl Into<String>) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, msg.into())
}

fn u16le(b: &[u8], off: usize) -> io::Result<u16> {
    b.get(off..off + 2)
        .map(|s| u16::from_le_bytes([s[0], s[1]]))
        .ok_or_else(|| bad("truncated zip data"))
}

fn u32le(b: &[u8], off: usize) -> io::Result<u32> {
    b.get(off..off + 4)
        .map(|s| u32::from_le_bytes([s[0], s[1], s[2], s[3]]))
        .ok_or_else(|| bad("truncated zip data"))
}

/// Locate and parse the central directory. Sizes and offsets are taken from
/// here rather than from local headers, which may carry deferred sizes.
fn central_directory(bytes: &[u8]) -> io::Result<Vec<(String, ZipEntry)>> {
    const EOCD_SIG: [u8; 4] = [0x50, 0x4b, 0x05, 0x06];
    if bytes.len() < 22 {
        return Err(bad("not a zip archive"));
    }
    // EOCD sits in the last 22..~65k bytes depending on the archive comment.
    let scan_start = bytes.len().saturating_sub(66_000);
    let eocd = (scan_start..=bytes.len() - 22)
        .rev()
        .find(|&i| bytes[i..i + 4] == EOCD_SIG)
        .ok_or_else(|| bad("not a zip archive (no end-of-central-directory)"))?;

    let count = u16le(bytes, eocd + 10)? as usize;
    let mut off = u32le(bytes, eocd + 16)? as usize;

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        if u32le(bytes, off)? != 0x0201_4b50 {
            return Err(bad("corrupt central directory"));
        }
        let method = u16le(bytes, off + 10)?;
        let csize = u32le(bytes, off + 20)? as usize;
        let name_len = u16le(bytes, off + 28)? as usize;
        let extra_len = u16le(bytes, off + 30)? as usize;
        let comment_len = u16le(bytes, off + 32)? as usize;
        let header_offset = u32le(bytes, off + 42)? as usize;
        let name_bytes = bytes
            .get(off + 46..off + 46 + name_len)
            .ok_or_else(|| bad("truncated central directory"))?;
        entries.push((
            String::from_utf8_lossy(name_bytes).into_owned(),
            ZipEntry {
                method,
                csize,
                header_offset,
            },
        ));
        off += 46 + name_len + extra_len + comment_len;
    }
    Ok(entries)
}

/// Extract and (if deflated) decompress one zip member.
fn member_bytes(bytes: &[u8], entry: &ZipEntry) -> io::Result<Vec<u8>> {
    let off = entry.header_offset;
    if u32le(bytes, off)? != 0x0403_4b50 {
        return Err(bad("corrupt local file header"));
    }
    // The local extra field may differ in length from the central one.
    let name_len = u16le(bytes, off + 26)? as usize;
    let extra_len = u16le(bytes, off + 28)? as usize;
    let start = off + 30 + name_len + extra_len;
    let data = bytes
        .get(start..start + entry.csize)
        .ok_or_else(|| bad("truncated zip member"))?;

    match entry.method {
        0 => Ok(data.to_vec()),
        8 => {
            let mut out = Vec::new();
            DeflateDecoder::new(data).read_to_end(&mut out)?;
            Ok(out)
        }
        m => Err(bad(format!("unsupported zip compression method {m}"))),
    }
}

// ---------------------------------------------------------------------------
// Worksheet XML
// ---------------------------------------------------------------------------

/// Find the next `<name ...>inner</name>` element. Returns the open tag's
/// attribute text, the inner slice (empty for self-closing tags), and the
/// remainder of the document after the element.
fn next_element<'a>(xml: &'a str, name: &str) -> Option<(&'a str, &'a str, &'a str)> {
    let open = format!("<{name}");
    let mut search = 0;
    loop {
        let pos = xml[search..].find(&open)? + search;
        let after_name = pos + open.len();
        match xml.as_bytes().get(after_name) {
            Some(b'>') | Some(b'/') | Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                let tag_end = xml[after_name..].find('>')? + after_name;
                let attrs = &xml[after_name..tag_end];
                if let Some(stripped) = attrs.strip_suffix('/') {
                    return Some((stripped, "", &xml[tag_end + 1..]));
                }
                let close = format!("</{name}>");
                let inner_start = tag_end + 1;
                let end = xml[inner_start..].find(&close)? + inner_start;
                return Some((attrs, &xml[inner_start..end], &xml[end + close.len()..]));
            }
            // Longer tag name sharing this prefix; keep scanning.
            _ => search = after_name,
        }
    }
}

/// Attribute value from an open tag's attribute text.
fn attr<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let pat = format!("{name}=\"");
    let mut search = 0;
    loop {
        let pos = attrs[search..].find(&pat)? + search;
        let vstart = pos + pat.len();
        let vend = attrs[vstart..].find('"')? + vstart;
        if pos == 0 || attrs.as_bytes()[pos - 1].is_ascii_whitespace() {
            return Some(&attrs[vstart..vend]);
        }
        search = vend;
    }
}

/// Concatenate the text of every `<t>` element in a slice (rich-text runs
/// inside one shared string collapse to their concatenation).
fn collect_t_text(mut xml: &str) -> String {
    let mut out = String::new();
    while let Some((_, inner, rest)) = next_element(xml, "t") {
        out.push_str(&unescape(inner));
        xml = rest;
    }
    out
}

fn parse_shared_strings(mut xml: &str) -> Vec<String> {
    let mut out = Vec::new();
    while let Some((_, inner, rest)) = next_element(xml, "si") {
        out.push(collect_t_text(inner));
        xml = rest;
    }
    out
}

/// Column index from an A1-style cell reference (`"B2"` → 1).
fn col_index(cell_ref: &str) -> Option<usize> {
    let mut idx = 0usize;
    let mut seen = false;
    for c in cell_ref.chars() {
        if !c.is_ascii_alphabetic() {
            break;
        }
        idx = idx * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
        seen = true;
    }
    if seen { Some(idx - 1) } else { None }
}

fn parse_sheet(mut xml: &str, shared: &[String]) -> Vec<Vec<String>> {
    let mut grid: Vec<Vec<String>> = Vec::new();
    while let Some((row_attrs, row_inner, rest)) = next_element(xml, "row") {
        xml = rest;
        // Sparse sheets skip empty rows; pad from the 1-based row number.
        if let Some(rn) = attr(row_attrs, "r").and_then(|v| v.parse::<usize>().ok()) {
            while grid.len() + 1 < rn {
                grid.push(Vec::new());
            }
        }
        let mut cells: Vec<String> = Vec::new();
        let mut cxml = row_inner;
        while let Some((cattrs, cinner, crest)) = next_element(cxml, "c") {
            cxml = crest;
            let col = attr(cattrs, "r").and_then(col_index).unwrap_or(cells.len());
            let ctype = attr(cattrs, "t").unwrap_or("");
            let value = if ctype == "inlineStr" {
                next_element(cinner, "is")
                    .map(|(_, is_inner, _)| collect_t_text(is_inner))
                    .unwrap_or_default()
            } else {
                let raw = next_element(cinner, "v")
                    .map(|(_, v, _)| unescape(v))
                    .unwrap_or_default();
                if ctype == "s" {
                    raw.trim()
                        .parse::<usize>()
                        .ok()
                        .and_then(|i| shared.get(i).cloned())
                        .unwrap_or_default()
                } else {
                    raw
                }
            };
            if cells.len() <= col {
                cells.resize(col + 1, String::new());
            }
            cells[col] = value;
        }
        grid.push(cells);
    }
    grid
}

/// Resolve the five predefined XML entities plus numeric character refs.
fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let Some(end) = rest.find(';') else {
            break;
        };
        let entity = &rest[1..end];
        let replacement = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                u32::from_str_radix(&entity[2..], 16)
                    .ok()
                    .and_then(char::from_u32)
            }
            _ if entity.starts_with('#') => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
            _ => None,
        };
        match replacement {
            Some(ch) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Build an in-memory zip with stored (method 0) members. The reader
    /// never verifies CRCs, so they are left zero.
    fn stored_zip(members: &[(&str, &str)]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();
        for (name, data) in members {
            let offset = out.len() as u32;
            out.extend_from_slice(&[0x50, 0x4b, 0x03, 0x04]);
            out.extend_from_slice(&20u16.to_le_bytes()); // version needed
            out.extend_from_slice(&0u16.to_le_bytes()); // flags
            out.extend_from_slice(&0u16.to_le_bytes()); // method: stored
            out.extend_from_slice(&[0u8; 4]); // mod time/date
            out.extend_from_slice(&0u32.to_le_bytes()); // crc
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            out.extend_from_slice(&(data.len() as u32).to_le_bytes());
            out.extend_from_slice(&(name.len() as u16).to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes()); // extra len
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(data.as_bytes());

            central.extend_from_slice(&[0x50, 0x4b, 0x01, 0x02]);
            central.extend_from_slice(&20u16.to_le_bytes()); // version made by
            central.extend_from_slice(&20u16.to_le_bytes()); // version needed
            central.extend_from_slice(&0u16.to_le_bytes()); // flags
            central.extend_from_slice(&0u16.to_le_bytes()); // method
            central.extend_from_slice(&[0u8; 4]); // mod time/date
            central.extend_from_slice(&0u32.to_le_bytes()); // crc
            central.extend_from_slice(&(data.len() as u32).to_le_bytes());
            central.extend_from_slice(&(data.len() as u32).to_le_bytes());
            central.extend_from_slice(&(name.len() as u16).to_le_bytes());
            central.extend_from_slice(&0u16.to_le_bytes()); // extra len
            central.extend_from_slice(&0u16.to_le_bytes()); // comment len
            central.extend_from_slice(&0u16.to_le_bytes()); // disk
            central.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
            central.extend_from_slice(&0u32.to_le_bytes()); // external attrs
            central.extend_from_slice(&offset.to_le_bytes());
            central.extend_from_slice(name.as_bytes());
        }
        let cd_offset = out.len() as u32;
        out.extend_from_slice(&central);
        let cd_size = out.len() as u32 - cd_offset;
        out.extend_from_slice(&[0x50, 0x4b, 0x05, 0x06]);
        out.extend_from_slice(&0u16.to_le_bytes()); // disk
        out.extend_from_slice(&0u16.to_le_bytes()); // cd start disk
        out.extend_from_slice(&(members.len() as u16).to_le_bytes());
        out.extend_from_slice(&(members.len() as u16).to_le_bytes());
        out.extend_from_slice(&cd_size.to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes()); // comment len
        out
    }

    const SHEET: &str = r#"<?xml version="1.0"?><worksheet><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2"><v>1</v></c><c r="B2"><v>-1</v></c></row>
<row r="3"><c r="B3" t="inlineStr"><is><t>inline</t></is></c></row>
</sheetData></worksheet>"#;

    const SHARED: &str = "<sst><si><t>name</t></si><si><t>a &amp; b</t></si></sst>";

    #[test]
    fn reads_stored_workbook() {
        let zip = stored_zip(&[
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", SHEET),
        ]);
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&zip).unwrap();

        let grid = read_grid(f.path()).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec!["name", "a & b"]);
        assert_eq!(grid[1], vec!["1", "-1"]);
        // Cell A3 absent: padded with empty string.
        assert_eq!(grid[2], vec!["", "inline"]);
    }

    #[test]
    fn rejects_non_zip() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"definitely,not,a,workbook").unwrap();
        assert!(read_grid(f.path()).is_err());
    }

    #[test]
    fn col_index_parses_refs() {
        assert_eq!(col_index("A1"), Some(0));
        assert_eq!(col_index("B2"), Some(1));
        assert_eq!(col_index("Z9"), Some(25));
        assert_eq!(col_index("AA1"), Some(26));
        assert_eq!(col_index("12"), None);
    }

    #[test]
    fn unescape_entities() {
        assert_eq!(unescape("a &lt;b&gt; &amp; &#65;&#x42;"), "a <b> & AB");
        assert_eq!(unescape("plain"), "plain");
    }
}
