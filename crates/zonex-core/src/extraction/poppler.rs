use crate::error::ZonexError;
use crate::extraction::{Fragment, PageImage, PageText, PdfBackend};
use std::path::Path;
use std::process::Command;

/// PDF backend shelling out to poppler-utils.
///
/// Uses `pdftotext -layout` for whitespace-aligned page text,
/// `pdftotext -bbox-layout` for positioned fragments, and
/// `pdftoppm -gray` to render pages for OCR.
pub struct PopplerBackend;

impl PopplerBackend {
    pub fn new() -> Self {
        PopplerBackend
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    /// Check if pdftoppm is available, needed only for the OCR path.
    pub fn can_render() -> bool {
        Command::new("pdftoppm")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PopplerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend for PopplerBackend {
    fn extract_pages(&self, pdf: &Path) -> Result<Vec<PageText>, ZonexError> {
        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(pdf)
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ZonexError::PdftotextNotFound
                } else {
                    ZonexError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ZonexError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout);

        // Split into pages (pdftotext uses form feed \x0c as page separator)
        let mut pages: Vec<PageText> = text
            .split('\x0c')
            .enumerate()
            .map(|(i, page_text)| PageText {
                page_number: i + 1,
                lines: page_text.lines().map(|l| l.to_string()).collect(),
            })
            .collect();

        // The output ends with a form feed, so the split leaves one empty
        // trailing entry. Drop only that; interior empty pages are real
        // pages (scanned documents have no text layer at all) and the page
        // count must survive for rendering.
        if pages.len() > 1 && pages.last().is_some_and(|p| p.lines.is_empty()) {
            pages.pop();
        }

        Ok(pages)
    }

    fn extract_fragments(&self, pdf: &Path) -> Result<Vec<Fragment>, ZonexError> {
        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(pdf)
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ZonexError::PdftotextNotFound
                } else {
                    ZonexError::Extraction(format!("pdftotext -bbox-layout failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ZonexError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        Ok(parse_bbox_fragments(&xml))
    }

    fn render_page(&self, pdf: &Path, page: usize, dpi: u32) -> Result<PageImage, ZonexError> {
        let dir = tempfile::tempdir()?;
        let prefix = dir.path().join("page");
        let page_arg = (page + 1).to_string();

        let output = Command::new("pdftoppm")
            .arg("-gray")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(&page_arg)
            .arg("-l")
            .arg(&page_arg)
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ZonexError::PdftoppmNotFound
                } else {
                    ZonexError::Extraction(format!("pdftoppm failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ZonexError::PdftoppmFailed { code, stderr });
        }

        // pdftoppm pads the page number in the file name, so glob the
        // temp directory rather than guess the exact name.
        let mut rendered: Vec<_> = std::fs::read_dir(dir.path())?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().map(|ext| ext == "pgm").unwrap_or(false))
            .collect();
        rendered.sort();

        let image_path = rendered.into_iter().next().ok_or_else(|| {
            ZonexError::Extraction(format!(
                "pdftoppm produced no image for page {}",
                page + 1
            ))
        })?;

        let data = std::fs::read(&image_path)?;
        PageImage::from_pgm(&data)
    }

    fn backend_name(&self) -> &str {
        "poppler"
    }
}

/// Parse the `-bbox-layout` XML into one fragment per text line.
///
/// The output is a fixed four-level page/flow/block/line/word nesting
/// with attributes in a known order, so a line scanner is enough and
/// keeps the XML dependency out of the tree.
fn parse_bbox_fragments(xml: &str) -> Vec<Fragment> {
    let mut out = Vec::new();
    let mut page: Option<usize> = None;
    let mut line_pos: Option<(f32, f32)> = None;
    let mut words: Vec<String> = Vec::new();

    for raw in xml.lines() {
        let line = raw.trim();

        if line.starts_with("<page") {
            // Recent poppler omits the number attribute, pages arrive in order.
            page = Some(match parse_attr_usize(line, "number") {
                Some(n) => n.saturating_sub(1),
                None => page.map(|p| p + 1).unwrap_or(0),
            });
            continue;
        }

        if line.starts_with("<line ") {
            line_pos = parse_position(line);
            words.clear();
            continue;
        }

        if line.starts_with("<word ") {
            if let Some(word_text) = parse_word_text(line) {
                let w = decode_xml_entities(&word_text).trim().to_string();
                if !w.is_empty() {
                    words.push(w);
                }
            }
            continue;
        }

        if line.starts_with("</line>") {
            if let (Some(page), Some((x, y))) = (page, line_pos.take()) {
                let text = words.join(" ");
                if !text.is_empty() {
                    out.push(Fragment { text, x, y, page });
                }
            }
            words.clear();
        }
    }

    out
}

fn parse_attr_usize(tag: &str, name: &str) -> Option<usize> {
    parse_attr(tag, name)?.parse().ok()
}

fn parse_attr_f32(tag: &str, name: &str) -> Option<f32> {
    parse_attr(tag, name)?.parse().ok()
}

fn parse_attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{}=\"", name);
    let start = tag.find(&needle)? + needle.len();
    let rest = &tag[start..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

/// Top-left corner of a `<line>` element.
fn parse_position(line_tag: &str) -> Option<(f32, f32)> {
    Some((
        parse_attr_f32(line_tag, "xMin")?,
        parse_attr_f32(line_tag, "yMin")?,
    ))
}

fn parse_word_text(word_tag: &str) -> Option<String> {
    let start = word_tag.find('>')? + 1;
    let end = word_tag.rfind("</word>")?;
    Some(word_tag[start..end].to_string())
}

fn decode_xml_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}
