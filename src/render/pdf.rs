//! Serialises a [`Layout`] as an uncompressed PDF 1.4 document using the
//! built-in Helvetica font.

use std::io::{self, Write};

use super::{
    layout::{Align, DocumentInfo, Element, Layout, PAGE_HEIGHT, PAGE_WIDTH, Rgb},
    metrics::text_width,
};

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Line width of frames, in points.
const FRAME_LINE_WIDTH: f32 = 0.57;

/// Control point distance for approximating a quarter circle with a cubic
/// Bézier curve, as a fraction of the radius.
const KAPPA: f32 = 0.552_284_8;

const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT: usize = 3;
const INFO: usize = 4;
const FIRST_PAGE: usize = 5;

/// Write `layout` to `out` as a complete PDF file.
///
/// Page `i` (zero-based) is object `5 + 2i` and its content stream is the
/// object that follows it.
///
/// # Errors
///
/// Returns any error raised by `out`.
pub fn write_pdf<W: Write>(layout: &Layout, out: W) -> io::Result<()> {
    let mut pdf = PdfWriter::new(out);
    pdf.raw(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;

    pdf.object(CATALOG, format!("<< /Type /Catalog /Pages {PAGES} 0 R >>").as_bytes())?;

    let kids: Vec<String> = (0..layout.pages().len())
        .map(|index| format!("{} 0 R", page_object(index)))
        .collect();
    pdf.object(
        PAGES,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            layout.pages().len()
        )
        .as_bytes(),
    )?;

    pdf.object(
        FONT,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    )?;

    pdf.object(INFO, &info_dictionary(layout.info()))?;

    for (index, page) in layout.pages().iter().enumerate() {
        let object = page_object(index);
        pdf.object(
            object,
            format!(
                "<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 {FONT} 0 R >> >> /Contents {} 0 R >>",
                number(PAGE_WIDTH * PT_PER_MM),
                number(PAGE_HEIGHT * PT_PER_MM),
                object + 1
            )
            .as_bytes(),
        )?;

        let mut content = Vec::new();
        for element in page.elements() {
            draw(&mut content, element)?;
        }
        pdf.stream(object + 1, &content)?;
    }

    pdf.finish()
}

const fn page_object(index: usize) -> usize {
    FIRST_PAGE + 2 * index
}

/// Tracks byte offsets of objects for the cross-reference table.
struct PdfWriter<W> {
    inner: W,
    position: usize,
    offsets: Vec<usize>,
}

impl<W: Write> PdfWriter<W> {
    const fn new(inner: W) -> Self {
        Self {
            inner,
            position: 0,
            offsets: Vec::new(),
        }
    }

    fn raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)?;
        self.position += bytes.len();
        Ok(())
    }

    fn begin(&mut self, id: usize) -> io::Result<()> {
        debug_assert_eq!(id, self.offsets.len() + 1, "objects are written in order");
        self.offsets.push(self.position);
        self.raw(format!("{id} 0 obj\n").as_bytes())
    }

    fn object(&mut self, id: usize, body: &[u8]) -> io::Result<()> {
        self.begin(id)?;
        self.raw(body)?;
        self.raw(b"\nendobj\n")
    }

    fn stream(&mut self, id: usize, data: &[u8]) -> io::Result<()> {
        self.begin(id)?;
        self.raw(format!("<< /Length {} >>\nstream\n", data.len()).as_bytes())?;
        self.raw(data)?;
        self.raw(b"\nendstream\nendobj\n")
    }

    fn finish(mut self) -> io::Result<()> {
        let xref = self.position;
        let size = self.offsets.len() + 1;

        self.raw(format!("xref\n0 {size}\n0000000000 65535 f \n").as_bytes())?;
        for offset in std::mem::take(&mut self.offsets) {
            self.raw(format!("{offset:010} 00000 n \n").as_bytes())?;
        }

        self.raw(
            format!(
                "trailer\n<< /Size {size} /Root {CATALOG} 0 R /Info {INFO} 0 R >>\n\
                 startxref\n{xref}\n%%EOF\n"
            )
            .as_bytes(),
        )?;
        self.inner.flush()
    }
}

fn info_dictionary(info: &DocumentInfo) -> Vec<u8> {
    let mut dict = b"<< ".to_vec();
    for (key, value) in [
        ("Title", info.title.as_str()),
        ("Subject", info.subject.as_str()),
        ("Author", info.author.as_str()),
        ("Keywords", info.keywords.as_str()),
        ("Creator", info.creator.as_str()),
    ] {
        dict.extend_from_slice(format!("/{key} ").as_bytes());
        dict.extend(literal(value));
        dict.push(b' ');
    }
    dict.extend_from_slice(
        format!("/CreationDate (D:{}000000Z) >>", info.created.format("%Y%m%d")).as_bytes(),
    );
    dict
}

fn draw(out: &mut Vec<u8>, element: &Element) -> io::Result<()> {
    match element {
        Element::Text {
            x,
            y,
            size,
            color,
            align,
            text,
        } => {
            let left = match align {
                Align::Left => *x,
                Align::Center => x - text_width(text, *size) / 2.0,
            };
            write!(
                out,
                "BT /F1 {} Tf {} rg {} {} Td ",
                number(*size),
                color_operands(*color),
                number(left * PT_PER_MM),
                number((PAGE_HEIGHT - y) * PT_PER_MM),
            )?;
            out.extend(literal(text));
            out.extend_from_slice(b" Tj ET\n");
        }
        Element::Frame {
            x,
            y,
            width,
            height,
            color,
        } => {
            writeln!(
                out,
                "{} RG {} w {} {} {} {} re S",
                color_operands(*color),
                number(FRAME_LINE_WIDTH),
                number(x * PT_PER_MM),
                number((PAGE_HEIGHT - y - height) * PT_PER_MM),
                number(width * PT_PER_MM),
                number(height * PT_PER_MM),
            )?;
        }
        Element::Badge {
            x,
            y,
            width,
            height,
            radius,
            color,
        } => rounded_rect(out, *x, *y, *width, *height, *radius, *color)?,
    }
    Ok(())
}

fn rounded_rect(
    out: &mut Vec<u8>,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    radius: f32,
    color: Rgb,
) -> io::Result<()> {
    let x0 = x * PT_PER_MM;
    let x1 = (x + width) * PT_PER_MM;
    let y0 = (PAGE_HEIGHT - y - height) * PT_PER_MM;
    let y1 = (PAGE_HEIGHT - y) * PT_PER_MM;
    let r = radius * PT_PER_MM;
    let k = r * KAPPA;

    let point = |px: f32, py: f32| format!("{} {}", number(px), number(py));

    writeln!(out, "q {} rg", color_operands(color))?;
    writeln!(out, "{} m", point(x0 + r, y0))?;
    writeln!(out, "{} l", point(x1 - r, y0))?;
    writeln!(
        out,
        "{} {} {} c",
        point(x1 - r + k, y0),
        point(x1, y0 + r - k),
        point(x1, y0 + r)
    )?;
    writeln!(out, "{} l", point(x1, y1 - r))?;
    writeln!(
        out,
        "{} {} {} c",
        point(x1, y1 - r + k),
        point(x1 - r + k, y1),
        point(x1 - r, y1)
    )?;
    writeln!(out, "{} l", point(x0 + r, y1))?;
    writeln!(
        out,
        "{} {} {} c",
        point(x0 + r - k, y1),
        point(x0, y1 - r + k),
        point(x0, y1 - r)
    )?;
    writeln!(out, "{} l", point(x0, y0 + r))?;
    writeln!(
        out,
        "{} {} {} c",
        point(x0, y0 + r - k),
        point(x0 + r - k, y0),
        point(x0 + r, y0)
    )?;
    writeln!(out, "h f Q")
}

fn number(value: f32) -> String {
    format!("{value:.2}")
}

fn color_operands(Rgb(r, g, b): Rgb) -> String {
    let channel = |c: u8| format!("{:.3}", f32::from(c) / 255.0);
    format!("{} {} {}", channel(r), channel(g), channel(b))
}

/// `text` as a PDF literal string in `WinAnsiEncoding`.
fn literal(text: &str) -> Vec<u8> {
    let mut out = vec![b'('];
    for byte in text.chars().map(win_ansi) {
        match byte {
            b'(' | b')' | b'\\' => out.extend_from_slice(&[b'\\', byte]),
            0x80..=0xFF => out.extend_from_slice(format!("\\{byte:03o}").as_bytes()),
            _ => out.push(byte),
        }
    }
    out.push(b')');
    out
}

/// The `WinAnsiEncoding` code of `c`, or `?` if the encoding has none.
fn win_ansi(c: char) -> u8 {
    match c {
        ' '..='~' | '\u{A0}'..='\u{FF}' => u8::try_from(c).unwrap_or(b'?'),
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}
