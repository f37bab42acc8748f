//! Minimal PDF writer for plain-text documents.
//!
//! Produces PDF 1.4 with a single built-in Courier font, one text object per
//! page, and a correct cross-reference table. Characters outside printable
//! ASCII are replaced with `?`.

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const MARGIN: u32 = 54;
const FONT_SIZE: u32 = 10;
const LEADING: u32 = 13;
const WRAP_COLUMNS: usize = 86;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

// Object numbers 1-3 are the catalog, page tree, and font; pages follow in
// (page, contents) pairs.
const FIRST_PAGE_OBJECT: usize = 4;

pub(crate) fn render_text_document(lines: &[String]) -> Vec<u8> {
    let wrapped: Vec<String> = lines.iter().flat_map(|line| wrap(line)).collect();
    let pages: Vec<&[String]> = if wrapped.is_empty() {
        vec![&wrapped[..]]
    } else {
        wrapped.chunks(LINES_PER_PAGE).collect()
    };

    let page_refs = (0..pages.len())
        .map(|index| format!("{} 0 R", FIRST_PAGE_OBJECT + index * 2))
        .collect::<Vec<_>>()
        .join(" ");

    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{page_refs}] /Count {} >>",
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Courier >>".to_string(),
    ];

    for (index, page) in pages.iter().enumerate() {
        let contents_object = FIRST_PAGE_OBJECT + index * 2 + 1;
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
/Resources << /Font << /F1 3 0 R >> >> /Contents {contents_object} 0 R >>"
        ));
        let stream = content_stream(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", index + 1).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(
        format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).as_bytes(),
    );
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

fn content_stream(lines: &[String]) -> String {
    let top = PAGE_HEIGHT - MARGIN - FONT_SIZE;
    let mut stream = format!("BT\n/F1 {FONT_SIZE} Tf\n{LEADING} TL\n{MARGIN} {top} Td\n");
    for line in lines {
        stream.push('(');
        stream.push_str(&escape(line));
        stream.push_str(") Tj\nT*\n");
    }
    stream.push_str("ET");
    stream
}

fn wrap(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(WRAP_COLUMNS)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn escape(line: &str) -> String {
    let mut escaped = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '\t' => escaped.push(' '),
            ' '..='~' => escaped.push(ch),
            _ => escaped.push('?'),
        }
    }
    escaped
}
