use crate::encoding::to_win_ansi;

/// Builds a page content stream one operator per line.
#[derive(Debug, Default, Clone)]
pub struct ContentStream {
    buf: Vec<u8>,
    text_open: bool,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_text(&mut self) -> &mut Self {
        if !self.text_open {
            self.buf.extend_from_slice(b"BT\n");
            self.text_open = true;
        }
        self
    }

    pub fn end_text(&mut self) -> &mut Self {
        if self.text_open {
            self.buf.extend_from_slice(b"ET\n");
            self.text_open = false;
        }
        self
    }

    /// `Tf`: selects a font resource by name.
    pub fn set_font(&mut self, resource: &str, size: f32) -> &mut Self {
        self.line(format!("/{resource} {} Tf", fmt_num(size)))
    }

    /// `Tm`: places the text cursor at an absolute position.
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.line(format!("1 0 0 1 {} {} Tm", fmt_num(x), fmt_num(y)))
    }

    /// `Tj`: shows a literal string, WinAnsi-encoded and escaped.
    pub fn show_text(&mut self, text: &str) -> &mut Self {
        self.buf.extend_from_slice(&literal_string(text));
        self.buf.extend_from_slice(b" Tj\n");
        self
    }

    fn line(&mut self, op: String) -> &mut Self {
        self.buf.extend_from_slice(op.as_bytes());
        self.buf.push(b'\n');
        self
    }

    /// Closes any open text object and returns the payload.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.end_text();
        self.buf
    }
}

/// Encodes `text` as a parenthesised PDF literal string.
pub fn literal_string(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 2);
    out.push(b'(');
    out.extend(escape_literal(&to_win_ansi(text)));
    out.push(b')');
    out
}

/// Backslash-escapes `\`, `(` and `)` in a single pass.
pub fn escape_literal(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        if matches!(b, b'\\' | b'(' | b')') {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}

fn fmt_num(n: f32) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        let s = format!("{n:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
