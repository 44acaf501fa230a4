const PREFIX: &str = "compressed_";
const MAX_STEM_LEN: usize = 120;

/// Download name for a compressed upload: `compressed_{sanitized_original}`.
///
/// The result is safe to place in a `Content-Disposition` header and on any
/// common filesystem; it always ends in `.pdf`.
pub fn compressed_file_name(original: &str) -> String {
    // Browsers may send a full client-side path; keep the last component only.
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);
    let sanitized = sanitize_name(base);
    let stem = strip_pdf_extension(&sanitized);
    let stem = if stem.is_empty() { "document" } else { stem };
    format!("{PREFIX}{stem}.pdf")
}

fn sanitize_name(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    // Collapse runs of underscores left behind by replacements.
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }

    if compacted.len() > MAX_STEM_LEN {
        let mut cut = MAX_STEM_LEN;
        while !compacted.is_char_boundary(cut) {
            cut -= 1;
        }
        compacted.truncate(cut);
    }
    compacted
}

fn strip_pdf_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case("pdf") => stem.trim_end_matches('.'),
        _ => name,
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ';' | '\0'..='\u{1F}' | '\u{7F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_plain_names() {
        assert_eq!(compressed_file_name("sample.pdf"), "compressed_sample.pdf");
        assert_eq!(compressed_file_name("Report 2024.PDF"), "compressed_Report 2024.pdf");
    }

    #[test]
    fn adds_missing_extension() {
        assert_eq!(compressed_file_name("scan"), "compressed_scan.pdf");
        assert_eq!(compressed_file_name(""), "compressed_document.pdf");
        assert_eq!(compressed_file_name("..."), "compressed_document.pdf");
    }

    #[test]
    fn drops_client_paths_and_header_breaking_characters() {
        assert_eq!(
            compressed_file_name("C:\\Users\\me\\invoice.pdf"),
            "compressed_invoice.pdf"
        );
        assert_eq!(compressed_file_name("../../etc/passwd"), "compressed_passwd.pdf");
        assert_eq!(
            compressed_file_name("a\"b\r\nc;d.pdf"),
            "compressed_a_b_c_d.pdf"
        );
    }

    #[test]
    fn caps_long_names_on_char_boundary() {
        let long = "é".repeat(200) + ".pdf";
        let name = compressed_file_name(&long);
        assert!(name.starts_with("compressed_é"));
        assert!(name.ends_with(".pdf"));
        assert!(name.len() <= PREFIX.len() + MAX_STEM_LEN + ".pdf".len());
    }
}
