#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    // Plain text only: no markup, no character references.
    if !s
        .chars()
        .all(|c| (c.is_ascii_graphic() && c != '<' && c != '&') || c == ' ' || c == '\n')
    {
        return;
    }

    let output = html2typst::convert(s);
    let norm_in: Vec<&str> = s.split_whitespace().collect();
    let unescaped = unescape(&output);
    let norm_out: Vec<&str> = unescaped.split_whitespace().collect();
    assert_eq!(norm_in, norm_out, "text changed through conversion");
});

fn unescape(typst: &str) -> String {
    let mut out = String::with_capacity(typst.len());
    let mut chars = typst.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
